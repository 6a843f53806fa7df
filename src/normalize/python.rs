//! Python front end: tree-sitter parse tree to [`SyntaxNode`]
//!
//! Conversion rules:
//! - named nodes are kept, except comments and the pieces of a string
//!   literal (`string_start`, `string_content`, `string_end`, escapes)
//! - anonymous tokens are kept only when they fill an `operator` or
//!   `operators` field, so `a + b` and `a - b` stay distinguishable while
//!   punctuation and keywords (implied by the node kind) are dropped
//! - the `async` modifier is kept, since it changes the statement kind
//! - a tree containing any ERROR or MISSING node is unparseable
//! - so is a tree the grammar recovered without error nodes but the
//!   interpreter rejects: an empty indented block, or a Python 2
//!   `print`/`exec` statement

use super::{ParseOutcome, SyntaxNode};
use tree_sitter::{Node, Parser};

/// Node kinds erased from the tree entirely
const SKIP_KINDS: &[&str] = &[
    "comment",
    "string_start",
    "string_content",
    "string_end",
    "escape_sequence",
    "escape_interpolation",
    "line_continuation",
];

/// Fields whose anonymous tokens carry structure
const OPERATOR_FIELDS: &[&str] = &["operator", "operators"];

/// Anonymous keywords that are not implied by their parent's kind
const MODIFIER_TOKENS: &[&str] = &["async"];

/// Statement kinds the grammar accepts but Python 3 does not
const PYTHON2_KINDS: &[&str] = &["print_statement", "exec_statement"];

pub(super) fn parse(text: &str) -> ParseOutcome {
    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(&tree_sitter_python::LANGUAGE.into()) {
        tracing::error!("Python grammar rejected by tree-sitter runtime: {}", e);
        return ParseOutcome::Unparseable;
    }

    let Some(tree) = parser.parse(text, None) else {
        tracing::debug!("tree-sitter returned no tree ({} bytes)", text.len());
        return ParseOutcome::Unparseable;
    };

    let root = tree.root_node();
    if root.has_error() {
        tracing::debug!(
            "Syntax error in {} byte source, structural dump degrades to empty",
            text.len()
        );
        return ParseOutcome::Unparseable;
    }

    let tree = convert(root, None, text.as_bytes());
    if let Some(kind) = rejected_kind(&tree) {
        tracing::debug!(
            "Recovered parse with invalid {} in {} byte source, structural dump degrades to empty",
            kind,
            text.len()
        );
        return ParseOutcome::Unparseable;
    }

    ParseOutcome::Parsed(tree)
}

/// First node kind that makes a recovered tree invalid Python 3
fn rejected_kind(node: &SyntaxNode) -> Option<&str> {
    if node.kind == "block" && node.is_leaf() {
        return Some("empty block");
    }
    if PYTHON2_KINDS.contains(&node.kind.as_str()) {
        return Some(node.kind.as_str());
    }
    node.children.iter().find_map(rejected_kind)
}

fn convert(node: Node<'_>, field: Option<&str>, source: &[u8]) -> SyntaxNode {
    let mut children = Vec::new();
    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            let child_field = cursor.field_name();
            if keep(child, child_field) {
                children.push(convert(child, child_field, source));
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    let literal = if node.child_count() == 0 || node.kind() == "string" {
        node.utf8_text(source).ok().map(str::to_owned)
    } else {
        None
    };

    SyntaxNode {
        kind: node.kind().to_string(),
        field: field.map(str::to_owned),
        literal,
        children,
    }
}

fn keep(node: Node<'_>, field: Option<&str>) -> bool {
    if node.is_extra() || SKIP_KINDS.contains(&node.kind()) {
        return false;
    }
    if node.is_named() {
        return true;
    }
    MODIFIER_TOKENS.contains(&node.kind()) || field.is_some_and(|f| OPERATOR_FIELDS.contains(&f))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(src: &str) -> SyntaxNode {
        match parse(src) {
            ParseOutcome::Parsed(t) => t,
            ParseOutcome::Unparseable => panic!("failed to parse {:?}", src),
        }
    }

    #[test]
    fn test_comment_nodes_dropped() {
        let t = tree("# only a comment\n");
        assert_eq!(t.kind, "module");
        assert!(t.children.is_empty());
    }

    #[test]
    fn test_operator_token_kept_with_field() {
        let t = tree("a + b\n");
        let binop = &t.children[0].children[0];
        assert_eq!(binop.kind, "binary_operator");
        let op = binop
            .children
            .iter()
            .find(|c| c.field.as_deref() == Some("operator"))
            .expect("operator child");
        assert_eq!(op.kind, "+");
    }

    #[test]
    fn test_punctuation_dropped() {
        let t = tree("f(x)\n");
        let call = &t.children[0].children[0];
        assert_eq!(call.kind, "call");
        let args = &call.children[1];
        assert_eq!(args.kind, "argument_list");
        assert_eq!(args.children.len(), 1);
        assert_eq!(args.children[0].kind, "identifier");
    }

    #[test]
    fn test_missing_token_is_unparseable() {
        assert_eq!(parse("if x\n    pass\n"), ParseOutcome::Unparseable);
    }

    #[test]
    fn test_unindented_body_is_unparseable() {
        assert_eq!(parse("def f():\nreturn 1\n"), ParseOutcome::Unparseable);
        assert_eq!(parse("for i in x:\nprint(i)\n"), ParseOutcome::Unparseable);
    }

    #[test]
    fn test_python2_statements_are_unparseable() {
        assert_eq!(parse("print \"hi\"\n"), ParseOutcome::Unparseable);
        assert_eq!(parse("exec \"code\"\n"), ParseOutcome::Unparseable);
    }

    #[test]
    fn test_print_call_still_parses() {
        let t = tree("print(\"hi\")\n");
        assert_eq!(t.children[0].children[0].kind, "call");
    }

    #[test]
    fn test_async_modifier_kept() {
        let t = tree("async def f():\n    pass\n");
        let def = &t.children[0];
        assert_eq!(def.kind, "function_definition");
        assert_eq!(def.children[0].kind, "async");
        assert!(tree("def f():\n    pass\n").children[0]
            .children
            .iter()
            .all(|c| c.kind != "async"));
    }
}
