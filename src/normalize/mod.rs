//! Structural normalizer: source text to canonical structural dump
//!
//! Parsing produces a language-neutral [`SyntaxNode`] tree. The dump is a
//! pre-order serialization of that tree that keeps node kinds, grammar
//! field roles and operator tokens, and drops everything a renaming or
//! reformatting pass could change: identifier names, literal values,
//! whitespace, and comments.
//!
//! ```text
//! "x = 1"  ─┐
//!           ├─▶ module(expression_statement(assignment(left=identifier,right=integer)))
//! "y = 2"  ─┘
//! ```
//!
//! Malformed input maps to [`ParseOutcome::Unparseable`], whose dump is the
//! empty string. Callers still get a raw-text comparison for those files.

mod python;

use serde::{Deserialize, Serialize};

// ─── Syntax Tree ───────────────────────────────────────────────────

/// A node of the parsed source tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    /// Grammar node kind (e.g. `function_definition`, `identifier`, `+`)
    pub kind: String,
    /// Field role this node fills in its parent (e.g. `left`, `body`)
    pub field: Option<String>,
    /// Source text for leaf tokens and string literals. Never dumped.
    pub literal: Option<String>,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn branch(kind: impl Into<String>, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind: kind.into(),
            field: None,
            literal: None,
            children,
        }
    }

    pub fn leaf(kind: impl Into<String>, literal: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            field: None,
            literal: Some(literal.into()),
            children: Vec::new(),
        }
    }

    /// Attach the field role this node fills in its parent
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including `self`
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SyntaxNode::node_count).sum::<usize>()
    }
}

// ─── Parse Outcome ─────────────────────────────────────────────────

/// Result of parsing one source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed(SyntaxNode),
    /// The text is not valid source for the grammar
    Unparseable,
}

impl ParseOutcome {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    /// Map the outcome to its structural dump. `Unparseable` becomes `""`.
    pub fn into_dump(self) -> String {
        match self {
            Self::Parsed(tree) => dump(&tree),
            Self::Unparseable => String::new(),
        }
    }
}

// ─── Core Functions ────────────────────────────────────────────────

/// Parse Python source into a syntax tree.
pub fn parse(text: &str) -> ParseOutcome {
    python::parse(text)
}

/// Normalize source text into its structural dump (`""` if unparseable).
pub fn normalize(text: &str) -> String {
    parse(text).into_dump()
}

/// Canonical pre-order serialization of a syntax tree.
///
/// A childless node prints as `kind`; a node with children prints as
/// `kind(child,child,...)`. Children that fill a named field are prefixed
/// with `field=`. Literals are never printed.
pub fn dump(node: &SyntaxNode) -> String {
    let mut out = String::with_capacity(node.node_count() * 16);
    write_node(node, &mut out);
    out
}

fn write_node(node: &SyntaxNode, out: &mut String) {
    if let Some(field) = &node.field {
        out.push_str(field);
        out.push('=');
    }
    out.push_str(&node.kind);

    if node.is_leaf() {
        return;
    }
    out.push('(');
    for (i, child) in node.children.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_node(child, out);
    }
    out.push(')');
}

// ─── Tests ─────────────────────────────────────────────────────────
