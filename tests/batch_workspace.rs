//! End-to-end batch runs through a temporary workspace
//!
//! Upload → load → compare → write results, the path the CLI takes.

use pairsim::engine::cache::{DumpCache, CACHE_FILE_NAME};
use pairsim::engine::{pair_count, SkipReason};
use pairsim::{BatchEngine, PairsimConfig, PairsimError, ReportFormat, SourceFile, Workspace};
use std::collections::HashSet;

const ADD: &str = "def add(a, b):\n    return a + b\n";
const SUM: &str = "def total(x, y):\n    # renamed copy\n    return x + y\n";
const LOOP: &str = "for i in range(10):\n    if i % 2:\n        print(i)\n";
const BROKEN: &str = "def add(a, b:\n    return a + b\n";

fn workspace() -> (tempfile::TempDir, Workspace) {
    let dir = tempfile::tempdir().unwrap();
    let ws = Workspace::new(dir.path().join("uploads"), dir.path().join("results"));
    ws.ensure_dirs().unwrap();
    (dir, ws)
}

#[test]
fn three_uploads_produce_three_pairs() {
    let (_dir, ws) = workspace();
    ws.store_upload("add.py", ADD.as_bytes()).unwrap();
    ws.store_upload("sum.py", SUM.as_bytes()).unwrap();
    ws.store_upload("loop.py", LOOP.as_bytes()).unwrap();

    let loaded = ws.load_upload_dir();
    assert_eq!(loaded.files.len(), 3);

    let report = BatchEngine::default().compare(&loaded.files).unwrap();
    assert_eq!(report.pairs.len(), pair_count(3));

    let mut seen = HashSet::new();
    for pair in &report.pairs {
        assert_ne!(pair.file_a, pair.file_b, "no self pairs");
        let key = if pair.file_a < pair.file_b {
            (pair.file_a.clone(), pair.file_b.clone())
        } else {
            (pair.file_b.clone(), pair.file_a.clone())
        };
        assert!(seen.insert(key), "no duplicate pairs");
    }

    // Files load in name order: add.py, loop.py, sum.py
    let order: Vec<(&str, &str)> = report
        .pairs
        .iter()
        .map(|p| (p.file_a.as_str(), p.file_b.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![("add.py", "loop.py"), ("add.py", "sum.py"), ("loop.py", "sum.py")]
    );

    // The renamed copy shares the structure of the original exactly
    let add_sum = &report.pairs[1];
    assert_eq!(add_sum.structural_ratio, 1.0);
    assert!(add_sum.score > report.pairs[0].score);
}

#[test]
fn malformed_file_degrades_instead_of_failing() {
    let files = vec![SourceFile::new("ok.py", ADD), SourceFile::new("broken.py", BROKEN)];
    let report = BatchEngine::default().compare(&files).unwrap();
    assert_eq!(report.pairs.len(), 1);
    assert_eq!(report.pairs[0].structural_ratio, 0.0);
    assert!(report.pairs[0].raw_ratio > 0.9);
    assert!(!report.files[1].parseable);
}

#[test]
fn write_all_result_files() {
    let (_dir, ws) = workspace();
    let files = vec![
        SourceFile::new("add.py", ADD),
        SourceFile::new("sum.py", SUM),
        SourceFile::new("broken.py", BROKEN),
    ];
    let report = BatchEngine::default().compare(&files).unwrap();
    let written = ws.write_results(&report, &ReportFormat::ALL).unwrap();
    assert_eq!(written.len(), 4);

    let csv = std::fs::read_to_string(ws.result_dir().join("result.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("File 1,File 2,Similarity (%)"));
    assert_eq!(lines.count(), 3);

    let svg = std::fs::read_to_string(ws.result_dir().join("graph.svg")).unwrap();
    assert!(svg.contains("add.py ↔ sum.py"));

    let json = std::fs::read_to_string(ws.result_dir().join("result.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["pairs"].as_array().map(Vec::len), Some(3));

    let md = std::fs::read_to_string(ws.result_dir().join("result.md")).unwrap();
    assert!(md.contains("`broken.py`"));
}

#[test]
fn skipped_files_carried_into_report() {
    let (_dir, ws) = workspace();
    std::fs::write(ws.upload_dir().join("a.py"), ADD).unwrap();
    std::fs::write(ws.upload_dir().join("image.png"), [0x89, 0x50, 0x4e, 0x47, 0xff]).unwrap();

    let loaded = ws.load_upload_dir();
    let report = BatchEngine::default()
        .compare(&loaded.files)
        .unwrap()
        .with_skipped(loaded.skipped);

    assert!(report.pairs.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].reason, SkipReason::NotUtf8);
}

#[test]
fn persistent_cache_survives_runs() {
    let (_dir, ws) = workspace();
    let files = vec![SourceFile::new("a.py", ADD), SourceFile::new("b.py", LOOP)];
    let engine = BatchEngine::default();

    let mut cache = DumpCache::load(ws.result_dir());
    let first = engine.compare_with_cache(&files, &mut cache).unwrap();
    assert_eq!(first.cache_hit_rate, Some(0.0));
    cache.save().unwrap();
    assert!(ws.result_dir().join(CACHE_FILE_NAME).exists());

    let mut reloaded = DumpCache::load(ws.result_dir());
    let second = engine.compare_with_cache(&files, &mut reloaded).unwrap();
    assert_eq!(second.cache_hit_rate, Some(1.0));
    assert_eq!(first.pairs, second.pairs);
}

#[test]
fn pair_limit_enforced() {
    let engine = BatchEngine::new(PairsimConfig {
        max_pairs: 5,
        ..PairsimConfig::default()
    });
    let files: Vec<SourceFile> = (0..4)
        .map(|i| SourceFile::new(format!("f{}.py", i), format!("x = {}", i)))
        .collect();
    let err = engine.compare(&files).unwrap_err();
    assert!(matches!(err, PairsimError::BatchTooLarge { pairs: 6, limit: 5 }));
}
