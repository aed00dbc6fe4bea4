//! Integration tests for conf-cleaner
//!
//! These exercise the full pipeline over a file-backed store living in
//! a temporary directory, plus the CLI binary itself.

use assert_cmd::Command;
use conf_cleaner::cleaner::CleanerSession;
use conf_cleaner::export;
use conf_cleaner::store::{seed_dir, ConfValue, FileStore};
use conf_cleaner::UnknownPair;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

/// The store from the worked example: /a holds one known and one
/// orphaned entry, /a/b one orphaned entry.
fn seed_example(root: &Path) {
    seed_dir(
        root,
        "/a",
        &[
            ("k1", ConfValue::Int(5), Some("s1")),
            ("k2", ConfValue::String("x".into()), None),
        ],
    )
    .unwrap();
    seed_dir(root, "/a/b", &[("k3", ConfValue::Bool(true), None)]).unwrap();
}

fn scan(root: &Path) -> (CleanerSession<FileStore>, Vec<UnknownPair>) {
    let store = FileStore::open(root).unwrap();
    let mut session = CleanerSession::new(store);
    session.update().unwrap();

    let mut pairs = Vec::new();
    while session.has_next_dir() {
        pairs.extend(session.classify_next_dir().unwrap().unknown);
    }
    (session, pairs)
}

#[test]
fn test_full_scan_over_file_store() {
    let tmp = tempdir().unwrap();
    seed_example(tmp.path());

    let (session, pairs) = scan(tmp.path());

    assert_eq!(session.dirs(), ["/a", "/a/b"]);
    assert_eq!(session.dir_count(), 2);
    assert_eq!(session.entry_count(), 3);
    assert_eq!(session.unknown_entry_count(), 2);

    let keys: Vec<_> = pairs.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, ["/a/k2", "/a/b/k3"]);
}

#[test]
fn test_rescan_matches_first_scan() {
    let tmp = tempdir().unwrap();
    seed_example(tmp.path());

    let (first, _) = scan(tmp.path());
    let (second, _) = scan(tmp.path());

    assert_eq!(first.dirs(), second.dirs());
    assert_eq!(first.entry_count(), second.entry_count());
    assert_eq!(first.unknown_entry_count(), second.unknown_entry_count());
}

#[test]
fn test_dump_file_contents() {
    let tmp = tempdir().unwrap();
    seed_example(tmp.path());
    let (_, pairs) = scan(tmp.path());

    let dump_path = tmp.path().join("orphans.reg");
    export::write_dump(&dump_path, "/", &pairs).unwrap();

    let doc = std::fs::read_to_string(&dump_path).unwrap();
    assert!(doc.starts_with("<entryfile>\n"));
    assert!(doc.contains("<key>/a/k2</key>"));
    assert!(doc.contains("<string>x</string>"));
    assert!(doc.contains("<key>/a/b/k3</key>"));
    assert!(doc.contains("<bool>true</bool>"));
    assert!(!doc.contains("/a/k1"));
}

#[test]
fn test_cleanup_removes_only_orphans() {
    let tmp = tempdir().unwrap();
    seed_example(tmp.path());
    let (mut session, pairs) = scan(tmp.path());

    for pair in &pairs {
        session.unset_key(&pair.key).unwrap();
    }
    session.sync().unwrap();

    // A fresh store sees only the schema-backed key
    let (session, remaining) = scan(tmp.path());
    assert!(remaining.is_empty());
    assert_eq!(session.entry_count(), 1);
    assert_eq!(session.unknown_entry_count(), 0);
}

#[test]
fn test_cli_report_mode_lists_orphans() {
    let tmp = tempdir().unwrap();
    seed_example(tmp.path());

    Command::cargo_bin("conf-cleaner")
        .unwrap()
        .arg(tmp.path())
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::contains("/a/k2"))
        .stdout(predicate::str::contains("/a/b/k3"))
        .stdout(predicate::str::contains("/a/k1").not());
}

#[test]
fn test_cli_delete_with_yes() {
    let tmp = tempdir().unwrap();
    seed_example(tmp.path());

    Command::cargo_bin("conf-cleaner")
        .unwrap()
        .arg(tmp.path())
        .args(["--delete", "-y", "--no-backup", "-q"])
        .assert()
        .success();

    let (session, pairs) = scan(tmp.path());
    assert!(pairs.is_empty());
    assert_eq!(session.entry_count(), 1);
}

#[test]
fn test_cli_rejects_missing_store() {
    Command::cargo_bin("conf-cleaner")
        .unwrap()
        .arg("/no/such/store")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_cli_export_writes_dump() {
    let tmp = tempdir().unwrap();
    seed_example(tmp.path());
    let dump = tmp.path().join("dump.reg");

    Command::cargo_bin("conf-cleaner")
        .unwrap()
        .arg(tmp.path())
        .args(["-q", "-o"])
        .arg(&dump)
        .assert()
        .success();

    let doc = std::fs::read_to_string(&dump).unwrap();
    assert!(doc.contains("<key>/a/k2</key>"));
}
