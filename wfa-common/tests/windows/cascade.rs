use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};
use std::{env, fs, process};

use windows::Win32::Storage::FileSystem::{
    FILE_ATTRIBUTE_ARCHIVE, FILE_ATTRIBUTE_DIRECTORY, FILE_ATTRIBUTE_HIDDEN,
    FILE_ATTRIBUTE_REPARSE_POINT,
};
use wfa_common::attributes::FileAttributes;
use wfa_common::error::{is_encoding_failure, is_invalid_path_syntax, is_not_found};
use wfa_common::query::{
    CASCADE, by_directory_enumeration, by_handle, by_metadata_lookup, stat_file_attributes,
};
use wfa_common::set::set_file_attributes;

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(label: &str) -> Self {
        let mut path = env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        path.push(format!("wfa_{label}_{}_{}", process::id(), nanos));
        fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

#[test]
fn plain_file_strategies_agree() {
    let dir = TempDir::new("plain");
    let file = dir.path.join("plain.bin");
    fs::write(&file, b"contents").expect("create file");

    let metadata = by_metadata_lookup(&file).expect("metadata lookup failed");
    let enumeration = by_directory_enumeration(&file).expect("enumeration failed");
    let handle = by_handle(&file).expect("handle query failed");

    assert!(metadata.contains(FILE_ATTRIBUTE_ARCHIVE));
    assert_eq!(metadata, enumeration);
    assert_eq!(metadata, handle);

    let cascade = stat_file_attributes(&file).expect("cascade failed");
    assert_eq!(cascade, metadata);
}

#[test]
fn normal_only_file_exhausts_the_cascade() {
    let dir = TempDir::new("normal");
    let file = dir.path.join("plain.bin");
    fs::write(&file, b"contents").expect("create file");
    set_file_attributes(&file, FileAttributes::NORMAL).expect("clear attributes");

    for (name, strategy) in &CASCADE {
        let attributes = strategy(&file).unwrap_or_else(|e| panic!("{name} failed: {e}"));
        assert!(attributes.is_normal_only(), "{name} saw {attributes:?}");
    }

    // Terminal case: the authoritative strategy confirms the sentinel.
    let cascade = stat_file_attributes(&file).expect("cascade failed");
    assert!(cascade.is_normal_only());
}

#[test]
fn directory_reported_by_every_strategy() {
    let dir = TempDir::new("dir");

    let metadata = by_metadata_lookup(&dir.path).expect("metadata lookup failed");
    let enumeration = by_directory_enumeration(&dir.path).expect("enumeration failed");
    let handle = by_handle(&dir.path).expect("handle query failed");

    for attributes in [metadata, enumeration, handle] {
        assert!(attributes.contains(FILE_ATTRIBUTE_DIRECTORY));
    }
    assert_eq!(metadata, enumeration);
    assert_eq!(metadata, handle);
}

#[test]
fn missing_path_is_not_found_everywhere() {
    let dir = TempDir::new("missing");
    let missing = dir.path.join("missing.bin");

    for (name, strategy) in &CASCADE {
        let error = strategy(&missing).expect_err("strategy found a missing file");
        assert!(is_not_found(&error), "{name} returned {error}");
    }

    let error = stat_file_attributes(&missing).expect_err("cascade found a missing file");
    assert!(is_not_found(&error));
}

#[test]
fn wildcard_matches_its_single_entry() {
    let dir = TempDir::new("wildcard");
    fs::write(dir.path.join("alpha.dat"), b"a").expect("create file");

    let pattern = dir.path.join("*.dat");
    let through_search = by_directory_enumeration(&pattern).expect("enumeration failed");
    assert!(through_search.contains(FILE_ATTRIBUTE_ARCHIVE));

    let error = by_metadata_lookup(&pattern).expect_err("metadata lookup accepted a wildcard");
    assert!(is_invalid_path_syntax(&error) || is_not_found(&error));

    // The cascade recovers through the search strategy.
    let cascade = stat_file_attributes(&pattern).expect("cascade failed");
    assert_eq!(cascade, through_search);
}

#[test]
fn wildcard_with_no_matches_surfaces_not_found() {
    let dir = TempDir::new("nomatch");
    let pattern = dir.path.join("*.go2");

    let error = by_directory_enumeration(&pattern).expect_err("search matched something");
    assert!(is_not_found(&error));

    let error = stat_file_attributes(&pattern).expect_err("cascade matched something");
    assert!(is_not_found(&error) || is_invalid_path_syntax(&error));
}

#[test]
fn repeated_queries_return_identical_masks() {
    let dir = TempDir::new("idem");
    let file = dir.path.join("stable.bin");
    fs::write(&file, b"contents").expect("create file");

    let first = stat_file_attributes(&file).expect("first query failed");
    let second = stat_file_attributes(&file).expect("second query failed");
    assert_eq!(first, second);
}

#[test]
fn hidden_flag_round_trips_through_set() {
    let dir = TempDir::new("hidden");
    let file = dir.path.join("tucked.bin");
    fs::write(&file, b"contents").expect("create file");

    let base = stat_file_attributes(&file).expect("base query failed");
    assert!(!base.contains(FILE_ATTRIBUTE_HIDDEN));

    set_file_attributes(&file, base.with(FILE_ATTRIBUTE_HIDDEN)).expect("set failed");
    let hidden = stat_file_attributes(&file).expect("query after set failed");
    assert!(hidden.contains(FILE_ATTRIBUTE_HIDDEN));
    assert_eq!(hidden.without(FILE_ATTRIBUTE_HIDDEN), base);

    set_file_attributes(&file, base).expect("restore failed");
    let restored = stat_file_attributes(&file).expect("query after restore failed");
    assert_eq!(restored, base);
}

#[test]
fn junction_short_circuits_with_its_own_attributes() {
    let dir = TempDir::new("junction");
    let target = dir.path.join("target");
    fs::create_dir(&target).expect("create target");
    let junction = dir.path.join("junction");

    let status = Command::new("cmd")
        .args(["/C", "mklink", "/J"])
        .arg(&junction)
        .arg(&target)
        .status();
    match status {
        Ok(status) if status.success() => {}
        other => {
            eprintln!("skipping junction test, mklink refused: {other:?}");
            return;
        }
    }

    let metadata = by_metadata_lookup(&junction).expect("metadata lookup failed");
    assert!(metadata.contains(FILE_ATTRIBUTE_DIRECTORY));
    assert!(metadata.contains(FILE_ATTRIBUTE_REPARSE_POINT));
    assert_eq!(
        by_directory_enumeration(&junction).expect("enumeration failed"),
        metadata
    );

    // Opening dereferences the junction, so the handle strategy reports the
    // target directory rather than the reparse point itself.
    let handle = by_handle(&junction).expect("handle query failed");
    assert!(handle.contains(FILE_ATTRIBUTE_DIRECTORY));
    assert!(!handle.contains(FILE_ATTRIBUTE_REPARSE_POINT));

    // The mismatch proves the cascade stopped at the first informative
    // answer instead of reaching the handle strategy.
    let cascade = stat_file_attributes(&junction).expect("cascade failed");
    assert_eq!(cascade, metadata);
    assert_ne!(cascade, handle);
}

#[test]
fn hard_link_shares_the_original_attributes() {
    let dir = TempDir::new("hardlink");
    let original = dir.path.join("original.bin");
    fs::write(&original, b"contents").expect("create file");
    let link = dir.path.join("link.bin");

    if let Err(error) = fs::hard_link(&original, &link) {
        eprintln!("skipping hard link test, creation refused: {error}");
        return;
    }

    let original_attributes = stat_file_attributes(&original).expect("original query failed");
    let link_attributes = stat_file_attributes(&link).expect("link query failed");
    assert_eq!(link_attributes, original_attributes);
}

#[test]
fn volume_root_is_a_directory() {
    let root = format!(
        "{}\\",
        env::var("SystemDrive").unwrap_or_else(|_| "C:".to_string())
    );

    let metadata = by_metadata_lookup(Path::new(&root)).expect("metadata lookup failed");
    assert!(metadata.contains(FILE_ATTRIBUTE_DIRECTORY));

    // Roots are not directory entries, so the search strategy cannot see
    // them; the handle strategy can.
    assert!(by_directory_enumeration(Path::new(&root)).is_err());
    let handle = by_handle(Path::new(&root)).expect("handle query failed");
    assert!(handle.contains(FILE_ATTRIBUTE_DIRECTORY));

    let cascade = stat_file_attributes(&root).expect("cascade failed");
    assert!(cascade.contains(FILE_ATTRIBUTE_DIRECTORY));
}

#[test]
fn interior_nul_is_an_encoding_failure() {
    let bogus = PathBuf::from("inter\0nal.bin");

    for (name, strategy) in &CASCADE {
        let error = strategy(&bogus).expect_err("conversion succeeded");
        assert!(is_encoding_failure(&error), "{name} returned {error}");
    }
}
