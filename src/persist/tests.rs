use super::*;
use crate::library::{Entry, Playlist};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn entry(name: &str, gain: f32) -> Entry {
    Entry {
        path: PathBuf::from(format!("/music/{name}")),
        name: name.to_string(),
        gain,
    }
}

#[test]
fn report_lines_are_sorted_and_formatted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.txt");

    let entries = vec![
        entry("zebra.wav", 0.0),
        entry("alpha.wav", -2.5),
        entry("mid.wav", 1.0),
    ];
    write_report(&path, &entries).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text, "alpha.wav - -2.5\nmid.wav - 1\nzebra.wav - 0\n");
}

#[test]
fn report_to_unwritable_path_is_a_persistence_error() {
    let err = write_report(Path::new("/no/such/dir/out.txt"), &[]).unwrap_err();
    assert!(matches!(err, crate::error::EngineError::Persistence { .. }));
}

#[test]
fn document_matches_legacy_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let entries = vec![entry("a.wav", -2.5), entry("b.wav", 0.0)];
    write_document(&path, Path::new("/music/box"), &entries).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let expected = concat!(
        "{\n",
        "  \"folderPath\": \"\\/music\\/box\",\n",
        "  \"files\": [\n",
        "    {\n",
        "      \"fileName\": \"a.wav\",\n",
        "      \"Gain\": -2.5\n",
        "    },\n",
        "    {\n",
        "      \"fileName\": \"b.wav\",\n",
        "      \"Gain\": 0\n",
        "    }\n",
        "  ]\n",
        "}",
    );
    assert_eq!(text, expected);
}

#[test]
fn document_round_trips_awkward_names() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let name = r#"we"ird\name/slash.wav"#;
    write_document(&path, Path::new(r#"/mu"sic\dir"#), &[entry(name, 1.25)]).unwrap();

    let doc = read_document(&path).unwrap();
    assert_eq!(doc.folder_path.as_deref(), Some(r#"/mu"sic\dir"#));
    assert_eq!(doc.files.len(), 1);
    assert_eq!(doc.files[0].0, name);
    assert!((doc.files[0].1 - 1.25).abs() < 1e-6);
}

#[test]
fn document_gains_round_trip_through_merge() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let entries = vec![
        entry("a.wav", 0.5),
        entry("b.wav", -2.25),
        entry("c.wav", 0.0),
    ];
    write_document(&path, Path::new("/music"), &entries).unwrap();

    // A fresh scan would produce the same names in some other order with
    // zero gains; merging the document back restores every gain by name.
    let mut fresh = Playlist::from_scan(
        PathBuf::from("/music"),
        vec![entry("c.wav", 0.0), entry("a.wav", 0.0), entry("b.wav", 0.0)],
    );
    let doc = read_document(&path).unwrap();
    let matched = fresh.merge_gains(doc.files);

    assert_eq!(matched, 3);
    for original in &entries {
        let restored = fresh
            .entries()
            .iter()
            .find(|e| e.name == original.name)
            .unwrap();
        assert!((restored.gain - original.gain).abs() < 1e-6);
    }
}

#[test]
fn reader_tolerates_missing_folder_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(
        &path,
        r#"{ "files": [ { "fileName": "a.wav", "Gain": -1.5 } ] }"#,
    )
    .unwrap();

    let doc = read_document(&path).unwrap();
    assert!(doc.folder_path.is_none());
    assert_eq!(doc.files, vec![("a.wav".to_string(), -1.5)]);
}

#[test]
fn reader_tolerates_missing_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, r#"{ "folderPath": "/music" }"#).unwrap();

    let doc = read_document(&path).unwrap();
    assert_eq!(doc.folder_path.as_deref(), Some("/music"));
    assert!(doc.files.is_empty());
}

#[test]
fn reader_skips_malformed_file_items() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(
        &path,
        r#"{ "files": [ { "fileName": "ok.wav", "Gain": 1 }, { "fileName": "no-gain.wav" }, { "Gain": 2 } ] }"#,
    )
    .unwrap();

    let doc = read_document(&path).unwrap();
    assert_eq!(doc.files, vec![("ok.wav".to_string(), 1.0)]);
}

#[test]
fn reader_rejects_non_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, "definitely not json").unwrap();

    let err = read_document(&path).unwrap_err();
    assert!(matches!(err, crate::error::EngineError::Persistence { .. }));
}

#[test]
fn legacy_capitalized_gain_key_is_required() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(
        &path,
        r#"{ "files": [ { "fileName": "a.wav", "gain": -1.5 } ] }"#,
    )
    .unwrap();

    // Lowercase "gain" is a different key; the item has no usable gain.
    let doc = read_document(&path).unwrap();
    assert!(doc.files.is_empty());
}

#[test]
fn suggested_file_names_use_folder_name() {
    assert_eq!(
        suggested_file_name(Path::new("/music/roadtrip"), "txt").as_deref(),
        Some("roadtrip.txt")
    );
    assert_eq!(
        suggested_file_name(Path::new("/music/roadtrip"), "json").as_deref(),
        Some("roadtrip.json")
    );
}
