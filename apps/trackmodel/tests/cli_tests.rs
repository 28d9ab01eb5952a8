//! Integration tests for CLI file handling and commands.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use clap::Parser;
use std::path::PathBuf;
use tempfile::TempDir;
use trackmodel::cli::{
    Cli, LayoutFormat, OutputMode, cmd_check, cmd_convert, cmd_print, decode_model, execute,
    load_model,
};
use trackmodel_core::{SnapshotHeader, TrackError, primitives::MAX_SNAPSHOT_SIZE};

const LOOP_LAYOUT: &str = r#"[
  {
    "m": { "type": "MOTORIZED" },
    "p": { "type": "PASSIVE", "metadata": { "label": "merge" } }
  },
  {
    "straight": {
      "link": { "startNode": "m", "startSlot": 1, "endNode": "p", "endSlot": 1 },
      "length": 120
    },
    "diverging": {
      "link": { "startNode": "m", "startSlot": 2, "endNode": "p", "endSlot": 2 },
      "dest": { "address": "7", "name": "Siding" }
    },
    "return": {
      "link": { "startNode": "p", "startSlot": 0, "endNode": "m", "endSlot": 0 }
    }
  }
]"#;

const OPEN_LAYOUT: &str = r#"[
  { "n1": { "type": "THRU" } },
  { "s1": { "dir": "BIDIR" } }
]"#;

fn write_layout(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn quiet() -> OutputMode {
    OutputMode {
        quiet: true,
        ..OutputMode::default()
    }
}

// =============================================================================
// LOADING
// =============================================================================

#[test]
fn test_load_json_layout() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(&dir, "loop.json", LOOP_LAYOUT);

    let model = load_model(&path).unwrap();
    assert_eq!(model.node_count(), 2);
    assert_eq!(model.section_count(), 3);
    assert_eq!(model.section("straight").unwrap().length(), Some(120));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = load_model(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(TrackError::IoError(_))));
}

#[test]
fn test_load_directory_is_rejected() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(load_model(dir.path()), Err(TrackError::IoError(_))));
}

#[test]
fn test_load_oversized_file_is_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("huge.trkm");
    let file = std::fs::File::create(&path).unwrap();
    file.set_len(MAX_SNAPSHOT_SIZE as u64 + 1).unwrap();

    let result = load_model(&path);
    assert!(matches!(result, Err(TrackError::InvalidFormat(ref m)) if m.contains("exceeds maximum")));
}

#[test]
fn test_decode_non_utf8_is_invalid_format() {
    let result = decode_model(&[0xff, 0xfe, 0x00]);
    assert!(matches!(result, Err(TrackError::InvalidFormat(_))));
}

#[test]
fn test_format_detection() {
    assert_eq!(LayoutFormat::detect(b"TRKM\x01"), LayoutFormat::Snapshot);
    assert_eq!(LayoutFormat::detect(b"[{},{}]"), LayoutFormat::Json);
    assert!(LayoutFormat::parse("yaml").is_err());
}

// =============================================================================
// CHECK
// =============================================================================

#[test]
fn test_check_correct_layout() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(&dir, "loop.json", LOOP_LAYOUT);
    assert!(cmd_check(&path, quiet()).unwrap());
}

#[test]
fn test_check_incomplete_layout_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(&dir, "open.json", OPEN_LAYOUT);
    assert!(!cmd_check(&path, quiet()).unwrap());
}

#[test]
fn test_check_illegal_layout_is_error() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(
        &dir,
        "bad.json",
        r#"[{ "n1": { "type": "END" } }, { "s1": { "link": { "startNode": "n1", "startSlot": 0, "endNode": "n1", "endSlot": 0 } } }]"#,
    );
    assert!(matches!(
        cmd_check(&path, quiet()),
        Err(TrackError::IllegalModel(_))
    ));
}

// =============================================================================
// CONVERT
// =============================================================================

#[test]
fn test_convert_to_snapshot_and_back() {
    let dir = TempDir::new().unwrap();
    let json = write_layout(&dir, "loop.json", LOOP_LAYOUT);
    let snapshot = dir.path().join("loop.trkm");
    let back = dir.path().join("loop2.json");

    cmd_convert(&json, &snapshot, "snapshot", quiet()).unwrap();
    let bytes = std::fs::read(&snapshot).unwrap();
    assert!(SnapshotHeader::is_snapshot(&bytes));

    cmd_convert(&snapshot, &back, "json", quiet()).unwrap();
    assert_eq!(load_model(&back).unwrap(), load_model(&json).unwrap());
}

#[test]
fn test_convert_unknown_format_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let json = write_layout(&dir, "loop.json", LOOP_LAYOUT);
    let output = dir.path().join("out.bin");

    assert!(cmd_convert(&json, &output, "xml", quiet()).is_err());
    assert!(!output.exists());
}

#[test]
fn test_convert_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let json = write_layout(&dir, "loop.json", LOOP_LAYOUT);
    let output = dir.path().join("missing").join("out.json");

    assert!(matches!(
        cmd_convert(&json, &output, "json", quiet()),
        Err(TrackError::IoError(_))
    ));
}

// =============================================================================
// DISPATCH
// =============================================================================

#[test]
fn test_print_runs_in_every_mode() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(&dir, "loop.json", LOOP_LAYOUT);

    for mode in [
        OutputMode::default(),
        quiet(),
        OutputMode {
            verbose: true,
            ..OutputMode::default()
        },
        OutputMode {
            json: true,
            ..OutputMode::default()
        },
    ] {
        cmd_print(&path, mode).unwrap();
    }
}

#[test]
fn test_execute_reports_check_verdict() {
    let dir = TempDir::new().unwrap();
    let good = write_layout(&dir, "loop.json", LOOP_LAYOUT);
    let open = write_layout(&dir, "open.json", OPEN_LAYOUT);

    let cli = Cli::parse_from(["trackmodel", "--json-mode", "check", good.to_str().unwrap()]);
    assert!(execute(cli).unwrap());

    let cli = Cli::parse_from(["trackmodel", "-q", "check", open.to_str().unwrap()]);
    assert!(!execute(cli).unwrap());
}
