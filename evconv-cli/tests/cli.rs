use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array};
use arrow::record_batch::RecordBatch;
use arrow_schema::{DataType, Field, Schema};
use assert_cmd::Command;
use parquet::arrow::ArrowWriter;
use predicates::prelude::*;

fn write_fixture(path: &Path) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("mass", DataType::Float64, false),
        Field::new("n_jets", DataType::Int64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(vec![125.1, 124.8, 126.0])),
            Arc::new(Int64Array::from(vec![2, 3, 2])),
        ],
    )
    .unwrap();

    let file = File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn csv_without_arguments_prints_usage_and_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("parquet-to-csv")
        .unwrap()
        .current_dir(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
    // Nothing written.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn csv_missing_input_exits_one_without_creating_output() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("parquet-to-csv")
        .unwrap()
        .current_dir(dir.path())
        .arg("missing.parquet")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));
    assert!(!dir.path().join("missing.csv").exists());
}

#[test]
fn csv_conversion_succeeds_and_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(&dir.path().join("events.parquet"));

    Command::cargo_bin("parquet-to-csv")
        .unwrap()
        .current_dir(dir.path())
        .arg("events.parquet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rows:    3"))
        .stdout(predicate::str::contains("Rows written: 3"))
        .stdout(predicate::str::contains("Conversion complete!"));

    let text = std::fs::read_to_string(dir.path().join("events.csv")).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert_eq!(text.lines().next().unwrap(), "mass,n_jets");
}

#[test]
fn csv_corrupt_input_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("events.parquet"), b"not parquet").unwrap();

    Command::cargo_bin("parquet-to-csv")
        .unwrap()
        .current_dir(dir.path())
        .arg("events.parquet")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ERROR"));
}

#[test]
fn ipc_conversion_reports_verification_echo() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(&dir.path().join("events.parquet"));

    Command::cargo_bin("parquet-to-ipc")
        .unwrap()
        .current_dir(dir.path())
        .args(["events.parquet", "events.arrow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 rows, 2 columns"))
        .stdout(predicate::str::contains("Verification: 3 entries, 2 fields"))
        .stdout(predicate::str::contains("Sample values (mass)"));

    assert!(dir.path().join("events.arrow").exists());
}

#[test]
fn ipc_check_rows_passes_quietly_on_a_clean_write() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(&dir.path().join("events.parquet"));

    Command::cargo_bin("parquet-to-ipc")
        .unwrap()
        .current_dir(dir.path())
        .args(["events.parquet", "events.arrow", "--check-rows"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING").not());
}

#[test]
fn ipc_missing_input_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("parquet-to-ipc")
        .unwrap()
        .current_dir(dir.path())
        .args(["missing.parquet", "events.arrow"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));
    assert!(!dir.path().join("events.arrow").exists());
}
