mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_no_arguments_prints_usage() {
    LatlonboxTest::new()
        .assert_success()
        .stdout(predicate::str::starts_with("Usage: latlonbox"));
}

#[test]
fn test_help_flag() {
    LatlonboxTest::new()
        .arg("--help")
        .assert_success()
        .stdout(predicate::str::contains("Extracts geographic bounding boxes"))
        .stdout(predicate::str::contains("--format=<format>"));
}

#[test]
fn test_command_help() {
    LatlonboxTest::new()
        .args(["help", "bbox"])
        .assert_success()
        .stdout(predicate::str::contains("--layouts=<list>"));

    LatlonboxTest::new()
        .args(["help", "points"])
        .assert_success()
        .stdout(predicate::str::contains("Both latitude and longitude need a direction"));
}

#[test]
fn test_version_flag() {
    LatlonboxTest::new()
        .arg("--version")
        .assert_success()
        .stdout(predicate::str::starts_with(format!(
            "latlonbox {}",
            env!("CARGO_PKG_VERSION")
        )))
        .stdout(predicate::str::contains("Features:"));
}

#[test]
fn test_unknown_option_fails() {
    LatlonboxTest::new()
        .args(["--frobnicate", REFERENCE_BOX, "bbox"])
        .assert_failure()
        .stderr(predicate::str::contains("Error: Unknown option: --frobnicate"));
}

#[test]
fn test_unknown_command_fails() {
    LatlonboxTest::new()
        .args([REFERENCE_BOX, "polygon"])
        .assert_failure()
        .stderr(predicate::str::contains("Unknown command: polygon"));
}

#[test]
fn test_invalid_format_fails() {
    LatlonboxTest::new()
        .args(["--format=xml", REFERENCE_BOX, "bbox"])
        .assert_failure()
        .stderr(predicate::str::contains("Invalid format: xml"));
}

#[test]
fn test_invalid_layout_fails() {
    LatlonboxTest::new()
        .args(["--layouts=A,Z", REFERENCE_BOX, "bbox"])
        .assert_failure()
        .stderr(predicate::str::contains("Unknown layout: Z"));
}

#[test]
fn test_duplicate_layout_fails() {
    LatlonboxTest::new()
        .args(["--layouts=A,A", REFERENCE_BOX, "bbox"])
        .assert_failure()
        .stderr(predicate::str::contains("Error: Layout A listed more than once"));
}

#[test]
fn test_bbox_options_rejected_for_points() {
    for option in ["--layouts=A", "--antimeridian", "--show-unmatched"] {
        LatlonboxTest::new()
            .args([option, "36°N 108°W", "points"])
            .assert_failure()
            .stderr(predicate::str::contains("not valid for points command"));
    }
}

#[test]
fn test_unquoted_input_is_rejected() {
    LatlonboxTest::new()
        .args(["36°N", "to", "37°N", "bbox"])
        .assert_failure()
        .stderr(predicate::str::contains("Too many arguments"));
}
