mod common;
use common::*;
use serde_json::Value;

fn json_lines(output: &str) -> Vec<Value> {
    output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_bbox_json_record() {
    let records = json_lines(&bbox_test("JSON", REFERENCE_BOX).stdout());
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record["line"], 1);
    assert_eq!(record["found"], true);
    assert_eq!(record["layout"], "A");
    assert_eq!(record["matched"], REFERENCE_BOX);
    assert!(record.get("input").is_none());
    assert!((record["lat1"].as_f64().unwrap() - 36.516667).abs() < 1e-5);
    assert!((record["lon2"].as_f64().unwrap() - 109.433333).abs() < 1e-5);
    assert!((record["centroid_lat"].as_f64().unwrap() - 36.925).abs() < 1e-9);
    assert!((record["centroid_lon"].as_f64().unwrap() - 109.15).abs() < 1e-9);
    assert_eq!(record["advisories"], serde_json::json!([]));
}

#[test]
fn test_bbox_json_escapes_input() {
    let text = "Site \"Alpha\": 10°N to 20°N, 170°E to 170°W";
    let output = LatlonboxTest::new()
        .args(["--format=json", "--show-inputs", text, "bbox"])
        .stdout();
    let records = json_lines(&output);
    assert_eq!(records[0]["input"], text);
    assert_eq!(
        records[0]["advisories"],
        serde_json::json!(["antimeridian-crossing"])
    );
}

#[test]
fn test_bbox_json_unmatched_records() {
    let text = format!("nothing here\n{}", REFERENCE_BOX);
    let output = LatlonboxTest::new()
        .args(["--format=json", "--show-unmatched", &text, "bbox"])
        .stdout();
    let records = json_lines(&output);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["line"], 1);
    assert_eq!(records[0]["found"], false);
    assert!(records[0].get("lat1").is_none());
    assert_eq!(records[1]["found"], true);
}

#[test]
fn test_points_json_records() {
    let output = points_test("json", "Plots at 36°31′N 108°52′W and 12.5 S / 40.25 E").stdout();
    let records = json_lines(&output);
    assert_eq!(records.len(), 2);

    assert_eq!(records[0]["latitude"], 36.517);
    assert_eq!(records[0]["longitude"], -108.867);
    assert_eq!(records[0]["decimals"], 3);
    assert_eq!(records[1]["latitude"], -12.5);
    assert_eq!(records[1]["longitude"], 40.25);
    assert_eq!(records[1]["decimals"], 2);
}
