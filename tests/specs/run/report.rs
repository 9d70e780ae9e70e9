//! Full run specs
//!
//! A short seeded day runs to completion and leaves a report behind.

use crate::prelude::*;

#[test]
fn short_day_writes_text_report_and_summary() {
    let temp = Scratch::empty();
    temp.lift()
        .args(SHORT_DAY)
        .passes()
        .stdout_has("Park closed after")
        .stdout_has("daily_report.txt");

    let report = std::fs::read_to_string(temp.log_dir().join("daily_report.txt")).unwrap();
    assert!(report.contains("=== Chairlift daily report ==="));
    assert!(report.contains("Rides per ticket:"));

    let log = std::fs::read_to_string(temp.log_dir().join("lift.log")).unwrap();
    assert!(log.contains("starting simulation"));
    assert!(log.contains("park closed"));
}

#[test]
fn json_format_writes_machine_readable_report() {
    let temp = Scratch::empty();
    temp.lift().args(SHORT_DAY).args(&["--format", "json"]).passes();

    let report = std::fs::read_to_string(temp.log_dir().join("daily_report.txt")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(value["snapshot"]["system_active"], false);
    assert_eq!(value["aborted"], 0);
}
