//! Invalid input specs
//!
//! Bad parameters exit 1 before the park opens.

use crate::prelude::*;

#[test]
fn day_shorter_than_ten_seconds_is_rejected() {
    let temp = Scratch::empty();
    temp.lift()
        .args(&["-t", "5"])
        .fails()
        .stderr_has("between 10 and 3600 seconds, got 5")
        .stderr_has("suggestions:");

    // Nothing is written for a rejected run
    assert!(!temp.log_dir().exists());
}

#[test]
fn zero_visitors_is_rejected() {
    Scratch::empty()
        .lift()
        .args(&["-n", "0"])
        .fails()
        .stderr_has("visitor count must be between 1 and 500");
}

#[test]
fn impossible_config_file_is_rejected() {
    let temp = Scratch::empty();
    temp.file(
        "park.toml",
        "[lift]\ntotal_chairs = 10\nmax_concurrent_chairs = 20\n",
    );
    temp.lift()
        .args(&["--config", "park.toml"])
        .fails()
        .stderr_has("lift.max_concurrent_chairs")
        .stderr_has("while loading park.toml");
}

#[test]
fn missing_config_file_is_reported() {
    Scratch::empty()
        .lift()
        .args(&["--config", "nowhere.toml"])
        .fails()
        .stderr_has("failed to read config");
}

#[test]
fn unknown_format_is_a_usage_error() {
    Scratch::empty()
        .lift()
        .args(&["--format", "yaml"])
        .fails_with_usage();
}
