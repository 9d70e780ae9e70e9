//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_run_parameters() {
    Scratch::empty()
        .lift()
        .args(&["--help"])
        .passes()
        .stdout_has("--time")
        .stdout_has("--visitors")
        .stdout_has("--seed")
        .stdout_has("--format");
}

#[test]
fn version_prints_package_version() {
    Scratch::empty()
        .lift()
        .args(&["--version"])
        .passes()
        .stdout_has(env!("CARGO_PKG_VERSION"));
}
