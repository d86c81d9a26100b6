//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_subcommands() {
    hoist()
        .args(&["--help"])
        .passes()
        .stdout_has("run")
        .stdout_has("config")
        .stdout_has("roles");
}

#[test]
fn run_help_shows_protocol_flags() {
    hoist()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("--sim")
        .stdout_has("--purchasers")
        .stdout_has("--capacity")
        .stdout_has("--timeout");
}

#[test]
fn version_flag() {
    hoist().args(&["--version"]).passes().stdout_has("hoist");
}
