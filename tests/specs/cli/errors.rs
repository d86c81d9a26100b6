//! Error reporting specs

use crate::prelude::*;

#[test]
fn unknown_subcommand_fails() {
    hoist().args(&["launch"]).fails().stderr_has("unrecognized");
}

#[test]
fn purchasers_require_couriers() {
    hoist()
        .args(&["run", "--sim", "--purchasers", "2"])
        .fails()
        .stderr_has("--couriers");
}

#[test]
fn single_process_is_rejected() {
    hoist()
        .args(&["run", "--sim", "--processes", "1"])
        .fails()
        .stderr_has("need at least 2 processes");
}

#[test]
fn zero_lifts_is_rejected() {
    hoist()
        .args(&["run", "--sim", "--lifts", "0"])
        .fails()
        .stderr_has("lifts must be at least 1");
}

#[test]
fn missing_config_file_is_reported() {
    let temp = Project::empty();
    temp.hoist()
        .args(&["config", "--config", "absent.toml"])
        .fails()
        .stderr_has("failed to read absent.toml");
}

#[test]
fn malformed_config_file_is_reported() {
    let temp = Project::empty();
    temp.file("hoist.toml", "lifts = \"many\"\n");
    temp.hoist()
        .args(&["config", "--config", "hoist.toml"])
        .fails()
        .stderr_has("failed to parse hoist.toml");
}

#[test]
fn invalid_log_level_is_rejected() {
    hoist()
        .args(&["--log-level", "hoist=loudest", "config"])
        .fails();
}
