//! `hoist config` specs

use crate::prelude::*;

#[test]
fn config_prints_defaults() {
    hoist()
        .args(&["config"])
        .passes()
        .stdout_has("lifts = 4")
        .stdout_has("capacity = 5")
        .stdout_has("rounds = 1")
        .stdout_has("startup_delay = \"1s\"")
        .stdout_has("[purchaser_window]");
}

#[test]
fn fast_timings_are_shown() {
    hoist()
        .args(&["config", "--fast"])
        .passes()
        .stdout_has("startup_delay = \"5ms\"");
}

#[test]
fn flags_override_the_file() {
    let temp = Project::empty();
    temp.file("hoist.toml", "lifts = 2\ncapacity = 8\n");

    temp.hoist()
        .args(&["config", "--config", "hoist.toml", "--capacity", "3"])
        .passes()
        .stdout_has("lifts = 2")
        .stdout_has("capacity = 3")
        .stdout_lacks("capacity = 8");
}

#[test]
fn printed_config_loads_back() {
    let temp = Project::empty();
    let printed = temp
        .hoist()
        .args(&["config", "--fast", "--rounds", "3"])
        .passes()
        .stdout();
    temp.file("roundtrip.toml", &printed);

    let again = temp
        .hoist()
        .args(&["config", "--config", "roundtrip.toml"])
        .passes()
        .stdout();
    assert_eq!(printed, again);
}
