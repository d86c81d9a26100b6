//! Log output specs

use crate::prelude::*;

#[test]
fn log_file_receives_protocol_events() {
    let temp = Project::empty();
    temp.hoist()
        .args(&[
            "--log-file",
            "logs/hoist.log",
            "--log-level",
            "info",
            "run",
            "--sim",
            "--seed",
            "4",
            "-n",
            "3",
        ])
        .passes();

    let log = std::fs::read_to_string(temp.join("logs/hoist.log")).unwrap();
    assert!(log.contains("orders submitted"));
    assert!(log.contains("packages delivered"));
}

#[test]
fn warnings_only_by_default() {
    hoist()
        .args(&["run", "--sim", "--seed", "4", "-n", "3"])
        .passes()
        .stdout_lacks("INFO");
}
