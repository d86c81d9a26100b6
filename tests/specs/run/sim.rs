//! Simulated run specs

use crate::prelude::*;

#[test]
fn simulated_run_completes() {
    hoist()
        .args(&[
            "run",
            "--sim",
            "--seed",
            "3",
            "--purchasers",
            "2",
            "--couriers",
            "2",
        ])
        .passes()
        .stdout_has("Run complete (simulated, seed 3)")
        .stdout_has("Purchasers:   2 (2 completed)")
        .stdout_has("Couriers:     2");
}

#[test]
fn simulated_run_is_reproducible() {
    let args = [
        "run", "--sim", "--seed", "17", "-n", "6", "--rounds", "2", "--lifts", "2",
    ];
    let first = hoist().args(&args).passes().stdout();
    let second = hoist().args(&args).passes().stdout();
    assert_eq!(first, second);
}

#[test]
fn json_summary_counts_every_round() {
    let json = hoist()
        .args(&[
            "run",
            "--sim",
            "--seed",
            "8",
            "--purchasers",
            "3",
            "--couriers",
            "2",
            "--rounds",
            "2",
            "--json",
        ])
        .passes()
        .json();

    assert_eq!(json["mode"], "simulated");
    assert_eq!(json["purchasers"], 3);
    assert_eq!(json["completed"], 3);
    assert!(json["steps"].as_u64().unwrap() > 0);
    assert!(json["submissions"].as_u64().unwrap() >= 1);
    assert!(json["deliveries"].as_u64().unwrap() >= 1);
}

#[test]
fn single_lift_large_cluster() {
    hoist()
        .args(&["run", "--sim", "--seed", "1", "-n", "8", "--lifts", "1"])
        .passes()
        .stdout_has("completed)");
}

#[test]
fn tiny_step_limit_fails() {
    hoist()
        .args(&["run", "--sim", "--seed", "2", "--max-steps", "10"])
        .fails()
        .stderr_has("Simulation exceeded 10 steps");
}

#[test]
fn reordered_run_completes() {
    hoist()
        .args(&[
            "run",
            "--sim",
            "--reorder",
            "--seed",
            "5",
            "--purchasers",
            "3",
            "--couriers",
            "2",
            "--lifts",
            "2",
            "--rounds",
            "2",
        ])
        .passes()
        .stdout_has("Purchasers:   3 (3 completed)");
}

#[test]
fn reorder_requires_the_simulator() {
    hoist()
        .args(&["run", "--reorder", "--seed", "5"])
        .fails()
        .stderr_has("--sim");
}
