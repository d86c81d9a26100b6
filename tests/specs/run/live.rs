//! Live (tokio) run specs

use crate::prelude::*;

#[test]
fn live_run_completes_with_fast_timings() {
    let json = hoist()
        .args(&[
            "run",
            "--fast",
            "--purchasers",
            "2",
            "--couriers",
            "1",
            "--lifts",
            "2",
            "--timeout",
            "60s",
            "--json",
        ])
        .passes()
        .json();

    assert_eq!(json["mode"], "live");
    assert_eq!(json["completed"], 2);
    assert!(json.get("steps").is_none());
}

#[test]
fn live_run_text_summary() {
    hoist()
        .args(&["run", "--fast", "-n", "4", "--seed", "9", "--timeout", "60s"])
        .passes()
        .stdout_has("Run complete (live, seed 9)");
}

#[test]
fn live_run_times_out() {
    hoist()
        .args(&[
            "run",
            "--purchasers",
            "1",
            "--couriers",
            "1",
            "--timeout",
            "50ms",
        ])
        .fails()
        .stderr_has("did not complete within 50ms");
}
