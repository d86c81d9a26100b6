// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn summary() -> RunSummary {
    RunSummary {
        purchasers: 3,
        couriers: 2,
        completed: 3,
        elapsed_ms: 1200,
        messages: 480,
        submissions: 3,
        deliveries: 4,
        shared_rides: 1,
    }
}

#[test]
fn run_output_text() {
    let output = RunOutput {
        mode: RunMode::Simulated,
        seed: 7,
        steps: Some(900),
        summary: summary(),
    };
    let text = output.to_string();
    assert!(text.starts_with("Run complete (simulated, seed 7)"));
    assert!(text.contains("Purchasers:   3 (3 completed)"));
    assert!(text.contains("Steps:        900"));
    assert!(text.contains("Shared rides: 1"));
}

#[test]
fn run_output_json_is_flat() {
    let output = RunOutput {
        mode: RunMode::Live,
        seed: 7,
        steps: None,
        summary: summary(),
    };
    let json: serde_json::Value = serde_json::to_value(&output).unwrap();
    assert_eq!(json["mode"], "live");
    assert_eq!(json["completed"], 3);
    assert_eq!(json["deliveries"], 4);
    assert!(json.get("steps").is_none());
}

#[test]
fn roles_output_lists_ranks() {
    let membership = Membership::split(2, 1).unwrap();
    let output = RolesOutput::new(&membership, 3);
    assert_eq!(
        output.to_string(),
        "purchasers   #0 #1\ncouriers     #2\n"
    );
}
