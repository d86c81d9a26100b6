//! `hoist roles` specs

use crate::prelude::*;

#[test]
fn roles_lists_both_groups() {
    hoist()
        .args(&["roles", "--processes", "6", "--seed", "11"])
        .passes()
        .stdout_has("purchasers")
        .stdout_has("couriers");
}

#[test]
fn roles_cover_every_rank_once() {
    let json = hoist()
        .args(&["roles", "--processes", "7", "--seed", "5", "--json"])
        .passes()
        .json();

    let mut ranks: Vec<u64> = json["purchasers"]
        .as_array()
        .unwrap()
        .iter()
        .chain(json["couriers"].as_array().unwrap())
        .map(|r| r.as_u64().unwrap())
        .collect();
    ranks.sort();
    assert_eq!(ranks, (0..7).collect::<Vec<_>>());
    assert!(!json["purchasers"].as_array().unwrap().is_empty());
    assert!(!json["couriers"].as_array().unwrap().is_empty());
    assert_eq!(json["seed"], 5);
}

#[test]
fn same_seed_same_roles() {
    let first = hoist()
        .args(&["roles", "-n", "9", "--seed", "42"])
        .passes()
        .stdout();
    let second = hoist()
        .args(&["roles", "-n", "9", "--seed", "42"])
        .passes()
        .stdout();
    assert_eq!(first, second);
}

#[test]
fn two_processes_split_evenly() {
    let json = hoist()
        .args(&["roles", "-n", "2", "--json"])
        .passes()
        .json();
    assert_eq!(json["purchasers"].as_array().unwrap().len(), 1);
    assert_eq!(json["couriers"].as_array().unwrap().len(), 1);
}
