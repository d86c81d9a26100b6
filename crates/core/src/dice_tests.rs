// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn seeded_dice_replay_identically() {
    let a = SeededDice::new(42);
    let b = SeededDice::new(42);
    let xs: Vec<_> = (0..16).map(|_| a.roll(1..=100)).collect();
    let ys: Vec<_> = (0..16).map(|_| b.roll(1..=100)).collect();
    assert_eq!(xs, ys);
}

#[test]
fn rolls_stay_in_range() {
    let dice = ThreadDice;
    for _ in 0..100 {
        let v = dice.roll(3..=6);
        assert!((3..=6).contains(&v));
    }
}

#[test]
fn scripted_dice_clamp_and_fall_back() {
    let dice = ScriptedDice::new([9, 2]);
    assert_eq!(dice.roll(1..=5), 5);
    assert_eq!(dice.roll(1..=5), 2);
    assert_eq!(dice.roll(1..=5), 1);
}

#[test]
fn degenerate_range_returns_start() {
    let dice = SeededDice::new(1);
    assert_eq!(dice.roll(4..=4), 4);
}
