// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const PURCHASER: Rank = Rank(0);
const COURIER_A: Rank = Rank(3);
const COURIER_B: Rank = Rank(4);

fn stamp(clock: u64, rank: Rank) -> Stamp {
    Stamp::new(clock, rank)
}

fn order(lift: u32, quantity: u32, clock: u64, rank: Rank) -> Order {
    Order::new(LiftKey(lift), quantity, stamp(clock, rank))
}

fn holders(board: &LiftBoard, lift: LiftKey) -> Vec<Rank> {
    board.holders(lift).collect()
}

#[test]
fn lifts_start_free_in_ordering() {
    let board = LiftBoard::new(2);
    for lift in LiftKey::all(2) {
        assert_eq!(board.phase(lift), Some(Phase::Ordering));
        assert!(board.is_free(lift));
    }
    assert_eq!(board.phase(LiftKey(3)), None);
    assert!(!board.is_free(LiftKey(3)));
}

#[test]
fn claim_ahead_of_release_keeps_both_holders() {
    let mut board = LiftBoard::new(1);
    let lift = LiftKey(1);
    board.claim(lift, PURCHASER).unwrap();
    board.claim(lift, COURIER_A).unwrap();
    assert_eq!(holders(&board, lift), vec![PURCHASER, COURIER_A]);

    board.submit_orders(lift, PURCHASER, &[], stamp(3, PURCHASER)).unwrap();
    assert_eq!(holders(&board, lift), vec![COURIER_A]);
    assert!(!board.is_free(lift));
}

#[test]
fn claim_on_unknown_lift_is_a_violation() {
    let mut board = LiftBoard::new(1);
    assert_eq!(
        board.claim(LiftKey(7), PURCHASER),
        Err(Violation::UnknownLift(LiftKey(7)))
    );
}

#[test]
fn full_cycle_with_split_pickup() {
    let mut board = LiftBoard::new(1);
    let lift = LiftKey(1);
    let a = order(1, 2, 10, PURCHASER);
    let b = order(1, 3, 12, Rank(1));

    board.claim(lift, PURCHASER).unwrap();
    let phase = board
        .submit_orders(lift, PURCHASER, &[b.clone(), a.clone()], stamp(20, PURCHASER))
        .unwrap();
    assert_eq!(phase, Some(Phase::Pickup));
    assert!(board.is_free(lift));
    assert_eq!(board.oldest_order(lift), Some(&a));
    assert_eq!(board.outstanding(lift), 2);
    assert!(board.has_pending_orders());

    board.claim(lift, COURIER_A).unwrap();
    let next = board.pick_up(lift, COURIER_A, &a, stamp(25, COURIER_A)).unwrap();
    assert_eq!(next, None);
    assert_eq!(board.phase(lift), Some(Phase::Pickup));
    assert_eq!(board.orders(lift), vec![&b]);

    board.claim(lift, COURIER_B).unwrap();
    let next = board.pick_up(lift, COURIER_B, &b, stamp(27, COURIER_B)).unwrap();
    assert_eq!(next, Some(Phase::Delivery));
    assert!(!board.has_pending_orders());

    // First courier delivers its share: the lift stays in delivery
    let next = board
        .deliver(lift, COURIER_A, &[Package::new(a, COURIER_A)], stamp(30, COURIER_A))
        .unwrap();
    assert_eq!(next, None);
    assert_eq!(board.phase(lift), Some(Phase::Delivery));
    assert_eq!(board.outstanding(lift), 1);

    let next = board
        .deliver(lift, COURIER_B, &[Package::new(b, COURIER_B)], stamp(31, COURIER_B))
        .unwrap();
    assert_eq!(next, Some(Phase::Ordering));
    assert_eq!(board.outstanding(lift), 0);
    assert!(board.history(lift).unwrap().is_cyclic());
}

#[test]
fn pickup_ahead_of_its_submission_is_remembered() {
    let mut board = LiftBoard::new(1);
    let lift = LiftKey(1);
    let a = order(1, 2, 10, PURCHASER);
    let b = order(1, 1, 11, Rank(1));

    board.claim(lift, COURIER_A).unwrap();
    let next = board.pick_up(lift, COURIER_A, &a, stamp(25, COURIER_A)).unwrap();
    assert_eq!(next, None);
    assert!(board.is_free(lift));
    assert!(!board.has_pending_orders());

    board.claim(lift, PURCHASER).unwrap();
    board
        .submit_orders(lift, PURCHASER, &[a.clone(), b.clone()], stamp(20, PURCHASER))
        .unwrap();
    // Only the order nobody took is offered for pickup
    assert_eq!(board.orders(lift), vec![&b]);
    assert_eq!(board.outstanding(lift), 2);
    assert_eq!(board.phase(lift), Some(Phase::Pickup));
}

#[test]
fn submission_arriving_last_completes_the_cycle() {
    let mut board = LiftBoard::new(1);
    let lift = LiftKey(1);
    let a = order(1, 2, 10, PURCHASER);

    board.claim(lift, COURIER_A).unwrap();
    board.pick_up(lift, COURIER_A, &a, stamp(25, COURIER_A)).unwrap();
    board.claim(lift, COURIER_A).unwrap();
    board
        .deliver(lift, COURIER_A, &[Package::new(a.clone(), COURIER_A)], stamp(30, COURIER_A))
        .unwrap();
    assert_eq!(board.phase(lift), Some(Phase::Ordering));

    board.claim(lift, PURCHASER).unwrap();
    let next = board
        .submit_orders(lift, PURCHASER, &[a], stamp(20, PURCHASER))
        .unwrap();
    assert_eq!(next, None);
    assert_eq!(board.phase(lift), Some(Phase::Ordering));
    assert_eq!(board.outstanding(lift), 0);
    assert!(board.is_free(lift));
    let phases: Vec<Phase> = board
        .history(lift)
        .unwrap()
        .entries()
        .into_iter()
        .map(|(phase, _)| phase)
        .collect();
    assert_eq!(
        phases,
        vec![Phase::Ordering, Phase::Pickup, Phase::Delivery, Phase::Ordering]
    );
}

#[test]
fn delivery_ahead_of_a_pickup_keeps_the_order_taken() {
    let mut board = LiftBoard::new(1);
    let lift = LiftKey(1);
    let a = order(1, 2, 10, PURCHASER);
    let b = order(1, 1, 11, Rank(1));
    board
        .submit_orders(lift, PURCHASER, &[a.clone(), b.clone()], stamp(20, PURCHASER))
        .unwrap();
    board.pick_up(lift, COURIER_A, &a, stamp(25, COURIER_A)).unwrap();

    // Courier A carried b for courier B, whose pickup is still in flight
    board
        .deliver(
            lift,
            COURIER_A,
            &[Package::new(a, COURIER_A), Package::new(b.clone(), COURIER_B)],
            stamp(40, COURIER_A),
        )
        .unwrap();
    assert!(board.orders(lift).is_empty());
    assert_eq!(board.outstanding(lift), 0);
    assert_eq!(board.phase(lift), Some(Phase::Ordering));

    let next = board.pick_up(lift, COURIER_B, &b, stamp(30, COURIER_B)).unwrap();
    assert_eq!(next, None);
    assert!(board.history(lift).unwrap().is_cyclic());
}

#[test]
fn newer_batch_wins_over_an_unfinished_older_one() {
    let mut board = LiftBoard::new(1);
    let lift = LiftKey(1);
    let first = order(1, 1, 10, PURCHASER);
    let second = order(1, 2, 50, Rank(1));
    board
        .submit_orders(lift, PURCHASER, &[first.clone()], stamp(20, PURCHASER))
        .unwrap();
    board.pick_up(lift, COURIER_A, &first, stamp(25, COURIER_A)).unwrap();
    // The delivery of `first` is still in flight when the next batch lands
    board
        .submit_orders(lift, Rank(1), &[second.clone()], stamp(60, Rank(1)))
        .unwrap();
    assert_eq!(board.phase(lift), Some(Phase::Pickup));
    assert_eq!(board.orders(lift), vec![&second]);
    assert_eq!(board.outstanding(lift), 1);
}

#[test]
fn picking_up_twice_is_a_violation() {
    let mut board = LiftBoard::new(1);
    let lift = LiftKey(1);
    let a = order(1, 1, 5, PURCHASER);
    board
        .submit_orders(lift, PURCHASER, &[a.clone()], stamp(6, PURCHASER))
        .unwrap();
    board.pick_up(lift, COURIER_A, &a, stamp(7, COURIER_A)).unwrap();
    let err = board.pick_up(lift, COURIER_B, &a, stamp(8, COURIER_B)).unwrap_err();
    assert!(matches!(err, Violation::PickedTwice { courier, .. } if courier == COURIER_B));
}

#[test]
fn delivering_twice_is_a_violation() {
    let mut board = LiftBoard::new(1);
    let lift = LiftKey(1);
    let package = Package::new(order(1, 1, 5, PURCHASER), COURIER_A);
    board
        .deliver(lift, COURIER_A, &[package.clone()], stamp(9, COURIER_A))
        .unwrap();
    let err = board
        .deliver(lift, COURIER_B, &[package], stamp(10, COURIER_B))
        .unwrap_err();
    assert!(matches!(err, Violation::DeliveredTwice { courier, .. } if courier == COURIER_B));
}

#[test]
fn release_by_non_holder_keeps_holder() {
    let mut board = LiftBoard::new(1);
    board.claim(LiftKey(1), PURCHASER).unwrap();
    board
        .submit_orders(LiftKey(1), Rank(1), &[], stamp(3, Rank(1)))
        .unwrap();
    assert_eq!(holders(&board, LiftKey(1)), vec![PURCHASER]);
}
