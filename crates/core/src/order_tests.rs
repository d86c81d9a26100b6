// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

fn order(lift: u32, quantity: u32, clock: u64, rank: u32) -> Order {
    Order::new(LiftKey(lift), quantity, Stamp::new(clock, Rank(rank)))
}

#[test]
fn order_requester_comes_from_stamp() {
    let o = order(1, 3, 10, 4);
    assert_eq!(o.requester, Rank(4));
    assert_eq!(o.clone().retarget(LiftKey(2)).lift, LiftKey(2));
    assert_eq!(o.retarget(LiftKey(2)).stamp, Stamp::new(10, Rank(4)));
}

#[test]
fn batch_lists_distinct_lifts() {
    let mut batch = PreparedBatch::new();
    batch.push(order(2, 1, 5, 0));
    batch.push(order(1, 1, 6, 0));
    batch.push(order(2, 1, 7, 1));
    assert_eq!(batch.lifts(), vec![LiftKey(1), LiftKey(2)]);
    assert!(batch.has_lift(LiftKey(2)));
    assert!(!batch.has_lift(LiftKey(3)));
}

#[test]
fn oldest_for_ignores_other_lifts() {
    let mut batch = PreparedBatch::new();
    batch.push(order(1, 1, 9, 0));
    batch.push(order(2, 1, 3, 0));
    batch.push(order(1, 1, 4, 2));
    let oldest = batch.oldest_for(LiftKey(1)).map(|o| o.stamp);
    assert_eq!(oldest, Some(Stamp::new(4, Rank(2))));
}

#[test]
fn pack_skips_orders_that_do_not_fit() {
    let mut batch = PreparedBatch::new();
    batch.push(order(1, 3, 1, 0));
    batch.push(order(1, 4, 2, 1));
    batch.push(order(1, 2, 3, 2));
    batch.push(order(2, 1, 4, 3));

    let packed = batch.pack(LiftKey(1), 5);
    let quantities: Vec<_> = packed.iter().map(|o| o.quantity).collect();
    assert_eq!(quantities, vec![3, 2]);
    // The 4 stays behind, as does the other lift's order
    assert_eq!(batch.len(), 2);
    assert!(batch.has_lift(LiftKey(2)));
}

#[test]
fn pack_with_no_room_takes_nothing() {
    let mut batch = PreparedBatch::new();
    batch.push(order(1, 1, 1, 0));
    assert!(batch.pack(LiftKey(1), 0).is_empty());
    assert_eq!(batch.len(), 1);
}

proptest! {
    #[test]
    fn pack_never_exceeds_room(
        quantities in proptest::collection::vec(1u32..=5, 0..12),
        room in 0u32..=10,
    ) {
        let mut batch = PreparedBatch::new();
        for (i, q) in quantities.iter().enumerate() {
            batch.push(order(1, *q, i as u64, 0));
        }
        let before = batch.len();
        let packed = batch.pack(LiftKey(1), room);
        let total: u32 = packed.iter().map(|o| o.quantity).sum();
        prop_assert!(total <= room);
        prop_assert_eq!(before, batch.len() + packed.len());
    }
}
