// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;
use crate::config::ProtocolConfig;
use crate::dice::ScriptedDice;
use crate::effect::Effect;
use crate::lamport::{LamportClock, Stamp};
use std::time::Duration;

fn order(rank: u32, clock: u64, quantity: u32) -> Order {
    Order::new(LiftKey(1), quantity, Stamp::new(clock, Rank(rank)))
}

fn open_transit(clock: &FakeClock) -> Transit {
    let mut transit = Transit::open(QueueKind::Ordering, LiftKey(1), 5, Rank(1), [order(1, 1, 2)]);
    transit.window = Some(Countdown::start(clock, Duration::from_millis(30)));
    transit
}

#[test]
fn own_units_count_toward_load() {
    let clock = FakeClock::new();
    let transit = open_transit(&clock);
    assert_eq!(transit.load(), 2);
    assert_eq!(transit.remaining(), 3);
    assert!(!transit.is_full());
}

#[test]
fn fitting_unit_is_accepted_while_window_open() {
    let clock = FakeClock::new();
    let mut transit = open_transit(&clock);
    assert_eq!(transit.offer(Rank(2), order(2, 3, 3), &clock), Ok(()));
    assert!(transit.is_full());
    let orders = transit.into_orders();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[1].requester, Rank(2));
}

#[test]
fn oversized_unit_is_declined() {
    let clock = FakeClock::new();
    let mut transit = open_transit(&clock);
    assert_eq!(
        transit.offer(Rank(2), order(2, 3, 4), &clock),
        Err(Decline::NoRoom {
            offered: 4,
            remaining: 3
        })
    );
    assert_eq!(transit.load(), 2);
}

#[test]
fn unit_after_window_is_declined() {
    let clock = FakeClock::new();
    let mut transit = open_transit(&clock);
    clock.advance(Duration::from_millis(30));
    assert_eq!(
        transit.offer(Rank(2), order(2, 3, 1), &clock),
        Err(Decline::WindowClosed)
    );
}

#[test]
fn unit_for_another_lift_is_declined() {
    let clock = FakeClock::new();
    let mut transit = open_transit(&clock);
    let stray = order(2, 3, 1).retarget(LiftKey(2));
    assert_eq!(transit.offer(Rank(2), stray, &clock), Err(Decline::WrongLift));
}

#[test]
fn packages_credit_their_carrier() {
    let clock = FakeClock::new();
    let mut transit = Transit::open(QueueKind::Delivery, LiftKey(1), 5, Rank(7), [order(1, 1, 1)]);
    transit.window = Some(Countdown::start(&clock, Duration::from_millis(10)));
    transit.offer(Rank(8), order(2, 2, 1), &clock).unwrap();

    let packages = transit.into_packages();
    assert_eq!(packages[0].courier, Rank(7));
    assert_eq!(packages[1].courier, Rank(8));
    assert_eq!(packages[1].requester(), Rank(2));
}

#[test]
fn invite_and_reply_emit_messages() {
    let clock = FakeClock::new();
    let dice = ScriptedDice::default();
    let config = ProtocolConfig::fast();
    let mut lamport = LamportClock::new();
    let mut step = Step::new(Rank(1), &mut lamport, &clock, &dice, &config);

    let mut transit = Transit::open(QueueKind::Ordering, LiftKey(1), 5, Rank(1), [order(1, 1, 2)]);
    transit.invite(
        &mut step,
        Countdown::start(&clock, Duration::from_millis(20)),
        &[Rank(2), Rank(3)],
    );
    assert!(reply(&mut step, Some(&mut transit), QueueKind::Ordering, Rank(2), order(2, 4, 3)));
    assert!(!reply(&mut step, Some(&mut transit), QueueKind::Ordering, Rank(3), order(3, 5, 1)));
    assert!(!reply(&mut step, None, QueueKind::Ordering, Rank(4), order(4, 6, 1)));

    let messages: Vec<_> = step
        .into_effects()
        .into_iter()
        .filter_map(|e| match e {
            Effect::Send { to, envelope } => Some((to, envelope.message.name())),
            _ => None,
        })
        .collect();
    assert_eq!(
        messages,
        vec![
            (Rank(2), "ride_invite"),
            (Rank(3), "ride_invite"),
            (Rank(2), "ride_accepted"),
            (Rank(3), "ride_declined"),
            (Rank(4), "ride_declined"),
        ]
    );
}

#[test]
fn invitation_matches_its_inviter() {
    let clock = FakeClock::new();
    let dice = ScriptedDice::default();
    let config = ProtocolConfig::fast();
    let mut lamport = LamportClock::new();
    let mut step = Step::new(Rank(2), &mut lamport, &clock, &dice, &config);

    let invitation = Invitation::answer(&mut step, QueueKind::Ordering, Rank(1), order(2, 1, 1));
    assert!(invitation.matches(QueueKind::Ordering, LiftKey(1), Rank(1)));
    assert!(!invitation.matches(QueueKind::Ordering, LiftKey(1), Rank(3)));
    assert!(!invitation.matches(QueueKind::Delivery, LiftKey(1), Rank(1)));
}
