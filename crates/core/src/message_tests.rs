// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::id::Rank;
use crate::lamport::Envelope;

#[test]
fn messages_are_tagged_by_type() {
    let message = Message::Claim {
        kind: QueueKind::Pickup,
        lift: LiftKey(2),
    };
    let json = serde_json::to_value(&message).unwrap();
    assert_eq!(json["type"], "claim");
    assert_eq!(json["kind"], "pickup");
    assert_eq!(json["lift"], 2);
}

#[test]
fn envelope_survives_json() {
    let envelope = Envelope {
        from: Rank(3),
        clock: 17,
        message: Message::Request {
            kind: QueueKind::Delivery,
            scope: LiftScope::Only(vec![LiftKey(1), LiftKey(4)]),
        },
    };
    let text = serde_json::to_string(&envelope).unwrap();
    let back: Envelope = serde_json::from_str(&text).unwrap();
    assert_eq!(back, envelope);
    assert_eq!(back.stamp(), Stamp::new(17, Rank(3)));
}

#[test]
fn completed_has_no_kind_or_lift() {
    assert_eq!(Message::Completed.kind(), None);
    assert_eq!(Message::Completed.lift(), None);
    assert_eq!(Message::Completed.name(), "completed");
}

#[test]
fn releases_map_to_their_queue_family() {
    let delivered = Message::Delivered {
        lift: LiftKey(1),
        packages: vec![],
    };
    assert_eq!(delivered.kind(), Some(QueueKind::Delivery));
    assert_eq!(delivered.lift(), Some(LiftKey(1)));
}

#[test]
fn scope_contains() {
    assert!(LiftScope::All.contains(LiftKey(9)));
    assert!(LiftScope::single(LiftKey(2)).contains(LiftKey(2)));
    assert!(!LiftScope::single(LiftKey(2)).contains(LiftKey(3)));
}
