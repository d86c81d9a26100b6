// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::message::Message;

#[test]
fn traced_fields_name_the_message() {
    let effect = Effect::Send {
        to: Rank(2),
        envelope: Envelope {
            from: Rank(1),
            clock: 9,
            message: Message::Ack {
                kind: QueueKind::Ordering,
                request: crate::lamport::Stamp::new(4, Rank(2)),
            },
        },
    };
    assert_eq!(effect.name(), "send");
    let fields = effect.fields();
    assert!(fields.contains(&("to", "#2".to_string())));
    assert!(fields.contains(&("message", "ack".to_string())));
}

#[test]
fn timer_ids_display() {
    assert_eq!(TimerId::Poll(QueueKind::Pickup).to_string(), "poll:pickup");
    assert_eq!(TimerId::Departure(LiftKey(3)).to_string(), "departure:lift-3");
    let effect = Effect::SetTimer {
        id: TimerId::Prepare,
        duration: Duration::from_millis(500),
    };
    assert!(effect.fields().contains(&("duration_ms", "500".to_string())));
}
