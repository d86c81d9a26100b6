// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hoist_core::Message;

fn envelope() -> Envelope {
    Envelope {
        from: Rank(0),
        clock: 1,
        message: Message::Completed,
    }
}

#[tokio::test]
async fn fake_transport_records_calls() {
    let transport = FakeTransport::new(Rank(0), 3);
    transport.send(Rank(2), envelope()).await.unwrap();
    transport.broadcast(envelope()).await.unwrap();

    assert_eq!(
        transport.calls(),
        vec![
            TransportCall::Send {
                to: Rank(2),
                envelope: envelope()
            },
            TransportCall::Broadcast {
                envelope: envelope()
            },
        ]
    );
}

#[tokio::test]
async fn fake_transport_rejects_unknown_and_closed_ranks() {
    let transport = FakeTransport::new(Rank(0), 2);
    assert_eq!(
        transport.send(Rank(5), envelope()).await,
        Err(TransportError::UnknownRank(Rank(5)))
    );

    transport.close(Rank(1));
    assert_eq!(
        transport.send(Rank(1), envelope()).await,
        Err(TransportError::Closed(Rank(1)))
    );
}
