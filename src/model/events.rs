// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Domain events emitted by every `GraphModel` mutator.
//!
//! Listeners (counters, logs, the embedding UI) subscribe to a channel; a dropped receiver is
//! pruned on the next emit.

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::ids::{ConnectionId, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphEvent {
    NodeAdded { node_id: NodeId },
    NodeRemoved { node_id: NodeId },
    ConnectionCreated(ConnectionEndpoints),
    ConnectionRemoved(ConnectionEndpoints),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionEndpoints {
    pub connection_id: ConnectionId,
    pub source_id: NodeId,
    pub target_id: NodeId,
}

#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<UnboundedSender<GraphEvent>>,
}

impl EventBus {
    pub fn subscribe(&mut self) -> UnboundedReceiver<GraphEvent> {
        let (tx, rx) = unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub(crate) fn emit(&mut self, event: GraphEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
