//! Connection registry and room-scoped broadcast fan-out.

use std::sync::Arc;

use actix::prelude::*;
use dashmap::DashMap;
use tracing::warn;
use uuid::Uuid;

use crate::domain::table::RoomId;
use crate::ws::protocol::ServerMsg;

/// One pre-serialized frame, shared across every recipient.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct OutboundFrame(pub Arc<str>);

#[derive(Default)]
pub struct WsHub {
    rooms: DashMap<RoomId, DashMap<Uuid, Recipient<OutboundFrame>>>,
}

impl WsHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, room_id: RoomId, conn_id: Uuid, recipient: Recipient<OutboundFrame>) {
        let entry = self.rooms.entry(room_id).or_default();
        entry.insert(conn_id, recipient);
    }

    pub fn unregister(&self, room_id: RoomId, conn_id: Uuid) {
        if let Some(entry) = self.rooms.get(&room_id) {
            entry.remove(&conn_id);
            if entry.is_empty() {
                drop(entry);
                self.rooms.remove_if(&room_id, |_, conns| conns.is_empty());
            }
        }
    }

    /// Fan a message out to every observer of a room. Serialization
    /// happens once; delivery to a dead session is silently dropped (the
    /// session actor unregisters itself on stop).
    pub fn broadcast(&self, room_id: RoomId, msg: &ServerMsg) {
        let payload: Arc<str> = match serde_json::to_string(msg) {
            Ok(json) => Arc::from(json),
            Err(err) => {
                warn!(error = %err, "failed to serialize broadcast frame");
                return;
            }
        };
        if let Some(entry) = self.rooms.get(&room_id) {
            for recipient in entry.iter() {
                let _ = recipient.value().do_send(OutboundFrame(payload.clone()));
            }
        }
    }

    pub fn observer_count(&self, room_id: RoomId) -> usize {
        self.rooms.get(&room_id).map(|e| e.len()).unwrap_or(0)
    }
}
