//! Game flow orchestration service.
//!
//! The single entry point for every room mutation: player commands from
//! the WebSocket layer, seat administration from HTTP routes, automated
//! decisions from the drive loop and forced repairs from the watchdog.
//! Each operation locks the room's table, validates and applies the
//! mutation, then broadcasts the fully-settled state; partially applied
//! states are never observable.

mod ai_coordinator;
mod orchestration;
mod player_actions;
mod seats;

use std::sync::Arc;

use tracing::{error, warn};

use crate::config::TimingConfig;
use crate::domain::snapshot;
use crate::domain::table::RoomTable;
use crate::services::records::RoundStore;
use crate::services::rooms::RoomRegistry;
use crate::session::SessionMapper;
use crate::ws::hub::WsHub;
use crate::ws::protocol::ServerMsg;

pub struct GameFlowService {
    registry: Arc<RoomRegistry>,
    hub: Arc<WsHub>,
    mapper: Arc<SessionMapper>,
    records: Arc<RoundStore>,
    timing: TimingConfig,
}

impl GameFlowService {
    pub fn new(
        registry: Arc<RoomRegistry>,
        hub: Arc<WsHub>,
        mapper: Arc<SessionMapper>,
        records: Arc<RoundStore>,
        timing: TimingConfig,
    ) -> Self {
        Self {
            registry,
            hub,
            mapper,
            records,
            timing,
        }
    }

    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    pub fn mapper(&self) -> &Arc<SessionMapper> {
        &self.mapper
    }

    /// Close out a mutation: recover from invariant violations, persist a
    /// settled round, then push the new state to every observer.
    fn finish_mutation(&self, table: &mut RoomTable) {
        if let Err(violation) = table.verify_invariants() {
            error!(
                room_id = %table.id(),
                error = %violation,
                "table invariant violated, voiding the round as a push"
            );
            table.force_settle_push(&violation.to_string());
        }

        if let Some(outcome) = table.take_last_round() {
            if let Err(err) = self.records.record_round(table.id(), table.name(), &outcome) {
                // The round stands even when the history write fails.
                warn!(room_id = %table.id(), error = %err, "failed to record round");
            }
        }

        self.hub.broadcast(
            table.id(),
            &ServerMsg::RoomState {
                room: snapshot::snapshot(table),
            },
        );
    }

    fn notify(&self, table: &RoomTable, message: impl Into<String>) {
        self.hub.broadcast(
            table.id(),
            &ServerMsg::Notification {
                message: message.into(),
            },
        );
    }
}
