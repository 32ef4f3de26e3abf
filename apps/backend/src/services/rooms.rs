//! Room registry: create-on-demand, destroy-on-empty.
//!
//! A `Room` is the unit of concurrency isolation. Its table sits behind a
//! `tokio::sync::Mutex` that serializes every mutation (human command,
//! automated decision, watchdog repair), so two mutations never
//! interleave on the same room. Different rooms are independent.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::config::TableConfig;
use crate::domain::table::{Phase, RoomId, RoomTable};
use crate::errors::domain::{DomainError, NotFoundKind};

pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub table: Mutex<RoomTable>,
    /// Set while a drive task is chaining automated turns for this room,
    /// so commands do not pile up duplicate drive tasks.
    pub driving: AtomicBool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub room_name: String,
    pub player_count: usize,
    pub capacity: usize,
    pub phase: Phase,
}

pub struct RoomRegistry {
    rooms: DashMap<RoomId, Arc<Room>>,
    table_config: TableConfig,
}

impl RoomRegistry {
    pub fn new(table_config: TableConfig) -> Self {
        Self {
            rooms: DashMap::new(),
            table_config,
        }
    }

    pub fn table_config(&self) -> &TableConfig {
        &self.table_config
    }

    /// Create a new empty room in the waiting phase.
    pub fn create(&self, name: Option<String>) -> Arc<Room> {
        let id = Uuid::new_v4();
        let name = name.unwrap_or_else(|| format!("Room {}", self.rooms.len() + 1));
        let table = RoomTable::new(id, name.clone(), self.table_config);
        let room = Arc::new(Room {
            id,
            name,
            table: Mutex::new(table),
            driving: AtomicBool::new(false),
        });
        self.rooms.insert(id, room.clone());
        info!(room_id = %id, room_name = %room.name, "room created");
        room
    }

    pub fn get(&self, id: RoomId) -> Option<Arc<Room>> {
        self.rooms.get(&id).map(|r| r.clone())
    }

    pub fn require(&self, id: RoomId) -> Result<Arc<Room>, DomainError> {
        self.get(id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Room, format!("room {id} does not exist")))
    }

    /// Drop a room outright. Used once its last seat is removed.
    pub fn remove(&self, id: RoomId) {
        if self.rooms.remove(&id).is_some() {
            info!(room_id = %id, "room destroyed");
        }
    }

    /// Every live room, for the watchdog sweep and the lobby listing.
    pub fn all(&self) -> Vec<Arc<Room>> {
        self.rooms.iter().map(|r| r.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Lobby listing with per-room occupancy and phase.
    pub async fn summaries(&self) -> Vec<RoomSummary> {
        let rooms = self.all();
        let mut summaries = Vec::with_capacity(rooms.len());
        for room in rooms {
            let table = room.table.lock().await;
            summaries.push(RoomSummary {
                room_id: room.id,
                room_name: room.name.clone(),
                player_count: table.seats().len(),
                capacity: table.capacity(),
                phase: table.phase(),
            });
        }
        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_get_and_remove() {
        let registry = RoomRegistry::new(TableConfig::default());
        let room = registry.create(Some("High Rollers".to_string()));
        assert_eq!(registry.len(), 1);
        assert!(registry.get(room.id).is_some());
        assert!(registry.require(room.id).is_ok());

        let summaries = registry.summaries().await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].room_name, "High Rollers");
        assert_eq!(summaries[0].player_count, 0);
        assert_eq!(summaries[0].phase, Phase::Waiting);

        registry.remove(room.id);
        assert!(registry.get(room.id).is_none());
        assert!(matches!(
            registry.require(room.id),
            Err(DomainError::NotFound(NotFoundKind::Room, _))
        ));
    }

    #[tokio::test]
    async fn rooms_get_default_names() {
        let registry = RoomRegistry::new(TableConfig::default());
        let room = registry.create(None);
        assert_eq!(room.name, "Room 1");
    }
}
