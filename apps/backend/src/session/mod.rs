//! Session identity mapping.
//!
//! Two explicit maps, joined only here: transport identity (one WebSocket
//! connection) to the durable client id the browser holds on to, and
//! `(room, client)` to the seat created for that client. Reconnecting
//! under a fresh transport rebinds to the existing seat, so a durable
//! identity never owns more than one live seat per room.

use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::seat::SeatId;
use crate::domain::table::RoomId;

pub type ClientId = Uuid;
pub type ConnId = Uuid;

#[derive(Default)]
pub struct SessionMapper {
    /// Transport identity → durable client identity.
    transports: RwLock<HashMap<ConnId, ClientId>>,
    /// (room, durable client identity) → seat.
    seats: RwLock<HashMap<(RoomId, ClientId), SeatId>>,
}

impl SessionMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a live connection to its durable client id. Replaces any
    /// previous binding for the connection atomically.
    pub fn bind_transport(&self, conn: ConnId, client: ClientId) {
        self.transports.write().insert(conn, client);
    }

    /// Drop a closed connection. Seat bindings survive so the client can
    /// reclaim its seat on reconnect.
    pub fn release_transport(&self, conn: ConnId) {
        self.transports.write().remove(&conn);
    }

    pub fn client_for(&self, conn: ConnId) -> Option<ClientId> {
        self.transports.read().get(&conn).copied()
    }

    /// The seat previously created for this client in this room, if any.
    pub fn resolve(&self, room: RoomId, client: ClientId) -> Option<SeatId> {
        self.seats.read().get(&(room, client)).copied()
    }

    /// Record the seat created for a client in a room.
    pub fn bind_seat(&self, room: RoomId, client: ClientId, seat: SeatId) {
        self.seats.write().insert((room, client), seat);
    }

    /// Forget a seat binding after a voluntary leave or removal.
    pub fn forget_seat(&self, room: RoomId, client: ClientId) {
        self.seats.write().remove(&(room, client));
    }

    /// Drop every seat binding for a destroyed room.
    pub fn forget_room(&self, room: RoomId) {
        self.seats.write().retain(|(r, _), _| *r != room);
    }
}
