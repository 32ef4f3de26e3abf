//! Seat membership: join/reconnect, leave, connectivity, AI seat admin.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::GameFlowService;
use crate::ai::friendly_seat_name;
use crate::domain::seat::{Difficulty, Seat, SeatId};
use crate::domain::snapshot::{self, RoomSnapshot, SeatView};
use crate::domain::table::RoomId;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::services::rooms::Room;
use crate::session::{ClientId, ConnId};
use crate::ws::protocol::ServerMsg;

impl GameFlowService {
    /// Join a room, or reclaim an existing seat when the durable client
    /// identity already owns one (reconnection). Returns the full room
    /// snapshot for the caller's first render.
    pub async fn join(
        self: &Arc<Self>,
        room_id: RoomId,
        client: ClientId,
        display_name: String,
    ) -> Result<RoomSnapshot, AppError> {
        let room = self.registry.require(room_id)?;
        let snapshot = {
            let mut table = room.table.lock().await;

            if let Some(seat_id) = self.mapper.resolve(room_id, client) {
                if table.seat(seat_id).is_some() {
                    // Reconnect: same seat, funds, hand and wager.
                    let state = table.seat_reconnected(seat_id);
                    info!(room_id = %room_id, seat_id = %seat_id, "seat reclaimed on reconnect");
                    self.hub
                        .broadcast(room_id, &ServerMsg::SeatStatus { seat_id, state });
                    self.finish_mutation(&mut table);
                    snapshot::snapshot(&table)
                } else {
                    // The seat was removed while the client was away.
                    self.mapper.forget_seat(room_id, client);
                    self.seat_new_player(&mut table, room_id, client, &display_name)?
                }
            } else {
                self.seat_new_player(&mut table, room_id, client, &display_name)?
            }
        };
        self.spawn_drive(room);
        Ok(snapshot)
    }

    fn seat_new_player(
        &self,
        table: &mut crate::domain::table::RoomTable,
        room_id: RoomId,
        client: ClientId,
        display_name: &str,
    ) -> Result<RoomSnapshot, AppError> {
        let funds = self.registry.table_config().starting_funds;
        let seat = Seat::human(Uuid::new_v4(), display_name, funds);
        let seat_id = seat.id;
        let added = table.add_seat(seat)?;
        let view = SeatView::from(added);
        self.mapper.bind_seat(room_id, client, seat_id);
        info!(room_id = %room_id, seat_id = %seat_id, display_name, "player joined");
        self.hub
            .broadcast(room_id, &ServerMsg::PlayerJoined { seat: view });
        self.finish_mutation(table);
        Ok(snapshot::snapshot(table))
    }

    /// Voluntarily leave a room. Destroys the room once its last seat,
    /// human or automated, is gone.
    pub async fn leave(self: &Arc<Self>, room_id: RoomId, client: ClientId) -> Result<(), AppError> {
        let room = self.registry.require(room_id)?;
        let seat_id = self
            .mapper
            .resolve(room_id, client)
            .ok_or_else(|| AppError::not_found(ErrorCode::SeatNotFound, "you have not joined this room"))?;

        let destroyed = {
            let mut table = room.table.lock().await;
            let removed = table.remove_seat(seat_id)?;
            self.mapper.forget_seat(room_id, client);
            info!(room_id = %room_id, seat_id = %seat_id, display_name = %removed.display_name, "player left");
            self.hub
                .broadcast(room_id, &ServerMsg::PlayerLeft { seat_id });
            self.finish_mutation(&mut table);
            table.is_empty()
        };

        if destroyed {
            self.destroy_room(&room);
        } else {
            self.spawn_drive(room);
        }
        Ok(())
    }

    /// Mark a seat disconnected when its socket drops. The seat keeps its
    /// turn slot; the watchdog is the recovery path if it was active.
    pub async fn mark_disconnected(&self, room_id: RoomId, conn: ConnId) {
        let Some(client) = self.mapper.client_for(conn) else {
            self.mapper.release_transport(conn);
            return;
        };
        self.mapper.release_transport(conn);

        let Some(room) = self.registry.get(room_id) else {
            return;
        };
        let Some(seat_id) = self.mapper.resolve(room_id, client) else {
            return;
        };

        let mut table = room.table.lock().await;
        if let Some(state) = table.seat_disconnected(seat_id) {
            info!(room_id = %room_id, seat_id = %seat_id, "seat marked disconnected");
            self.hub
                .broadcast(room_id, &ServerMsg::SeatStatus { seat_id, state });
            self.finish_mutation(&mut table);
        }
    }

    /// Administrative: add an automated seat at the given difficulty.
    pub async fn add_automated_seat(
        self: &Arc<Self>,
        room_id: RoomId,
        difficulty: Difficulty,
    ) -> Result<SeatView, AppError> {
        let room = self.registry.require(room_id)?;
        let view = {
            let mut table = room.table.lock().await;
            let funds = self.registry.table_config().starting_funds;
            let name = friendly_seat_name(difficulty, &mut rand::rng());
            let seat = Seat::automated(Uuid::new_v4(), name, funds, difficulty);
            let added = table.add_seat(seat)?;
            let view = SeatView::from(added);
            info!(
                room_id = %room_id,
                seat_id = %view.seat_id,
                difficulty = difficulty.as_str(),
                "automated seat added"
            );
            self.hub.broadcast(
                room_id,
                &ServerMsg::PlayerJoined { seat: view.clone() },
            );
            self.finish_mutation(&mut table);
            view
        };
        self.spawn_drive(room);
        Ok(view)
    }

    /// Administrative: remove an automated seat.
    pub async fn remove_automated_seat(
        self: &Arc<Self>,
        room_id: RoomId,
        seat_id: SeatId,
    ) -> Result<(), AppError> {
        let room = self.registry.require(room_id)?;
        let destroyed = {
            let mut table = room.table.lock().await;
            match table.seat(seat_id) {
                Some(seat) if seat.is_automated() => {}
                Some(_) => {
                    return Err(AppError::conflict(
                        ErrorCode::NotAutomated,
                        "the target seat belongs to a human player",
                    ))
                }
                None => {
                    return Err(AppError::not_found(
                        ErrorCode::SeatNotFound,
                        "no such seat in this room",
                    ))
                }
            }
            table.remove_seat(seat_id)?;
            info!(room_id = %room_id, seat_id = %seat_id, "automated seat removed");
            self.hub
                .broadcast(room_id, &ServerMsg::PlayerLeft { seat_id });
            self.finish_mutation(&mut table);
            table.is_empty()
        };

        if destroyed {
            self.destroy_room(&room);
        } else {
            self.spawn_drive(room);
        }
        Ok(())
    }

    fn destroy_room(&self, room: &Room) {
        self.registry.remove(room.id);
        self.mapper.forget_room(room.id);
    }
}
