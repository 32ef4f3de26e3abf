//! Seat-scoped player commands: ready, bet, hit, stand, double, next round.
//!
//! Every command resolves the caller's seat through the session mapper,
//! applies the table operation under the room lock, broadcasts the
//! settled state, and then schedules a drive so any automated seats that
//! now owe an action get to act.

use std::sync::Arc;

use tracing::info;

use super::GameFlowService;
use crate::domain::seat::SeatId;
use crate::domain::table::RoomId;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::session::ClientId;
use crate::ws::protocol::ServerMsg;

impl GameFlowService {
    fn seat_for(&self, room_id: RoomId, client: ClientId) -> Result<SeatId, AppError> {
        self.mapper
            .resolve(room_id, client)
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Seat, "you have not joined this room").into()
            })
    }

    /// Toggle readiness; betting starts once every funded seat is ready.
    pub async fn set_ready(self: &Arc<Self>, room_id: RoomId, client: ClientId) -> Result<(), AppError> {
        let room = self.registry.require(room_id)?;
        let seat_id = self.seat_for(room_id, client)?;
        {
            let mut table = room.table.lock().await;
            table.set_ready(seat_id)?;
            if let Some(seat) = table.seat(seat_id) {
                self.hub.broadcast(
                    room_id,
                    &ServerMsg::SeatStatus {
                        seat_id,
                        state: seat.state,
                    },
                );
            }
            self.finish_mutation(&mut table);
        }
        self.spawn_drive(room);
        Ok(())
    }

    pub async fn place_bet(
        self: &Arc<Self>,
        room_id: RoomId,
        client: ClientId,
        amount: u32,
    ) -> Result<(), AppError> {
        let room = self.registry.require(room_id)?;
        let seat_id = self.seat_for(room_id, client)?;
        {
            let mut table = room.table.lock().await;
            table.place_bet(seat_id, amount)?;
            info!(room_id = %room_id, seat_id = %seat_id, amount, "wager placed");
            self.finish_mutation(&mut table);
        }
        self.spawn_drive(room);
        Ok(())
    }

    pub async fn hit(self: &Arc<Self>, room_id: RoomId, client: ClientId) -> Result<(), AppError> {
        let room = self.registry.require(room_id)?;
        let seat_id = self.seat_for(room_id, client)?;
        {
            let mut table = room.table.lock().await;
            table.hit(seat_id)?;
            self.finish_mutation(&mut table);
        }
        self.spawn_drive(room);
        Ok(())
    }

    pub async fn stand(self: &Arc<Self>, room_id: RoomId, client: ClientId) -> Result<(), AppError> {
        let room = self.registry.require(room_id)?;
        let seat_id = self.seat_for(room_id, client)?;
        {
            let mut table = room.table.lock().await;
            table.stand(seat_id)?;
            self.finish_mutation(&mut table);
        }
        self.spawn_drive(room);
        Ok(())
    }

    pub async fn double_down(
        self: &Arc<Self>,
        room_id: RoomId,
        client: ClientId,
    ) -> Result<(), AppError> {
        let room = self.registry.require(room_id)?;
        let seat_id = self.seat_for(room_id, client)?;
        {
            let mut table = room.table.lock().await;
            table.double_down(seat_id)?;
            self.finish_mutation(&mut table);
        }
        self.spawn_drive(room);
        Ok(())
    }

    /// Reset a settled room for the next round.
    pub async fn next_round(
        self: &Arc<Self>,
        room_id: RoomId,
        client: ClientId,
    ) -> Result<(), AppError> {
        let room = self.registry.require(room_id)?;
        // Any seated participant may start the next round.
        let _seat_id = self.seat_for(room_id, client)?;
        {
            let mut table = room.table.lock().await;
            table.prepare_next_round()?;
            self.finish_mutation(&mut table);
            self.notify(&table, "A new round is ready, please get ready");
        }
        self.spawn_drive(room);
        Ok(())
    }
}
