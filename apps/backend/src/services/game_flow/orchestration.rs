//! The drive loop that chains automated turns, and the forced repairs
//! the watchdog routes through the ordinary state-machine operations.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::time::sleep;
use tracing::{info, warn};

use super::GameFlowService;
use crate::ai::clamp_wager;
use crate::domain::seat::SeatState;
use crate::domain::table::Phase;
use crate::error::AppError;
use crate::services::rooms::Room;
use crate::ws::protocol::ServerMsg;

impl GameFlowService {
    /// Chain automated turns until control returns to a human seat, the
    /// round ends, or the iteration budget runs out.
    ///
    /// Bounded looping instead of recursion: every iteration is one
    /// agent step, so a table of automated seats plays through without
    /// ever growing the stack, and a bug can waste at most the budget.
    pub async fn drive(&self, room: &Room, pause: bool) {
        for _ in 0..self.timing.drive_iteration_cap {
            match self.run_agent_task(room, pause).await {
                Ok(true) => continue,
                Ok(false) => return,
                Err(err) => {
                    warn!(room_id = %room.id, error = %err, "agent step failed, leaving the room to the watchdog");
                    return;
                }
            }
        }
        warn!(
            room_id = %room.id,
            cap = self.timing.drive_iteration_cap,
            "drive iteration budget exhausted"
        );
    }

    /// Schedule a drive for this room after the configured render pause.
    ///
    /// Deduplicated per room: while one drive task is live, later
    /// commands rely on it (or on the watchdog) to pick up the new state.
    pub fn spawn_drive(self: &Arc<Self>, room: Arc<Room>) {
        if room.driving.swap(true, Ordering::SeqCst) {
            return;
        }
        let flow = self.clone();
        tokio::spawn(async move {
            if !flow.timing.drive_pause.is_zero() {
                sleep(flow.timing.drive_pause).await;
            }
            flow.drive(&room, true).await;
            room.driving.store(false, Ordering::SeqCst);
        });
    }

    // ---------- Watchdog repairs ----------

    /// Force every seat stuck in the betting state to the table minimum
    /// wager (or all-in below it). Returns true if any wager was forced.
    pub async fn force_betting_minimums(&self, room: &Room) -> Result<bool, AppError> {
        let mut table = room.table.lock().await;
        if table.phase() != Phase::Betting {
            return Ok(false);
        }
        let stuck: Vec<_> = table
            .seats()
            .iter()
            .filter(|s| s.state == SeatState::Betting)
            .map(|s| (s.id, s.funds))
            .collect();
        if stuck.is_empty() {
            return Ok(false);
        }
        let minimum = table.config().min_wager;
        for (seat_id, funds) in stuck {
            let amount = clamp_wager(minimum, minimum, funds);
            table.place_bet(seat_id, amount)?;
            info!(room_id = %room.id, seat_id = %seat_id, amount, "forced minimum wager");
        }
        self.finish_mutation(&mut table);
        Ok(true)
    }

    /// Force the stuck active seat to stand and advance the turn.
    pub async fn force_stand_active(&self, room: &Room) -> Result<bool, AppError> {
        let mut table = room.table.lock().await;
        match table.active_seat_id() {
            Some(seat_id) => {
                table.stand(seat_id)?;
                info!(room_id = %room.id, seat_id = %seat_id, "forced stand on stuck seat");
                self.finish_mutation(&mut table);
                Ok(true)
            }
            None if table.phase() == Phase::Playing => {
                // Playing with nobody to act should be impossible; resync
                // pushes the round on to the dealer.
                table.resync_turn();
                info!(room_id = %room.id, "resynced a playing room with no active seat");
                self.finish_mutation(&mut table);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Ready up every funded automated seat still waiting.
    pub async fn force_ready_automated(&self, room: &Room) -> Result<bool, AppError> {
        let mut table = room.table.lock().await;
        if table.phase() != Phase::Waiting {
            return Ok(false);
        }
        let waiting: Vec<_> = table
            .seats()
            .iter()
            .filter(|s| s.is_automated() && s.state == SeatState::Waiting && s.funds > 0)
            .map(|s| s.id)
            .collect();
        if waiting.is_empty() {
            return Ok(false);
        }
        for seat_id in waiting {
            table.set_ready(seat_id)?;
        }
        self.finish_mutation(&mut table);
        Ok(true)
    }

    /// Reset a settled room that nobody advanced.
    pub async fn auto_next_round(&self, room: &Room) -> Result<(), AppError> {
        let mut table = room.table.lock().await;
        if table.phase() != Phase::Settled {
            return Ok(());
        }
        table.prepare_next_round()?;
        info!(room_id = %room.id, "auto-started the next round");
        self.finish_mutation(&mut table);
        self.hub.broadcast(
            room.id,
            &ServerMsg::Notification {
                message: "A new round has automatically started".to_string(),
            },
        );
        Ok(())
    }
}
