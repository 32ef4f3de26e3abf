//! Whose-turn query and single-step execution for automated seats.

use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, info};

use super::GameFlowService;
use crate::ai::{clamp_wager, strategy_for, Action, TableView};
use crate::domain::seat::{SeatId, SeatState};
use crate::domain::table::{Phase, RoomTable};
use crate::error::AppError;
use crate::services::rooms::Room;

/// The next action an automated seat owes the room, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AgentTask {
    /// Ready up during the waiting phase.
    Ready(SeatId),
    /// Place a wager during the betting phase.
    Wager(SeatId),
    /// Act on the seat's turn during the playing phase.
    Turn(SeatId),
}

impl GameFlowService {
    /// Explicit whose-turn query: does any automated seat owe an action
    /// right now? Returns at most one task; the drive loop iterates.
    pub(super) fn next_agent_task(table: &RoomTable) -> Option<AgentTask> {
        match table.phase() {
            Phase::Waiting => table
                .seats()
                .iter()
                .find(|s| s.is_automated() && s.state == SeatState::Waiting && s.funds > 0)
                .map(|s| AgentTask::Ready(s.id)),
            Phase::Betting => table
                .seats()
                .iter()
                .find(|s| s.is_automated() && s.state == SeatState::Betting)
                .map(|s| AgentTask::Wager(s.id)),
            Phase::Playing => {
                let active = table.active_seat_id()?;
                let seat = table.seat(active)?;
                seat.is_automated().then_some(AgentTask::Turn(active))
            }
            Phase::DealerTurn | Phase::Settled => None,
        }
    }

    /// Let the decision agent take one step for this room.
    ///
    /// Returns true if a mutation was applied. The thinking pause happens
    /// outside the room lock so human commands interleave fairly; the
    /// task is recomputed under the lock afterwards, which makes the
    /// speculative pre-check safe.
    pub(super) async fn run_agent_task(&self, room: &Room, pause: bool) -> Result<bool, AppError> {
        let pending = {
            let table = room.table.lock().await;
            Self::next_agent_task(&table)
        };
        if pending.is_none() {
            return Ok(false);
        }

        if pause {
            self.think_pause().await;
        }

        let mut table = room.table.lock().await;
        let Some(task) = Self::next_agent_task(&table) else {
            // A human or the watchdog got there first.
            return Ok(false);
        };

        match task {
            AgentTask::Ready(seat_id) => {
                table.set_ready(seat_id)?;
                debug!(room_id = %table.id(), seat_id = %seat_id, "automated seat readied up");
            }
            AgentTask::Wager(seat_id) => {
                let (difficulty, funds) = {
                    let seat = table.seat(seat_id).expect("task references a live seat");
                    (seat.automation.expect("wager task is automated"), seat.funds)
                };
                let minimum = table.config().min_wager;
                let strategy = strategy_for(difficulty);
                let proposed = strategy.wager(funds, minimum, &mut rand::rng());
                let amount = clamp_wager(proposed, minimum, funds);
                table.place_bet(seat_id, amount)?;
                info!(
                    room_id = %table.id(),
                    seat_id = %seat_id,
                    difficulty = difficulty.as_str(),
                    amount,
                    "automated seat wagered"
                );
            }
            AgentTask::Turn(seat_id) => {
                let (difficulty, view) = {
                    let seat = table.seat(seat_id).expect("task references a live seat");
                    let view = TableView {
                        score: seat.score(),
                        cards_held: seat.hand.len(),
                        dealer_upcard: table
                            .dealer_upcard()
                            .map(|c| c.rank.face_value())
                            .unwrap_or(0),
                        funds: seat.funds,
                        wager: seat.wager,
                    };
                    (seat.automation.expect("turn task is automated"), view)
                };
                let strategy = strategy_for(difficulty);
                let action = strategy.decide(&view, &mut rand::rng());
                info!(
                    room_id = %table.id(),
                    seat_id = %seat_id,
                    difficulty = difficulty.as_str(),
                    ?action,
                    score = view.score,
                    "automated seat acted"
                );
                match action {
                    Action::Hit => table.hit(seat_id)?,
                    Action::Stand => table.stand(seat_id)?,
                    Action::Double => {
                        // A strategy that misjudged the double preconditions
                        // still owes the room progress.
                        if table.double_down(seat_id).is_err() {
                            table.stand(seat_id)?;
                        }
                    }
                }
            }
        }

        self.finish_mutation(&mut table);
        Ok(true)
    }

    /// Simulated thinking time, skipped entirely when configured to zero.
    async fn think_pause(&self) {
        let (min, max) = (self.timing.think_min, self.timing.think_max);
        if max.is_zero() {
            return;
        }
        let delay = if min >= max {
            max
        } else {
            rand::rng().random_range(min..=max)
        };
        sleep(delay).await;
    }
}
