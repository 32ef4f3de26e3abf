//! Stall watchdog: periodic out-of-band detection and repair of rooms
//! that have stopped making forward progress.
//!
//! Per room it tracks `(phase, active seat)` and the time of the last
//! observed change. Once a room sits unchanged past the grace period the
//! repairs escalate:
//!
//! 1. stuck betting seats are forced straight to the table minimum, and
//!    automated seats that owe a ready/turn action get driven without
//!    any thinking pause;
//! 2. after three consecutive stall detections the active seat is forced
//!    to stand;
//! 3. a settled room idle past the long grace window is reset for the
//!    next round.
//!
//! All repairs route through the same state-machine operations ordinary
//! commands use, and every corrective action broadcasts. A failure in
//! one room is logged and never stops the sweep.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::config::TimingConfig;
use crate::domain::seat::SeatId;
use crate::domain::table::{Phase, RoomId};
use crate::error::AppError;
use crate::services::game_flow::GameFlowService;
use crate::services::rooms::{Room, RoomRegistry};

/// How many consecutive stall detections trigger the forced repair tier.
const FORCE_AFTER_STALLS: u32 = 3;

struct RoomProgress {
    phase: Phase,
    active: Option<SeatId>,
    last_change: Instant,
    stall_count: u32,
}

pub struct StallWatchdog {
    registry: Arc<RoomRegistry>,
    flow: Arc<GameFlowService>,
    timing: TimingConfig,
    states: HashMap<RoomId, RoomProgress>,
}

impl StallWatchdog {
    pub fn new(
        registry: Arc<RoomRegistry>,
        flow: Arc<GameFlowService>,
        timing: TimingConfig,
    ) -> Self {
        Self {
            registry,
            flow,
            timing,
            states: HashMap::new(),
        }
    }

    /// Run the sweep loop on its own task until the process exits.
    pub fn spawn(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.timing.watchdog_tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(tick = ?self.timing.watchdog_tick, "stall watchdog started");
            loop {
                ticker.tick().await;
                self.sweep().await;
            }
        })
    }

    /// One pass over every room. Public so tests can tick the watchdog
    /// deterministically.
    pub async fn sweep(&mut self) {
        let rooms = self.registry.all();
        for room in &rooms {
            if let Err(err) = self.check_room(room).await {
                // Never fail silently, never break the loop: the next
                // tick retries with the escalation state preserved.
                warn!(room_id = %room.id, error = %err, "watchdog check failed");
            }
        }
        self.states.retain(|id, _| rooms.iter().any(|r| r.id == *id));
    }

    async fn check_room(&mut self, room: &Arc<Room>) -> Result<(), AppError> {
        let (phase, active) = {
            let table = room.table.lock().await;
            (table.phase(), table.active_seat_id())
        };
        let now = Instant::now();

        let entry = match self.states.entry(room.id) {
            Entry::Vacant(vacant) => {
                // First observation of this room: record a baseline only.
                vacant.insert(RoomProgress {
                    phase,
                    active,
                    last_change: now,
                    stall_count: 0,
                });
                return Ok(());
            }
            Entry::Occupied(occupied) => occupied.into_mut(),
        };

        if entry.phase != phase || entry.active != active {
            entry.phase = phase;
            entry.active = active;
            entry.last_change = now;
            entry.stall_count = 0;
            return Ok(());
        }

        match phase {
            Phase::Settled => {
                if now.duration_since(entry.last_change) >= self.timing.settled_grace {
                    info!(room_id = %room.id, "settled room idle too long, starting next round");
                    self.flow.auto_next_round(room).await?;
                    entry.last_change = now;
                    entry.stall_count = 0;
                }
            }
            Phase::Waiting | Phase::Betting | Phase::Playing => {
                if now.duration_since(entry.last_change) < self.timing.stall_grace {
                    return Ok(());
                }
                entry.stall_count += 1;
                // Stamp even when the repair below fails, so one broken
                // room does not fire on every tick.
                entry.last_change = now;

                let stalls = entry.stall_count;
                info!(room_id = %room.id, ?phase, stalls, "stall detected");
                self.repair(room, phase, stalls).await?;
            }
            Phase::DealerTurn => {}
        }
        Ok(())
    }

    async fn repair(&mut self, room: &Arc<Room>, phase: Phase, stalls: u32) -> Result<(), AppError> {
        match phase {
            Phase::Betting => {
                // Minimal safe action for a stuck bettor is always the
                // table minimum, automated or not.
                if self.flow.force_betting_minimums(room).await? {
                    self.reset_stalls(room.id);
                }
            }
            Phase::Waiting => {
                if self.flow.force_ready_automated(room).await? {
                    self.reset_stalls(room.id);
                }
            }
            Phase::Playing => {
                if stalls >= FORCE_AFTER_STALLS {
                    if self.flow.force_stand_active(room).await? {
                        self.reset_stalls(room.id);
                    }
                } else {
                    // First detections: let the decision agent act for a
                    // stuck automated seat, with no thinking pause.
                    self.flow.drive(room, false).await;
                }
            }
            Phase::DealerTurn | Phase::Settled => {}
        }
        Ok(())
    }

    fn reset_stalls(&mut self, room_id: RoomId) {
        if let Some(entry) = self.states.get_mut(&room_id) {
            entry.stall_count = 0;
        }
    }
}
