//! Append-only round record store.
//!
//! One JSON file per room under the configured records directory, plus an
//! in-process cache so history reads do not hit the filesystem on every
//! request. Settlement correctness never depends on this store; a failed
//! write is logged by the caller and the round stands.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::seat::{Difficulty, SeatState};
use crate::domain::table::{RoomId, RoundOutcome};
use crate::domain::settlement::Outcome;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedCard {
    pub suit: String,
    pub rank: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatRecord {
    pub name: String,
    pub wager: u32,
    /// Profit or loss for the round.
    pub net: i64,
    pub outcome: Outcome,
    pub state: SeatState,
    pub score: u32,
    pub is_automated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    pub id: String,
    pub room_id: RoomId,
    pub room_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub players: Vec<SeatRecord>,
    pub dealer_score: u32,
    pub dealer_cards: Vec<RecordedCard>,
    pub result: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerStats {
    pub games_played: u64,
    pub wins: u64,
    pub losses: u64,
    pub total_profit: i64,
    pub blackjacks: u64,
    pub busts: u64,
    pub win_rate: f64,
}

pub struct RoundStore {
    dir: PathBuf,
    cache: Mutex<HashMap<RoomId, Vec<RoundRecord>>>,
}

impl RoundStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|err| AppError::config(format!("cannot create records dir: {err}")))?;
        Ok(Self {
            dir,
            cache: Mutex::new(HashMap::new()),
        })
    }

    fn room_file(&self, room_id: RoomId) -> PathBuf {
        self.dir.join(format!("room_{room_id}.json"))
    }

    /// Append a settled round to the room's record file.
    pub fn record_round(
        &self,
        room_id: RoomId,
        room_name: &str,
        outcome: &RoundOutcome,
    ) -> Result<RoundRecord, AppError> {
        let timestamp = OffsetDateTime::now_utc();
        let record = RoundRecord {
            id: format!("{room_id}_{}", timestamp.unix_timestamp()),
            room_id,
            room_name: room_name.to_string(),
            timestamp,
            players: outcome
                .results
                .iter()
                .map(|r| SeatRecord {
                    name: r.display_name.clone(),
                    wager: r.wager,
                    net: r.net,
                    outcome: r.outcome,
                    state: r.state,
                    score: r.score,
                    is_automated: r.automation.is_some(),
                    difficulty: r.automation,
                })
                .collect(),
            dealer_score: outcome.dealer_score,
            dealer_cards: outcome
                .dealer_cards
                .iter()
                .map(|c| RecordedCard {
                    suit: c.suit.symbol().to_string(),
                    rank: c.rank.label().to_string(),
                })
                .collect(),
            result: outcome.message.clone(),
        };

        let mut cache = self.cache.lock();
        let records = match cache.entry(room_id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let loaded = self.load_from_disk(room_id)?;
                entry.insert(loaded)
            }
        };
        records.push(record.clone());
        let serialized = serde_json::to_string_pretty(&records)
            .map_err(|err| AppError::internal(format!("cannot serialize round records: {err}")))?;
        fs::write(self.room_file(room_id), serialized)
            .map_err(|err| AppError::internal(format!("cannot write round records: {err}")))?;
        Ok(record)
    }

    /// Full round history of a room, oldest first.
    pub fn load_history(&self, room_id: RoomId) -> Result<Vec<RoundRecord>, AppError> {
        let mut cache = self.cache.lock();
        if let Some(records) = cache.get(&room_id) {
            return Ok(records.clone());
        }
        let records = self.load_from_disk(room_id)?;
        cache.insert(room_id, records.clone());
        Ok(records)
    }

    fn load_from_disk(&self, room_id: RoomId) -> Result<Vec<RoundRecord>, AppError> {
        let path = self.room_file(room_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path)
            .map_err(|err| AppError::internal(format!("cannot read round records: {err}")))?;
        serde_json::from_str(&raw)
            .map_err(|err| AppError::internal(format!("corrupt round record file: {err}")))
    }

    /// Aggregate statistics for a display name across every room.
    pub fn player_stats(&self, player_name: &str) -> Result<PlayerStats, AppError> {
        let mut stats = PlayerStats::default();
        for entry in fs::read_dir(&self.dir)
            .map_err(|err| AppError::internal(format!("cannot scan records dir: {err}")))?
        {
            let entry =
                entry.map_err(|err| AppError::internal(format!("cannot scan records dir: {err}")))?;
            if !is_room_file(&entry.path()) {
                continue;
            }
            let raw = fs::read_to_string(entry.path())
                .map_err(|err| AppError::internal(format!("cannot read round records: {err}")))?;
            let records: Vec<RoundRecord> = match serde_json::from_str(&raw) {
                Ok(records) => records,
                // A corrupt file must not take the stats endpoint down.
                Err(_) => continue,
            };
            for record in &records {
                for player in &record.players {
                    if player.name != player_name {
                        continue;
                    }
                    stats.games_played += 1;
                    stats.total_profit += player.net;
                    match player.net.cmp(&0) {
                        std::cmp::Ordering::Greater => stats.wins += 1,
                        std::cmp::Ordering::Less => stats.losses += 1,
                        std::cmp::Ordering::Equal => {}
                    }
                    if player.state == SeatState::Blackjack {
                        stats.blackjacks += 1;
                    }
                    if player.state == SeatState::Busted {
                        stats.busts += 1;
                    }
                }
            }
        }
        if stats.games_played > 0 {
            stats.win_rate = stats.wins as f64 / stats.games_played as f64 * 100.0;
        }
        Ok(stats)
    }
}

fn is_room_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with("room_") && n.ends_with(".json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::cards::{Card, Rank, Suit};
    use crate::domain::table::SeatRoundResult;

    fn outcome(name: &str, net: i64, state: SeatState) -> RoundOutcome {
        RoundOutcome {
            dealer_score: 19,
            dealer_cards: vec![
                Card::new(Suit::Spades, Rank::King),
                Card::new(Suit::Hearts, Rank::Nine),
            ],
            results: vec![SeatRoundResult {
                seat_id: Uuid::new_v4(),
                display_name: name.to_string(),
                wager: 100,
                net,
                outcome: if net > 0 {
                    Outcome::Win
                } else if net < 0 {
                    Outcome::Lose
                } else {
                    Outcome::Push
                },
                score: 20,
                state,
                automation: None,
            }],
            message: "Dealer stands at 19".to_string(),
        }
    }

    #[test]
    fn records_append_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = RoundStore::new(dir.path()).unwrap();
        let room_id = Uuid::new_v4();

        store
            .record_round(room_id, "Room 1", &outcome("Ada", 100, SeatState::Stand))
            .unwrap();
        store
            .record_round(room_id, "Room 1", &outcome("Ada", -100, SeatState::Busted))
            .unwrap();

        let history = store.load_history(room_id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].players[0].name, "Ada");

        // A fresh store must read the same file back.
        let reopened = RoundStore::new(dir.path()).unwrap();
        let history = reopened.load_history(room_id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].players[0].net, -100);
    }

    #[test]
    fn player_stats_aggregate_across_rooms() {
        let dir = tempfile::tempdir().unwrap();
        let store = RoundStore::new(dir.path()).unwrap();

        store
            .record_round(Uuid::new_v4(), "Room 1", &outcome("Ada", 150, SeatState::Blackjack))
            .unwrap();
        store
            .record_round(Uuid::new_v4(), "Room 2", &outcome("Ada", -100, SeatState::Busted))
            .unwrap();
        store
            .record_round(Uuid::new_v4(), "Room 3", &outcome("Bea", 100, SeatState::Stand))
            .unwrap();

        let stats = store.player_stats("Ada").unwrap();
        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.total_profit, 50);
        assert_eq!(stats.blackjacks, 1);
        assert_eq!(stats.busts, 1);
        assert!((stats.win_rate - 50.0).abs() < f64::EPSILON);

        let stats = store.player_stats("Nobody").unwrap();
        assert_eq!(stats.games_played, 0);
        assert_eq!(stats.win_rate, 0.0);
    }

    #[test]
    fn empty_history_for_unknown_room() {
        let dir = tempfile::tempdir().unwrap();
        let store = RoundStore::new(dir.path()).unwrap();
        assert!(store.load_history(Uuid::new_v4()).unwrap().is_empty());
    }
}
