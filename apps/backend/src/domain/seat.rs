//! Per-participant seat state and lifecycle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cards::Card;
use crate::domain::hand;

pub type SeatId = Uuid;

/// Automation difficulty tiers, strictly increasing in sophistication.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(()),
        }
    }
}

/// Seat lifecycle.
///
/// `Waiting → Ready → Betting → Playing → {Stand, Busted, Blackjack,
/// FiveDragon} → (Waiting | Spectating)`. A seat with zero funds after
/// settlement spectates until it regains funds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatState {
    Waiting,
    Ready,
    Betting,
    Playing,
    Stand,
    Busted,
    Blackjack,
    FiveDragon,
    Spectating,
}

impl SeatState {
    /// Terminal per-round states: the seat owes no further action this
    /// round and settlement will consider it.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SeatState::Stand | SeatState::Busted | SeatState::Blackjack | SeatState::FiveDragon
        )
    }

    /// States that participate in the current round's settlement.
    pub fn in_round(&self) -> bool {
        self.is_terminal() || matches!(self, SeatState::Playing)
    }
}

#[derive(Debug, Clone)]
pub struct Seat {
    pub id: SeatId,
    pub display_name: String,
    pub funds: u32,
    pub wager: u32,
    pub hand: Vec<Card>,
    pub state: SeatState,
    /// Difficulty tier when the seat is automated, None for humans.
    pub automation: Option<Difficulty>,
    pub connected: bool,
}

impl Seat {
    pub fn human(id: SeatId, display_name: impl Into<String>, funds: u32) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            funds,
            wager: 0,
            hand: Vec::new(),
            state: SeatState::Waiting,
            automation: None,
            connected: true,
        }
    }

    pub fn automated(
        id: SeatId,
        display_name: impl Into<String>,
        funds: u32,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            automation: Some(difficulty),
            ..Self::human(id, display_name, funds)
        }
    }

    pub fn is_automated(&self) -> bool {
        self.automation.is_some()
    }

    pub fn score(&self) -> u32 {
        hand::score(&self.hand)
    }

    /// Clear per-round state. Zero-funds seats spectate; everyone else
    /// returns to waiting.
    pub fn reset_for_new_round(&mut self) {
        self.hand.clear();
        self.wager = 0;
        self.state = if self.funds == 0 {
            SeatState::Spectating
        } else {
            SeatState::Waiting
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_spectates_broke_seats() {
        let mut seat = Seat::human(Uuid::new_v4(), "Ada", 0);
        seat.state = SeatState::Stand;
        seat.reset_for_new_round();
        assert_eq!(seat.state, SeatState::Spectating);

        let mut seat = Seat::human(Uuid::new_v4(), "Bea", 400);
        seat.state = SeatState::Busted;
        seat.wager = 100;
        seat.reset_for_new_round();
        assert_eq!(seat.state, SeatState::Waiting);
        assert_eq!(seat.wager, 0);
        assert!(seat.hand.is_empty());
    }

    #[test]
    fn terminal_states() {
        assert!(SeatState::Stand.is_terminal());
        assert!(SeatState::FiveDragon.is_terminal());
        assert!(!SeatState::Playing.is_terminal());
        assert!(!SeatState::Spectating.is_terminal());
        assert!(SeatState::Playing.in_round());
        assert!(!SeatState::Waiting.in_round());
    }

    #[test]
    fn difficulty_round_trips_from_str() {
        for d in Difficulty::ALL {
            assert_eq!(d.as_str().parse::<Difficulty>(), Ok(d));
        }
        assert!("impossible".parse::<Difficulty>().is_err());
    }
}
