//! Serializable room views.
//!
//! Snapshots are the only shape the wire ever sees; domain types stay
//! plain. The dealer's hole card is masked outside the dealer-turn and
//! settled phases, and the dealer's visible score counts the upcard only.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::cards::Card;
use crate::domain::hand;
use crate::domain::seat::{Difficulty, Seat, SeatState};
use crate::domain::table::{Phase, RoomTable};

#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub suit: String,
    pub rank: String,
}

impl CardView {
    fn from_card(card: Card) -> Self {
        Self {
            suit: card.suit.symbol().to_string(),
            rank: card.rank.label().to_string(),
        }
    }

    fn masked() -> Self {
        Self {
            suit: "?".to_string(),
            rank: "?".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatView {
    pub seat_id: Uuid,
    pub display_name: String,
    pub funds: u32,
    pub wager: u32,
    pub hand: Vec<CardView>,
    pub score: u32,
    pub state: SeatState,
    pub is_automated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    pub connected: bool,
}

impl From<&Seat> for SeatView {
    fn from(seat: &Seat) -> Self {
        Self::from_seat(seat)
    }
}

impl SeatView {
    fn from_seat(seat: &Seat) -> Self {
        Self {
            seat_id: seat.id,
            display_name: seat.display_name.clone(),
            funds: seat.funds,
            wager: seat.wager,
            hand: seat.hand.iter().copied().map(CardView::from_card).collect(),
            score: seat.score(),
            state: seat.state,
            is_automated: seat.is_automated(),
            difficulty: seat.automation,
            connected: seat.connected,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DealerView {
    pub hand: Vec<CardView>,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomSnapshot {
    pub room_id: Uuid,
    pub room_name: String,
    pub phase: Phase,
    pub message: String,
    pub dealer: DealerView,
    pub seats: Vec<SeatView>,
    pub turn_order: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_seat: Option<Uuid>,
}

/// Build the observer-facing snapshot of a table.
pub fn snapshot(table: &RoomTable) -> RoomSnapshot {
    let reveal = matches!(table.phase(), Phase::DealerTurn | Phase::Settled);
    let dealer_hand = table.dealer_hand();

    let dealer = if reveal {
        DealerView {
            hand: dealer_hand.iter().copied().map(CardView::from_card).collect(),
            score: hand::score(dealer_hand),
        }
    } else {
        let mut cards: Vec<CardView> = Vec::with_capacity(dealer_hand.len());
        for (i, card) in dealer_hand.iter().enumerate() {
            if i == 0 {
                cards.push(CardView::from_card(*card));
            } else {
                cards.push(CardView::masked());
            }
        }
        DealerView {
            hand: cards,
            score: dealer_hand.first().map(|c| hand::score(&[*c])).unwrap_or(0),
        }
    };

    RoomSnapshot {
        room_id: table.id(),
        room_name: table.name().to_string(),
        phase: table.phase(),
        message: table.message().to_string(),
        dealer,
        seats: table.seats().iter().map(SeatView::from_seat).collect(),
        turn_order: table.seats().iter().map(|s| s.id).collect(),
        active_seat: table.active_seat_id(),
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::config::TableConfig;
    use crate::domain::seat::Seat;

    #[test]
    fn hole_card_is_masked_until_dealer_turn() {
        let mut table = RoomTable::with_seed(Uuid::new_v4(), "Room 1", TableConfig::default(), 3);
        let seat = Seat::human(Uuid::new_v4(), "Ada", 1000);
        let seat_id = seat.id;
        table.add_seat(seat).unwrap();
        table.set_ready(seat_id).unwrap();
        table.place_bet(seat_id, 100).unwrap();

        let snap = snapshot(&table);
        if snap.phase == Phase::Playing {
            assert_eq!(snap.dealer.hand.len(), 2);
            assert_eq!(snap.dealer.hand[1].suit, "?");
            assert_eq!(snap.dealer.hand[1].rank, "?");
            // Visible score counts the upcard only.
            assert!(snap.dealer.score <= 11);
        } else {
            // A dealt natural settles immediately and reveals the hole card.
            assert_eq!(snap.phase, Phase::Settled);
            assert!(snap.dealer.hand.iter().all(|c| c.rank != "?"));
        }
    }

    #[test]
    fn snapshot_preserves_turn_order() {
        let mut table = RoomTable::with_seed(Uuid::new_v4(), "Room 1", TableConfig::default(), 3);
        let a = Seat::human(Uuid::new_v4(), "Ada", 1000);
        let b = Seat::human(Uuid::new_v4(), "Bea", 1000);
        let (a_id, b_id) = (a.id, b.id);
        table.add_seat(a).unwrap();
        table.add_seat(b).unwrap();

        let snap = snapshot(&table);
        assert_eq!(snap.turn_order, vec![a_id, b_id]);
        assert_eq!(snap.phase, Phase::Waiting);
        assert!(snap.active_seat.is_none());
    }
}
