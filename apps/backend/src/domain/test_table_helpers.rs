//! Shared helpers for table state-machine tests.

use uuid::Uuid;

use crate::config::TableConfig;
use crate::domain::cards::{Card, Rank, Suit};
use crate::domain::seat::{Seat, SeatId, SeatState};
use crate::domain::table::{Phase, RoomTable};

pub fn card(rank: Rank) -> Card {
    Card::new(Suit::Spades, rank)
}

pub fn table() -> RoomTable {
    RoomTable::with_seed(Uuid::new_v4(), "Test Room", TableConfig::default(), 42)
}

/// Add `n` funded human seats and return their ids in turn order.
pub fn seated_table(n: usize) -> (RoomTable, Vec<SeatId>) {
    let mut table = table();
    let mut ids = Vec::new();
    for i in 0..n {
        let seat = Seat::human(Uuid::new_v4(), format!("Player {}", i + 1), 1000);
        ids.push(seat.id);
        table.add_seat(seat).unwrap();
    }
    (table, ids)
}

/// Put the table straight into the playing phase with fixed hands.
///
/// Every listed seat gets the given wager deducted, the given hand, and
/// the state its cards imply (natural → Blackjack, otherwise Playing);
/// the dealer gets `dealer_hand`. The active index is resynced to the
/// first playing seat.
pub fn rig_round(
    table: &mut RoomTable,
    seats: &[(SeatId, u32, Vec<Card>)],
    dealer_hand: Vec<Card>,
) {
    table.set_phase_for_test(Phase::Playing);
    for (id, wager, cards) in seats {
        let seat = table.seat_mut_for_test(*id);
        seat.funds -= *wager;
        seat.wager = *wager;
        seat.hand = cards.clone();
        seat.state = if crate::domain::hand::is_natural(cards) {
            SeatState::Blackjack
        } else {
            SeatState::Playing
        };
    }
    *table.dealer_hand_mut_for_test() = dealer_hand;
    table.reset_active_for_test();
}
