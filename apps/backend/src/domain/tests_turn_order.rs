//! Turn-order integrity, including mid-round seat removal.

use crate::domain::cards::Rank;
use crate::domain::seat::SeatState;
use crate::domain::table::Phase;
use crate::domain::test_table_helpers::{card, rig_round, seated_table};

fn rigged_three() -> (crate::domain::table::RoomTable, Vec<crate::domain::seat::SeatId>) {
    let (mut table, ids) = seated_table(3);
    rig_round(
        &mut table,
        &[
            (ids[0], 100, vec![card(Rank::Ten), card(Rank::Six)]),
            (ids[1], 100, vec![card(Rank::Nine), card(Rank::Seven)]),
            (ids[2], 100, vec![card(Rank::Eight), card(Rank::Seven)]),
        ],
        vec![card(Rank::Nine), card(Rank::Eight)],
    );
    (table, ids)
}

#[test]
fn active_seat_always_points_at_a_playing_seat() {
    let (mut table, ids) = rigged_three();
    for id in &ids {
        match table.active_seat_id() {
            Some(active) => {
                assert_eq!(
                    table.seat(active).unwrap().state,
                    SeatState::Playing,
                    "active seat must be playing"
                );
                assert_eq!(active, *id);
                table.stand(active).unwrap();
            }
            None => panic!("round ended early"),
        }
    }
    assert_eq!(table.phase(), Phase::Settled);
}

#[test]
fn removing_a_later_seat_keeps_the_active_seat() {
    let (mut table, ids) = rigged_three();
    assert_eq!(table.active_seat_id(), Some(ids[0]));

    table.remove_seat(ids[2]).unwrap();
    assert_eq!(table.active_seat_id(), Some(ids[0]));
    assert_eq!(table.seats().len(), 2);
}

#[test]
fn removing_the_active_seat_advances_to_the_next() {
    let (mut table, ids) = rigged_three();
    table.remove_seat(ids[0]).unwrap();
    assert_eq!(table.active_seat_id(), Some(ids[1]));
}

#[test]
fn removing_an_earlier_seat_shifts_the_active_index_down() {
    let (mut table, ids) = rigged_three();
    table.stand(ids[0]).unwrap();
    assert_eq!(table.active_seat_id(), Some(ids[1]));

    // Seat 0 sits before the active seat; removal must not skip seat 1.
    table.remove_seat(ids[0]).unwrap();
    assert_eq!(table.active_seat_id(), Some(ids[1]));

    table.stand(ids[1]).unwrap();
    assert_eq!(table.active_seat_id(), Some(ids[2]));
}

#[test]
fn removing_the_last_playing_seat_ends_the_player_phase() {
    let (mut table, ids) = rigged_three();
    table.stand(ids[0]).unwrap();
    table.stand(ids[1]).unwrap();
    table.remove_seat(ids[2]).unwrap();
    // Remaining seats were terminal, so the dealer plays and settles.
    assert_eq!(table.phase(), Phase::Settled);
}

#[test]
fn removing_every_in_round_seat_resets_the_room() {
    let (mut table, ids) = seated_table(2);
    rig_round(
        &mut table,
        &[
            (ids[0], 100, vec![card(Rank::Ten), card(Rank::Six)]),
            (ids[1], 100, vec![card(Rank::Nine), card(Rank::Seven)]),
        ],
        vec![card(Rank::Nine), card(Rank::Eight)],
    );

    table.remove_seat(ids[0]).unwrap();
    // Settlement already ran for the last participant when it left the
    // playing phase; removing it afterwards leaves an idle room.
    table.remove_seat(ids[1]).unwrap();
    assert!(matches!(table.phase(), Phase::Waiting | Phase::Settled));
    assert_eq!(table.seats().len(), 0);
}

#[test]
fn leave_during_betting_can_complete_the_deal() {
    let (mut table, ids) = seated_table(2);
    table.set_ready(ids[0]).unwrap();
    table.set_ready(ids[1]).unwrap();
    assert_eq!(table.phase(), Phase::Betting);

    table.place_bet(ids[0], 100).unwrap();
    // The only outstanding bettor walks away; the deal proceeds for the
    // seat that wagered.
    table.remove_seat(ids[1]).unwrap();
    assert_ne!(table.phase(), Phase::Betting);
    assert_eq!(table.seat(ids[0]).unwrap().hand.len(), 2);
}
