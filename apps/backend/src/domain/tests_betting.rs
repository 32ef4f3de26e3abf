//! Readiness and betting-phase transitions.

use crate::domain::seat::SeatState;
use crate::domain::table::Phase;
use crate::domain::test_table_helpers::seated_table;
use crate::errors::domain::DomainError;

#[test]
fn ready_toggles_between_waiting_and_ready() {
    let (mut table, ids) = seated_table(2);
    table.set_ready(ids[0]).unwrap();
    assert_eq!(table.seat(ids[0]).unwrap().state, SeatState::Ready);
    table.set_ready(ids[0]).unwrap();
    assert_eq!(table.seat(ids[0]).unwrap().state, SeatState::Waiting);
    assert_eq!(table.phase(), Phase::Waiting);
}

#[test]
fn betting_starts_when_every_funded_seat_is_ready() {
    let (mut table, ids) = seated_table(3);
    table.set_ready(ids[0]).unwrap();
    table.set_ready(ids[1]).unwrap();
    assert_eq!(table.phase(), Phase::Waiting);

    table.set_ready(ids[2]).unwrap();
    assert_eq!(table.phase(), Phase::Betting);
    for id in &ids {
        assert_eq!(table.seat(*id).unwrap().state, SeatState::Betting);
    }
}

#[test]
fn broke_seats_spectate_and_do_not_block_readiness() {
    let (mut table, ids) = seated_table(2);
    table.seat_mut_for_test(ids[1]).funds = 0;
    table.seat_mut_for_test(ids[1]).state = SeatState::Spectating;

    table.set_ready(ids[0]).unwrap();
    assert_eq!(table.phase(), Phase::Betting);
    assert_eq!(table.seat(ids[1]).unwrap().state, SeatState::Spectating);
}

#[test]
fn spectator_with_funds_can_ready_up() {
    let (mut table, ids) = seated_table(2);
    table.seat_mut_for_test(ids[0]).state = SeatState::Spectating;
    table.set_ready(ids[0]).unwrap();
    assert_eq!(table.seat(ids[0]).unwrap().state, SeatState::Ready);
}

#[test]
fn bets_are_rejected_outside_the_betting_phase() {
    let (mut table, ids) = seated_table(2);
    let err = table.place_bet(ids[0], 100).unwrap_err();
    assert!(matches!(err, DomainError::Phase(_)));
    assert_eq!(table.seat(ids[0]).unwrap().funds, 1000);
}

#[test]
fn bets_must_be_positive_and_within_funds() {
    let (mut table, ids) = seated_table(1);
    table.set_ready(ids[0]).unwrap();
    assert_eq!(table.phase(), Phase::Betting);

    let err = table.place_bet(ids[0], 0).unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = table.place_bet(ids[0], 1001).unwrap_err();
    assert!(matches!(err, DomainError::InsufficientFunds(_)));

    // Rejections leave the seat untouched.
    let seat = table.seat(ids[0]).unwrap();
    assert_eq!(seat.funds, 1000);
    assert_eq!(seat.wager, 0);
    assert_eq!(seat.state, SeatState::Betting);
}

#[test]
fn funds_are_deducted_at_wager_placement() {
    let (mut table, ids) = seated_table(2);
    table.set_ready(ids[0]).unwrap();
    table.set_ready(ids[1]).unwrap();

    table.place_bet(ids[0], 300).unwrap();
    let seat = table.seat(ids[0]).unwrap();
    assert_eq!(seat.funds, 700);
    assert_eq!(seat.wager, 300);
    assert_eq!(seat.state, SeatState::Ready);
    // One bettor still outstanding: no deal yet.
    assert_eq!(table.phase(), Phase::Betting);
    assert!(seat.hand.is_empty());
}

#[test]
fn last_bet_deals_two_cards_everywhere() {
    let (mut table, ids) = seated_table(2);
    table.set_ready(ids[0]).unwrap();
    table.set_ready(ids[1]).unwrap();
    table.place_bet(ids[0], 100).unwrap();
    table.place_bet(ids[1], 200).unwrap();

    for id in &ids {
        assert_eq!(table.seat(*id).unwrap().hand.len(), 2);
    }
    assert_eq!(table.dealer_hand().len(), 2);

    // Playing unless every participant was dealt a natural.
    let all_terminal = ids
        .iter()
        .all(|id| table.seat(*id).unwrap().state.is_terminal());
    if all_terminal {
        assert_eq!(table.phase(), Phase::Settled);
    } else {
        assert_eq!(table.phase(), Phase::Playing);
        assert!(table.active_seat_id().is_some());
    }
}

#[test]
fn double_bet_is_rejected() {
    let (mut table, ids) = seated_table(2);
    table.set_ready(ids[0]).unwrap();
    table.set_ready(ids[1]).unwrap();
    table.place_bet(ids[0], 100).unwrap();

    let err = table.place_bet(ids[0], 100).unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(table.seat(ids[0]).unwrap().funds, 900);
}
