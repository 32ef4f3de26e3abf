//! Turn actions: hit, stand, double down.

use crate::domain::cards::Rank;
use crate::domain::seat::SeatState;
use crate::domain::table::Phase;
use crate::domain::test_table_helpers::{card, rig_round, seated_table};
use crate::errors::domain::DomainError;

#[test]
fn actions_are_rejected_outside_the_playing_phase() {
    let (mut table, ids) = seated_table(2);
    assert!(matches!(
        table.hit(ids[0]).unwrap_err(),
        DomainError::Phase(_)
    ));
    assert!(matches!(
        table.stand(ids[0]).unwrap_err(),
        DomainError::Phase(_)
    ));
    assert!(matches!(
        table.double_down(ids[0]).unwrap_err(),
        DomainError::Phase(_)
    ));
}

#[test]
fn only_the_active_seat_may_act() {
    let (mut table, ids) = seated_table(2);
    rig_round(
        &mut table,
        &[
            (ids[0], 100, vec![card(Rank::Ten), card(Rank::Six)]),
            (ids[1], 100, vec![card(Rank::Nine), card(Rank::Seven)]),
        ],
        vec![card(Rank::Nine), card(Rank::Eight)],
    );
    assert_eq!(table.active_seat_id(), Some(ids[0]));

    let err = table.stand(ids[1]).unwrap_err();
    assert!(matches!(err, DomainError::OutOfTurn(_)));
    assert_eq!(table.seat(ids[1]).unwrap().state, SeatState::Playing);
}

#[test]
fn stand_is_terminal_and_advances_the_turn() {
    let (mut table, ids) = seated_table(2);
    rig_round(
        &mut table,
        &[
            (ids[0], 100, vec![card(Rank::Ten), card(Rank::Six)]),
            (ids[1], 100, vec![card(Rank::Nine), card(Rank::Seven)]),
        ],
        vec![card(Rank::Nine), card(Rank::Eight)],
    );

    table.stand(ids[0]).unwrap();
    assert_eq!(table.seat(ids[0]).unwrap().state, SeatState::Stand);
    assert_eq!(table.active_seat_id(), Some(ids[1]));
}

#[test]
fn hit_on_twenty_always_terminates_the_turn() {
    let (mut table, ids) = seated_table(2);
    rig_round(
        &mut table,
        &[
            (ids[0], 100, vec![card(Rank::King), card(Rank::Queen)]),
            (ids[1], 100, vec![card(Rank::Nine), card(Rank::Seven)]),
        ],
        vec![card(Rank::Nine), card(Rank::Eight)],
    );

    // Any third card busts 20 or lands exactly on 21.
    table.hit(ids[0]).unwrap();
    let seat = table.seat(ids[0]).unwrap();
    assert!(seat.state.is_terminal(), "got {:?}", seat.state);
    assert_eq!(table.active_seat_id(), Some(ids[1]));
}

#[test]
fn low_hand_keeps_the_turn_after_a_hit() {
    let (mut table, ids) = seated_table(2);
    rig_round(
        &mut table,
        &[
            (ids[0], 100, vec![card(Rank::Two), card(Rank::Three)]),
            (ids[1], 100, vec![card(Rank::Nine), card(Rank::Seven)]),
        ],
        vec![card(Rank::Nine), card(Rank::Eight)],
    );

    // 5 plus any card stays at 16 or less with three cards: never terminal.
    table.hit(ids[0]).unwrap();
    let seat = table.seat(ids[0]).unwrap();
    assert_eq!(seat.state, SeatState::Playing);
    assert_eq!(seat.hand.len(), 3);
    assert_eq!(table.active_seat_id(), Some(ids[0]));
}

#[test]
fn fifth_card_under_22_is_a_five_dragon() {
    let (mut table, ids) = seated_table(2);
    rig_round(
        &mut table,
        &[
            (
                ids[0],
                100,
                vec![
                    card(Rank::Ace),
                    card(Rank::Ace),
                    card(Rank::Ace),
                    card(Rank::Ace),
                ],
            ),
            (ids[1], 100, vec![card(Rank::Nine), card(Rank::Seven)]),
        ],
        vec![card(Rank::Nine), card(Rank::Eight)],
    );

    // Four aces read as 14; no fifth card can bust that hand.
    table.hit(ids[0]).unwrap();
    let seat = table.seat(ids[0]).unwrap();
    assert_eq!(seat.state, SeatState::FiveDragon);
    assert_eq!(seat.hand.len(), 5);
    assert_eq!(table.active_seat_id(), Some(ids[1]));
}

#[test]
fn double_down_doubles_the_wager_and_draws_exactly_one_card() {
    let (mut table, ids) = seated_table(2);
    rig_round(
        &mut table,
        &[
            (ids[0], 100, vec![card(Rank::Five), card(Rank::Six)]),
            (ids[1], 100, vec![card(Rank::Nine), card(Rank::Seven)]),
        ],
        vec![card(Rank::Nine), card(Rank::Eight)],
    );

    table.double_down(ids[0]).unwrap();
    let seat = table.seat(ids[0]).unwrap();
    assert_eq!(seat.wager, 200);
    assert_eq!(seat.funds, 800);
    assert_eq!(seat.hand.len(), 3);
    assert!(seat.state.is_terminal());
    assert_eq!(table.active_seat_id(), Some(ids[1]));
}

#[test]
fn double_down_requires_two_cards_and_matching_funds() {
    let (mut table, ids) = seated_table(2);
    rig_round(
        &mut table,
        &[
            (
                ids[0],
                100,
                vec![card(Rank::Two), card(Rank::Three), card(Rank::Four)],
            ),
            (ids[1], 100, vec![card(Rank::Nine), card(Rank::Seven)]),
        ],
        vec![card(Rank::Nine), card(Rank::Eight)],
    );

    let err = table.double_down(ids[0]).unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    // Two cards but not enough funds left to match the wager.
    let (mut table, ids) = seated_table(1);
    rig_round(
        &mut table,
        &[(ids[0], 950, vec![card(Rank::Five), card(Rank::Six)])],
        vec![card(Rank::Nine), card(Rank::Eight)],
    );
    let err = table.double_down(ids[0]).unwrap_err();
    assert!(matches!(err, DomainError::InsufficientFunds(_)));
    let seat = table.seat(ids[0]).unwrap();
    assert_eq!(seat.wager, 950);
    assert_eq!(seat.hand.len(), 2);
}

#[test]
fn last_terminal_action_hands_the_round_to_the_dealer() {
    let (mut table, ids) = seated_table(2);
    rig_round(
        &mut table,
        &[
            (ids[0], 100, vec![card(Rank::Ten), card(Rank::Six)]),
            (ids[1], 100, vec![card(Rank::Nine), card(Rank::Seven)]),
        ],
        vec![card(Rank::King), card(Rank::Nine)],
    );

    table.stand(ids[0]).unwrap();
    table.stand(ids[1]).unwrap();
    // Dealer stands at 19 and the round settles immediately.
    assert_eq!(table.phase(), Phase::Settled);
}
