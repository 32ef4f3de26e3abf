//! Dealer play, settlement payouts and round lifecycle.

use crate::domain::cards::Rank;
use crate::domain::seat::SeatState;
use crate::domain::settlement::Outcome;
use crate::domain::table::Phase;
use crate::domain::test_table_helpers::{card, rig_round, seated_table};
use crate::errors::domain::DomainError;

#[test]
fn natural_pays_three_to_two() {
    // Funds 1000, wager 100, dealt A+K against a dealer 9 showing with a
    // hidden 8: settlement credits 250 and the seat ends at 1150.
    let (mut table, ids) = seated_table(1);
    rig_round(
        &mut table,
        &[(ids[0], 100, vec![card(Rank::Ace), card(Rank::King)])],
        vec![card(Rank::Nine), card(Rank::Eight)],
    );

    // The natural is terminal, so rigging resolves straight through the
    // dealer's turn into settlement.
    assert_eq!(table.phase(), Phase::Settled);
    let seat = table.seat(ids[0]).unwrap();
    assert_eq!(seat.state, SeatState::Blackjack);
    assert_eq!(seat.funds, 1150);

    let outcome = table.take_last_round().unwrap();
    assert_eq!(outcome.dealer_score, 17);
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].outcome, Outcome::Win);
    assert_eq!(outcome.results[0].net, 150);
}

#[test]
fn both_naturals_push() {
    let (mut table, ids) = seated_table(1);
    rig_round(
        &mut table,
        &[(ids[0], 100, vec![card(Rank::Ace), card(Rank::King)])],
        vec![card(Rank::Ace), card(Rank::Queen)],
    );

    assert_eq!(table.phase(), Phase::Settled);
    assert_eq!(table.seat(ids[0]).unwrap().funds, 1000);
}

#[test]
fn dealer_bust_pays_standing_seats_even_money() {
    let (mut table, ids) = seated_table(1);
    rig_round(
        &mut table,
        &[(ids[0], 100, vec![card(Rank::Ten), card(Rank::Nine)])],
        // 16 forces a draw; a ten-heavy rigged deck is not guaranteed, so
        // rig an already-bust dealer hand instead.
        vec![card(Rank::King), card(Rank::Queen), card(Rank::Five)],
    );
    table.stand(ids[0]).unwrap();

    assert_eq!(table.phase(), Phase::Settled);
    assert_eq!(table.seat(ids[0]).unwrap().funds, 1100);
}

#[test]
fn five_dragon_beats_a_dealer_stand_and_pays_double() {
    let (mut table, ids) = seated_table(2);
    rig_round(
        &mut table,
        &[
            (
                ids[0],
                100,
                vec![
                    card(Rank::Two),
                    card(Rank::Three),
                    card(Rank::Four),
                    card(Rank::Five),
                    card(Rank::Two),
                ],
            ),
            (ids[1], 100, vec![card(Rank::Ten), card(Rank::Nine)]),
        ],
        vec![card(Rank::King), card(Rank::Nine)],
    );
    // Five cards at 16: flag the dragon, then let the other seat finish.
    table.seat_mut_for_test(ids[0]).state = SeatState::FiveDragon;
    table.reset_active_for_test();
    table.stand(ids[1]).unwrap();

    assert_eq!(table.phase(), Phase::Settled);
    // 1000 - 100 + 300: the dragon outranks the dealer's 19.
    assert_eq!(table.seat(ids[0]).unwrap().funds, 1200);
    // 19 pushes 19 for the standing seat.
    assert_eq!(table.seat(ids[1]).unwrap().funds, 1000);
}

#[test]
fn busted_seats_stay_paid_out_nothing() {
    let (mut table, ids) = seated_table(2);
    rig_round(
        &mut table,
        &[
            (
                ids[0],
                100,
                vec![card(Rank::King), card(Rank::Queen), card(Rank::Five)],
            ),
            (ids[1], 100, vec![card(Rank::Ten), card(Rank::Nine)]),
        ],
        vec![card(Rank::King), card(Rank::Queen), card(Rank::Five)],
    );
    table.seat_mut_for_test(ids[0]).state = SeatState::Busted;
    table.reset_active_for_test();
    table.stand(ids[1]).unwrap();

    assert_eq!(table.phase(), Phase::Settled);
    // Busted loses even though the dealer busted as well.
    assert_eq!(table.seat(ids[0]).unwrap().funds, 900);
    assert_eq!(table.seat(ids[1]).unwrap().funds, 1100);
}

#[test]
fn dealer_draws_to_seventeen() {
    let (mut table, ids) = seated_table(1);
    rig_round(
        &mut table,
        &[(ids[0], 100, vec![card(Rank::Ten), card(Rank::Nine)])],
        vec![card(Rank::Nine), card(Rank::Two)],
    );
    table.stand(ids[0]).unwrap();

    assert_eq!(table.phase(), Phase::Settled);
    let outcome = table.take_last_round().unwrap();
    // The dealer keeps drawing below 17, stopping early only to protect a
    // four-card hand from busting.
    assert!(
        outcome.dealer_score >= 17
            || outcome.dealer_cards.len() == 4
            || outcome.dealer_score > 21,
        "dealer stopped at {} with {} cards",
        outcome.dealer_score,
        outcome.dealer_cards.len()
    );
}

#[test]
fn prepare_next_round_requires_settlement() {
    let (mut table, ids) = seated_table(1);
    let err = table.prepare_next_round().unwrap_err();
    assert!(matches!(err, DomainError::Phase(_)));

    rig_round(
        &mut table,
        &[(ids[0], 100, vec![card(Rank::Ten), card(Rank::Nine)])],
        vec![card(Rank::King), card(Rank::Nine)],
    );
    table.stand(ids[0]).unwrap();
    assert_eq!(table.phase(), Phase::Settled);
    table.prepare_next_round().unwrap();
    assert_eq!(table.phase(), Phase::Waiting);
}

#[test]
fn round_trip_reaches_a_fresh_deal() {
    let (mut table, ids) = seated_table(2);
    rig_round(
        &mut table,
        &[
            (ids[0], 100, vec![card(Rank::Ten), card(Rank::Nine)]),
            (ids[1], 100, vec![card(Rank::Ten), card(Rank::Eight)]),
        ],
        vec![card(Rank::King), card(Rank::Nine)],
    );
    table.stand(ids[0]).unwrap();
    table.stand(ids[1]).unwrap();
    assert_eq!(table.phase(), Phase::Settled);

    table.prepare_next_round().unwrap();
    for id in &ids {
        let seat = table.seat(*id).unwrap();
        assert!(seat.hand.is_empty());
        assert_eq!(seat.wager, 0);
        assert_eq!(seat.state, SeatState::Waiting);
    }
    assert!(table.dealer_hand().is_empty());
    assert!(table.take_last_round().is_none());

    table.set_ready(ids[0]).unwrap();
    table.set_ready(ids[1]).unwrap();
    table.place_bet(ids[0], 100).unwrap();
    table.place_bet(ids[1], 100).unwrap();

    for id in &ids {
        assert_eq!(table.seat(*id).unwrap().hand.len(), 2);
    }
    assert_eq!(table.dealer_hand().len(), 2);
    // A rebuilt 52-card deck minus two hands and the dealer's pair.
    assert_eq!(table.deck_len_for_test(), 46);
}

#[test]
fn force_settle_push_refunds_every_wager() {
    let (mut table, ids) = seated_table(2);
    rig_round(
        &mut table,
        &[
            (ids[0], 100, vec![card(Rank::Ten), card(Rank::Nine)]),
            (ids[1], 250, vec![card(Rank::Ten), card(Rank::Eight)]),
        ],
        vec![card(Rank::King), card(Rank::Nine)],
    );

    table.force_settle_push("negative funds computed");
    assert_eq!(table.phase(), Phase::Settled);
    assert_eq!(table.seat(ids[0]).unwrap().funds, 1000);
    assert_eq!(table.seat(ids[1]).unwrap().funds, 1000);
    assert!(table.take_last_round().is_none());
    assert!(table.message().contains("Round voided"));
}
