//! Stall watchdog tests, ticked deterministically via `sweep`.

use std::time::Duration;

use uuid::Uuid;

use crate::config::TimingConfig;
use crate::domain::cards::{Card, Rank, Suit};
use crate::domain::seat::{Difficulty, Seat, SeatState};
use crate::domain::table::Phase;
use crate::services::watchdog::StallWatchdog;
use crate::state::app_state::AppState;

fn state() -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::for_tests(dir.path());
    (state, dir)
}

/// Zero grace periods so every sweep past the first detects a stall.
fn eager_timing() -> TimingConfig {
    TimingConfig {
        stall_grace: Duration::ZERO,
        settled_grace: Duration::ZERO,
        ..TimingConfig::default()
    }
}

fn watchdog(state: &AppState) -> StallWatchdog {
    StallWatchdog::new(state.registry.clone(), state.flow.clone(), eager_timing())
}

fn card(rank: Rank) -> Card {
    Card::new(Suit::Spades, rank)
}

#[tokio::test]
async fn betting_stall_forces_the_minimum_wager_in_one_tick() {
    let (state, _dir) = state();
    let room = state.registry.create(None);
    let seat_id = {
        let mut table = room.table.lock().await;
        let seat = Seat::automated(Uuid::new_v4(), "Beginner-Jack", 1000, Difficulty::Easy);
        let seat_id = seat.id;
        table.add_seat(seat).unwrap();
        // Readying the lone seat opens betting; nothing drives the agent,
        // so the seat is now stuck owing a wager.
        table.set_ready(seat_id).unwrap();
        assert_eq!(table.phase(), Phase::Betting);
        seat_id
    };

    let mut dog = watchdog(&state);
    dog.sweep().await; // records baseline progress
    dog.sweep().await; // detects the stall and repairs

    let table = room.table.lock().await;
    let seat = table.seat(seat_id).unwrap();
    // Forced to exactly the table minimum, never more.
    assert_eq!(seat.wager, state.config.table.min_wager);
    assert_ne!(seat.state, SeatState::Betting);
    // The forced wager completed the deal for the lone bettor.
    assert!(matches!(table.phase(), Phase::Playing | Phase::Settled));
}

#[tokio::test]
async fn disconnected_active_seat_is_forced_to_stand_after_repeated_stalls() {
    let (state, _dir) = state();
    let room = state.registry.create(None);
    let (seat_a, seat_b) = {
        let mut table = room.table.lock().await;
        let a = Seat::human(Uuid::new_v4(), "Ada", 1000);
        let b = Seat::human(Uuid::new_v4(), "Bea", 1000);
        let (a_id, b_id) = (a.id, b.id);
        table.add_seat(a).unwrap();
        table.add_seat(b).unwrap();

        table.set_phase_for_test(Phase::Playing);
        for id in [a_id, b_id] {
            let seat = table.seat_mut_for_test(id);
            seat.funds -= 100;
            seat.wager = 100;
            seat.hand = vec![card(Rank::Ten), card(Rank::Six)];
            seat.state = SeatState::Playing;
        }
        *table.dealer_hand_mut_for_test() = vec![card(Rank::Nine), card(Rank::Eight)];
        table.reset_active_for_test();
        table.seat_disconnected(a_id);
        assert_eq!(table.active_seat_id(), Some(a_id));
        (a_id, b_id)
    };

    let mut dog = watchdog(&state);
    dog.sweep().await; // baseline
    dog.sweep().await; // stall 1: agent pass, no automated seat to act
    dog.sweep().await; // stall 2
    dog.sweep().await; // stall 3: forced stand

    let table = room.table.lock().await;
    assert_eq!(table.seat(seat_a).unwrap().state, SeatState::Stand);
    // The turn advanced to the connected seat without a reconnect.
    assert_eq!(table.active_seat_id(), Some(seat_b));
    assert_eq!(table.phase(), Phase::Playing);
}

#[tokio::test]
async fn idle_settled_rooms_are_reset_for_the_next_round() {
    let (state, _dir) = state();
    let room = state.registry.create(None);
    let seat_id = {
        let mut table = room.table.lock().await;
        let seat = Seat::human(Uuid::new_v4(), "Ada", 1100);
        let seat_id = seat.id;
        table.add_seat(seat).unwrap();
        let rigged = table.seat_mut_for_test(seat_id);
        rigged.state = SeatState::Stand;
        rigged.hand = vec![card(Rank::Ten), card(Rank::Nine)];
        table.set_phase_for_test(Phase::Settled);
        seat_id
    };

    let mut dog = watchdog(&state);
    dog.sweep().await; // baseline
    dog.sweep().await; // settled grace elapsed: auto next round

    let table = room.table.lock().await;
    assert_eq!(table.phase(), Phase::Waiting);
    let seat = table.seat(seat_id).unwrap();
    assert_eq!(seat.state, SeatState::Waiting);
    assert!(seat.hand.is_empty());
}

#[tokio::test]
async fn waiting_rooms_with_idle_automated_seats_get_readied() {
    let (state, _dir) = state();
    let room = state.registry.create(None);
    {
        let mut table = room.table.lock().await;
        let seat = Seat::automated(Uuid::new_v4(), "Master-Apple", 1000, Difficulty::Expert);
        table.add_seat(seat).unwrap();
        assert_eq!(table.phase(), Phase::Waiting);
    }

    let mut dog = watchdog(&state);
    dog.sweep().await; // baseline
    dog.sweep().await; // stall: forced ready (and the betting cascade)

    let table = room.table.lock().await;
    // Readying the lone automated seat opened betting at least.
    assert_ne!(table.phase(), Phase::Waiting);
}
