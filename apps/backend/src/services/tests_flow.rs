//! Game-flow service tests: joining, reconnection, automated rounds.

use uuid::Uuid;

use crate::domain::seat::{Difficulty, Seat, SeatState};
use crate::domain::table::Phase;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

fn state() -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::for_tests(dir.path());
    (state, dir)
}

#[tokio::test]
async fn a_lone_automated_seat_plays_a_full_round() {
    let (state, _dir) = state();
    let room = state.registry.create(None);
    {
        let mut table = room.table.lock().await;
        let seat = Seat::automated(Uuid::new_v4(), "Beginner-Emma", 1000, Difficulty::Easy);
        table.add_seat(seat).unwrap();
    }

    // Drive with no pauses: ready -> wager -> play -> dealer -> settled.
    state.flow.drive(&room, false).await;

    let table = room.table.lock().await;
    assert_eq!(table.phase(), Phase::Settled);
    let seat = &table.seats()[0];
    assert!(seat.state.is_terminal(), "got {:?}", seat.state);
    assert!(seat.hand.len() >= 2);
    drop(table);

    // Settlement reached the record store.
    let history = state.records.load_history(room.id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].players.len(), 1);
    assert!(history[0].players[0].is_automated);
}

#[tokio::test]
async fn join_creates_a_seat_and_reconnect_reclaims_it() {
    let (state, _dir) = state();
    let room = state.registry.create(None);
    let client = Uuid::new_v4();

    let snapshot = state
        .flow
        .join(room.id, client, "Ada".to_string())
        .await
        .unwrap();
    assert_eq!(snapshot.seats.len(), 1);
    let seat_id = snapshot.seats[0].seat_id;
    assert_eq!(snapshot.seats[0].funds, 1000);

    // Same durable identity joins again: no duplicate seat.
    let snapshot = state
        .flow
        .join(room.id, client, "Ada".to_string())
        .await
        .unwrap();
    assert_eq!(snapshot.seats.len(), 1);
    assert_eq!(snapshot.seats[0].seat_id, seat_id);
    assert_eq!(state.mapper.resolve(room.id, client), Some(seat_id));
}

#[tokio::test]
async fn join_rejected_when_the_room_is_full() {
    let (state, _dir) = state();
    let room = state.registry.create(None);
    let capacity = state.config.table.room_capacity;

    for i in 0..capacity {
        state
            .flow
            .join(room.id, Uuid::new_v4(), format!("Player {i}"))
            .await
            .unwrap();
    }

    let err = state
        .flow
        .join(room.id, Uuid::new_v4(), "Latecomer".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::RoomFull);
}

#[tokio::test]
async fn last_leave_destroys_the_room() {
    let (state, _dir) = state();
    let room = state.registry.create(None);
    let client = Uuid::new_v4();
    state
        .flow
        .join(room.id, client, "Ada".to_string())
        .await
        .unwrap();

    state.flow.leave(room.id, client).await.unwrap();
    assert!(state.registry.get(room.id).is_none());
    assert_eq!(state.mapper.resolve(room.id, client), None);
}

#[tokio::test]
async fn rejected_commands_leave_state_untouched() {
    let (state, _dir) = state();
    let room = state.registry.create(None);
    let client = Uuid::new_v4();
    state
        .flow
        .join(room.id, client, "Ada".to_string())
        .await
        .unwrap();

    // Betting has not started.
    let err = state.flow.place_bet(room.id, client, 100).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PhaseMismatch);

    let table = room.table.lock().await;
    assert_eq!(table.phase(), Phase::Waiting);
    assert_eq!(table.seats()[0].funds, 1000);
    assert_eq!(table.seats()[0].wager, 0);
}

#[tokio::test]
async fn commands_from_strangers_are_rejected() {
    let (state, _dir) = state();
    let room = state.registry.create(None);

    let err = state
        .flow
        .set_ready(room.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::SeatNotFound);

    let err = state
        .flow
        .hit(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::RoomNotFound);
}

#[tokio::test]
async fn removing_a_human_seat_via_ai_admin_is_rejected() {
    let (state, _dir) = state();
    let room = state.registry.create(None);
    let client = Uuid::new_v4();
    let snapshot = state
        .flow
        .join(room.id, client, "Ada".to_string())
        .await
        .unwrap();
    let seat_id = snapshot.seats[0].seat_id;

    let err = state
        .flow
        .remove_automated_seat(room.id, seat_id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotAutomated);
}

#[tokio::test]
async fn mixed_table_returns_control_to_the_human() {
    let (state, _dir) = state();
    let room = state.registry.create(None);
    let client = Uuid::new_v4();
    let snapshot = state
        .flow
        .join(room.id, client, "Ada".to_string())
        .await
        .unwrap();
    let human_seat = snapshot.seats[0].seat_id;

    state
        .flow
        .add_automated_seat(room.id, Difficulty::Hard)
        .await
        .unwrap();

    // The automated seat readies up; betting waits on the human.
    state.flow.drive(&room, false).await;
    {
        let table = room.table.lock().await;
        assert_eq!(table.phase(), Phase::Waiting);
    }

    state.flow.set_ready(room.id, client).await.unwrap();
    state.flow.drive(&room, false).await;
    {
        let table = room.table.lock().await;
        assert_eq!(table.phase(), Phase::Betting);
        // The automated seat has wagered; only the human is outstanding.
        let human = table.seat(human_seat).unwrap();
        assert_eq!(human.state, SeatState::Betting);
    }

    state.flow.place_bet(room.id, client, 100).await.unwrap();
    state.flow.drive(&room, false).await;

    let table = room.table.lock().await;
    match table.phase() {
        // Control is back with the human seat, or the round resolved
        // outright on naturals.
        Phase::Playing => assert_eq!(table.active_seat_id(), Some(human_seat)),
        Phase::Settled => {}
        other => panic!("unexpected phase {other:?}"),
    }
}

#[tokio::test]
async fn disconnect_marks_the_seat_but_keeps_it() {
    let (state, _dir) = state();
    let room = state.registry.create(None);
    let client = Uuid::new_v4();
    let conn = Uuid::new_v4();

    state.mapper.bind_transport(conn, client);
    let snapshot = state
        .flow
        .join(room.id, client, "Ada".to_string())
        .await
        .unwrap();
    let seat_id = snapshot.seats[0].seat_id;

    state.flow.mark_disconnected(room.id, conn).await;

    let table = room.table.lock().await;
    let seat = table.seat(seat_id).unwrap();
    assert!(!seat.connected);
    drop(table);
    // The seat binding survives for reconnection.
    assert_eq!(state.mapper.resolve(room.id, client), Some(seat_id));
    assert_eq!(state.mapper.client_for(conn), None);
}
