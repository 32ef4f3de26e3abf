//! Room lifecycle and administration over HTTP.

use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::seat::Difficulty;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

#[derive(Deserialize)]
struct CreateRoomRequest {
    room_name: Option<String>,
}

#[derive(Serialize)]
struct CreateRoomResponse {
    room_id: Uuid,
    room_name: String,
}

/// POST /api/rooms
///
/// Create a new empty room and return its id.
async fn create_room(
    body: web::Json<CreateRoomRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room = app_state.registry.create(body.into_inner().room_name);
    Ok(HttpResponse::Created().json(CreateRoomResponse {
        room_id: room.id,
        room_name: room.name.clone(),
    }))
}

/// GET /api/rooms
///
/// Lobby listing: occupancy and phase per live room.
async fn list_rooms(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let summaries = app_state.registry.summaries().await;
    Ok(HttpResponse::Ok().json(summaries))
}

#[derive(Deserialize)]
struct AddAiSeatRequest {
    difficulty: Option<String>,
}

/// POST /api/rooms/{room_id}/ai-seats
///
/// Add an automated seat; difficulty defaults to medium.
async fn add_ai_seat(
    path: web::Path<Uuid>,
    body: web::Json<AddAiSeatRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let difficulty = match body.into_inner().difficulty {
        None => Difficulty::Medium,
        Some(raw) => raw.parse::<Difficulty>().map_err(|_| {
            AppError::invalid(
                ErrorCode::InvalidDifficulty,
                format!("unknown difficulty '{raw}'"),
            )
        })?,
    };
    let seat = app_state.flow.add_automated_seat(room_id, difficulty).await?;
    Ok(HttpResponse::Created().json(seat))
}

/// DELETE /api/rooms/{room_id}/ai-seats/{seat_id}
async fn remove_ai_seat(
    path: web::Path<(Uuid, Uuid)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (room_id, seat_id) = path.into_inner();
    app_state.flow.remove_automated_seat(room_id, seat_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/rooms/{room_id}/history
///
/// Round records for a room, oldest first. History survives the room, so
/// this intentionally does not require the room to still exist.
async fn room_history(
    path: web::Path<Uuid>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let records = app_state.records.load_history(room_id)?;
    Ok(HttpResponse::Ok().json(records))
}

/// GET /api/players/{name}/stats
async fn player_stats(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let stats = app_state.records.player_stats(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(stats))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_room))
            .route(web::get().to(list_rooms)),
    );
    cfg.service(web::resource("/{room_id}/ai-seats").route(web::post().to(add_ai_seat)));
    cfg.service(
        web::resource("/{room_id}/ai-seats/{seat_id}").route(web::delete().to(remove_ai_seat)),
    );
    cfg.service(web::resource("/{room_id}/history").route(web::get().to(room_history)));
}

pub fn configure_player_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{name}/stats").route(web::get().to(player_stats)));
}
