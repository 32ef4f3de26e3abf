//! WebSocket upgrade endpoint.

use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;
use crate::ws::session::WsSession;

#[derive(Deserialize)]
struct WsQuery {
    /// Durable client identity. A first-time client omits it and stores
    /// the id echoed back in the hello acknowledgement.
    client_id: Option<Uuid>,
}

/// GET /api/ws/rooms/{room_id}?client_id=...
async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    path: web::Path<Uuid>,
    query: web::Query<WsQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let room_id = path.into_inner();
    if app_state.registry.get(room_id).is_none() {
        return Err(AppError::not_found(
            ErrorCode::RoomNotFound,
            format!("room {room_id} does not exist"),
        )
        .into());
    }

    let conn_id = Uuid::new_v4();
    let client_id = query.into_inner().client_id.unwrap_or_else(Uuid::new_v4);

    let session = WsSession::new(
        conn_id,
        room_id,
        client_id,
        app_state.flow.clone(),
        app_state.hub.clone(),
    );
    ws::start(session, &req, stream)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/rooms/{room_id}").route(web::get().to(upgrade)));
}
