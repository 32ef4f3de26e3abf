use actix_web::web;

pub mod health;
pub mod realtime;
pub mod rooms;

/// Configure application routes.
///
/// `main.rs` wires these under the server with CORS; tests can register
/// the same paths directly against a test `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Root banner: /
    cfg.route("/", web::get().to(health::root));

    // Health check routes: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Room lifecycle and administration: /api/rooms/**
    cfg.service(web::scope("/api/rooms").configure(rooms::configure_routes));

    // Player statistics: /api/players/**
    cfg.service(web::scope("/api/players").configure(rooms::configure_player_routes));

    // Realtime routes: /api/ws/**
    cfg.service(web::scope("/api/ws").configure(realtime::configure_routes));
}
