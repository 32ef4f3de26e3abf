use actix_web::{web, App, HttpServer};
use backend::config::AppConfig;
use backend::middleware::cors_middleware;
use backend::routes;
use backend::state::app_state::AppState;
use backend::StallWatchdog;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    let (host, port) = (config.host.clone(), config.port);

    println!("🚀 Starting Blackjack Backend on http://{}:{}", host, port);

    let app_state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    // The watchdog owns its own timer and runs until the process exits.
    StallWatchdog::new(
        app_state.registry.clone(),
        app_state.flow.clone(),
        app_state.config.timing,
    )
    .spawn();

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
