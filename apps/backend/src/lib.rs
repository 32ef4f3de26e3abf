#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod ai;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod ws;

// Re-exports for public API
pub use config::AppConfig;
pub use error::AppError;
pub use errors::ErrorCode;
pub use services::game_flow::GameFlowService;
pub use services::watchdog::StallWatchdog;
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
