//! Application state containing shared resources.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::game_flow::GameFlowService;
use crate::services::records::RoundStore;
use crate::services::rooms::RoomRegistry;
use crate::session::SessionMapper;
use crate::ws::hub::WsHub;

/// Shared resources handed to routes, sessions and the watchdog.
///
/// The room registry replaces any process-wide table: it is created here
/// and injected everywhere a mutation can originate.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: Arc<RoomRegistry>,
    pub mapper: Arc<SessionMapper>,
    pub hub: Arc<WsHub>,
    pub records: Arc<RoundStore>,
    pub flow: Arc<GameFlowService>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let records = Arc::new(RoundStore::new(&config.records_dir)?);
        Ok(Self::with_records(config, records))
    }

    fn with_records(config: AppConfig, records: Arc<RoundStore>) -> Self {
        let config = Arc::new(config);
        let registry = Arc::new(RoomRegistry::new(config.table));
        let mapper = Arc::new(SessionMapper::new());
        let hub = Arc::new(WsHub::new());
        let flow = Arc::new(GameFlowService::new(
            registry.clone(),
            hub.clone(),
            mapper.clone(),
            records.clone(),
            config.timing,
        ));
        Self {
            config,
            registry,
            mapper,
            hub,
            records,
            flow,
        }
    }

    /// Test state: zeroed delays and a temporary records directory.
    #[cfg(test)]
    pub fn for_tests(records_dir: &std::path::Path) -> Self {
        let config = AppConfig {
            records_dir: records_dir.display().to_string(),
            ..AppConfig::for_tests()
        };
        let records = Arc::new(RoundStore::new(records_dir).expect("temp records dir"));
        Self::with_records(config, records)
    }
}
