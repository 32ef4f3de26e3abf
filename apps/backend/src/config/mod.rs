pub mod app;

pub use app::{AppConfig, TableConfig, TimingConfig};
