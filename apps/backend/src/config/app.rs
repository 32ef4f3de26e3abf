//! Application configuration, read once from the environment at startup.
//!
//! Table rules and timing knobs all have defaults suitable for local play;
//! every value can be overridden through `BACKEND_*` environment variables.

use std::time::Duration;

use crate::error::AppError;

/// House rules for every table in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Funds granted to a newly created seat.
    pub starting_funds: u32,
    /// Smallest wager accepted; also the wager forced by the watchdog.
    pub min_wager: u32,
    /// Deck is rebuilt and reshuffled once its length drops to this.
    pub reshuffle_threshold: usize,
    /// Maximum seats per room, human and automated combined.
    pub room_capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            starting_funds: 1000,
            min_wager: 100,
            reshuffle_threshold: 10,
            room_capacity: 5,
        }
    }
}

/// Timing knobs for the watchdog and the automated-turn coordinator.
///
/// The stall grace period must exceed the maximum thinking delay, otherwise
/// the watchdog would fire on turns that are merely slow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    /// Watchdog sweep period.
    pub watchdog_tick: Duration,
    /// No observed progress for this long counts as a stall.
    pub stall_grace: Duration,
    /// A settled room idle for this long is reset for the next round.
    pub settled_grace: Duration,
    /// Pause after a command before automated turns are chained.
    pub drive_pause: Duration,
    /// Bounds of the simulated per-decision thinking delay.
    pub think_min: Duration,
    pub think_max: Duration,
    /// Upper bound on chained automated turns per drive.
    pub drive_iteration_cap: usize,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            watchdog_tick: Duration::from_secs(3),
            stall_grace: Duration::from_secs(5),
            settled_grace: Duration::from_secs(30),
            drive_pause: Duration::from_millis(500),
            think_min: Duration::from_millis(500),
            think_max: Duration::from_millis(2500),
            drive_iteration_cap: 64,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Directory for the append-only round record files.
    pub records_dir: String,
    pub table: TableConfig,
    pub timing: TimingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            records_dir: "game_records".to_string(),
            table: TableConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Build the configuration from `BACKEND_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        let table = TableConfig {
            starting_funds: env_u32("BACKEND_STARTING_FUNDS", defaults.table.starting_funds)?,
            min_wager: env_u32("BACKEND_MIN_WAGER", defaults.table.min_wager)?,
            reshuffle_threshold: env_usize(
                "BACKEND_RESHUFFLE_THRESHOLD",
                defaults.table.reshuffle_threshold,
            )?,
            room_capacity: env_usize("BACKEND_ROOM_CAPACITY", defaults.table.room_capacity)?,
        };
        if table.min_wager == 0 {
            return Err(AppError::config("BACKEND_MIN_WAGER must be positive"));
        }
        if table.room_capacity == 0 {
            return Err(AppError::config("BACKEND_ROOM_CAPACITY must be positive"));
        }

        let timing = TimingConfig {
            watchdog_tick: env_secs("BACKEND_WATCHDOG_TICK_SECS", defaults.timing.watchdog_tick)?,
            stall_grace: env_secs("BACKEND_STALL_GRACE_SECS", defaults.timing.stall_grace)?,
            settled_grace: env_secs("BACKEND_SETTLED_GRACE_SECS", defaults.timing.settled_grace)?,
            ..defaults.timing
        };
        if timing.stall_grace <= timing.think_max {
            return Err(AppError::config(
                "stall grace must exceed the maximum thinking delay",
            ));
        }

        Ok(Self {
            host: std::env::var("BACKEND_HOST").unwrap_or(defaults.host),
            port: env_u16("BACKEND_PORT", defaults.port)?,
            records_dir: std::env::var("BACKEND_RECORDS_DIR").unwrap_or(defaults.records_dir),
            table,
            timing,
        })
    }

    /// Configuration for unit tests: default rules, no artificial delays.
    pub fn for_tests() -> Self {
        Self {
            timing: TimingConfig {
                drive_pause: Duration::ZERO,
                think_min: Duration::ZERO,
                think_max: Duration::ZERO,
                ..TimingConfig::default()
            },
            ..Self::default()
        }
    }
}

fn env_u32(key: &str, default: u32) -> Result<u32, AppError> {
    parse_env(key, default)
}

fn env_u16(key: &str, default: u16) -> Result<u16, AppError> {
    parse_env(key, default)
}

fn env_usize(key: &str, default: usize) -> Result<usize, AppError> {
    parse_env(key, default)
}

fn env_secs(key: &str, default: Duration) -> Result<Duration, AppError> {
    let secs = parse_env(key, default.as_secs())?;
    Ok(Duration::from_secs(secs))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("{key} has an invalid value: {raw}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_house_rules() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.table.starting_funds, 1000);
        assert_eq!(cfg.table.min_wager, 100);
        assert_eq!(cfg.table.reshuffle_threshold, 10);
        assert_eq!(cfg.timing.watchdog_tick, Duration::from_secs(3));
        assert_eq!(cfg.timing.settled_grace, Duration::from_secs(30));
    }

    #[test]
    fn grace_exceeds_thinking_delay() {
        let cfg = AppConfig::default();
        assert!(cfg.timing.stall_grace > cfg.timing.think_max);
    }

    #[test]
    fn test_config_has_no_delays() {
        let cfg = AppConfig::for_tests();
        assert_eq!(cfg.timing.drive_pause, Duration::ZERO);
        assert_eq!(cfg.timing.think_max, Duration::ZERO);
    }
}
