//! # Configuration
//!
//! Capacity and timing knobs for the care system, read from the
//! environment with sensible defaults.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Default bound on stored medications
pub const DEFAULT_CAPACITY_MED: usize = 50;
/// Default bound on history records before eviction kicks in
pub const DEFAULT_CAPACITY_RECORD: usize = 200;
/// Default scheduler tick interval in seconds
pub const DEFAULT_TICK_INTERVAL_SECS: u64 = 10;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of medications the store holds
    pub capacity_med: usize,
    /// Maximum number of history records kept (oldest evicted beyond this)
    pub capacity_record: usize,
    /// Interval between reminder scheduler scans
    pub tick_interval: Duration,
    /// Default log filter passed to env_logger
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            capacity_med: DEFAULT_CAPACITY_MED,
            capacity_record: DEFAULT_CAPACITY_RECORD,
            tick_interval: Duration::from_secs(DEFAULT_TICK_INTERVAL_SECS),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: `MEDICARE_CAPACITY_MED`,
    /// `MEDICARE_CAPACITY_RECORD`, `MEDICARE_TICK_INTERVAL_SECS`,
    /// `LOG_LEVEL`. Unparsable values are reported, not silently
    /// defaulted.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Some(value) = env_var("MEDICARE_CAPACITY_MED") {
            config.capacity_med = parse_capacity("MEDICARE_CAPACITY_MED", &value)?;
        }
        if let Some(value) = env_var("MEDICARE_CAPACITY_RECORD") {
            config.capacity_record = parse_capacity("MEDICARE_CAPACITY_RECORD", &value)?;
        }
        if let Some(value) = env_var("MEDICARE_TICK_INTERVAL_SECS") {
            let secs: u64 = value
                .parse()
                .with_context(|| format!("MEDICARE_TICK_INTERVAL_SECS is not a number: {value}"))?;
            if secs == 0 {
                bail!("MEDICARE_TICK_INTERVAL_SECS must be at least 1");
            }
            config.tick_interval = Duration::from_secs(secs);
        }
        if let Some(value) = env_var("LOG_LEVEL") {
            config.log_level = value;
        }

        Ok(config)
    }

    /// Override the medication capacity
    pub fn with_capacity_med(mut self, capacity: usize) -> Self {
        self.capacity_med = capacity;
        self
    }

    /// Override the record capacity
    pub fn with_capacity_record(mut self, capacity: usize) -> Self {
        self.capacity_record = capacity;
        self
    }

    /// Override the scheduler tick interval
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_capacity(name: &str, value: &str) -> Result<usize> {
    let capacity: usize = value
        .parse()
        .with_context(|| format!("{name} is not a number: {value}"))?;
    if capacity == 0 {
        bail!("{name} must be at least 1");
    }
    Ok(capacity)
}
