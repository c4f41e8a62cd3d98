//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so a fresh install needs no configuration.

use std::fmt;
use std::path::PathBuf;

use sowp_shared::constants::{
    CLEANUP_BATCH_SIZE, DB_KEY_SIZE, DEFAULT_PAGE_SIZE, MILLIS_PER_DAY, MILLIS_PER_HOUR,
    SWEEP_INTERVAL_SECS,
};

use crate::retention::RetentionPolicy;

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Database file.
    /// Env: `SOWP_DB_PATH`
    /// Default: `None` (platform data directory).
    pub db_path: Option<PathBuf>,

    /// Local database key (hex-encoded, 64 chars).
    /// Env: `SOWP_DB_KEY`
    /// Default: all-zeros (development only).
    pub db_key: [u8; DB_KEY_SIZE],

    /// Horizon, cooldown and batch size of the retention sweeper.
    /// Env: `SOWP_RETENTION_DAYS`, `SOWP_CLEANUP_COOLDOWN_HOURS`,
    /// `SOWP_CLEANUP_BATCH_SIZE`
    pub retention: RetentionPolicy,

    /// Rows per page in list screens.
    /// Env: `SOWP_PAGE_SIZE`
    /// Default: `10`
    pub page_size: usize,

    /// Seconds between sweep attempts in the maintenance loop.
    /// Env: `SOWP_SWEEP_INTERVAL_SECS`
    /// Default: `3600`
    pub sweep_interval_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            db_key: [0u8; DB_KEY_SIZE],
            retention: RetentionPolicy::default(),
            page_size: DEFAULT_PAGE_SIZE,
            sweep_interval_secs: SWEEP_INTERVAL_SECS,
        }
    }
}

// The key stays out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("db_path", &self.db_path)
            .field("db_key", &"<redacted>")
            .field("retention", &self.retention)
            .field("page_size", &self.page_size)
            .field("sweep_interval_secs", &self.sweep_interval_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("SOWP_DB_PATH") {
            if !path.trim().is_empty() {
                config.db_path = Some(PathBuf::from(path));
            }
        }

        if let Some(hex_key) = lookup("SOWP_DB_KEY") {
            match parse_hex_key(&hex_key) {
                Ok(key) => config.db_key = key,
                Err(e) => {
                    tracing::warn!(error = %e, "Invalid SOWP_DB_KEY, using default (dev-only)");
                }
            }
        }

        if let Some(days) = parse_positive::<i64>(&lookup, "SOWP_RETENTION_DAYS") {
            config.retention.horizon_ms = days.saturating_mul(MILLIS_PER_DAY);
        }

        if let Some(hours) = parse_positive::<i64>(&lookup, "SOWP_CLEANUP_COOLDOWN_HOURS") {
            config.retention.cooldown_ms = hours.saturating_mul(MILLIS_PER_HOUR);
        }

        if let Some(size) = parse_positive::<usize>(&lookup, "SOWP_CLEANUP_BATCH_SIZE") {
            config.retention.batch_size = size;
        }

        if let Some(size) = parse_positive::<usize>(&lookup, "SOWP_PAGE_SIZE") {
            config.page_size = size;
        }

        if let Some(secs) = parse_positive::<u64>(&lookup, "SOWP_SWEEP_INTERVAL_SECS") {
            config.sweep_interval_secs = secs;
        }

        // RUST_LOG is read by tracing-subscriber's EnvFilter directly.

        config
    }
}

/// Read a strictly positive number, warning about anything else.
fn parse_positive<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let raw = lookup(name)?;
    match raw.trim().parse::<T>() {
        Ok(n) if n > T::default() => Some(n),
        _ => {
            tracing::warn!(variable = name, value = %raw, "Invalid value, using default");
            None
        }
    }
}

fn parse_hex_key(value: &str) -> Result<[u8; DB_KEY_SIZE], String> {
    let value = value.trim();
    if value.len() != DB_KEY_SIZE * 2 {
        return Err(format!(
            "expected {} hex chars, got {}",
            DB_KEY_SIZE * 2,
            value.len()
        ));
    }

    let mut key = [0u8; DB_KEY_SIZE];
    hex::decode_to_slice(value, &mut key).map_err(|e| e.to_string())?;
    Ok(key)
}
