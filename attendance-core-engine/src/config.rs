use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Tunables of the attendance engine.
///
/// Every field has a default, so a partial document deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Same-direction entries closer than this (inclusive) are duplicates
    pub duplicate_window_secs: i64,
    /// Entry count at which a day is flagged as anomalous
    pub anomaly_entry_threshold: usize,
    /// Entries before this hour raise an after-hours warning
    pub day_start_hour: u32,
    /// Entries at or after this hour raise an after-hours warning
    pub day_end_hour: u32,
    /// Budget for closing one worker inside the daily job
    pub worker_timeout_ms: u64,
    pub policy_cache_ttl_secs: u64,
    pub policy_cache_capacity: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            duplicate_window_secs: 300,
            anomaly_entry_threshold: 6,
            day_start_hour: 5,
            day_end_hour: 23,
            worker_timeout_ms: 10_000,
            policy_cache_ttl_secs: 300,
            policy_cache_capacity: 1_000,
        }
    }
}

impl EngineConfig {
    /// Read `ATTENDANCE_*` variables, keeping the default for anything unset
    /// or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            duplicate_window_secs: env_or("ATTENDANCE_DUPLICATE_WINDOW_SECS", defaults.duplicate_window_secs),
            anomaly_entry_threshold: env_or("ATTENDANCE_ANOMALY_ENTRY_THRESHOLD", defaults.anomaly_entry_threshold),
            day_start_hour: env_or("ATTENDANCE_DAY_START_HOUR", defaults.day_start_hour),
            day_end_hour: env_or("ATTENDANCE_DAY_END_HOUR", defaults.day_end_hour),
            worker_timeout_ms: env_or("ATTENDANCE_WORKER_TIMEOUT_MS", defaults.worker_timeout_ms),
            policy_cache_ttl_secs: env_or("ATTENDANCE_POLICY_CACHE_TTL_SECS", defaults.policy_cache_ttl_secs),
            policy_cache_capacity: env_or("ATTENDANCE_POLICY_CACHE_CAPACITY", defaults.policy_cache_capacity),
        }
    }

    pub fn worker_timeout(&self) -> Duration {
        Duration::from_millis(self.worker_timeout_ms)
    }

    pub fn policy_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.policy_cache_ttl_secs)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
