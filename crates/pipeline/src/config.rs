use std::time::Duration;

use clawforge_core::certification::{RejectionPolicy, DEFAULT_SILVER_REVIEW_THRESHOLD};

/// Default archive download timeout.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default upper bound on a downloaded archive (50 MiB).
pub const DEFAULT_ARCHIVE_MAX_BYTES: u64 = 50 * 1024 * 1024;

/// Default age after which a `processing` queue entry may be reclaimed.
pub const DEFAULT_STALE_RUN_SECS: u64 = 15 * 60;

/// Settings of the automated certification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub fetch_timeout_secs: u64,
    pub archive_max_bytes: u64,
    /// Silver score at or above which a skill is queued for review.
    pub silver_review_threshold: u32,
    pub rejection_policy: RejectionPolicy,
    /// A run claim older than this no longer blocks a new run.
    pub stale_run_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            archive_max_bytes: DEFAULT_ARCHIVE_MAX_BYTES,
            silver_review_threshold: DEFAULT_SILVER_REVIEW_THRESHOLD,
            rejection_policy: RejectionPolicy::default(),
            stale_run_secs: DEFAULT_STALE_RUN_SECS,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default              |
    /// |------------------------------|----------------------|
    /// | `ARCHIVE_FETCH_TIMEOUT_SECS` | `30`                 |
    /// | `ARCHIVE_MAX_BYTES`          | `52428800`           |
    /// | `SILVER_REVIEW_THRESHOLD`    | `80`                 |
    /// | `REJECTION_POLICY`           | `keep_certification` |
    /// | `STALE_RUN_SECS`             | `900`                |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let fetch_timeout_secs: u64 = std::env::var("ARCHIVE_FETCH_TIMEOUT_SECS")
            .map(|v| v.parse().expect("ARCHIVE_FETCH_TIMEOUT_SECS must be a valid u64"))
            .unwrap_or(defaults.fetch_timeout_secs);

        let archive_max_bytes: u64 = std::env::var("ARCHIVE_MAX_BYTES")
            .map(|v| v.parse().expect("ARCHIVE_MAX_BYTES must be a valid u64"))
            .unwrap_or(defaults.archive_max_bytes);

        let silver_review_threshold: u32 = std::env::var("SILVER_REVIEW_THRESHOLD")
            .map(|v| {
                let threshold: u32 = v.parse().expect("SILVER_REVIEW_THRESHOLD must be a valid u32");
                assert!(threshold <= 100, "SILVER_REVIEW_THRESHOLD must be at most 100");
                threshold
            })
            .unwrap_or(defaults.silver_review_threshold);

        let rejection_policy = std::env::var("REJECTION_POLICY")
            .map(|v| {
                RejectionPolicy::from_str_value(&v)
                    .expect("REJECTION_POLICY must be keep_certification or reset_certification")
            })
            .unwrap_or(defaults.rejection_policy);

        let stale_run_secs: u64 = std::env::var("STALE_RUN_SECS")
            .map(|v| v.parse().expect("STALE_RUN_SECS must be a valid u64"))
            .unwrap_or(defaults.stale_run_secs);

        Self {
            fetch_timeout_secs,
            archive_max_bytes,
            silver_review_threshold,
            rejection_policy,
            stale_run_secs,
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
