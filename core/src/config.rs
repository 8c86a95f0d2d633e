//! Run configuration.
//!
//! Backend credentials come from the environment and are validated once
//! at startup. Generator and ingest settings default to the production
//! values; the runner overrides them from flags.

use crate::error::{SeedError, SeedResult};
use chrono::{Local, NaiveDate};
use std::time::Duration;

pub const ENDPOINT_VAR: &str = "VITE_SUPABASE_URL";
pub const CREDENTIAL_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";

pub const DEFAULT_DAYS: u32 = 731;
pub const DEFAULT_RECORDS_PER_DAY: u32 = 50;
pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_PACE: Duration = Duration::from_millis(100);
pub const INVENTORY_TABLE: &str = "inventory_data";
pub const NOTIFICATIONS_TABLE: &str = "notifications";

/// Where the hosted row-store lives and the privileged key used to write
/// to it.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub endpoint: String,
    pub credential: String,
}

// Keep the key out of logs.
impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("endpoint", &self.endpoint)
            .field("credential", &"<redacted>")
            .finish()
    }
}

impl BackendConfig {
    pub fn from_env() -> SeedResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable lookup. Missing and blank values are both
    /// treated as absent.
    pub fn from_lookup<F>(lookup: F) -> SeedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |var: &'static str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(SeedError::MissingConfig { var })
        };
        let endpoint = fetch(ENDPOINT_VAR)?;
        let credential = fetch(CREDENTIAL_VAR)?;

        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(SeedError::InvalidConfig {
                reason: format!("{ENDPOINT_VAR} must be an http(s) URL, got '{endpoint}'"),
            });
        }

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            credential,
        })
    }
}

/// Shape of the synthetic window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub days: u32,
    pub records_per_day: u32,
    /// Last day of the window, inclusive.
    pub end_date: NaiveDate,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::ending(Local::now().date_naive())
    }
}

impl GeneratorConfig {
    pub fn ending(end_date: NaiveDate) -> Self {
        Self {
            days: DEFAULT_DAYS,
            records_per_day: DEFAULT_RECORDS_PER_DAY,
            end_date,
        }
    }

    pub fn total_records(&self) -> usize {
        self.days as usize * self.records_per_day as usize
    }

    /// First day of the window, or `None` when it falls outside the
    /// calendar range chrono can represent.
    pub fn start_date(&self) -> Option<NaiveDate> {
        let span = chrono::Duration::try_days(self.days.saturating_sub(1) as i64)?;
        self.end_date.checked_sub_signed(span)
    }

    pub fn validate(&self) -> SeedResult<()> {
        if self.start_date().is_none() {
            return Err(SeedError::InvalidConfig {
                reason: format!(
                    "a window of {} days ending {} starts before the earliest representable date",
                    self.days, self.end_date
                ),
            });
        }
        Ok(())
    }
}

/// How generated rows are shipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub table: String,
    pub batch_size: usize,
    /// Pause after every batch, success or failure.
    pub pace: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            table: INVENTORY_TABLE.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            pace: DEFAULT_PACE,
        }
    }
}

impl IngestConfig {
    pub fn validate(&self) -> SeedResult<()> {
        if self.batch_size == 0 {
            return Err(SeedError::InvalidConfig {
                reason: "batch size must be at least 1".into(),
            });
        }
        if self.table.trim().is_empty() {
            return Err(SeedError::InvalidConfig {
                reason: "table name may not be empty".into(),
            });
        }
        Ok(())
    }
}
