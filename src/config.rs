use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{CleanseError, CleanseResult};

pub const ENV_REFERENCE_WORKBOOK: &str = "ORDER_CLEANSE_REFERENCE_WORKBOOK";
pub const ENV_REFERENCE_SHEET_ID: &str = "ORDER_CLEANSE_REFERENCE_SHEET_ID";
pub const ENV_OUTPUT_DIR: &str = "ORDER_CLEANSE_OUTPUT_DIR";
pub const ENV_LOG_LEVEL: &str = "ORDER_CLEANSE_LOG_LEVEL";
pub const ENV_HTTP_TIMEOUT: &str = "ORDER_CLEANSE_HTTP_TIMEOUT_SECS";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Settings read from the environment (and a `.env` file if present). CLI flags win over these.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub reference_workbook: Option<PathBuf>,
    pub reference_sheet_id: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub log_level: String,
    pub http_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reference_workbook: None,
            reference_sheet_id: None,
            output_dir: None,
            log_level: "info".to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

fn load_env() {
    let _ = dotenvy::dotenv();
}

impl Settings {
    pub fn from_env() -> CleanseResult<Self> {
        load_env();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> CleanseResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();
        let http_timeout = match get(ENV_HTTP_TIMEOUT) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| CleanseError::InvalidConfig {
                    field: ENV_HTTP_TIMEOUT.to_string(),
                    value: raw.clone(),
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.http_timeout,
        };
        Ok(Self {
            reference_workbook: get(ENV_REFERENCE_WORKBOOK).map(PathBuf::from),
            reference_sheet_id: get(ENV_REFERENCE_SHEET_ID),
            output_dir: get(ENV_OUTPUT_DIR).map(PathBuf::from),
            log_level: get(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            http_timeout,
        })
    }
}
