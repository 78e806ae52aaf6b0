//! Runtime settings read from the environment (and `.env`, loaded by the binary).
//!
//! | Variable                   | Default                                            |
//! |----------------------------|----------------------------------------------------|
//! | `OPENWEATHER_API_KEY`      | none, required by the `weather` command            |
//! | `OPENWEATHER_URL`          | `https://api.openweathermap.org/data/2.5/weather`  |
//! | `MODEL_PATH`               | `model/forest.json`                                |
//! | `LOCAL_UTC_OFFSET_MINUTES` | `330` (IST)                                        |
//! | `HTTP_TIMEOUT_SECS`        | `30`                                               |

use anyhow::{Context, Result, anyhow};
use chrono::FixedOffset;
use std::path::PathBuf;
use std::time::Duration;

use crate::weather::DEFAULT_BASE_URL;

const DEFAULT_MODEL_PATH: &str = "model/forest.json";
const DEFAULT_OFFSET_MINUTES: i32 = 330;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Settings {
    pub openweather_api_key: Option<String>,
    pub openweather_url: String,
    pub model_path: PathBuf,
    pub local_offset: FixedOffset,
    pub http_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let offset_minutes = match get("LOCAL_UTC_OFFSET_MINUTES") {
            Some(v) => v
                .trim()
                .parse::<i32>()
                .with_context(|| format!("LOCAL_UTC_OFFSET_MINUTES is not an integer: '{v}'"))?,
            None => DEFAULT_OFFSET_MINUTES,
        };
        let local_offset = FixedOffset::east_opt(offset_minutes * 60)
            .ok_or_else(|| anyhow!("LOCAL_UTC_OFFSET_MINUTES out of range: {offset_minutes}"))?;

        let timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("HTTP_TIMEOUT_SECS is not a whole number: '{v}'"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            openweather_api_key: get("OPENWEATHER_API_KEY"),
            openweather_url: get("OPENWEATHER_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model_path: get("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            local_offset,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.openweather_api_key
            .as_deref()
            .ok_or_else(|| anyhow!("OPENWEATHER_API_KEY must be set"))
    }
}
