//! Runtime configuration read from the environment.
//!
//! `main` loads `.env` with `dotenvy` first, so every value here can live in
//! that file. CLI flags override the feed sources per invocation.

use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_STATIONS_URL: &str = "https://api.tfl.gov.uk/StopPoint/Mode/tube";
pub const DEFAULT_ROUTES_URL: &str = "https://api.tfl.gov.uk/Line/Mode/tube/Route";
pub const DEFAULT_WAQI_SEARCH_URL: &str = "https://api.waqi.info/search/";
pub const DEFAULT_WAQI_KEYWORD: &str = "london";
pub const DEFAULT_WAQI_TOKEN: &str = "demo";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/clean_air_router.log";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Station feed: URL or local JSON file.
    pub stations_source: String,
    /// Route feed: URL or local JSON file.
    pub routes_source: String,
    /// AQI search endpoint or local JSON file.
    pub aqi_source: String,
    pub waqi_keyword: String,
    pub waqi_token: String,
    pub tfl_app_key: Option<String>,
    pub http_timeout: Duration,
    pub log_file_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stations_source: DEFAULT_STATIONS_URL.to_string(),
            routes_source: DEFAULT_ROUTES_URL.to_string(),
            aqi_source: DEFAULT_WAQI_SEARCH_URL.to_string(),
            waqi_keyword: DEFAULT_WAQI_KEYWORD.to_string(),
            waqi_token: DEFAULT_WAQI_TOKEN.to_string(),
            tfl_app_key: None,
            http_timeout: Duration::from_secs(30),
            log_file_path: DEFAULT_LOG_FILE_PATH.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("HTTP_TIMEOUT_SECS must be whole seconds, got '{raw}'"))?,
            ),
            None => defaults.http_timeout,
        };

        Ok(Self {
            stations_source: get("TFL_STATIONS_URL").unwrap_or(defaults.stations_source),
            routes_source: get("TFL_ROUTES_URL").unwrap_or(defaults.routes_source),
            aqi_source: get("WAQI_SEARCH_URL").unwrap_or(defaults.aqi_source),
            waqi_keyword: get("WAQI_KEYWORD").unwrap_or(defaults.waqi_keyword),
            waqi_token: get("WAQI_TOKEN").unwrap_or(defaults.waqi_token),
            tfl_app_key: get("TFL_APP_KEY"),
            http_timeout,
            log_file_path: get("LOG_FILE_PATH").unwrap_or(defaults.log_file_path),
        })
    }
}
