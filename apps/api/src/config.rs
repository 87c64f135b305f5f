use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_BMF_PATH: &str = "data/eo_ca.csv";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;

/// Application configuration loaded from environment variables.
/// Nothing is required: a missing census key only degrades census lookups.
#[derive(Debug, Clone)]
pub struct Config {
    pub census_api_key: Option<String>,
    pub bmf_path: PathBuf,
    pub lookup_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            census_api_key: optional_env("CENSUS_API_KEY"),
            bmf_path: optional_env("BMF_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BMF_PATH)),
            lookup_timeout: Duration::from_secs(
                parse_env("LOOKUP_TIMEOUT_SECS", DEFAULT_LOOKUP_TIMEOUT_SECS)
                    .context("LOOKUP_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            port: parse_env("PORT", DEFAULT_PORT).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            census_api_key: None,
            bmf_path: PathBuf::from(DEFAULT_BMF_PATH),
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
            port: DEFAULT_PORT,
            rust_log: "info".to_string(),
        }
    }
}

/// Reads a variable, treating unset and blank values the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for environment variable '{key}'")),
        None => Ok(default),
    }
}
