//! Application configuration.
//!
//! Every setting comes from an environment variable, optionally loaded from a `.env` file.
//!
//! | Variable | Default | |
//! |---|---|---|
//! | `AGUA_CHANNEL_BUFFER` | `32` | request queue size of every actor |
//! | `AGUA_TRANSITION_POLICY` | `strict` | `strict` or `lenient` |
//! | `AGUA_MISSING_LOCATION` | `unranked` | `exclude` or `unranked` |
//! | `AGUA_LOG_FILTER` | `info` | used when `RUST_LOG` is unset |
//! | `AGUA_LOG_FORMAT` | `compact` | `compact` or `json` |
//! | `GOOGLE_MAPS_API_KEY` | unset | enables the Google geocoder |
//! | `AGUA_GEOCODE_URL` | Google endpoint | |
//! | `AGUA_SEED_SUPPLIERS` | `false` | register the demo suppliers at startup |
//! | `AGUA_ARGON2_MEMORY_KIB` | `19456` | argon2 memory cost |
//! | `AGUA_ARGON2_ITERATIONS` | `2` | argon2 time cost |

use crate::model::TransitionPolicy;
use crate::services::MissingLocation;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected 'compact' or 'json', got '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub channel_buffer: usize,
    pub transition_policy: TransitionPolicy,
    pub missing_location: MissingLocation,
    pub log_filter: String,
    pub log_format: LogFormat,
    pub google_maps_api_key: Option<String>,
    pub geocode_url: String,
    pub seed_suppliers: bool,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 32,
            transition_policy: TransitionPolicy::default(),
            missing_location: MissingLocation::default(),
            log_filter: "info".to_string(),
            log_format: LogFormat::default(),
            google_maps_api_key: None,
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            seed_suppliers: false,
            argon2_memory_kib: argon2::Params::DEFAULT_M_COST,
            argon2_iterations: argon2::Params::DEFAULT_T_COST,
        }
    }
}

fn parse<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let channel_buffer = parse("AGUA_CHANNEL_BUFFER", get("AGUA_CHANNEL_BUFFER"), defaults.channel_buffer)?;
        if channel_buffer == 0 {
            return Err(ConfigError::Invalid {
                var: "AGUA_CHANNEL_BUFFER",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let config = Self {
            channel_buffer,
            transition_policy: parse(
                "AGUA_TRANSITION_POLICY",
                get("AGUA_TRANSITION_POLICY"),
                defaults.transition_policy,
            )?,
            missing_location: parse(
                "AGUA_MISSING_LOCATION",
                get("AGUA_MISSING_LOCATION"),
                defaults.missing_location,
            )?,
            log_filter: get("AGUA_LOG_FILTER").unwrap_or(defaults.log_filter),
            log_format: parse("AGUA_LOG_FORMAT", get("AGUA_LOG_FORMAT"), defaults.log_format)?,
            google_maps_api_key: get("GOOGLE_MAPS_API_KEY"),
            geocode_url: get("AGUA_GEOCODE_URL").unwrap_or(defaults.geocode_url),
            seed_suppliers: parse("AGUA_SEED_SUPPLIERS", get("AGUA_SEED_SUPPLIERS"), defaults.seed_suppliers)?,
            argon2_memory_kib: parse(
                "AGUA_ARGON2_MEMORY_KIB",
                get("AGUA_ARGON2_MEMORY_KIB"),
                defaults.argon2_memory_kib,
            )?,
            argon2_iterations: parse(
                "AGUA_ARGON2_ITERATIONS",
                get("AGUA_ARGON2_ITERATIONS"),
                defaults.argon2_iterations,
            )?,
        };

        // never log the API key itself
        tracing::info!(
            channel_buffer = config.channel_buffer,
            policy = ?config.transition_policy,
            geocoder = if config.google_maps_api_key.is_some() { "google" } else { "static" },
            "Application configuration loaded"
        );
        Ok(config)
    }
}
