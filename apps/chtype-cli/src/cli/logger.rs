//! # Logger Module
//!
//! Logging for the `chtype` binary, built from `tracing-subscriber` layers:
//! - **EnvFilter Layer**: honours `RUST_LOG` for module-level filtering and
//!   falls back to the configured level
//! - **Format Layer**: compact text or JSON, always written to stderr so
//!   command output on stdout stays machine readable
//!
//! The library itself only emits `tracing` events; nothing is printed unless
//! this module installs a subscriber.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: standard filtering (e.g. `RUST_LOG=chtype::parser=trace`)
//! - `CHTYPE__LOGGER__LEVEL`: DEBUG, INFO, WARN or ERROR (default: WARN)
//! - `CHTYPE__LOGGER__FORMAT`: Text or Json (default: Text)

use serde::Deserialize;
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub enum LoggerLevel {
    #[serde(alias = "DEBUG", alias = "debug")]
    Debug,
    #[serde(alias = "INFO", alias = "info")]
    Info,
    #[serde(alias = "WARN", alias = "warn")]
    Warn,
    #[serde(alias = "ERROR", alias = "error")]
    Error,
}

impl LoggerLevel {
    pub fn to_tracing_level(&self) -> LevelFilter {
        match self {
            LoggerLevel::Debug => LevelFilter::DEBUG,
            LoggerLevel::Info => LevelFilter::INFO,
            LoggerLevel::Warn => LevelFilter::WARN,
            LoggerLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub enum LogFormat {
    #[serde(alias = "JSON", alias = "json")]
    Json,
    #[serde(alias = "TEXT", alias = "text")]
    Text,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LoggerSettings {
    #[serde(default = "default_log_level")]
    pub level: LoggerLevel,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

fn default_log_level() -> LoggerLevel {
    LoggerLevel::Warn
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

impl Default for LoggerSettings {
    fn default() -> Self {
        LoggerSettings {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoggerError {
    #[error("Error installing the log subscriber: {0}")]
    Init(String),
}

/// Installs the global subscriber. `debug` overrides the configured level.
pub fn setup_logging(settings: &LoggerSettings, debug: bool) -> Result<(), LoggerError> {
    let level = if debug {
        LevelFilter::DEBUG
    } else {
        settings.level.to_tracing_level()
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let format_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    let result = if settings.format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(format_layer.json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(format_layer.compact())
            .try_init()
    };
    result.map_err(|e| LoggerError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(LoggerLevel::Debug.to_tracing_level(), LevelFilter::DEBUG);
        assert_eq!(LoggerLevel::Error.to_tracing_level(), LevelFilter::ERROR);
    }

    #[test]
    fn test_settings_defaults() {
        let settings: LoggerSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.level, LoggerLevel::Warn);
        assert_eq!(settings.format, LogFormat::Text);

        let settings: LoggerSettings =
            serde_json::from_str(r#"{"level": "debug", "format": "JSON"}"#).unwrap();
        assert_eq!(settings.level, LoggerLevel::Debug);
        assert_eq!(settings.format, LogFormat::Json);
    }
}
