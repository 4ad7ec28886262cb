//! # Settings
//!
//! Layered configuration for the `chtype` binary, lowest precedence first:
//! 1. built-in defaults
//! 2. `~/.chtype/config.toml`, or the file passed with `--config`
//! 3. `CHTYPE__`-prefixed environment variables, `__` separating sections,
//!    e.g. `CHTYPE__PARSER__MAX_DEPTH=16`
//!
//! A missing config file is not an error.

use std::path::{Path, PathBuf};

use chtype::format::Format;
use chtype::ParserOptions;
use config::{Config, ConfigError, Environment, File};
use home::home_dir;
use serde::Deserialize;

use super::logger::LoggerSettings;

pub const CONFIG_DIRECTORY: &str = ".chtype";
pub const CONFIG_FILE: &str = "config.toml";
const ENVIRONMENT_PREFIX: &str = "CHTYPE";

/// Parser limits, passed through to the library.
pub type ParserSettings = ParserOptions;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    /// Format whose capabilities `parse` reports under the column table.
    #[serde(default = "default_format")]
    pub default_format: Format,
}

fn default_format() -> Format {
    Format::RowBinaryWithNamesAndTypes
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            default_format: default_format(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub logger: LoggerSettings,
    #[serde(default)]
    pub parser: ParserSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

/// `~/.chtype`, or `./.chtype` when no home directory can be found.
pub fn user_directory() -> PathBuf {
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIRECTORY)
}

pub fn config_path() -> PathBuf {
    user_directory().join(CONFIG_FILE)
}

/// Reads settings from `path` (or the default location) and the environment.
pub fn read_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);

    Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix(ENVIRONMENT_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::logger::{LogFormat, LoggerLevel};
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = read_settings(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings.parser.max_depth, 64);
        assert_eq!(settings.logger.level, LoggerLevel::Warn);
        assert_eq!(
            settings.display.default_format,
            Format::RowBinaryWithNamesAndTypes
        );
    }

    #[test]
    #[serial]
    fn test_reads_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.child("config.toml");
        file.write_str(
            r#"
[logger]
level = "DEBUG"
format = "Json"

[parser]
max_depth = 8

[display]
default_format = "TabSeparated"
"#,
        )
        .unwrap();

        let settings = read_settings(Some(file.path())).unwrap();
        assert_eq!(settings.logger.level, LoggerLevel::Debug);
        assert_eq!(settings.logger.format, LogFormat::Json);
        assert_eq!(settings.parser.max_depth, 8);
        assert_eq!(settings.display.default_format, Format::TabSeparated);
    }

    #[test]
    #[serial]
    fn test_environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.child("config.toml");
        file.write_str("[parser]\nmax_depth = 8\n").unwrap();

        std::env::set_var("CHTYPE__PARSER__MAX_DEPTH", "3");
        let settings = read_settings(Some(file.path()));
        std::env::remove_var("CHTYPE__PARSER__MAX_DEPTH");

        assert_eq!(settings.unwrap().parser.max_depth, 3);
    }
}
