use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuillError;

/// How login checks a submitted password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordMode {
    /// Every account accepts the single demo password.
    #[default]
    Demo,
    /// Argon2 verification against the user's stored hash.
    Hashed,
}

impl PasswordMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordMode::Demo => "demo",
            PasswordMode::Hashed => "hashed",
        }
    }
}

impl FromStr for PasswordMode {
    type Err = QuillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "demo" => Ok(PasswordMode::Demo),
            "hashed" | "hash" => Ok(PasswordMode::Hashed),
            other => Err(QuillError::InvalidInput(format!(
                "unknown password mode '{}' (expected demo or hashed)",
                other
            ))),
        }
    }
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = QuillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(QuillError::InvalidInput(format!(
                "unknown log format '{}' (expected compact, pretty or json)",
                other
            ))),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one JSON file per storage key (default: ./.quill)
    pub data_dir: PathBuf,

    /// Password check used at login (default: demo)
    pub password_mode: PasswordMode,

    /// Install demo users, topics and posts into an empty store (default: true)
    pub seed_demo_data: bool,

    /// Environment: development, production, test
    pub environment: String,

    /// Log output format (default: compact)
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("./.quill"),
            password_mode: PasswordMode::Demo,
            seed_demo_data: true,
            environment: "development".to_string(),
            log_format: LogFormat::Compact,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (with .env support).
    pub fn from_env() -> Result<Self, QuillError> {
        // Load .env file if present (ignore errors if missing)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, QuillError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let password_mode = match lookup("QUILL_PASSWORD_MODE") {
            Some(raw) => raw.parse()?,
            None => defaults.password_mode,
        };
        let log_format = match lookup("QUILL_LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => defaults.log_format,
        };

        Ok(Config {
            data_dir: lookup("QUILL_DATA_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            password_mode,
            seed_demo_data: lookup("QUILL_SEED_DEMO_DATA")
                .map(|raw| parse_flag(&raw))
                .unwrap_or(defaults.seed_demo_data),
            environment: lookup("QUILL_ENVIRONMENT").unwrap_or(defaults.environment),
            log_format,
        })
    }

    /// Configuration used by tests: demo passwords, no seed data.
    pub fn for_tests() -> Self {
        Config {
            seed_demo_data: false,
            environment: "test".to_string(),
            ..Config::default()
        }
    }

    /// Check if running in development mode.
    pub fn is_dev(&self) -> bool {
        self.environment == "development"
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).expect("config");
        assert_eq!(config.data_dir, PathBuf::from("./.quill"));
        assert_eq!(config.password_mode, PasswordMode::Demo);
        assert!(config.seed_demo_data);
        assert!(config.is_dev());
        assert_eq!(config.log_format, LogFormat::Compact);
    }

    #[test]
    fn test_config_from_vars() {
        let config = Config::from_lookup(lookup_from(&[
            ("QUILL_DATA_DIR", "/var/lib/quill"),
            ("QUILL_PASSWORD_MODE", "Hashed"),
            ("QUILL_SEED_DEMO_DATA", "no"),
            ("QUILL_ENVIRONMENT", "production"),
            ("QUILL_LOG_FORMAT", "json"),
        ]))
        .expect("config");

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/quill"));
        assert_eq!(config.password_mode, PasswordMode::Hashed);
        assert!(!config.seed_demo_data);
        assert!(!config.is_dev());
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_config_rejects_unknown_password_mode() {
        let err = Config::from_lookup(lookup_from(&[("QUILL_PASSWORD_MODE", "plaintext")]))
            .expect_err("unknown mode");
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_blank_data_dir_falls_back_to_default() {
        let config =
            Config::from_lookup(lookup_from(&[("QUILL_DATA_DIR", "  ")])).expect("config");
        assert_eq!(config.data_dir, PathBuf::from("./.quill"));
    }
}
