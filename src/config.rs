// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Client configuration.
//!
//! Resolution order, later wins:
//!
//! 1. Built-in defaults (`http://localhost:3001`, 10 s timeout)
//! 2. JSON file: `--config PATH`, else `lectern.json` in the working directory
//!    if it exists
//! 3. Environment: `LECTERN_BASE_URL`, `LECTERN_TIMEOUT_SECS`,
//!    `LECTERN_CORPUS_LEN`
//! 4. Command-line flags (applied by `main`)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "lectern.json";

pub const ENV_BASE_URL: &str = "LECTERN_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "LECTERN_TIMEOUT_SECS";
pub const ENV_CORPUS_LEN: &str = "LECTERN_CORPUS_LEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the search backend.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Length of the corpus stream, when known. Clamps forward paging.
    pub corpus_len: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            timeout_secs: 10,
            corpus_len: None,
        }
    }
}

impl ClientConfig {
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|err| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: err.to_string(),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Apply overrides from a key lookup (the process environment in `main`).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = parse_override(ENV_TIMEOUT_SECS, &value)?;
        }
        if let Some(value) = lookup(ENV_CORPUS_LEN) {
            self.corpus_len = Some(parse_override(ENV_CORPUS_LEN, &value)?);
        }
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidOverride {
            key: key.to_string(),
            value: value.to_string(),
        })
}

/// Read one config file.
pub fn read_config_file(path: &Path) -> Result<ClientConfig, ConfigError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: display,
        source,
    })
}

fn default_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(DEFAULT_CONFIG_FILE)
}

/// Load configuration: explicit file, else the default file if present, else
/// defaults; then environment overrides.
///
/// An explicit path that does not exist is an error. A missing default file
/// is not.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let config = read_config_file(path)?;
            tracing::info!("Loaded configuration from {:?}", path);
            config
        }
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                let config = read_config_file(&default_path)?;
                tracing::info!("Loaded configuration from {:?}", default_path);
                config
            } else {
                tracing::debug!("No config file, using defaults");
                ClientConfig::default()
            }
        }
    };

    config.apply_overrides(|key| std::env::var(key).ok())?;
    config.base_url()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url().unwrap().as_str(), "http://localhost:3001/");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.corpus_len, None);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lectern.json");
        std::fs::write(&path, r#"{ "corpus_len": 5000000 }"#).unwrap();

        let config = read_config_file(&path).unwrap();
        assert_eq!(config.corpus_len, Some(5_000_000));
        assert_eq!(config.base_url, "http://localhost:3001");
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lectern.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            read_config_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn overrides_replace_file_values() {
        let env: HashMap<&str, &str> = [
            (ENV_BASE_URL, "http://search.internal:8080"),
            (ENV_TIMEOUT_SECS, "3"),
            (ENV_CORPUS_LEN, "42"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.base_url, "http://search.internal:8080");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.corpus_len, Some(42));
    }

    #[test]
    fn bad_override_is_rejected() {
        let mut config = ClientConfig::default();
        let err = config
            .apply_overrides(|key| (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOverride { .. }));
    }
}
