//! Console configuration.
//!
//! Settings come from, in increasing precedence:
//! - built-in defaults;
//! - a JSON file (`--config`, or `config.json` in the platform config dir);
//! - `ROSTER_*` environment variables;
//! - command-line flags (applied by the binary).

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding [`Config::base_url`].
pub const ENV_BASE_URL: &str = "ROSTER_BASE_URL";
/// Environment variable overriding [`Config::api_key`].
pub const ENV_API_KEY: &str = "ROSTER_API_KEY";
/// Environment variable overriding [`Config::log_filter`].
pub const ENV_LOG: &str = "ROSTER_LOG";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the bearer token is kept between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    /// OS keychain.
    #[default]
    Keyring,
    /// Process memory; sign in on every run.
    Memory,
}

/// Console settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the remote collection API.
    pub base_url: String,
    /// Optional API key sent with every request.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds. Requests never time out when unset.
    pub request_timeout_secs: Option<u64>,
    /// `tracing` filter directive.
    pub log_filter: String,
    /// Keychain account the token is stored under.
    pub profile: String,
    /// Token storage backend.
    pub token_store: TokenStoreKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://reqres.in".to_string(),
            api_key: None,
            request_timeout_secs: None,
            log_filter: "roster=info".to_string(),
            profile: "default".to_string(),
            token_store: TokenStoreKind::default(),
        }
    }
}

impl Config {
    /// Loads configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used if a file is there and defaults apply otherwise. Environment
    /// overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns `config.json` in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "roster").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Applies `ROSTER_*` overrides. Blank values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(api_key) = lookup(ENV_API_KEY) {
            self.api_key = Some(api_key);
        }
        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = filter;
        }
    }

    /// Returns the request timeout, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
