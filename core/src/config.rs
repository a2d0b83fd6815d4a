use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Name of the directory under `~/.config` holding authd files
pub const APP_NAME: &str = "authd";

/// On-disk configuration for the authd suite.
///
/// Every key is optional; unset keys fall through to the next layer
/// (command line, then built-in defaults).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AuthdConfig {
    /// Address the HTTP server binds to
    pub http_addr: Option<SocketAddr>,
    /// Number of random users created next to `admin` at startup
    pub seed_users: Option<usize>,
    /// Fixed seed for the token generator, for reproducible runs
    pub rng_seed: Option<u64>,
}

impl AuthdConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Loads `~/.config/authd/config.toml`, or defaults when it is absent
    pub fn load_from_default() -> Result<Self, ConfigError> {
        Self::load_from_file(&get_default_config_file(APP_NAME)?)
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            http_addr: other.http_addr.or(self.http_addr),
            seed_users: other.seed_users.or(self.seed_users),
            rng_seed: other.rng_seed.or(self.rng_seed),
        }
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> Result<PathBuf, ConfigError> {
    let home_dir = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> Result<PathBuf, ConfigError> {
    Ok(get_default_config_dir(app_name)?.join("config.toml"))
}
