//! Keeps the bearer token between `authctl` invocations.

use authd_core::config::{get_default_config_dir, APP_NAME};
use authd_core::ConfigError;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// A single-token file, `~/.config/authd/token` by default
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(get_default_config_dir(APP_NAME)?.join("token"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The saved token, or `None` when nothing is saved
    pub fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }

    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
