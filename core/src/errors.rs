use thiserror::Error;

/// Session store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionStoreError {
    /// An empty username or password, or an impossible seeding request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User already exists: {0}")]
    AlreadyExists(String),

    /// Unknown username or password mismatch; deliberately does not say which
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Token missing from the token table
    #[error("Unauthorized")]
    Unauthorized,

    /// The lock guarding the tables was poisoned by a panicking writer
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not determine home directory")]
    NoHomeDir,
}

/// Result type for session store operations
pub type StoreResult<T> = Result<T, SessionStoreError>;
