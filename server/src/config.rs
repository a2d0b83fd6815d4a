use anyhow::{anyhow, Result};
use authd_core::config::AuthdConfig;
use authd_core::random::USERNAME_SPACE;
use authd_core::session::DEFAULT_SEED_USERS;
use authd_core::{InMemorySessionStore, SessionStoreRef};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::net::SocketAddr;
use std::sync::Arc;

/// Resolved configuration for the authd daemon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub http_addr: SocketAddr,
    /// Random users created next to `admin`
    pub seed_users: usize,
    /// Fixed generator seed; wall-clock seeded when absent
    pub rng_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            seed_users: DEFAULT_SEED_USERS,
            rng_seed: None,
        }
    }
}

impl From<&AuthdConfig> for AppConfig {
    fn from(config: &AuthdConfig) -> Self {
        let defaults = Self::default();
        Self {
            http_addr: config.http_addr.unwrap_or(defaults.http_addr),
            seed_users: config.seed_users.unwrap_or(defaults.seed_users),
            rng_seed: config.rng_seed,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.seed_users > USERNAME_SPACE {
            return Err(anyhow!(
                "seed_users is {} but at most {} random usernames exist",
                self.seed_users,
                USERNAME_SPACE
            ));
        }
        Ok(())
    }

    /// Build the session store this configuration describes
    pub fn build_store(&self) -> Result<SessionStoreRef> {
        let store = match self.rng_seed {
            Some(seed) => {
                InMemorySessionStore::with_rng(StdRng::seed_from_u64(seed), self.seed_users)?
            }
            None => InMemorySessionStore::new(self.seed_users)?,
        };
        Ok(Arc::new(store))
    }
}
