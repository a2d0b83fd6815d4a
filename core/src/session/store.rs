use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::StoreResult;
use crate::types::UserListing;

/// Credential present in every freshly built store
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin";

/// Random users created at startup in addition to the admin
pub const DEFAULT_SEED_USERS: usize = 5;

/// Trait defining the interface for session stores
///
/// Each call is atomic on its own; no call spans more than one critical
/// section of another. Passwords are compared and stored as plain text.
#[async_trait]
pub trait SessionStore: Send + Sync + Debug {
    /// Add a credential. Empty fields are `InvalidInput`, a taken name is `AlreadyExists`.
    async fn register(&self, username: &str, password: &str) -> StoreResult<()>;

    /// Check a credential and issue a new bearer token for it
    async fn login(&self, username: &str, password: &str) -> StoreResult<String>;

    /// Revoke a token, returning the username it belonged to
    async fn logout(&self, token: &str) -> StoreResult<String>;

    /// Snapshot every registered username on behalf of a token holder
    async fn list_users(&self, token: &str) -> StoreResult<UserListing>;

    /// Resolve a token to its username without changing anything
    async fn authenticate(&self, token: &str) -> StoreResult<String>;

    /// Number of registered credentials
    async fn user_count(&self) -> StoreResult<usize>;

    /// Number of live tokens
    async fn active_sessions(&self) -> StoreResult<usize>;
}

/// Type alias for Arc-wrapped SessionStore trait objects
pub type SessionStoreRef = Arc<dyn SessionStore>;
