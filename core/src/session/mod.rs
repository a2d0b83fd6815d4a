//! Session management for authd
//!
//! This module owns the credential table (username -> password) and the token
//! table (token -> username). It defines a `SessionStore` trait so the HTTP
//! layer only ever sees an injected handle, and provides the in-memory adapter
//! used by the daemon and the tests.

pub mod adapters;
pub mod store;

pub use adapters::InMemorySessionStore;
pub use store::{
    SessionStore, SessionStoreRef, ADMIN_PASSWORD, ADMIN_USERNAME, DEFAULT_SEED_USERS,
};
