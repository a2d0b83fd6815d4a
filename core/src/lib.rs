// Core of the authd suite:
// - In-memory credential/session store and its trait seam
// - Wire types shared by the server and the CLI
// - Configuration loading
// - Shared error types

// Export session module - SessionStore trait and the in-memory adapter
pub mod session;
pub use session::{InMemorySessionStore, SessionStore, SessionStoreRef};

// Export types module - Request/response data structures
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use config::AuthdConfig;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

// Token and seed-user generators
pub mod random;
