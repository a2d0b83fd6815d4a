// Client side of the authd suite: the HTTP client and the token file used by `authctl`.

pub mod client;
pub use client::{AuthClient, ClientError, ClientResult};

pub mod token_store;
pub use token_store::TokenStore;
