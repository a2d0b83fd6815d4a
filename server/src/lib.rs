//! HTTP front-end for the authd session store.
//!
//! Handlers are thin adapters: they decode the request, call one
//! `SessionStore` operation and encode the result.

pub mod config;
pub mod http_server;

pub use config::AppConfig;
pub use http_server::{app, run_server, ApiError, AppState, BearerToken};
