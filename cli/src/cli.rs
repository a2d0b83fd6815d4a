use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for the authd service
#[derive(Parser, Debug)]
#[command(name = "authctl", author, version, about, long_about = None)]
pub struct Args {
    /// Base URL of the authd server
    #[arg(long, env = "AUTHCTL_SERVER", default_value = "http://127.0.0.1:8080")]
    pub server: String,

    /// File the bearer token is kept in (defaults to ~/.config/authd/token)
    #[arg(long, env = "AUTHCTL_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new account
    Register { username: String, password: String },
    /// Log in and remember the issued token
    Login { username: String, password: String },
    /// List registered users using the remembered token
    Users,
    /// Revoke the remembered token
    Logout,
    /// Check that the server is up
    Health,
}
