use anyhow::{Context, Result};
use authd_core::config::AuthdConfig;
use authd_server::{http_server, AppConfig};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "authd", about = "Minimal in-memory authentication service", version)]
struct Args {
    /// Path to config file (defaults to ~/.config/authd/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP server address
    #[arg(long, env = "AUTHD_HTTP_ADDR")]
    http_addr: Option<SocketAddr>,

    /// Number of random users to create next to `admin`
    #[arg(long, env = "AUTHD_SEED_USERS")]
    seed_users: Option<usize>,

    /// Fixed seed for token and seed-user generation
    #[arg(long, env = "AUTHD_RNG_SEED")]
    rng_seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "AUTHD_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)))
        .init();

    info!("Starting authd");

    // Load config from file or use defaults
    let file_config = match &args.config {
        Some(path) => AuthdConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => AuthdConfig::load_from_default().context("Failed to load configuration")?,
    };

    // Command line wins over the file
    let cli_config = AuthdConfig {
        http_addr: args.http_addr,
        seed_users: args.seed_users,
        rng_seed: args.rng_seed,
    };
    let config = AppConfig::from(&file_config.merge(&cli_config));
    config.validate().context("Invalid configuration")?;

    if config.rng_seed.is_some() {
        warn!("Using a fixed generator seed; tokens are predictable");
    }

    let store = config.build_store().context("Failed to build session store")?;
    info!(users = store.user_count().await?, "Session store ready");

    if let Err(e) = http_server::run_server(config.http_addr, store).await {
        error!(error = %e, "HTTP server failed");
        return Err(e);
    }

    info!("authd shutting down");
    Ok(())
}
