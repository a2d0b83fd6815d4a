use anyhow::{anyhow, Context, Result};
use authd_cli::{AuthClient, TokenStore};
use clap::Parser;
use log::{info, LevelFilter};

mod cli;
mod output;

use crate::cli::{Args, Command};
use crate::output::{print_error, print_success, print_users};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.to_string()))
        .init();

    if let Err(e) = run(args).await {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let token_path = match args.token_file {
        Some(path) => path,
        None => TokenStore::default_path().context("Failed to locate token file")?,
    };
    let tokens = TokenStore::new(token_path);
    let client = AuthClient::new(args.server);
    info!("Using authd at {}", client.base_url());

    match args.command {
        Command::Register { username, password } => {
            let response = client.register(&username, &password).await?;
            print_success(&response.message);
        }
        Command::Login { username, password } => {
            let (token, message) = client.login(&username, &password).await?;
            tokens
                .save(&token)
                .with_context(|| format!("Failed to save token to {}", tokens.path().display()))?;
            print_success(&message);
        }
        Command::Users => {
            let token = saved_token(&tokens)?;
            print_users(&client.users(&token).await?);
        }
        Command::Logout => {
            let token = saved_token(&tokens)?;
            let response = client.logout(&token).await?;
            tokens.clear().context("Failed to remove token file")?;
            print_success(&response.message);
        }
        Command::Health => {
            let body = client.health().await?;
            print_success(body.trim());
        }
    }

    Ok(())
}

fn saved_token(tokens: &TokenStore) -> Result<String> {
    tokens
        .load()
        .with_context(|| format!("Failed to read token from {}", tokens.path().display()))?
        .ok_or_else(|| anyhow!("Not logged in; run `authctl login <username> <password>` first"))
}
