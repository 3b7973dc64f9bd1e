//! Tic-tac-toe server binary.

#![warn(missing_docs)]

mod cli;

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tictactoe_server::{AppState, ServerConfig, SessionStore, StoreConfig, router};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

const PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tictactoe_server=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            port,
            host,
            sqlite,
            seed,
        } => run_server(config, port, host, sqlite, seed).await,
        Command::InitConfig { path, force } => init_config(path, force),
    }
}

/// Run the HTTP game server
#[instrument(skip_all, fields(config_path = %config_path.display()))]
async fn run_server(
    config_path: PathBuf,
    port: Option<u16>,
    host: Option<String>,
    sqlite: Option<String>,
    seed: Option<u64>,
) -> Result<()> {
    let mut config = ServerConfig::load_or_default(&config_path)?;
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(path) = sqlite {
        config = config.with_store(StoreConfig::Sqlite { path });
    }
    if seed.is_some() {
        config = config.with_agent_seed(seed);
    }

    let store = config.build_store()?;
    let agent = config.build_agent();
    spawn_purge_task(Arc::clone(&store));

    let app = router(AppState::new(store, agent, config.cookie_name().clone()));

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!("Server ready at http://{}:{}/", config.host(), config.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Periodically drops idle sessions.
fn spawn_purge_task(store: Arc<dyn SessionStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let store = Arc::clone(&store);
            match tokio::task::spawn_blocking(move || store.purge_expired()).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => warn!(error = %e, "Session purge failed"),
                Err(e) => warn!(error = %e, "Session purge task panicked"),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

/// Write a default config file
#[instrument(fields(path = %path.display()))]
fn init_config(path: PathBuf, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let text = ServerConfig::default().to_toml()?;
    std::fs::write(&path, text)?;
    info!("Wrote default config");
    Ok(())
}
