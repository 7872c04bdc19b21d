//! Battle Pass Daemon - player progression and reward service.
//!
//! Serves the battle pass REST API backed by SQLite.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use battlepassd::config::{DaemonConfig, CONFIG_PATH};
use battlepassd::seed;
use battlepassd::server::{self, AppState};
use battlepassd::store::Store;

#[derive(Parser, Debug)]
#[command(name = "battlepassd", about = "Battle pass progression daemon")]
struct Args {
    /// Config file path.
    #[arg(long, default_value = CONFIG_PATH)]
    config: PathBuf,

    /// Override the listen address from the config file.
    #[arg(long)]
    listen: Option<String>,

    /// Override the database path from the config file.
    #[arg(long)]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!("battlepassd v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = DaemonConfig::load(&args.config)?;
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }
    if let Some(db) = args.db {
        config.db_path = db;
    }

    let store = Store::open(&config.db_path)
        .await
        .context("Failed to open database")?;
    let store = Arc::new(store);

    if config.seed_defaults {
        let seeded = seed::seed_default_catalog(&store)
            .await
            .context("Failed to seed reward catalog")?;
        if seeded > 0 {
            info!("Seeded {seeded} catalog rewards");
        }
    }

    let state = AppState::new(store, &config);
    server::run(&config, state).await
}
