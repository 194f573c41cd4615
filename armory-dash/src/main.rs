//! armory-dash - Character dashboard service
//!
//! Opens the character database read-only and serves filter options and
//! aggregate views as JSON.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use armory_common::config::{load_toml_config, resolve_root_folder, ROOT_FOLDER_ENV};
use armory_common::db::{connect_readonly, DATABASE_FILE};
use armory_dash::{build_router, AppState, CharacterCache};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for armory-dash
#[derive(Parser, Debug)]
#[command(name = "armory-dash")]
#[command(about = "Serve World of Warcraft character analytics")]
#[command(version)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:5730", env = "ARMORY_DASH_ADDR")]
    listen: SocketAddr,

    /// Folder holding the character database
    #[arg(long, env = ROOT_FOLDER_ENV)]
    root_folder: Option<PathBuf>,

    /// Database file (overrides <root-folder>/characters.db)
    #[arg(long)]
    database: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_toml_config(args.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        "Starting armory-dash (Character Dashboard) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let db_path = match &args.database {
        Some(path) => path.clone(),
        None => resolve_root_folder(
            args.root_folder.as_deref(),
            ROOT_FOLDER_ENV,
            config.root_folder.as_deref(),
        )
        .join(DATABASE_FILE),
    };
    info!("Database path: {}", db_path.display());

    let pool = connect_readonly(&db_path)
        .await
        .context("Failed to connect to database in read-only mode")?;
    info!("✓ Connected to database (read-only)");

    let cache = CharacterCache::load(pool.clone()).await?;
    let app = build_router(AppState::new(cache));

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!("armory-dash listening on http://{}", args.listen);
    info!("Health check: http://{}/health", args.listen);

    let served = axum::serve(listener, app).await;

    pool.close().await;
    served?;

    Ok(())
}
