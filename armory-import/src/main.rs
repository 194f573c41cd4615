//! armory-import - Guild roster import CLI
//!
//! Fetches every member of one guild from Battle.net and upserts them into the
//! local character database, then prints the imported characters.
//!
//! Credentials come from `CLIENT_ID` / `CLIENT_SECRET` (a `.env` file in the
//! working directory is loaded first).

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use armory_common::config::{load_toml_config, resolve_root_folder, TomlConfig, ROOT_FOLDER_ENV};
use armory_common::db::{init_database_pool, DATABASE_FILE};
use armory_import::config::Credentials;
use armory_import::display::render_character_table;
use armory_import::{import_guild, BattleNetClient, BattleNetEndpoints, ImportReport};
use clap::Parser;
use sqlx::SqlitePool;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for armory-import
#[derive(Parser, Debug)]
#[command(name = "armory-import")]
#[command(about = "Fetch character information for a given realm and guild.")]
#[command(version)]
struct Args {
    /// The realm name
    realm: String,

    /// The guild name
    guild: String,

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

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = match load_toml_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    info!(
        "Starting armory-import v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match run(&args, &config).await {
        Ok(report) => {
            print!("{}", render_character_table(&report.imported));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout carries only the table
fn init_tracing(config: &TomlConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

async fn run(args: &Args, config: &TomlConfig) -> Result<ImportReport> {
    // Checked before the store is opened or anything touches the network
    let credentials = Credentials::from_env()?;

    let db_path = match &args.database {
        Some(path) => path.clone(),
        None => resolve_root_folder(
            args.root_folder.as_deref(),
            ROOT_FOLDER_ENV,
            config.root_folder.as_deref(),
        )
        .join(DATABASE_FILE),
    };
    info!("Database: {}", db_path.display());

    let pool = init_database_pool(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let result = import_with_store(args, config, &credentials, &pool).await;

    // Released on every exit path once opened
    pool.close().await;

    result
}

async fn import_with_store(
    args: &Args,
    config: &TomlConfig,
    credentials: &Credentials,
    pool: &SqlitePool,
) -> Result<ImportReport> {
    let endpoints = BattleNetEndpoints::from_config(&config.api);
    let client = BattleNetClient::authenticate(endpoints, credentials).await?;

    let report = import_guild(
        &client,
        pool,
        &config.store.upsert_policy(),
        &args.realm,
        &args.guild,
        &config.api.locale,
    )
    .await?;

    Ok(report)
}
