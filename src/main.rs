//! site-cms server and maintenance commands

use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use site_cms::api::start_server;
use site_cms::content::migrate_collections;
use site_cms::core::config::StorageType;
use site_cms::core::logging::init_logging;
use site_cms::core::{create_app_state, seed_on_boot, Config};
use site_cms::storage::JsonFileStore;
use std::path::Path;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    // Hashing needs neither configuration nor logging
    if let Some(("hash-password", args)) = matches.subcommand() {
        let password = args
            .get_one::<String>("password")
            .context("a password is required")?;
        println!("{}", site_cms::auth::hash_password(password)?);
        return Ok(());
    }

    let config_path = matches.get_one::<String>("config").map(Path::new);
    let mut config = Config::load(config_path).context("Failed to load configuration")?;
    apply_cli_overrides(&mut config, &matches)?;
    config.validate()?;

    init_logging(&config.logging);
    info!("Starting {} v{}", site_cms::NAME, site_cms::VERSION);

    match matches.subcommand() {
        Some(("seed", _)) => seed(config).await,
        Some(("migrate", args)) => {
            let from = args
                .get_one::<String>("from")
                .context("a source directory is required")?;
            migrate(config, Path::new(from)).await
        }
        _ => serve(config).await,
    }
}

fn cli() -> Command {
    Command::new("site-cms")
        .version(site_cms::VERSION)
        .about("Content service for a marketing site.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .global(true)
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("http-addr")
                .long("http-addr")
                .value_name("ADDR")
                .global(true)
                .help("HTTP server bind address"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .global(true)
                .help("Data directory for the JSON file backend"),
        )
        .arg(
            Arg::new("storage-type")
                .long("storage-type")
                .value_name("TYPE")
                .global(true)
                .help("Storage backend type (memory, json_file, mongodb)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .global(true)
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .subcommand(Command::new("serve").about("Run the HTTP server (default)"))
        .subcommand(Command::new("seed").about("Insert default content into empty collections"))
        .subcommand(
            Command::new("migrate")
                .about("Copy every known collection from a JSON data directory into the configured store")
                .arg(
                    Arg::new("from")
                        .long("from")
                        .value_name("DIR")
                        .required(true)
                        .help("Source JSON data directory"),
                ),
        )
        .subcommand(
            Command::new("hash-password")
                .about("Print a bcrypt hash for auth.admin_password_hash")
                .arg(Arg::new("password").value_name("PASSWORD").required(true)),
        )
}

/// Apply command line argument overrides to configuration
fn apply_cli_overrides(config: &mut Config, matches: &ArgMatches) -> anyhow::Result<()> {
    if let Some(addr) = matches.get_one::<String>("http-addr") {
        config.server.http_addr = addr
            .parse()
            .with_context(|| format!("Invalid HTTP address: {}", addr))?;
    }

    if let Some(data_dir) = matches.get_one::<String>("data-dir") {
        config.storage.data_dir = data_dir.into();
    }

    if let Some(level) = matches.get_one::<String>("log-level") {
        config.logging.level = level.clone();
    }

    if let Some(storage_type) = matches.get_one::<String>("storage-type") {
        config.storage.storage_type = storage_type.parse::<StorageType>()?;
    }

    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let state = create_app_state(config)?;
    seed_on_boot(&state).await;

    start_server(state, shutdown_signal()).await?;
    info!("Shutdown complete");
    Ok(())
}

async fn seed(config: Config) -> anyhow::Result<()> {
    let state = create_app_state(config)?;
    let seeded = site_cms::content::seed_defaults(&state.repository).await?;
    if seeded.is_empty() {
        info!("Every collection already has content");
    } else {
        info!(collections = ?seeded, "Seeded default content");
    }
    Ok(())
}

async fn migrate(config: Config, from: &Path) -> anyhow::Result<()> {
    if !from.is_dir() {
        anyhow::bail!("Source directory {:?} does not exist", from);
    }
    if config.storage.storage_type == StorageType::JsonFile && config.storage.data_dir == from {
        anyhow::bail!("Source and target are the same directory");
    }

    let source = JsonFileStore::new(from);
    let state = create_app_state(config)?;
    let report = migrate_collections(&source, state.repository.store().as_ref()).await?;

    for (collection, count) in &report.copied {
        info!(collection = %collection, documents = count, "Migrated");
    }
    for collection in &report.skipped {
        warn!(collection = %collection, "No source data, skipped");
    }
    info!(
        total = report.total_documents(),
        target = %state.repository.store_kind(),
        "Migration complete"
    );
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
    warn!("Shutting down gracefully...");
}
