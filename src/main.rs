mod cli;

use stowage::{
    config,
    storage::Backend,
    upgrade::{StorageSchemaUpgrade, TracingProgress, UpgradeError},
};
use stowage_db::{pool::init_pool, store::SqliteRecordStore};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "stowage=trace,stowage_db=debug,stowage_common=debug".to_string()
        } else {
            "stowage=info,stowage_db=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::StorageSchema { dry_run } => upgrade_storage_schema(cli.config.as_deref(), dry_run),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("stowage {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn upgrade_storage_schema(config_path: Option<&std::path::Path>, dry_run: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    // Reject the backend before the database is created or migrated
    let backend = Backend::from_config(&config.storage)
        .with_context(|| format!("Failed to set up {} storage", config.storage.backend_name()))?;
    if let Backend::Unsupported(name) = &backend {
        return Err(UpgradeError::UnsupportedBackend(name.clone()).into());
    }

    if dry_run && !config.database.path.exists() {
        anyhow::bail!("Database not found: {:?}", config.database.path);
    }

    let db_path = config.database.path.to_string_lossy();
    tracing::info!("Opening database at {}", db_path);
    let pool = init_pool(&db_path).context("Failed to open record store")?;
    let store = SqliteRecordStore::new(pool);

    let mut progress = TracingProgress::new();
    let summary = StorageSchemaUpgrade::new(&store, &backend, config.database.batch_size)
        .run(dry_run, &mut progress)?;

    println!("{}", summary);
    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            config::validate_config(&config)?;
            config
        }
    };

    println!("✓ Configuration is valid");
    println!("  Database: {}", config.database.path.display());
    println!("  Batch size: {}", config.database.batch_size);
    println!("  Storage backend: {}", config.storage.backend_name());
    match &config.storage {
        config::StorageConfig::Filesystem { root } => {
            println!("  Storage root: {}", root.display());
        }
        config::StorageConfig::S3(s3) => {
            println!("  Bucket: {}", s3.bucket);
            if let Some(endpoint) = &s3.endpoint {
                println!("  Endpoint: {}", endpoint);
            }
        }
        config::StorageConfig::Fog { .. } => {
            println!("  Note: the fog backend cannot run storage-schema upgrades");
        }
    }

    Ok(())
}
