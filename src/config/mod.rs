mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Parse configuration from TOML text without validating it
pub fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./stowage.toml",
        "./config.toml",
        "~/.config/stowage/config.toml",
        "/etc/stowage/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.database.batch_size == 0 {
        anyhow::bail!("database.batch_size must be greater than 0");
    }

    match &config.storage {
        StorageConfig::Filesystem { root } => {
            if !root.exists() {
                tracing::warn!("Storage root does not exist: {:?}", root);
            }
        }
        StorageConfig::S3(s3) => {
            if s3.bucket.trim().is_empty() {
                anyhow::bail!("S3 storage is selected but no bucket is configured");
            }
        }
        StorageConfig::Fog { .. } => {}
    }

    Ok(())
}
