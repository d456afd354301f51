//! YAML configuration I/O
//!
//! Loading never fails: a missing or unreadable file yields defaults, so the
//! editor can always start. Every loaded value is passed through
//! [`Validate::validate`] before it is handed out.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Configuration types that clamp their own values into supported ranges
pub trait Validate {
    fn validate(&mut self);
}

/// Load configuration from a YAML file
///
/// Missing file: defaults. Unreadable or malformed file: a warning and
/// defaults. The result is always validated.
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default + Validate,
{
    log::info!("load_config: Loading from {:?}", path);

    if !path.exists() {
        log::info!("load_config: Config file doesn't exist, using defaults");
        return T::default();
    }

    let mut config = match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents).unwrap_or_else(|e| {
            log::warn!("load_config: {:#}, using defaults", e);
            T::default()
        }),
        Err(e) => {
            log::warn!(
                "load_config: Failed to read config file: {}, using defaults",
                e
            );
            T::default()
        }
    };
    config.validate();
    config
}

/// Parse and validate configuration from YAML text
pub fn parse_config<T>(yaml: &str) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let mut config: T = serde_yaml::from_str(yaml).context("Failed to parse config")?;
    config.validate();
    Ok(config)
}

/// Save configuration to a YAML file, creating parent directories
pub fn save_config<T>(config: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    log::info!("save_config: Saving to {:?}", path);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    log::info!("save_config: Config saved successfully");
    Ok(())
}
