//! Standard locations for Supercut configuration

use std::path::PathBuf;

/// Directory holding Supercut configuration
///
/// Returns: `~/.config/supercut` (platform config dir), falling back to
/// `./supercut` when no config dir is known.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("supercut")
}

/// Path of a named config file inside [`default_config_dir`]
pub fn default_config_path(filename: &str) -> PathBuf {
    default_config_dir().join(filename)
}
