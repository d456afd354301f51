//! Editor configuration
//!
//! - Generic YAML config loading/saving with validation
//! - Config path utilities
//! - [`EditorConfig`] and its sections
//!
//! # Usage
//!
//! ```ignore
//! use supercut_core::config::{default_config_path, load_config, save_config, EditorConfig, CONFIG_FILENAME};
//!
//! let path = default_config_path(CONFIG_FILENAME);
//! let config: EditorConfig = load_config(&path);
//! save_config(&config, &path)?;
//! ```

mod editor;
mod io;
mod paths;

pub use editor::{EditorConfig, InteractionConfig, PlaybackConfig, SilenceConfig, TimecodeConfig};
pub use io::{load_config, parse_config, save_config, Validate};
pub use paths::{default_config_dir, default_config_path};

/// File name of the editor configuration
pub const CONFIG_FILENAME: &str = "config.yaml";
