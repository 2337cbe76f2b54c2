//! Configuration module for switch-album-import.
//!
//! This module handles:
//! - Loading non-credential options from a TOML file
//! - Merging CLI arguments into the loaded configuration
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{default_config_path, Config, HotspotConfig, OptionsConfig};
pub use modes::RestoreMode;
pub use validation::validate_config;
