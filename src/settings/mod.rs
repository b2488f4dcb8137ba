//! Settings for the overlay
//!
//! This module provides the configuration snapshot and its persistence:
//! - JSON settings file (human-readable, hand-editable)
//! - Every field optional on disk; missing fields take defaults
//! - Versioned so newer files are refused rather than misread
//!
//! # Architecture
//!
//! - `types`: the [`Config`] tree and its per-kind defaults
//! - `manager`: [`SettingsManager`] for file operations
//!
//! # Example Usage
//!
//! ```ignore
//! let manager = SettingsManager::in_config_dir()?;
//! let mut config = manager.load()?;
//! config.players.components.render_box = true;
//! manager.save(&config)?;
//! ```

pub mod manager;
pub mod types;

pub use manager::{SettingsFile, SettingsManager, CURRENT_SETTINGS_VERSION};
pub use types::*;
