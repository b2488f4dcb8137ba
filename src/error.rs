//! Error types
//!
//! Only the edges of the crate can fail: reading and writing settings, and
//! loading a stat catalog. The per-frame pipeline never returns errors; it
//! records a [`SkipReason`] for anything it declines to draw.

use thiserror::Error;

/// Errors from loading or saving the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("settings file version {0} is newer than this build supports")]
    InvalidVersion(u32),

    #[error("no platform config directory available")]
    NoConfigDirectory,
}

/// Errors from loading a stat catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("stat id {0} appears more than once")]
    DuplicateId(u32),
}

/// Why an entity produced no draw commands this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Rejected by kind, attitude, rank, type, rarity or dead-entity rules
    Filtered,
    /// Distance fading brought the entity to zero opacity
    Transparent,
    /// Projection failed: the entity is behind the camera
    BehindCamera,
    /// Projection produced no usable screen geometry
    Degenerate,
    /// Projected bounds do not overlap the viewport
    OffScreen,
    /// The per-frame entity pool was already full
    PoolExhausted,
}
