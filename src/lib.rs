//! Entity overlay
//!
//! Draws per-entity visual overlays (boxes, names, health bars, combat
//! numbers, details and motion trails) on top of a 3D game view from
//! per-frame entity snapshots.
//!
//! # Architecture
//!
//! - [`render::FramePipeline`] drives a frame: filter, style, project,
//!   animate and draw every entity in kind order
//! - [`combat`] tracks health changes across frames and turns them into
//!   damage/heal events, bursts and deaths
//! - [`animation`] converts combat state into per-frame animation values
//! - [`ui`] holds the stateless component renderers
//! - [`draw`] is the immediate-mode sink renderers append primitives to
//! - [`settings`] is the serde configuration tree and its JSON persistence
//!
//! The library has no windowing dependency. The `overlay-demo` binary
//! (feature `demo`) replays the recorded draw list onto an SDL2 canvas.

pub mod animation;
pub mod color;
pub mod combat;
pub mod draw;
pub mod entity;
pub mod error;
pub mod far_plane;
pub mod filter;
pub mod gear;
pub mod layout;
pub mod projection;
pub mod render;
pub mod settings;
pub mod sources;
pub mod stats;
pub mod style;
pub mod text;
pub mod ui;

pub use error::{CatalogError, SettingsError, SkipReason};
pub use render::{FrameContext, FramePipeline, FrameStats, VisualProperties};
