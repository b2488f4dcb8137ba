//! External inputs to the pipeline
//!
//! The overlay never reads game memory or a graphics API itself. A host
//! supplies each frame's inputs through these traits, and
//! [`FramePipeline`](crate::render::FramePipeline) consumes whatever they
//! return.
//!
//! - [`SnapshotSource`]: the frame's entities
//! - [`CameraSource`]: the frame's camera
//! - [`Clock`]: a non-decreasing millisecond counter
//!
//! # Example
//!
//! ```rust
//! use entity_overlay::sources::{Clock, ManualClock};
//!
//! let clock = ManualClock::new(1000);
//! clock.advance(16);
//! assert_eq!(clock.now_ms(), 1016);
//! ```

use crate::entity::EntitySnapshot;
use crate::projection::Camera;
use std::cell::Cell;
use std::time::Instant;

/// Delivers the entities visible this frame
///
/// Snapshots must be self-consistent within a frame, and a stable key must
/// keep naming the same logical entity across frames while it exists.
pub trait SnapshotSource {
    /// Replaces the contents of `out` with this frame's snapshots
    fn fill_frame(&mut self, now_ms: u64, out: &mut Vec<EntitySnapshot>);
}

/// Delivers the camera for this frame
pub trait CameraSource {
    /// `None` when no camera is available; the frame is then skipped
    fn camera(&mut self, now_ms: u64) -> Option<Camera>;
}

/// A monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Milliseconds since the clock was created
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// A clock that only moves when told to, for tests and replays
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        ManualClock { now: Cell::new(start_ms) }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    /// Moves the clock to `ms`; earlier times are ignored
    pub fn set(&self, ms: u64) {
        self.now.set(self.now.get().max(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Serves a fixed list of snapshots every frame
impl SnapshotSource for Vec<EntitySnapshot> {
    fn fill_frame(&mut self, _now_ms: u64, out: &mut Vec<EntitySnapshot>) {
        out.clear();
        out.extend(self.iter().cloned());
    }
}

/// A camera that never moves
impl CameraSource for Camera {
    fn camera(&mut self, _now_ms: u64) -> Option<Camera> {
        Some(*self)
    }
}
