//! Immediate-mode drawing
//!
//! The overlay never talks to a graphics API directly. Renderers append
//! primitives to a [`DrawList`], which a backend later submits to the GPU
//! (or, in tests, records for inspection).
//!
//! # Architecture
//!
//! - [`DrawList`]: the backend contract (rects, lines, circles, text)
//! - [`Painter`]: thin helpers over a draw list that fold the entity's
//!   opacity into every color and implement centered / multi-colored text
//! - [`CommandBuffer`]: a recording draw list used by tests and the demo
//!
//! # Example
//!
//! ```rust
//! use entity_overlay::color::palette;
//! use entity_overlay::draw::{CommandBuffer, Painter};
//! use glam::Vec2;
//!
//! let mut commands = CommandBuffer::new();
//! let mut painter = Painter::new(&mut commands, 0.5);
//! painter.filled_rect(Vec2::ZERO, Vec2::new(10.0, 4.0), palette::WHITE, 0.0);
//! assert_eq!(commands.len(), 1);
//! ```

pub mod command_buffer;
pub mod painter;

pub use command_buffer::{CommandBuffer, DrawCommand};
pub use painter::{Painter, TextRun, TextStyle};

use crate::color::Rgba;
use glam::Vec2;

/// A 2D immediate-mode primitive sink
///
/// Colors arrive with their final alpha already applied. Implementations
/// only append; they never clear or present.
pub trait DrawList {
    fn filled_rect(&mut self, min: Vec2, max: Vec2, color: Rgba, rounding: f32);

    fn stroke_rect(&mut self, min: Vec2, max: Vec2, color: Rgba, rounding: f32, thickness: f32);

    fn line(&mut self, a: Vec2, b: Vec2, color: Rgba, thickness: f32);

    fn circle(&mut self, center: Vec2, radius: f32, color: Rgba, thickness: f32);

    fn filled_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Draws `text` with its top-left corner at `pos`
    fn text(&mut self, pos: Vec2, text: &str, font_size: f32, color: Rgba);

    /// Measures `text` at `font_size`
    ///
    /// The default uses the bitmap font metrics; backends with real fonts
    /// override it.
    fn text_size(&self, text: &str, font_size: f32) -> Vec2 {
        crate::text::measure_text(text, font_size)
    }
}
