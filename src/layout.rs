//! Layout cursor for stacking components around an entity
//!
//! Every entity gets one [`LayoutCursor`] anchored at the bottom-center of
//! its box (or at its screen position when it has none). Renderers ask the
//! cursor where to draw and then advance it by what they drew, so bars, text
//! and details stack without knowing about each other.
//!
//! # Example
//!
//! ```rust
//! use entity_overlay::layout::{LayoutCursor, StackDirection};
//! use glam::Vec2;
//!
//! let mut cursor = LayoutCursor::new(Vec2::new(100.0, 200.0), StackDirection::Down);
//! // Region margin before the first element
//! assert_eq!(cursor.position(), Vec2::new(100.0, 208.0));
//!
//! let bar = cursor.top_left_for_bar(60.0, 7.0);
//! assert_eq!(bar, Vec2::new(70.0, 208.0));
//! cursor.advance(7.0);
//! assert_eq!(cursor.position().y, 219.0);
//! ```

use glam::Vec2;

/// Gap between the anchor and the first element
pub const REGION_MARGIN: f32 = 8.0;

/// Gap between consecutive elements
pub const ELEMENT_MARGIN: f32 = 4.0;

/// Spacing between consecutive detail lines
pub const DETAIL_LINE_SPACING: f32 = 2.0;

/// Which way the stack grows on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackDirection {
    /// Elements stack below the anchor (+y)
    Down,
    /// Elements stack above the anchor (-y)
    Up,
}

impl StackDirection {
    fn sign(self) -> f32 {
        match self {
            StackDirection::Down => 1.0,
            StackDirection::Up => -1.0,
        }
    }
}

/// A directional anchor that hands out positions for stacked elements
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    anchor: Vec2,
    offset: f32,
    direction: StackDirection,
    spacing: f32,
}

impl LayoutCursor {
    /// Creates a cursor with the region margin already applied
    pub fn new(anchor: Vec2, direction: StackDirection) -> Self {
        Self::with_spacing(anchor, direction, REGION_MARGIN, ELEMENT_MARGIN)
    }

    /// Creates a cursor with explicit margins
    pub fn with_spacing(anchor: Vec2, direction: StackDirection, region_margin: f32, spacing: f32) -> Self {
        LayoutCursor {
            anchor,
            offset: region_margin * direction.sign(),
            direction,
            spacing,
        }
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn direction(&self) -> StackDirection {
        self.direction
    }

    /// Current draw position: anchor plus the accumulated offset
    pub fn position(&self) -> Vec2 {
        self.anchor + Vec2::new(0.0, self.offset)
    }

    /// Moves past an element of height `h` plus the element spacing
    pub fn advance(&mut self, h: f32) {
        self.offset += (h + self.spacing) * self.direction.sign();
    }

    /// Moves past an element of height `h` using a custom spacing
    pub fn advance_with_spacing(&mut self, h: f32, spacing: f32) {
        self.offset += (h + spacing) * self.direction.sign();
    }

    /// Top-left corner for a `w`×`h` bar centered on the anchor
    ///
    /// Growing up, the bar's bottom edge sits at the cursor.
    pub fn top_left_for_bar(&self, w: f32, h: f32) -> Vec2 {
        let y = match self.direction {
            StackDirection::Down => self.anchor.y + self.offset,
            StackDirection::Up => self.anchor.y + self.offset - h,
        };
        Vec2::new(self.anchor.x - w * 0.5, y)
    }

    /// Top edge for a text line of height `h` at the cursor
    pub fn top_for_line(&self, h: f32) -> Vec2 {
        let pos = self.position();
        match self.direction {
            StackDirection::Down => pos,
            StackDirection::Up => Vec2::new(pos.x, pos.y - h),
        }
    }
}
