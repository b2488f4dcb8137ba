//! Recording draw list
//!
//! [`CommandBuffer`] stores every primitive as a [`DrawCommand`] value. The
//! pipeline tests assert against it, and the demo binary replays it onto an
//! SDL2 canvas once per frame.

use super::DrawList;
use crate::color::Rgba;
use glam::Vec2;

/// One recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FilledRect {
        min: Vec2,
        max: Vec2,
        color: Rgba,
        rounding: f32,
    },
    StrokeRect {
        min: Vec2,
        max: Vec2,
        color: Rgba,
        rounding: f32,
        thickness: f32,
    },
    Line {
        a: Vec2,
        b: Vec2,
        color: Rgba,
        thickness: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
        thickness: f32,
    },
    FilledCircle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Text {
        pos: Vec2,
        text: String,
        font_size: f32,
        color: Rgba,
    },
}

impl DrawCommand {
    /// Color carried by the command
    pub fn color(&self) -> Rgba {
        match self {
            DrawCommand::FilledRect { color, .. }
            | DrawCommand::StrokeRect { color, .. }
            | DrawCommand::Line { color, .. }
            | DrawCommand::Circle { color, .. }
            | DrawCommand::FilledCircle { color, .. }
            | DrawCommand::Text { color, .. } => *color,
        }
    }

    /// Text content, if this is a text command
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawCommand::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// A draw list that records commands instead of rasterizing them
#[derive(Debug, Default, Clone)]
pub struct CommandBuffer {
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        CommandBuffer::default()
    }

    /// Removes all commands, keeping the allocation for the next frame
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// All recorded text strings, in submission order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(DrawCommand::text)
    }

    /// Whether any text command contains `needle`
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    /// Filled rectangles with exactly `color` (ignoring alpha)
    pub fn filled_rects_with_rgb(&self, color: Rgba) -> Vec<(Vec2, Vec2, Rgba)> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FilledRect { min, max, color: c, .. }
                    if (c.r, c.g, c.b) == (color.r, color.g, color.b) =>
                {
                    Some((*min, *max, *c))
                }
                _ => None,
            })
            .collect()
    }
}

impl DrawList for CommandBuffer {
    fn filled_rect(&mut self, min: Vec2, max: Vec2, color: Rgba, rounding: f32) {
        self.commands.push(DrawCommand::FilledRect { min, max, color, rounding });
    }

    fn stroke_rect(&mut self, min: Vec2, max: Vec2, color: Rgba, rounding: f32, thickness: f32) {
        self.commands.push(DrawCommand::StrokeRect { min, max, color, rounding, thickness });
    }

    fn line(&mut self, a: Vec2, b: Vec2, color: Rgba, thickness: f32) {
        self.commands.push(DrawCommand::Line { a, b, color, thickness });
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Rgba, thickness: f32) {
        self.commands.push(DrawCommand::Circle { center, radius, color, thickness });
    }

    fn filled_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FilledCircle { center, radius, color });
    }

    fn text(&mut self, pos: Vec2, text: &str, font_size: f32, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            font_size,
            color,
        });
    }
}
