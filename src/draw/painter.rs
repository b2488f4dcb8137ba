//! Primitive draw helpers
//!
//! A [`Painter`] borrows a [`DrawList`] for the duration of one entity and
//! multiplies every color's alpha by the entity's fade factor before
//! submission. Renderers therefore pass palette colors unchanged and never
//! compute alpha themselves.
//!
//! Nested effects (a bar fading out on death, a floating number fading in)
//! take a scoped painter from [`Painter::faded`], which compounds the
//! factors.

use super::DrawList;
use crate::color::{palette, Rgba};
use glam::Vec2;

/// Offset of the drop shadow under text, in pixels
pub const TEXT_SHADOW_OFFSET: f32 = 1.0;

/// Padding around text when a background is drawn
pub const TEXT_BACKGROUND_PADDING: Vec2 = Vec2::new(4.0, 2.0);

pub const TEXT_BACKGROUND_ROUNDING: f32 = 3.0;

/// How a line of text is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub color: Rgba,
    pub shadow: bool,
    pub background: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            font_size: 16.0,
            color: palette::DEFAULT_TEXT,
            shadow: true,
            background: false,
        }
    }
}

/// A contiguous piece of text with its own color
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub color: Rgba,
}

impl TextRun {
    pub fn new(text: impl Into<String>, color: Rgba) -> Self {
        TextRun {
            text: text.into(),
            color,
        }
    }
}

/// Alpha-applying wrapper around a draw list
pub struct Painter<'a> {
    list: &'a mut dyn DrawList,
    fade: f32,
}

impl<'a> Painter<'a> {
    /// Creates a painter that multiplies every alpha by `fade`
    pub fn new(list: &'a mut dyn DrawList, fade: f32) -> Self {
        Painter {
            list,
            fade: fade.clamp(0.0, 1.0),
        }
    }

    /// The factor applied to every color
    pub fn fade(&self) -> f32 {
        self.fade
    }

    /// A painter for a nested effect, compounding `extra` onto this fade
    pub fn faded(&mut self, extra: f32) -> Painter<'_> {
        Painter {
            list: &mut *self.list,
            fade: (self.fade * extra).clamp(0.0, 1.0),
        }
    }

    /// Applies this painter's fade to a color
    pub fn apply(&self, color: Rgba) -> Rgba {
        color.fade(self.fade)
    }

    pub fn filled_rect(&mut self, min: Vec2, max: Vec2, color: Rgba, rounding: f32) {
        let color = self.apply(color);
        if color.a == 0 {
            return;
        }
        self.list.filled_rect(min, max, color, rounding);
    }

    pub fn stroke_rect(&mut self, min: Vec2, max: Vec2, color: Rgba, rounding: f32, thickness: f32) {
        let color = self.apply(color);
        if color.a == 0 {
            return;
        }
        self.list.stroke_rect(min, max, color, rounding, thickness);
    }

    pub fn line(&mut self, a: Vec2, b: Vec2, color: Rgba, thickness: f32) {
        let color = self.apply(color);
        if color.a == 0 {
            return;
        }
        self.list.line(a, b, color, thickness);
    }

    /// Draws a dashed line from `a` to `b`
    pub fn dashed_line(&mut self, a: Vec2, b: Vec2, color: Rgba, thickness: f32, dash: f32, gap: f32) {
        let length = a.distance(b);
        if length <= f32::EPSILON || dash <= 0.0 {
            return;
        }
        let dir = (b - a) / length;
        let mut travelled = 0.0;
        while travelled < length {
            let end = (travelled + dash).min(length);
            self.line(a + dir * travelled, a + dir * end, color, thickness);
            travelled = end + gap.max(0.0);
        }
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Rgba, thickness: f32) {
        let color = self.apply(color);
        if color.a == 0 || radius <= 0.0 {
            return;
        }
        self.list.circle(center, radius, color, thickness);
    }

    pub fn filled_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let color = self.apply(color);
        if color.a == 0 || radius <= 0.0 {
            return;
        }
        self.list.filled_circle(center, radius, color);
    }

    pub fn text_size(&self, text: &str, font_size: f32) -> Vec2 {
        self.list.text_size(text, font_size)
    }

    /// Draws text with its top-left corner at `pos`, returning its size
    pub fn text_at(&mut self, pos: Vec2, text: &str, style: &TextStyle) -> Vec2 {
        let size = self.list.text_size(text, style.font_size);
        self.decorated_text(pos, size, &[(text, style.color)], style);
        size
    }

    /// Draws text horizontally centered on `pos.x`, top edge at `pos.y`
    ///
    /// Returns the text height so callers can advance a layout cursor.
    pub fn text_centered(&mut self, pos: Vec2, text: &str, style: &TextStyle) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        let size = self.list.text_size(text, style.font_size);
        let top_left = Vec2::new(pos.x - size.x * 0.5, pos.y);
        self.decorated_text(top_left, size, &[(text, style.color)], style);
        size.y
    }

    /// Draws colored runs laid out contiguously and centered as one block
    pub fn text_multicolored(&mut self, pos: Vec2, runs: &[TextRun], style: &TextStyle) -> f32 {
        if runs.is_empty() {
            return 0.0;
        }
        let mut width = 0.0f32;
        let mut height = 0.0f32;
        for run in runs {
            let size = self.list.text_size(&run.text, style.font_size);
            width += size.x;
            height = height.max(size.y);
        }
        let top_left = Vec2::new(pos.x - width * 0.5, pos.y);
        let pieces: smallvec::SmallVec<[(&str, Rgba); 8]> =
            runs.iter().map(|r| (r.text.as_str(), r.color)).collect();
        self.decorated_text(top_left, Vec2::new(width, height), &pieces, style);
        height
    }

    fn decorated_text(&mut self, top_left: Vec2, size: Vec2, pieces: &[(&str, Rgba)], style: &TextStyle) {
        if style.background {
            self.filled_rect(
                top_left - TEXT_BACKGROUND_PADDING,
                top_left + size + TEXT_BACKGROUND_PADDING,
                palette::TEXT_BACKGROUND,
                TEXT_BACKGROUND_ROUNDING,
            );
        }

        let mut x = top_left.x;
        for (text, color) in pieces {
            let width = self.list.text_size(text, style.font_size).x;
            let pos = Vec2::new(x, top_left.y);
            if style.shadow {
                let shadow = self.apply(palette::TEXT_SHADOW);
                if shadow.a > 0 {
                    self.list.text(pos + Vec2::splat(TEXT_SHADOW_OFFSET), text, style.font_size, shadow);
                }
            }
            let color = self.apply(*color);
            if color.a > 0 {
                self.list.text(pos, text, style.font_size, color);
            }
            x += width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{CommandBuffer, DrawCommand};

    fn plain(font_size: f32) -> TextStyle {
        TextStyle {
            font_size,
            color: palette::WHITE,
            shadow: false,
            background: false,
        }
    }

    #[test]
    fn test_alpha_compounding() {
        let mut buffer = CommandBuffer::new();
        {
            // finalAlpha 0.8 already folded with global opacity 0.5
            let mut painter = Painter::new(&mut buffer, 0.8 * 0.5);
            painter.filled_rect(Vec2::ZERO, Vec2::ONE, Rgba::rgba(1, 2, 3, 200), 0.0);
        }
        assert_eq!(buffer.commands()[0].color().a, 80);
    }

    #[test]
    fn test_faded_compounds() {
        let mut buffer = CommandBuffer::new();
        {
            let mut painter = Painter::new(&mut buffer, 0.5);
            let mut inner = painter.faded(0.5);
            inner.line(Vec2::ZERO, Vec2::ONE, palette::WHITE, 1.0);
        }
        assert_eq!(buffer.commands()[0].color().a, 64);
    }

    #[test]
    fn test_fully_transparent_is_skipped() {
        let mut buffer = CommandBuffer::new();
        {
            let mut painter = Painter::new(&mut buffer, 0.0);
            painter.filled_circle(Vec2::ZERO, 3.0, palette::WHITE);
            painter.text_centered(Vec2::ZERO, "x", &plain(14.0));
        }
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_text_centered_geometry() {
        let mut buffer = CommandBuffer::new();
        let height = {
            let mut painter = Painter::new(&mut buffer, 1.0);
            painter.text_centered(Vec2::new(100.0, 50.0), "AB", &plain(14.0))
        };
        assert_eq!(height, 14.0);
        match &buffer.commands()[0] {
            DrawCommand::Text { pos, .. } => assert_eq!(*pos, Vec2::new(89.0, 50.0)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_shadow_and_background_order() {
        let mut buffer = CommandBuffer::new();
        {
            let mut painter = Painter::new(&mut buffer, 1.0);
            let style = TextStyle {
                shadow: true,
                background: true,
                ..plain(14.0)
            };
            painter.text_centered(Vec2::ZERO, "A", &style);
        }
        let commands = buffer.commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], DrawCommand::FilledRect { .. }));
        match (&commands[1], &commands[2]) {
            (DrawCommand::Text { pos: shadow, .. }, DrawCommand::Text { pos: main, .. }) => {
                assert_eq!(*shadow, *main + Vec2::ONE);
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn test_multicolored_runs_are_contiguous() {
        let mut buffer = CommandBuffer::new();
        {
            let mut painter = Painter::new(&mut buffer, 1.0);
            let runs = [
                TextRun::new("AB", palette::RARITY_EXOTIC),
                TextRun::new("C", palette::RARITY_ASCENDED),
            ];
            painter.text_multicolored(Vec2::new(50.0, 0.0), &runs, &plain(7.0));
        }
        let positions: Vec<_> = buffer
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { pos, .. } => Some(pos.x),
                _ => None,
            })
            .collect();
        // widths: "AB" = 11, "C" = 5, total 16 centered on 50
        assert_eq!(positions, vec![42.0, 53.0]);
    }

    #[test]
    fn test_dashed_line_segments() {
        let mut buffer = CommandBuffer::new();
        {
            let mut painter = Painter::new(&mut buffer, 1.0);
            painter.dashed_line(Vec2::ZERO, Vec2::new(30.0, 0.0), palette::WHITE, 1.0, 10.0, 5.0);
        }
        // dashes at 0-10, 15-25, 30-30 is skipped by the loop bound
        assert_eq!(buffer.len(), 2);
    }
}
