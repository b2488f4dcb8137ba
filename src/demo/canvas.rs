//! Replays recorded draw commands onto an SDL2 canvas
//!
//! The pipeline records into a [`CommandBuffer`]; this module turns each
//! command into SDL primitives. SDL has no anti-aliased or thick shapes, so
//! thickness is approximated with parallel strokes and rounding is ignored.
//! Text is rasterized from the overlay's own 5x7 glyph table.

use entity_overlay::color::Rgba;
use entity_overlay::draw::{CommandBuffer, DrawCommand};
use entity_overlay::text::{glyph_pattern, pixel_size, GLYPH_ADVANCE};
use glam::Vec2;
use sdl2::pixels::Color;
use sdl2::rect::{Point, Rect};
use sdl2::render::{BlendMode, Canvas};
use sdl2::video::Window;

const CIRCLE_SEGMENTS: usize = 32;

fn sdl_color(color: Rgba) -> Color {
    Color::RGBA(color.r, color.g, color.b, color.a)
}

fn point(v: Vec2) -> Point {
    Point::new(v.x.round() as i32, v.y.round() as i32)
}

fn rect(min: Vec2, max: Vec2) -> Option<Rect> {
    let size = max - min;
    if size.x < 1.0 || size.y < 1.0 {
        return None;
    }
    Some(Rect::new(
        min.x.round() as i32,
        min.y.round() as i32,
        size.x.round() as u32,
        size.y.round() as u32,
    ))
}

/// Strokes beyond the first, for a given thickness
fn extra_strokes(thickness: f32) -> i32 {
    (thickness.round() as i32 - 1).max(0)
}

/// Draws every command in `buffer`, in order
pub fn replay(canvas: &mut Canvas<Window>, buffer: &CommandBuffer) -> Result<(), String> {
    canvas.set_blend_mode(BlendMode::Blend);
    for command in buffer.commands() {
        if command.color().a == 0 {
            continue;
        }
        canvas.set_draw_color(sdl_color(command.color()));
        draw_command(canvas, command)?;
    }
    Ok(())
}

fn draw_command(canvas: &mut Canvas<Window>, command: &DrawCommand) -> Result<(), String> {
    match command {
        DrawCommand::FilledRect { min, max, .. } => {
            if let Some(r) = rect(*min, *max) {
                canvas.fill_rect(r)?;
            }
        }
        DrawCommand::StrokeRect { min, max, thickness, .. } => {
            for inset in 0..=extra_strokes(*thickness) {
                let inset = Vec2::splat(inset as f32);
                if let Some(r) = rect(*min + inset, *max - inset) {
                    canvas.draw_rect(r)?;
                }
            }
        }
        DrawCommand::Line { a, b, thickness, .. } => {
            let direction = (*b - *a).normalize_or_zero();
            let normal = Vec2::new(-direction.y, direction.x);
            let extra = extra_strokes(*thickness);
            for i in 0..=extra {
                let offset = normal * (i as f32 - extra as f32 * 0.5);
                canvas.draw_line(point(*a + offset), point(*b + offset))?;
            }
        }
        DrawCommand::Circle { center, radius, thickness, .. } => {
            for i in 0..=extra_strokes(*thickness) {
                let r = (radius - i as f32).max(0.0);
                let points: Vec<Point> = (0..=CIRCLE_SEGMENTS)
                    .map(|s| {
                        let angle = s as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
                        point(*center + Vec2::new(angle.cos(), angle.sin()) * r)
                    })
                    .collect();
                canvas.draw_lines(points.as_slice())?;
            }
        }
        DrawCommand::FilledCircle { center, radius, .. } => {
            let r = radius.round() as i32;
            for dy in -r..=r {
                let half = ((r * r - dy * dy) as f32).sqrt();
                let y = center.y + dy as f32;
                canvas.draw_line(
                    point(Vec2::new(center.x - half, y)),
                    point(Vec2::new(center.x + half, y)),
                )?;
            }
        }
        DrawCommand::Text { pos, text, font_size, .. } => {
            let pixels = glyph_rects(*pos, text, *font_size);
            if !pixels.is_empty() {
                canvas.fill_rects(&pixels)?;
            }
        }
    }
    Ok(())
}

/// One rect per lit font pixel
fn glyph_rects(pos: Vec2, text: &str, font_size: f32) -> Vec<Rect> {
    let px = pixel_size(font_size);
    let side = px.ceil().max(1.0) as u32;
    let mut rects = Vec::new();

    for (index, c) in text.chars().enumerate() {
        if c == ' ' {
            continue;
        }
        let origin = pos + Vec2::new(index as f32 * GLYPH_ADVANCE * px, 0.0);
        for (row, bits) in glyph_pattern(c).iter().enumerate() {
            for col in 0..5 {
                if bits & (0b10000 >> col) != 0 {
                    let at = origin + Vec2::new(col as f32, row as f32) * px;
                    rects.push(Rect::new(at.x.round() as i32, at.y.round() as i32, side, side));
                }
            }
        }
    }
    rects
}
