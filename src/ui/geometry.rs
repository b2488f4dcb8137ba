//! Box, wireframe, circle and dot
//!
//! The shape layer of an entity's overlay. Everything here is drawn in the
//! entity's own color except the dot on gadgets and attack targets, which is
//! a "natural" white so it reads the same against any attitude color.
//!
//! # Example
//!
//! ```rust,ignore
//! let geometry = GeometryRenderer::new();
//! geometry.render(&mut painter, ctx, entity, &props, &plan);
//! ```

use super::GyroscopicSphere;
use crate::color::{palette, Rgba};
use crate::draw::Painter;
use crate::entity::{EntityKind, EntitySnapshot};
use crate::filter::ComponentPlan;
use crate::projection::BOX_EDGES;
use crate::render::{FrameContext, VisualProperties};
use glam::Vec2;

/// Configuration for shape appearance
#[derive(Debug, Clone)]
pub struct GeometryStyle {
    /// Dark stroke drawn just outside the 2D box
    pub outer_stroke_color: Rgba,
    pub outer_stroke_outset: f32,
    pub outer_stroke_thickness: f32,

    /// Colored dots sit on a dark disc this much larger than the dot
    pub dot_outline_color: Rgba,
    pub dot_inner_ratio: f32,

    /// Natural dots get a drop shadow instead of an outline
    pub natural_dot_color: Rgba,
    pub natural_dot_shadow_offset: f32,
}

impl Default for GeometryStyle {
    fn default() -> Self {
        GeometryStyle {
            outer_stroke_color: palette::OUTER_STROKE,
            outer_stroke_outset: 1.0,
            outer_stroke_thickness: 1.0,
            dot_outline_color: palette::BLACK,
            dot_inner_ratio: 0.8,
            natural_dot_color: palette::WHITE,
            natural_dot_shadow_offset: 1.0,
        }
    }
}

/// Draws the shape layer for one entity
pub struct GeometryRenderer {
    style: GeometryStyle,
    sphere: GyroscopicSphere,
}

impl GeometryRenderer {
    pub fn new() -> Self {
        GeometryRenderer {
            style: GeometryStyle::default(),
            sphere: GyroscopicSphere::new(),
        }
    }

    pub fn with_style(style: GeometryStyle) -> Self {
        GeometryRenderer {
            style,
            sphere: GyroscopicSphere::new(),
        }
    }

    /// Renders box, wireframe, sphere, circle and dot, each behind its plan flag
    pub fn render(
        &self,
        painter: &mut Painter<'_>,
        ctx: &FrameContext<'_>,
        entity: &EntitySnapshot,
        props: &VisualProperties,
        plan: &ComponentPlan,
    ) {
        let color = props.style.entity_color;
        let thickness = props.style.box_thickness;
        let geometry = &props.geometry;

        if plan.render_box {
            self.render_box(painter, geometry.box_min, geometry.box_max, color, thickness);
        }
        if plan.wireframe {
            self.render_wireframe(painter, &geometry.corners, color, thickness);
        }

        let kind = entity.kind();
        if kind.is_object() {
            if plan.sphere {
                self.sphere.render(painter, ctx, entity, props);
            }
            if plan.circle {
                painter.circle(geometry.screen_pos, geometry.circle_radius, color, thickness);
            }
        }

        if plan.dot {
            match kind {
                EntityKind::Gadget | EntityKind::AttackTarget => {
                    self.render_natural_dot(painter, geometry.screen_pos, props.style.dot_radius)
                }
                _ => self.render_colored_dot(painter, geometry.screen_pos, color, props.style.dot_radius),
            }
        }
    }

    /// 2D box with a thin dark stroke just outside it
    pub fn render_box(&self, painter: &mut Painter<'_>, min: Vec2, max: Vec2, color: Rgba, thickness: f32) {
        let outset = Vec2::splat(self.style.outer_stroke_outset);
        let stroke = self.style.outer_stroke_color.fade(color.alpha_f32());
        painter.stroke_rect(min - outset, max + outset, stroke, 0.0, self.style.outer_stroke_thickness);
        painter.stroke_rect(min, max, color, 0.0, thickness);
    }

    /// Twelve AABB edges; an edge is skipped unless both corners projected
    pub fn render_wireframe(&self, painter: &mut Painter<'_>, corners: &[Option<Vec2>; 8], color: Rgba, thickness: f32) {
        for (a, b) in BOX_EDGES {
            if let (Some(a), Some(b)) = (corners[a], corners[b]) {
                painter.line(a, b, color, thickness);
            }
        }
    }

    pub fn render_colored_dot(&self, painter: &mut Painter<'_>, pos: Vec2, color: Rgba, radius: f32) {
        painter.filled_circle(pos, radius, self.style.dot_outline_color);
        painter.filled_circle(pos, radius * self.style.dot_inner_ratio, color);
    }

    pub fn render_natural_dot(&self, painter: &mut Painter<'_>, pos: Vec2, radius: f32) {
        let inner = radius * self.style.dot_inner_ratio;
        let shadow = pos + Vec2::splat(self.style.natural_dot_shadow_offset);
        painter.filled_circle(shadow, inner, self.style.dot_outline_color);
        painter.filled_circle(pos, inner, self.style.natural_dot_color);
    }

    pub fn style(&self) -> &GeometryStyle {
        &self.style
    }
}

impl Default for GeometryRenderer {
    fn default() -> Self {
        Self::new()
    }
}
