//! Gyroscopic sphere around objects
//!
//! Three orthogonal rings centered on the object's origin, drawn segment by
//! segment. Each segment is brightened and thickened by how much it faces the
//! camera, and whole rings are drawn back to front, so the sphere reads as a
//! 3D shape without a depth buffer.
//!
//! # Algorithm
//!
//! 1. LOD alpha: 1 up to 80 m of gameplay distance, linear to 0 at 90 m
//! 2. Project every ring point; if any point fails, the sphere is skipped
//! 3. Facing per point: `dot(outward normal, direction to camera)`
//! 4. Per segment, the average facing of its endpoints maps `[-1, 1]` to
//!    brightness `[0.5, 1.0]` and thickness `[0.8, 1.3]`
//! 5. Rings are sorted by average facing, least facing first
//!
//! # Rust Learning Notes
//!
//! The ring templates never change, so they are built once in `new()` and
//! stored as fixed-size arrays; the per-frame work only projects them.

use crate::draw::Painter;
use crate::entity::EntitySnapshot;
use crate::render::{FrameContext, VisualProperties};
use glam::{Vec2, Vec3};
use smallvec::SmallVec;
use std::f32::consts::TAU;

pub const RING_POINTS: usize = 16;
/// Radius of the vertical rings in meters
pub const VERTICAL_RADIUS: f32 = 0.35;
pub const HORIZONTAL_RADIUS_RATIO: f32 = 0.9;

pub const LOD_TRANSITION_START: f32 = 80.0;
pub const LOD_TRANSITION_END: f32 = 90.0;

pub const BASE_THICKNESS: f32 = 2.5;
pub const MIN_THICKNESS: f32 = 1.0;
pub const MAX_THICKNESS: f32 = 5.0;

pub const DEPTH_BRIGHTNESS_MIN: f32 = 0.5;
pub const DEPTH_BRIGHTNESS_MAX: f32 = 1.0;
pub const DEPTH_THICKNESS_MIN: f32 = 0.8;
pub const DEPTH_THICKNESS_MAX: f32 = 1.3;

type Ring = [Vec3; RING_POINTS];

/// One ring after projection
struct ProjectedRing {
    points: [Vec2; RING_POINTS],
    facing: [f32; RING_POINTS],
    average_facing: f32,
}

/// Draws the three-ring sphere
pub struct GyroscopicSphere {
    rings: [Ring; 3],
}

impl GyroscopicSphere {
    pub fn new() -> Self {
        let horizontal = VERTICAL_RADIUS * HORIZONTAL_RADIUS_RATIO;
        let mut flat = [Vec3::ZERO; RING_POINTS];
        let mut front = [Vec3::ZERO; RING_POINTS];
        let mut side = [Vec3::ZERO; RING_POINTS];
        for i in 0..RING_POINTS {
            let angle = TAU * i as f32 / RING_POINTS as f32;
            let (s, c) = angle.sin_cos();
            flat[i] = Vec3::new(c * horizontal, 0.0, s * horizontal);
            front[i] = Vec3::new(c * VERTICAL_RADIUS, s * VERTICAL_RADIUS, 0.0);
            side[i] = Vec3::new(0.0, c * VERTICAL_RADIUS, s * VERTICAL_RADIUS);
        }
        GyroscopicSphere {
            rings: [flat, front, side],
        }
    }

    /// Alpha multiplier for the sphere at a gameplay distance
    pub fn lod_alpha(gameplay_distance: f32) -> f32 {
        if gameplay_distance <= LOD_TRANSITION_START {
            return 1.0;
        }
        let progress = (gameplay_distance - LOD_TRANSITION_START) / (LOD_TRANSITION_END - LOD_TRANSITION_START);
        1.0 - progress.clamp(0.0, 1.0)
    }

    /// Line thickness at a distance scale
    pub fn thickness(scale: f32) -> f32 {
        (BASE_THICKNESS * scale).clamp(MIN_THICKNESS, MAX_THICKNESS)
    }

    pub fn render(
        &self,
        painter: &mut Painter<'_>,
        ctx: &FrameContext<'_>,
        entity: &EntitySnapshot,
        props: &VisualProperties,
    ) {
        let lod = Self::lod_alpha(entity.gameplay_distance);
        if lod <= 0.0 {
            return;
        }

        let mut projected: SmallVec<[ProjectedRing; 3]> = SmallVec::new();
        for ring in &self.rings {
            match self.project_ring(ctx, entity.position, ring) {
                Some(ring) => projected.push(ring),
                None => return,
            }
        }
        projected.sort_by(|a, b| a.average_facing.total_cmp(&b.average_facing));

        let base = props.style.entity_color;
        let thickness = Self::thickness(props.style.scale);
        let mut painter = painter.faded(lod);
        for ring in &projected {
            for i in 0..RING_POINTS {
                let next = (i + 1) % RING_POINTS;
                let facing = ((ring.facing[i] + ring.facing[next]) * 0.5 + 1.0) * 0.5;
                let facing = facing.clamp(0.0, 1.0);
                let brightness = DEPTH_BRIGHTNESS_MIN + (DEPTH_BRIGHTNESS_MAX - DEPTH_BRIGHTNESS_MIN) * facing;
                let width = DEPTH_THICKNESS_MIN + (DEPTH_THICKNESS_MAX - DEPTH_THICKNESS_MIN) * facing;
                painter.line(ring.points[i], ring.points[next], base.scale_rgb(brightness), thickness * width);
            }
        }
    }

    fn project_ring(&self, ctx: &FrameContext<'_>, center: Vec3, ring: &Ring) -> Option<ProjectedRing> {
        let mut points = [Vec2::ZERO; RING_POINTS];
        let mut facing = [0.0; RING_POINTS];
        for (i, local) in ring.iter().enumerate() {
            let world = center + *local;
            points[i] = ctx.projector.project_point(world)?;
            let to_camera = (ctx.camera.position - world).normalize_or_zero();
            facing[i] = local.normalize_or_zero().dot(to_camera);
        }
        let average_facing = facing.iter().sum::<f32>() / RING_POINTS as f32;
        Some(ProjectedRing {
            points,
            facing,
            average_facing,
        })
    }
}

impl Default for GyroscopicSphere {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{CommandBuffer, DrawCommand};
    use crate::entity::{EntityDetails, GadgetInfo, StableKey};
    use crate::ui::testing::Fixture;

    fn gadget_at(z: f32, distance: f32) -> EntitySnapshot {
        EntitySnapshot::new(StableKey(9), Vec3::new(0.0, 0.0, z), EntityDetails::Gadget(GadgetInfo::default()))
            .with_distance(distance)
    }

    #[test]
    fn test_lod_alpha() {
        assert_eq!(GyroscopicSphere::lod_alpha(10.0), 1.0);
        assert!((GyroscopicSphere::lod_alpha(85.0) - 0.5).abs() < 1e-5);
        assert_eq!(GyroscopicSphere::lod_alpha(95.0), 0.0);
    }

    #[test]
    fn test_thickness_is_clamped() {
        assert_eq!(GyroscopicSphere::thickness(0.1), MIN_THICKNESS);
        assert_eq!(GyroscopicSphere::thickness(1.0), 2.5);
        assert_eq!(GyroscopicSphere::thickness(10.0), MAX_THICKNESS);
    }

    #[test]
    fn test_draws_three_rings() {
        let fixture = Fixture::new();
        let ctx = fixture.context(0);
        let entity = gadget_at(-5.0, 5.0);
        let props = fixture.props(&ctx, &entity);

        let mut buffer = CommandBuffer::new();
        let mut painter = Painter::new(&mut buffer, 1.0);
        GyroscopicSphere::new().render(&mut painter, &ctx, &entity, &props);

        assert_eq!(buffer.len(), 3 * RING_POINTS);
        assert!(buffer.commands().iter().all(|c| matches!(c, DrawCommand::Line { .. })));
    }

    #[test]
    fn test_back_segments_are_dimmer() {
        let fixture = Fixture::new();
        let ctx = fixture.context(0);
        let entity = gadget_at(-5.0, 5.0);
        let props = fixture.props(&ctx, &entity);

        let mut buffer = CommandBuffer::new();
        let mut painter = Painter::new(&mut buffer, 1.0);
        GyroscopicSphere::new().render(&mut painter, &ctx, &entity, &props);

        let widths: Vec<f32> = buffer
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { thickness, .. } => Some(*thickness),
                _ => None,
            })
            .collect();
        let min = widths.iter().cloned().fold(f32::MAX, f32::min);
        let max = widths.iter().cloned().fold(f32::MIN, f32::max);
        assert!(max > min);
    }

    #[test]
    fn test_skipped_when_a_point_fails() {
        let fixture = Fixture::new();
        let ctx = fixture.context(0);
        // Straddling the camera plane: some ring points are behind the camera
        let entity = gadget_at(0.0, 1.0);
        let props = fixture.props_unchecked(&entity);

        let mut buffer = CommandBuffer::new();
        let mut painter = Painter::new(&mut buffer, 1.0);
        GyroscopicSphere::new().render(&mut painter, &ctx, &entity, &props);
        assert!(buffer.is_empty());
    }
}
