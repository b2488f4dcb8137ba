//! Player motion trails
//!
//! A trail is the player's recent position history, smoothed with a
//! Catmull-Rom spline and drawn as a polyline that fades with age. History
//! is recorded by the combat store during the frame's update pass; this
//! module only draws it.
//!
//! # Algorithm
//!
//! 1. Split the history wherever two consecutive samples are farther apart
//!    than the teleport threshold
//! 2. Within each run, interpolate 4 points per segment; the neighbours of
//!    the run's ends are the end points themselves
//! 3. Every interpolated point gets an interpolated timestamp and an alpha of
//!    `(1 - age / max_duration)²`; points at or below 0.01 break the line.
//!    Line thickness tapers with the same factor, down to 30 %
//! 4. In analysis mode, teleport gaps are bridged with a dashed connector
//! 5. When the newest sample is recent, a head segment joins it to the
//!    entity's current position
//!
//! A failed projection breaks the polyline rather than skipping the trail.

use crate::color::{palette, Rgba};
use crate::combat::{EntityCombatState, PositionSample};
use crate::draw::Painter;
use crate::entity::EntitySnapshot;
use crate::filter::ComponentPlan;
use crate::render::{FrameContext, VisualProperties};
use crate::settings::TeleportMode;
use glam::{Vec2, Vec3};
use smallvec::SmallVec;
use std::ops::Range;

pub const CATMULL_ROM_SUBDIVISIONS: usize = 4;
pub const TRAIL_FADE_CUTOFF: f32 = 0.01;
/// The head segment is only drawn while the newest sample is this fresh
pub const HEAD_SEGMENT_MAX_AGE_MS: u64 = 150;

/// Thickness of a fully faded segment, as a fraction of the configured one
pub const MIN_TAPER: f32 = 0.3;

pub const CONNECTOR_DASH: f32 = 10.0;
pub const CONNECTOR_GAP: f32 = 5.0;
pub const CONNECTOR_ALPHA: f32 = 0.8;

/// Uniform Catmull-Rom interpolation between `p1` and `p2`
///
/// ```rust
/// use entity_overlay::ui::catmull_rom;
/// use glam::Vec3;
///
/// let (p0, p1, p2, p3) = (Vec3::ZERO, Vec3::X, Vec3::X * 2.0, Vec3::X * 3.0);
/// assert_eq!(catmull_rom(p0, p1, p2, p3, 0.0), p1);
/// assert!((catmull_rom(p0, p1, p2, p3, 0.5) - Vec3::X * 1.5).length() < 1e-5);
/// ```
pub fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Index ranges of the history that contain no teleport
///
/// Each range covers samples whose consecutive distances are all within
/// `threshold` meters.
pub fn split_at_teleports(samples: &[PositionSample], threshold: f32) -> SmallVec<[Range<usize>; 4]> {
    let mut runs = SmallVec::new();
    if samples.is_empty() {
        return runs;
    }
    let mut start = 0;
    for i in 1..samples.len() {
        if samples[i - 1].position.distance(samples[i].position) > threshold {
            runs.push(start..i);
            start = i;
        }
    }
    runs.push(start..samples.len());
    runs
}

/// Alpha for a trail point of the given age
pub fn trail_fade(age_ms: f32, max_duration_ms: u64) -> f32 {
    if max_duration_ms == 0 {
        return 0.0;
    }
    let remaining = (1.0 - age_ms / max_duration_ms as f32).clamp(0.0, 1.0);
    remaining * remaining
}

/// Line thickness for a segment with the given fade
pub fn tapered_thickness(thickness: f32, fade: f32) -> f32 {
    thickness * (MIN_TAPER + (1.0 - MIN_TAPER) * fade.clamp(0.0, 1.0))
}

/// Draws smoothed motion trails
#[derive(Debug, Default)]
pub struct TrailRenderer;

impl TrailRenderer {
    pub fn new() -> Self {
        TrailRenderer
    }

    pub fn render(
        &self,
        painter: &mut Painter<'_>,
        ctx: &FrameContext<'_>,
        entity: &EntitySnapshot,
        props: &VisualProperties,
        plan: &ComponentPlan,
        combat: Option<&EntityCombatState>,
    ) {
        if !plan.trail {
            return;
        }
        let Some(state) = combat else {
            return;
        };
        let settings = &ctx.config.players.trails;
        let samples: SmallVec<[PositionSample; 64]> = state.position_history.iter().copied().collect();
        let Some(newest) = samples.last().copied() else {
            return;
        };

        let color = if entity.is_hostile_player() {
            palette::TRAIL_HOSTILE
        } else {
            props.style.entity_color
        };
        let stroke = TrailStroke {
            color,
            thickness: settings.thickness,
            now_ms: ctx.now_ms,
            max_duration_ms: settings.max_duration_ms,
        };

        let runs = split_at_teleports(&samples, settings.teleport_distance_m);
        for run in &runs {
            stroke.draw_run(painter, ctx, &samples[run.clone()]);
        }

        if settings.teleport_mode == TeleportMode::Analysis {
            for pair in runs.windows(2) {
                let from = samples[pair[0].end - 1].position;
                let to = samples[pair[1].start].position;
                if let (Some(a), Some(b)) = (ctx.projector.project_point(from), ctx.projector.project_point(to)) {
                    painter.faded(CONNECTOR_ALPHA).dashed_line(
                        a,
                        b,
                        palette::TELEPORT_CONNECTOR,
                        settings.thickness,
                        CONNECTOR_DASH,
                        CONNECTOR_GAP,
                    );
                }
            }
        }

        let head_age = ctx.now_ms.saturating_sub(newest.timestamp_ms);
        let head_length = newest.position.distance(entity.position);
        if head_age < HEAD_SEGMENT_MAX_AGE_MS && head_length > 0.0 && head_length <= settings.teleport_distance_m {
            if let (Some(a), Some(b)) = (
                ctx.projector.project_point(newest.position),
                ctx.projector.project_point(entity.position),
            ) {
                let fade = trail_fade(head_age as f32, settings.max_duration_ms);
                painter
                    .faded(fade)
                    .line(a, b, color, tapered_thickness(settings.thickness, fade));
            }
        }
    }
}

/// Per-trail drawing parameters
struct TrailStroke {
    color: Rgba,
    thickness: f32,
    now_ms: u64,
    max_duration_ms: u64,
}

impl TrailStroke {
    fn draw_run(&self, painter: &mut Painter<'_>, ctx: &FrameContext<'_>, run: &[PositionSample]) {
        let mut previous: Option<Vec2> = None;
        for i in 0..run.len().saturating_sub(1) {
            let p1 = run[i];
            let p2 = run[i + 1];
            let p0 = if i > 0 { run[i - 1] } else { p1 };
            let p3 = run.get(i + 2).copied().unwrap_or(p2);

            let first = if i == 0 { 0 } else { 1 };
            for step in first..=CATMULL_ROM_SUBDIVISIONS {
                let t = step as f32 / CATMULL_ROM_SUBDIVISIONS as f32;
                let world = catmull_rom(p0.position, p1.position, p2.position, p3.position, t);
                let timestamp = p1.timestamp_ms as f32 + (p2.timestamp_ms as f32 - p1.timestamp_ms as f32) * t;
                let age = (self.now_ms as f32 - timestamp).max(0.0);
                let fade = trail_fade(age, self.max_duration_ms);
                if fade <= TRAIL_FADE_CUTOFF {
                    previous = None;
                    continue;
                }
                let Some(point) = ctx.projector.project_point(world) else {
                    previous = None;
                    continue;
                };
                if let Some(prev) = previous {
                    painter
                        .faded(fade)
                        .line(prev, point, self.color, tapered_thickness(self.thickness, fade));
                }
                previous = Some(point);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{CommandBuffer, DrawCommand};
    use crate::entity::{Attitude, EntityDetails, PlayerInfo, StableKey};
    use crate::ui::testing::Fixture;

    fn sample(x: f32, timestamp_ms: u64) -> PositionSample {
        PositionSample {
            position: Vec3::new(x, 0.0, -50.0),
            timestamp_ms,
        }
    }

    fn hostile_player(x: f32) -> EntitySnapshot {
        EntitySnapshot::new(
            StableKey(11),
            Vec3::new(x, 0.0, -50.0),
            EntityDetails::Player(PlayerInfo {
                name: "Blink".to_string(),
                attitude: Attitude::Hostile,
                ..Default::default()
            }),
        )
        .with_health(100.0, 100.0)
        .with_distance(50.0)
    }

    fn state_with(entity: &EntitySnapshot, samples: &[PositionSample]) -> EntityCombatState {
        let mut state = EntityCombatState::new(entity, samples[0].timestamp_ms);
        state.position_history.clear();
        for sample in samples {
            state.position_history.push(*sample);
        }
        state
    }

    fn trail_plan() -> ComponentPlan {
        ComponentPlan {
            trail: true,
            ..Default::default()
        }
    }

    fn lines_with_rgb(buffer: &CommandBuffer, rgb: Rgba) -> usize {
        buffer
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { color, .. } if (color.r, color.g, color.b) == (rgb.r, rgb.g, rgb.b)))
            .count()
    }

    fn render(fixture: &Fixture, now_ms: u64, entity: &EntitySnapshot, state: &EntityCombatState) -> CommandBuffer {
        let ctx = fixture.context(now_ms);
        let props = fixture.props(&ctx, entity);
        let mut buffer = CommandBuffer::new();
        let mut painter = Painter::new(&mut buffer, 1.0);
        TrailRenderer::new().render(&mut painter, &ctx, entity, &props, &trail_plan(), Some(state));
        buffer
    }

    #[test]
    fn test_catmull_rom_hits_control_points() {
        let p = [Vec3::ZERO, Vec3::new(1.0, 2.0, 0.0), Vec3::new(3.0, 1.0, 0.0), Vec3::new(4.0, 0.0, 1.0)];
        assert!((catmull_rom(p[0], p[1], p[2], p[3], 0.0) - p[1]).length() < 1e-5);
        assert!((catmull_rom(p[0], p[1], p[2], p[3], 1.0) - p[2]).length() < 1e-5);
    }

    #[test]
    fn test_split_at_teleports() {
        let samples = [sample(0.0, 0), sample(40.0, 100)];
        let runs = split_at_teleports(&samples, 20.0);
        assert_eq!(runs.as_slice(), &[0..1, 1..2]);

        let walk = [sample(0.0, 0), sample(1.0, 100), sample(2.0, 200)];
        assert_eq!(split_at_teleports(&walk, 20.0).as_slice(), &[0..3]);
        assert!(split_at_teleports(&[], 20.0).is_empty());
    }

    #[test]
    fn test_trail_fade() {
        assert_eq!(trail_fade(0.0, 1000), 1.0);
        assert!((trail_fade(500.0, 1000) - 0.25).abs() < 1e-6);
        assert_eq!(trail_fade(1500.0, 1000), 0.0);
    }

    #[test]
    fn test_walking_trail_is_smoothed() {
        let entity = hostile_player(2.0);
        let state = state_with(&entity, &[sample(0.0, 800), sample(1.0, 900), sample(2.0, 1000)]);
        let buffer = render(&Fixture::new(), 1000, &entity, &state);

        // Two segments, four subdivisions each
        assert_eq!(lines_with_rgb(&buffer, palette::TRAIL_HOSTILE), 2 * CATMULL_ROM_SUBDIVISIONS);
    }

    #[test]
    fn test_older_segments_are_thinner() {
        let entity = hostile_player(2.0);
        let state = state_with(&entity, &[sample(0.0, 400), sample(1.0, 700), sample(2.0, 1000)]);
        let buffer = render(&Fixture::new(), 1000, &entity, &state);

        // Lines are emitted oldest first
        let thickness: Vec<f32> = buffer
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { thickness, .. } => Some(*thickness),
                _ => None,
            })
            .collect();
        assert!(thickness.len() > 2);
        assert!(thickness.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(thickness[0] < thickness[thickness.len() - 1]);
        assert!(thickness.iter().all(|&t| t >= 2.0 * MIN_TAPER - 1e-5 && t <= 2.0 + 1e-5));
    }

    #[test]
    fn test_tapered_thickness() {
        assert!((tapered_thickness(2.0, 1.0) - 2.0).abs() < 1e-6);
        assert!((tapered_thickness(2.0, 0.0) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_teleport_gap_is_left_empty_in_tactical_mode() {
        let entity = hostile_player(20.0);
        let state = state_with(&entity, &[sample(-20.0, 900), sample(20.0, 1000)]);
        let buffer = render(&Fixture::new(), 1000, &entity, &state);

        assert_eq!(lines_with_rgb(&buffer, palette::TRAIL_HOSTILE), 0);
        assert_eq!(lines_with_rgb(&buffer, palette::TELEPORT_CONNECTOR), 0);
    }

    #[test]
    fn test_teleport_gap_is_bridged_in_analysis_mode() {
        let mut fixture = Fixture::new();
        fixture.config.players.trails.teleport_mode = TeleportMode::Analysis;
        let entity = hostile_player(20.0);
        let state = state_with(&entity, &[sample(-20.0, 900), sample(20.0, 1000)]);
        let buffer = render(&fixture, 1000, &entity, &state);

        assert_eq!(lines_with_rgb(&buffer, palette::TRAIL_HOSTILE), 0);
        assert!(lines_with_rgb(&buffer, palette::TELEPORT_CONNECTOR) > 1);
    }

    #[test]
    fn test_expired_points_are_not_drawn() {
        let entity = hostile_player(1.0);
        let state = state_with(&entity, &[sample(0.0, 0), sample(1.0, 10)]);
        let buffer = render(&Fixture::new(), 5000, &entity, &state);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_head_segment_follows_current_position() {
        let entity = hostile_player(3.0);
        let state = state_with(&entity, &[sample(2.0, 950)]);
        let buffer = render(&Fixture::new(), 1000, &entity, &state);
        assert_eq!(lines_with_rgb(&buffer, palette::TRAIL_HOSTILE), 1);
    }

    #[test]
    fn test_disabled_by_plan() {
        let fixture = Fixture::new();
        let entity = hostile_player(2.0);
        let state = state_with(&entity, &[sample(0.0, 900), sample(2.0, 1000)]);
        let ctx = fixture.context(1000);
        let props = fixture.props(&ctx, &entity);
        let mut buffer = CommandBuffer::new();
        let mut painter = Painter::new(&mut buffer, 1.0);
        TrailRenderer::new().render(&mut painter, &ctx, &entity, &props, &ComponentPlan::default(), Some(&state));
        assert!(buffer.is_empty());
    }
}
