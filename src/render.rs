//! Frame pipeline
//!
//! [`FramePipeline`] turns one frame's entity snapshots into draw commands.
//! It owns everything that must outlive a frame: the combat state store, the
//! adaptive far plane, the stat catalog and the reusable per-frame buffers.
//!
//! # Architecture
//!
//! Each frame runs in a fixed order:
//!
//! 1. Cap the snapshot list at the configured pool size; overflow is dropped
//! 2. Order entities by kind (players, NPCs, gadgets, attack targets, items)
//!    with a stable sort, so equal kinds keep the source order
//! 3. Feed gadget distances to the adaptive far plane
//! 4. Run the combat update pass for every entity
//! 5. Per entity: filter, style, project, animate, then draw the components
//!    stacked under a [`LayoutCursor`]
//! 6. Evict combat state for entities not seen within the TTL
//!
//! The update pass runs before any filtering so that a death or burst
//! observed this frame is already visible to the dead-entity and
//! attack-target rules.
//!
//! # Example
//!
//! ```rust
//! use entity_overlay::draw::CommandBuffer;
//! use entity_overlay::entity::{EntityDetails, EntitySnapshot, PlayerInfo, StableKey};
//! use entity_overlay::projection::Camera;
//! use entity_overlay::render::FramePipeline;
//! use entity_overlay::settings::Config;
//! use glam::{Vec2, Vec3};
//!
//! let camera = Camera::look_at(Vec3::ZERO, Vec3::NEG_Z, 1.0, 16.0 / 9.0, 0.1, 5000.0);
//! let player = EntitySnapshot::new(
//!     StableKey(1),
//!     Vec3::new(0.0, 0.0, -10.0),
//!     EntityDetails::Player(PlayerInfo { name: "Logan".into(), ..Default::default() }),
//! )
//! .with_health(100.0, 100.0)
//! .with_distance(10.0);
//!
//! let mut pipeline = FramePipeline::new();
//! let mut commands = CommandBuffer::new();
//! let stats = pipeline.render_frame(
//!     &[player],
//!     &camera,
//!     Vec2::new(1600.0, 900.0),
//!     &Config::default(),
//!     0,
//!     &mut commands,
//! );
//! assert_eq!(stats.rendered, 1);
//! assert!(commands.contains_text("Logan"));
//! ```
//!
//! # Rust Learning Notes
//!
//! `FrameContext` borrows the config, camera and catalog for exactly one
//! frame. Because it only holds shared references, renderers can read it
//! freely while the pipeline still owns the combat store.

use crate::animation::{HealthBarAnimationState, HealthBarAnimator};
use crate::combat::CombatStateStore;
use crate::draw::{DrawList, Painter};
use crate::entity::{Attitude, EntityKind, EntitySnapshot};
use crate::error::SkipReason;
use crate::far_plane::AdaptiveFarPlane;
use crate::filter::EntityFilter;
use crate::gear::StatCatalog;
use crate::layout::{LayoutCursor, StackDirection};
use crate::projection::{Camera, EntityGeometry, ScreenProjector};
use crate::settings::Config;
use crate::style::{StyleCalculator, VisualStyle};
use crate::ui::{DetailsPanel, FloatingText, GeometryRenderer, HealthBar, IdentityLine, TrailRenderer};
use glam::Vec2;
use tracing::{trace, warn};

/// Style and screen geometry for one entity this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualProperties {
    pub style: VisualStyle,
    pub geometry: EntityGeometry,
}

/// Read-only inputs shared by every renderer during one frame
pub struct FrameContext<'a> {
    pub config: &'a Config,
    pub camera: &'a Camera,
    pub projector: ScreenProjector,
    pub viewport: Vec2,
    pub now_ms: u64,
    /// Adaptive far plane in meters
    pub far_plane: f32,
    pub catalog: &'a StatCatalog,
}

impl<'a> FrameContext<'a> {
    pub fn new(
        config: &'a Config,
        camera: &'a Camera,
        viewport: Vec2,
        now_ms: u64,
        far_plane: f32,
        catalog: &'a StatCatalog,
    ) -> Self {
        FrameContext {
            config,
            camera,
            projector: ScreenProjector::new(camera, viewport),
            viewport,
            now_ms,
            far_plane,
            catalog,
        }
    }
}

/// Per-frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub submitted: usize,
    pub rendered: usize,
    pub filtered: usize,
    pub transparent: usize,
    pub behind_camera: usize,
    pub degenerate: usize,
    pub off_screen: usize,
    /// Entities beyond the pool capacity
    pub dropped: usize,
    pub evicted: usize,
}

impl FrameStats {
    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Filtered => self.filtered += 1,
            SkipReason::Transparent => self.transparent += 1,
            SkipReason::BehindCamera => self.behind_camera += 1,
            SkipReason::Degenerate => self.degenerate += 1,
            SkipReason::OffScreen => self.off_screen += 1,
            SkipReason::PoolExhausted => self.dropped += 1,
        }
    }

    /// Entities that made it past the pool but drew nothing
    pub fn skipped(&self) -> usize {
        self.filtered + self.transparent + self.behind_camera + self.degenerate + self.off_screen
    }

    /// Entities skipped for geometric reasons
    pub fn culled(&self) -> usize {
        self.behind_camera + self.degenerate + self.off_screen
    }
}

/// Non-hostile NPC bars collapse completely once idle
fn hides_when_idle(entity: &EntitySnapshot) -> bool {
    entity.kind() == EntityKind::Npc && entity.attitude() != Attitude::Hostile
}

/// The per-frame entity visualization pipeline
pub struct FramePipeline {
    combat: CombatStateStore,
    far_plane: AdaptiveFarPlane,
    catalog: StatCatalog,
    /// Reused render order, indices into the frame's snapshots
    order: Vec<usize>,
    /// Latest frame time seen; earlier times are clamped to it
    last_now_ms: u64,

    geometry: GeometryRenderer,
    identity: IdentityLine,
    health_bar: HealthBar,
    floating_text: FloatingText,
    details: DetailsPanel,
    trail: TrailRenderer,
}

impl FramePipeline {
    pub fn new() -> Self {
        Self::with_catalog(StatCatalog::builtin())
    }

    /// A pipeline that names gear stats from `catalog`
    pub fn with_catalog(catalog: StatCatalog) -> Self {
        FramePipeline {
            combat: CombatStateStore::new(),
            far_plane: AdaptiveFarPlane::new(),
            catalog,
            order: Vec::new(),
            last_now_ms: 0,
            geometry: GeometryRenderer::new(),
            identity: IdentityLine::new(),
            health_bar: HealthBar::new(),
            floating_text: FloatingText::new(),
            details: DetailsPanel::new(),
            trail: TrailRenderer::new(),
        }
    }

    pub fn combat(&self) -> &CombatStateStore {
        &self.combat
    }

    pub fn far_plane(&self) -> f32 {
        self.far_plane.current()
    }

    pub fn catalog(&self) -> &StatCatalog {
        &self.catalog
    }

    /// Forgets all cross-frame state (e.g. after a map change)
    pub fn reset(&mut self) {
        self.combat.clear();
        self.far_plane.reset();
    }

    /// Renders one frame into `draw_list`
    pub fn render_frame(
        &mut self,
        snapshots: &[EntitySnapshot],
        camera: &Camera,
        viewport: Vec2,
        config: &Config,
        now_ms: u64,
        draw_list: &mut dyn DrawList,
    ) -> FrameStats {
        // A clock that steps back freezes animations instead of rewinding them
        let now_ms = now_ms.max(self.last_now_ms);
        self.last_now_ms = now_ms;

        let mut stats = FrameStats {
            submitted: snapshots.len(),
            ..Default::default()
        };

        let capacity = config.pipeline.max_entities_per_frame;
        let accepted = &snapshots[..snapshots.len().min(capacity)];
        if accepted.len() < snapshots.len() {
            let dropped = snapshots.len() - accepted.len();
            stats.dropped = dropped;
            warn!(dropped, capacity, "entity pool exhausted, dropping overflow");
        }

        let mut order = std::mem::take(&mut self.order);
        order.clear();
        order.extend(0..accepted.len());
        order.sort_by_key(|&index| accepted[index].kind());

        let far_plane = self.far_plane.update(
            now_ms,
            accepted
                .iter()
                .filter(|entity| entity.kind() == EntityKind::Gadget)
                .map(|entity| entity.gameplay_distance),
        );

        for entity in accepted {
            self.combat.update(entity, now_ms, config);
        }

        let ctx = FrameContext::new(config, camera, viewport, now_ms, far_plane, &self.catalog);
        for &index in &order {
            match self.render_entity(&ctx, &accepted[index], &mut *draw_list) {
                Ok(()) => stats.rendered += 1,
                Err(reason) => stats.record_skip(reason),
            }
        }
        self.order = order;

        stats.evicted = self.combat.evict_stale(now_ms, config.combat.state_ttl_ms);
        trace!(
            rendered = stats.rendered,
            culled = stats.culled(),
            filtered = stats.filtered,
            transparent = stats.transparent,
            dropped = stats.dropped,
            evicted = stats.evicted,
            "frame complete"
        );
        stats
    }

    fn render_entity(
        &self,
        ctx: &FrameContext<'_>,
        entity: &EntitySnapshot,
        draw_list: &mut dyn DrawList,
    ) -> Result<(), SkipReason> {
        let now_ms = ctx.now_ms;
        let combat = self.combat.get(entity.key);
        let filter = EntityFilter::new(ctx.config);
        if !filter.should_render(entity, combat, now_ms) {
            return Err(SkipReason::Filtered);
        }

        let style = StyleCalculator::new(ctx.config, ctx.far_plane).calculate(entity)?;
        let geometry = ctx.projector.project_entity(entity, style.scale, ctx.config)?;
        if !geometry.is_on_screen {
            return Err(SkipReason::OffScreen);
        }
        let props = VisualProperties { style, geometry };
        let plan = filter.plan(entity, combat, now_ms);

        let anim = match combat {
            Some(state) => HealthBarAnimator::new(&ctx.config.combat).animate(
                state,
                entity.health,
                hides_when_idle(entity),
                now_ms,
            ),
            None => HealthBarAnimationState::default(),
        };

        let anchor = if entity.kind().is_object() && !geometry.has_projected_box {
            geometry.screen_pos
        } else {
            Vec2::new(geometry.center.x, geometry.box_max.y)
        };
        let mut cursor = LayoutCursor::new(anchor, StackDirection::Down);
        let mut painter = Painter::new(draw_list, style.final_alpha);

        self.geometry.render(&mut painter, ctx, entity, &props, &plan);
        self.identity.render(&mut painter, ctx, entity, &props, &plan, &mut cursor);
        let bar = self.health_bar.render(&mut painter, entity, &props, &plan, &anim, &mut cursor);
        if plan.combat_ui {
            let burst_dps = combat.map_or(0.0, |state| state.burst_dps(now_ms));
            self.floating_text
                .render(&mut painter, ctx, &props, &plan, &anim, burst_dps, bar.as_ref());
        }
        self.health_bar
            .render_energy(&mut painter, ctx, entity, &props, &plan, &mut cursor);
        self.details.render(&mut painter, ctx, entity, &props, &plan, &mut cursor);
        self.trail.render(&mut painter, ctx, entity, &props, &plan, combat);
        Ok(())
    }
}

impl Default for FramePipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette;
    use crate::combat::LifeState;
    use crate::draw::{CommandBuffer, DrawCommand};
    use crate::entity::{EntityDetails, ItemInfo, NpcInfo, PlayerInfo, StableKey};
    use crate::settings::TeleportMode;
    use glam::Vec3;

    const VIEWPORT: Vec2 = Vec2::new(1920.0, 1080.0);

    fn camera() -> Camera {
        Camera::look_at(Vec3::ZERO, Vec3::NEG_Z, 60f32.to_radians(), VIEWPORT.x / VIEWPORT.y, 0.1, 5000.0)
    }

    fn player(key: u64, name: &str, attitude: Attitude, position: Vec3) -> EntitySnapshot {
        EntitySnapshot::new(
            StableKey(key),
            position,
            EntityDetails::Player(PlayerInfo {
                name: name.to_string(),
                attitude,
                ..Default::default()
            }),
        )
        .with_health(100.0, 100.0)
        .with_distance(position.length())
    }

    fn npc(health: f32) -> EntitySnapshot {
        EntitySnapshot::new(
            StableKey(2),
            Vec3::new(0.0, 0.0, -10.0),
            EntityDetails::Npc(NpcInfo {
                name: "Risen Grub".to_string(),
                attitude: Attitude::Hostile,
                ..Default::default()
            }),
        )
        .with_health(health, 1000.0)
        .with_distance(10.0)
    }

    struct Harness {
        pipeline: FramePipeline,
        camera: Camera,
        config: Config,
    }

    impl Harness {
        fn new() -> Self {
            Harness {
                pipeline: FramePipeline::new(),
                camera: camera(),
                config: Config::default(),
            }
        }

        fn frame(&mut self, snapshots: &[EntitySnapshot], now_ms: u64) -> (CommandBuffer, FrameStats) {
            let mut buffer = CommandBuffer::new();
            let stats =
                self.pipeline
                    .render_frame(snapshots, &self.camera, VIEWPORT, &self.config, now_ms, &mut buffer);
            (buffer, stats)
        }
    }

    fn width(rect: &(Vec2, Vec2, crate::color::Rgba)) -> f32 {
        rect.1.x - rect.0.x
    }

    #[test]
    fn test_full_health_bar_hidden_when_only_damaged() {
        let mut harness = Harness::new();
        harness.config.players.components.show_only_damaged = true;
        harness.config.players.components.render_dot = true;

        let entity = player(1, "Marjory", Attitude::Friendly, Vec3::new(0.0, 0.0, -10.0));
        let (buffer, stats) = harness.frame(&[entity], 0);

        assert_eq!(stats.rendered, 1);
        assert!(buffer.filled_rects_with_rgb(palette::BAR_BACKGROUND).is_empty());
        assert!(buffer.contains_text("Marjory"));
        assert!(buffer
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::FilledCircle { .. })));
    }

    #[test]
    fn test_damage_burst() {
        let mut harness = Harness::new();
        harness.frame(&[npc(1000.0)], 0);
        harness.frame(&[npc(900.0)], 1000);

        let state = harness.pipeline.combat().get(StableKey(2)).unwrap();
        let hit = state.last_damage().unwrap();
        assert_eq!((hit.timestamp_ms, hit.amount), (1000, 100.0));
        assert_eq!(state.burst_start_ms, Some(1000));
        assert_eq!(state.accumulated_damage, 100.0);

        let (buffer, _) = harness.frame(&[npc(900.0)], 1100);
        assert!((harness.pipeline.combat().burst_dps(StableKey(2), 1100) - 1000.0).abs() < 0.5);
        assert!(buffer.texts().any(|t| t == "100"));
        assert!(!buffer.filled_rects_with_rgb(palette::DAMAGE_FLASH).is_empty());
    }

    #[test]
    fn test_clock_stepping_back_freezes_animation() {
        let mut harness = Harness::new();
        harness.frame(&[npc(1000.0)], 0);
        harness.frame(&[npc(900.0)], 1000);

        let flash_alpha = |buffer: &CommandBuffer| {
            buffer
                .filled_rects_with_rgb(palette::DAMAGE_FLASH)
                .first()
                .map(|rect| rect.2.a)
        };
        let (later, _) = harness.frame(&[npc(900.0)], 1300);
        let (earlier, _) = harness.frame(&[npc(900.0)], 1100);

        assert!(flash_alpha(&later).is_some());
        assert_eq!(flash_alpha(&earlier), flash_alpha(&later));
        assert_eq!(harness.pipeline.combat().get(StableKey(2)).unwrap().last_seen_ms, 1300);
    }

    #[test]
    fn test_death_and_revive() {
        let mut harness = Harness::new();
        harness.frame(&[npc(500.0)], 4000);
        let (buffer, _) = harness.frame(&[npc(0.0)], 5000);

        let state = harness.pipeline.combat().get(StableKey(2)).unwrap();
        assert_eq!(state.life, LifeState::Dead { since_ms: 5000 });
        assert!(!buffer.filled_rects_with_rgb(palette::DEATH_BURST).is_empty());

        let (buffer, _) = harness.frame(&[npc(50.0)], 5500);
        let state = harness.pipeline.combat().get(StableKey(2)).unwrap();
        assert_eq!(state.life, LifeState::Alive);
        assert!(buffer.filled_rects_with_rgb(palette::DEATH_BURST).is_empty());

        let background = buffer.filled_rects_with_rgb(palette::BAR_BACKGROUND);
        let fill = buffer.filled_rects_with_rgb(palette::HOSTILE);
        assert_eq!(background.len(), 1);
        assert_eq!(fill.len(), 1);
        assert!((width(&fill[0]) - width(&background[0]) * 0.05).abs() < 1.0);
    }

    #[test]
    fn test_heal_overlay() {
        let mut harness = Harness::new();
        harness.frame(&[npc(400.0)], 0);
        let (buffer, _) = harness.frame(&[npc(700.0)], 100);

        let heal = harness.pipeline.combat().get(StableKey(2)).unwrap().last_heal().copied().unwrap();
        assert!((heal.start_percent - 0.4).abs() < 1e-5);
        assert!((heal.end_percent - 0.7).abs() < 1e-5);

        let background = buffer.filled_rects_with_rgb(palette::BAR_BACKGROUND)[0];
        let overlay = buffer.filled_rects_with_rgb(palette::HEAL_OVERLAY);
        assert_eq!(overlay.len(), 1);
        let bar_width = width(&background);
        assert!((overlay[0].0.x - (background.0.x + bar_width * 0.4)).abs() < 1.0);
        assert!((overlay[0].1.x - (background.0.x + bar_width * 0.7)).abs() < 1.0);
        assert!(!buffer.filled_rects_with_rgb(palette::HEAL_FLASH).is_empty());
    }

    #[test]
    fn test_distance_limit_culls() {
        let mut harness = Harness::new();
        harness.config.distance.use_limit = true;
        harness.config.distance.limit_meters = 90.0;

        let far = player(1, "Faraway", Attitude::Friendly, Vec3::new(0.0, 0.0, -95.0));
        let (buffer, stats) = harness.frame(&[far], 0);
        assert!(buffer.is_empty());
        assert_eq!(stats.transparent, 1);
        assert_eq!(stats.rendered, 0);
    }

    #[test]
    fn test_teleport_splits_trail() {
        for (mode, expect_connector) in [(TeleportMode::Tactical, false), (TeleportMode::Analysis, true)] {
            let mut harness = Harness::new();
            harness.config.players.trails.enabled = true;
            harness.config.players.trails.teleport_mode = mode;

            harness.frame(&[player(1, "Blink", Attitude::Hostile, Vec3::new(-20.0, 0.0, -50.0))], 0);
            let (buffer, _) =
                harness.frame(&[player(1, "Blink", Attitude::Hostile, Vec3::new(20.0, 0.0, -50.0))], 100);

            let state = harness.pipeline.combat().get(StableKey(1)).unwrap();
            assert_eq!(state.position_history.len(), 2);

            let connectors = buffer
                .commands()
                .iter()
                .filter(|c| {
                    matches!(c, DrawCommand::Line { color, .. }
                        if (color.r, color.g, color.b) == (200, 200, 200))
                })
                .count();
            assert_eq!(connectors > 0, expect_connector);
        }
    }

    #[test]
    fn test_kind_order() {
        let mut harness = Harness::new();
        harness.config.npcs.components.render_name = true;
        harness.config.objects.components.render_name = true;

        let item = EntitySnapshot::new(
            StableKey(3),
            Vec3::new(1.0, 0.0, -10.0),
            EntityDetails::Item(ItemInfo {
                item_id: 42,
                rarity: None,
            }),
        )
        .with_distance(10.0);
        let snapshots = [
            item,
            npc(1000.0),
            player(1, "Braham", Attitude::Friendly, Vec3::new(-1.0, 0.0, -10.0)),
        ];
        let (buffer, stats) = harness.frame(&snapshots, 0);
        assert_eq!(stats.rendered, 3);

        let position = |needle: &str| buffer.texts().position(|t| t == needle).unwrap();
        assert!(position("Braham") < position("Risen Grub"));
        assert!(position("Risen Grub") < position("Item [42]"));
    }

    #[test]
    fn test_pool_overflow_is_dropped() {
        let mut harness = Harness::new();
        harness.config.pipeline.max_entities_per_frame = 1;
        let snapshots = [
            player(1, "Kept", Attitude::Friendly, Vec3::new(0.0, 0.0, -10.0)),
            player(2, "Dropped", Attitude::Friendly, Vec3::new(1.0, 0.0, -10.0)),
        ];
        let (buffer, stats) = harness.frame(&snapshots, 0);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.rendered, 1);
        assert!(!buffer.contains_text("Dropped"));
        assert!(harness.pipeline.combat().get(StableKey(2)).is_none());
    }

    #[test]
    fn test_culling_reasons() {
        let mut harness = Harness::new();
        let behind = player(1, "Behind", Attitude::Friendly, Vec3::new(0.0, 0.0, 10.0));
        let aside = player(2, "Aside", Attitude::Friendly, Vec3::new(30.0, 0.0, -10.0));
        let (buffer, stats) = harness.frame(&[behind, aside], 0);
        assert!(buffer.is_empty());
        assert_eq!(stats.behind_camera, 1);
        assert_eq!(stats.off_screen, 1);
        assert_eq!(stats.culled(), 2);
    }

    #[test]
    fn test_unseen_state_is_evicted() {
        let mut harness = Harness::new();
        harness.frame(&[npc(1000.0)], 0);
        assert_eq!(harness.pipeline.combat().len(), 1);

        let (_, stats) = harness.frame(&[], 5000);
        assert_eq!(stats.evicted, 1);
        assert!(harness.pipeline.combat().is_empty());
    }

    #[test]
    fn test_global_opacity_compounds_once() {
        let mut harness = Harness::new();
        harness.config.appearance.global_opacity = 0.5;
        let entity = player(1, "Half", Attitude::Friendly, Vec3::new(0.0, 0.0, -10.0));
        let (buffer, _) = harness.frame(&[entity], 0);

        let name = buffer
            .commands()
            .iter()
            .rev()
            .find(|c| c.text() == Some("Half"))
            .unwrap();
        let expected = crate::style::entity_color(&player(1, "Half", Attitude::Friendly, Vec3::ZERO)).fade(0.5);
        assert_eq!(name.color().a, expected.a);
    }
}
