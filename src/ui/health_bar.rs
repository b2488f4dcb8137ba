//! Health bar component for displaying entity health
//!
//! A layered bar drawn under the entity's identity line. Layers, bottom to
//! top:
//!
//! 1. Background
//! 2. Base health fill in the entity's color
//! 3. Heal overlay and heal flash over the freshly healed segment
//! 4. Damage accumulator: health lost during the current burst
//! 5. Damage flash over the most recent hit
//! 6. Barrier, first inside the missing segment, then overflowing from the
//!    right edge
//! 7. Health percentage text to the right of the bar
//! 8. Border: hostile entities get an inset border and an outer stroke,
//!    everyone else only the outer stroke
//!
//! Dead entities replace layers 2-7 with the death burst.
//!
//! # Example
//!
//! ```rust,ignore
//! use entity_overlay::ui::{HealthBar, HealthBarStyle};
//!
//! // Create once
//! let health_bar = HealthBar::new();
//!
//! // Render for each entity
//! let placement = health_bar.render(&mut painter, entity, &props, &plan, &anim, &mut cursor);
//! health_bar.render_energy(&mut painter, ctx, entity, &props, &plan, &mut cursor);
//! ```

use crate::animation::HealthBarAnimationState;
use crate::color::{palette, Rgba};
use crate::draw::{Painter, TextStyle};
use crate::entity::{Attitude, EntityDetails, EntitySnapshot};
use crate::filter::ComponentPlan;
use crate::layout::LayoutCursor;
use crate::render::{FrameContext, VisualProperties};
use crate::settings::EnergyDisplay;
use crate::stats::Pool;
use glam::Vec2;

/// Configuration for health bar appearance
///
/// # Example
///
/// ```rust
/// use entity_overlay::color::Rgba;
/// use entity_overlay::ui::HealthBarStyle;
///
/// let flat = HealthBarStyle {
///     rounding: 0.0,
///     energy_color: Rgba::rgb(255, 200, 0),
///     ..Default::default()
/// };
/// assert_eq!(flat.percent_padding, 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct HealthBarStyle {
    /// Background bar color (shown where health is missing)
    pub background_color: Rgba,

    /// Alpha of the base fill; the fill takes the entity's color
    pub health_fill_alpha: u8,

    /// Inset border for hostile entities
    pub border_color: Rgba,
    pub border_thickness: f32,

    /// Stroke just outside the bar
    pub outer_stroke_color: Rgba,
    pub outer_stroke_outset: f32,

    pub rounding: f32,

    /// Fill color of the energy/endurance bar
    pub energy_color: Rgba,

    /// HP% text size relative to the entity font
    pub percent_font_scale: f32,

    /// Gap between the bar and the HP% text
    pub percent_padding: f32,
}

impl Default for HealthBarStyle {
    fn default() -> Self {
        HealthBarStyle {
            background_color: palette::BAR_BACKGROUND,
            health_fill_alpha: 220,
            border_color: palette::BAR_BORDER,
            border_thickness: 1.0,
            outer_stroke_color: palette::BAR_BORDER,
            outer_stroke_outset: 1.0,
            rounding: 1.0,
            energy_color: palette::ENERGY_BAR,
            percent_font_scale: 0.8,
            percent_padding: 5.0,
        }
    }
}

/// Where a health bar ended up, for components anchored to it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarPlacement {
    pub top_left: Vec2,
    pub size: Vec2,
    /// Width of the HP% text, 0 when none was drawn
    pub percent_text_width: f32,
}

impl BarPlacement {
    pub fn max(&self) -> Vec2 {
        self.top_left + self.size
    }

    pub fn center_y(&self) -> f32 {
        self.top_left.y + self.size.y * 0.5
    }
}

/// A health bar component that renders below entities
///
/// Health bars are stateless components that can be reused across multiple
/// entities. All per-entity animation comes in as a
/// [`HealthBarAnimationState`].
pub struct HealthBar {
    style: HealthBarStyle,
}

impl HealthBar {
    /// Creates a new health bar with default styling
    pub fn new() -> Self {
        HealthBar {
            style: HealthBarStyle::default(),
        }
    }

    /// Creates a health bar with custom styling
    pub fn with_style(style: HealthBarStyle) -> Self {
        HealthBar { style }
    }

    /// Renders the health bar at the cursor and advances past it
    ///
    /// Returns `None` when the plan has no health bar.
    pub fn render(
        &self,
        painter: &mut Painter<'_>,
        entity: &EntitySnapshot,
        props: &VisualProperties,
        plan: &ComponentPlan,
        anim: &HealthBarAnimationState,
        cursor: &mut LayoutCursor,
    ) -> Option<BarPlacement> {
        if !plan.health_bar {
            return None;
        }

        let size = Vec2::new(props.style.health_bar_width, props.style.health_bar_height);
        let top_left = cursor.top_left_for_bar(size.x, size.y);
        let mut placement = BarPlacement {
            top_left,
            size,
            percent_text_width: 0.0,
        };

        let mut bar = painter.faded(anim.health_bar_fade_alpha);
        if bar.fade() > 0.0 {
            let min = top_left;
            let max = top_left + size;
            bar.filled_rect(min, max, self.style.background_color, self.style.rounding);

            if entity.health.is_alive() {
                self.render_alive(&mut bar, entity, props, anim, min, max);
                if plan.health_percentage && entity.health.has_max() {
                    placement.percent_text_width =
                        self.render_percentage(&mut bar, entity.health, props.style.font_size, min, max);
                }
            } else {
                self.render_death_burst(&mut bar, anim, min, max);
            }

            self.render_border(&mut bar, entity.attitude() == Attitude::Hostile, min, max);
        }

        cursor.advance(size.y);
        Some(placement)
    }

    fn render_alive(
        &self,
        bar: &mut Painter<'_>,
        entity: &EntitySnapshot,
        props: &VisualProperties,
        anim: &HealthBarAnimationState,
        min: Vec2,
        max: Vec2,
    ) {
        let width = max.x - min.x;
        let health = entity.health;
        let current = health.percentage();
        let at = |percent: f32| min.x + width * percent;
        let rounding = self.style.rounding;

        // Base fill
        if health.has_max() {
            let fill = props.style.entity_color.with_alpha(self.style.health_fill_alpha);
            filled_span(bar, at(0.0), at(current), min.y, max.y, fill, rounding);
        }

        // Heal overlay and flash share the healed segment
        let (heal_start, heal_end) = (anim.heal_overlay_start_percent, anim.heal_overlay_end_percent.min(1.0));
        if heal_end > heal_start {
            if anim.heal_overlay_alpha > 0.0 {
                let color = palette::HEAL_OVERLAY.fade(anim.heal_overlay_alpha);
                filled_span(bar, at(heal_start), at(heal_end), min.y, max.y, color, rounding);
            }
            if anim.heal_flash_alpha > 0.0 {
                let color = palette::HEAL_FLASH.fade(anim.heal_flash_alpha);
                filled_span(bar, at(heal_start), at(heal_end), min.y, max.y, color, rounding);
            }
        }

        // Accumulated burst damage
        if anim.damage_accumulator_percent > 0.0 && anim.damage_accumulator_alpha > 0.0 {
            let end = anim.damage_accumulator_percent.min(1.0);
            if end > current {
                let color = palette::DAMAGE_ACCUMULATOR.fade(anim.damage_accumulator_alpha);
                filled_span(bar, at(current), at(end), min.y, max.y, color, rounding);
            }
        }

        // Latest hit
        if anim.damage_flash_alpha > 0.0 {
            let previous = anim.damage_flash_start_percent.min(1.0);
            if previous > current {
                let color = palette::DAMAGE_FLASH.fade(anim.damage_flash_alpha);
                filled_span(bar, at(current), at(previous), min.y, max.y, color, rounding);
            }
        }

        self.render_barrier(bar, health, anim.animated_barrier, min, max);
    }

    fn render_barrier(&self, bar: &mut Painter<'_>, health: Pool, barrier: f32, min: Vec2, max: Vec2) {
        if !health.has_max() || barrier <= 0.0 {
            return;
        }
        let width = max.x - min.x;
        let health_percent = health.percentage();
        let barrier_percent = health.fraction_of_max(barrier);
        let rounding = self.style.rounding;

        if health_percent < 1.0 {
            let end = (health_percent + barrier_percent).min(1.0);
            filled_span(
                bar,
                min.x + width * health_percent,
                min.x + width * end,
                min.y,
                max.y,
                palette::BARRIER_FILL,
                rounding,
            );
        }

        let overflow = health_percent + barrier_percent - 1.0;
        if overflow > 0.0 {
            let overflow_width = width * overflow.min(1.0);
            let overflow_min = Vec2::new(max.x - overflow_width, min.y);
            bar.filled_rect(overflow_min, max, palette::BARRIER_FILL, rounding);
            bar.stroke_rect(overflow_min, max, palette::BARRIER_SEPARATOR, rounding, self.style.border_thickness);
        }
    }

    /// Draws `"{:.0}%"` right of the bar and returns its width
    fn render_percentage(&self, bar: &mut Painter<'_>, health: Pool, font_size: f32, min: Vec2, max: Vec2) -> f32 {
        let text = format!("{:.0}%", health.percentage() * 100.0);
        let font_size = font_size * self.style.percent_font_scale;
        let size = bar.text_size(&text, font_size);
        let center_y = (min.y + max.y) * 0.5;
        let pos = Vec2::new(max.x + self.style.percent_padding, center_y - size.y * 0.5);
        let style = TextStyle {
            font_size,
            color: palette::WHITE,
            shadow: true,
            background: false,
        };
        bar.text_at(pos, &text, &style).x
    }

    fn render_death_burst(&self, bar: &mut Painter<'_>, anim: &HealthBarAnimationState, min: Vec2, max: Vec2) {
        if anim.death_burst_alpha <= 0.0 {
            return;
        }
        let bar_width = max.x - min.x;
        let width = bar_width * anim.death_burst_width;
        let center_x = min.x + bar_width * 0.5;
        let color = palette::DEATH_BURST.fade(anim.death_burst_alpha);
        filled_span(
            bar,
            center_x - width * 0.5,
            center_x + width * 0.5,
            min.y,
            max.y,
            color,
            self.style.rounding,
        );
    }

    fn render_border(&self, bar: &mut Painter<'_>, hostile: bool, min: Vec2, max: Vec2) {
        if hostile {
            bar.stroke_rect(min, max, self.style.border_color, self.style.rounding, self.style.border_thickness);
        }
        let outset = Vec2::splat(self.style.outer_stroke_outset);
        bar.stroke_rect(
            min - outset,
            max + outset,
            self.style.outer_stroke_color,
            self.style.rounding + self.style.outer_stroke_outset,
            1.0,
        );
    }

    /// Renders the player's energy or endurance bar at the cursor
    ///
    /// Returns whether a bar was drawn.
    pub fn render_energy(
        &self,
        painter: &mut Painter<'_>,
        ctx: &FrameContext<'_>,
        entity: &EntitySnapshot,
        props: &VisualProperties,
        plan: &ComponentPlan,
        cursor: &mut LayoutCursor,
    ) -> bool {
        if !plan.energy_bar {
            return false;
        }
        let EntityDetails::Player(player) = &entity.details else {
            return false;
        };
        let pool = match ctx.config.players.energy_display {
            EnergyDisplay::Energy => player.energy,
            EnergyDisplay::Endurance => player.endurance,
        };
        let Some(pool) = pool.filter(Pool::has_max) else {
            return false;
        };

        let size = Vec2::new(props.style.health_bar_width, props.style.health_bar_height);
        let min = cursor.top_left_for_bar(size.x, size.y);
        let max = min + size;
        let rounding = self.style.rounding;

        painter.filled_rect(min, max, self.style.background_color, rounding);
        filled_span(
            painter,
            min.x,
            min.x + size.x * pool.percentage(),
            min.y,
            max.y,
            self.style.energy_color,
            rounding,
        );
        self.render_border(painter, false, min, max);

        cursor.advance(size.y);
        true
    }

    /// Updates the health bar's style
    pub fn set_style(&mut self, style: HealthBarStyle) {
        self.style = style;
    }

    /// Gets a reference to the current style
    pub fn style(&self) -> &HealthBarStyle {
        &self.style
    }
}

impl Default for HealthBar {
    fn default() -> Self {
        Self::new()
    }
}

/// Fills the horizontal span `x0..x1`; empty spans draw nothing
fn filled_span(painter: &mut Painter<'_>, x0: f32, x1: f32, y0: f32, y1: f32, color: Rgba, rounding: f32) {
    if x1 > x0 && y1 > y0 {
        painter.filled_rect(Vec2::new(x0, y0), Vec2::new(x1, y1), color, rounding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{CommandBuffer, DrawCommand};
    use crate::entity::{NpcInfo, PlayerInfo, StableKey};
    use crate::layout::StackDirection;
    use crate::ui::testing::Fixture;
    use glam::Vec3;

    fn npc(attitude: Attitude, health: f32, max: f32) -> EntitySnapshot {
        EntitySnapshot::new(
            StableKey(4),
            Vec3::new(0.0, 0.0, -10.0),
            EntityDetails::Npc(NpcInfo {
                attitude,
                ..Default::default()
            }),
        )
        .with_health(health, max)
        .with_distance(10.0)
    }

    fn plan() -> ComponentPlan {
        ComponentPlan {
            health_bar: true,
            ..Default::default()
        }
    }

    fn render(entity: &EntitySnapshot, plan: &ComponentPlan, anim: &HealthBarAnimationState) -> (CommandBuffer, Option<BarPlacement>, VisualProperties) {
        let fixture = Fixture::new();
        let ctx = fixture.context(0);
        let props = fixture.props(&ctx, entity);
        let mut buffer = CommandBuffer::new();
        let mut cursor = LayoutCursor::new(Vec2::new(500.0, 500.0), StackDirection::Down);
        let mut painter = Painter::new(&mut buffer, 1.0);
        let placement = HealthBar::new().render(&mut painter, entity, &props, plan, anim, &mut cursor);
        (buffer, placement, props)
    }

    fn stroke_count(buffer: &CommandBuffer) -> usize {
        buffer
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokeRect { .. }))
            .count()
    }

    #[test]
    fn test_base_fill_matches_health() {
        let entity = npc(Attitude::Neutral, 250.0, 1000.0);
        let (buffer, placement, props) = render(&entity, &plan(), &HealthBarAnimationState::default());
        let placement = placement.unwrap();

        let fills = buffer.filled_rects_with_rgb(props.style.entity_color);
        assert_eq!(fills.len(), 1);
        let (min, max, _) = fills[0];
        assert!((max.x - min.x - placement.size.x * 0.25).abs() < 1.0);
    }

    #[test]
    fn test_no_fill_without_max() {
        let entity = npc(Attitude::Neutral, 0.0, 0.0);
        let (buffer, placement, props) = render(&entity, &plan(), &HealthBarAnimationState::default());
        assert!(placement.is_some());
        assert!(buffer.filled_rects_with_rgb(props.style.entity_color).is_empty());
    }

    #[test]
    fn test_heal_overlay_span() {
        let entity = npc(Attitude::Neutral, 700.0, 1000.0);
        let anim = HealthBarAnimationState {
            heal_overlay_start_percent: 0.4,
            heal_overlay_end_percent: 0.7,
            heal_overlay_alpha: 1.0,
            ..Default::default()
        };
        let (buffer, placement, _) = render(&entity, &plan(), &anim);
        let placement = placement.unwrap();

        let overlay = buffer.filled_rects_with_rgb(palette::HEAL_OVERLAY);
        assert_eq!(overlay.len(), 1);
        let (min, max, _) = overlay[0];
        assert!((min.x - (placement.top_left.x + placement.size.x * 0.4)).abs() < 0.01);
        assert!((max.x - (placement.top_left.x + placement.size.x * 0.7)).abs() < 0.01);
    }

    #[test]
    fn test_barrier_overflow_is_outlined() {
        let entity = npc(Attitude::Neutral, 900.0, 1000.0);
        let anim = HealthBarAnimationState {
            animated_barrier: 300.0,
            ..Default::default()
        };
        let (buffer, placement, _) = render(&entity, &plan(), &anim);
        let placement = placement.unwrap();

        let barrier = buffer.filled_rects_with_rgb(palette::BARRIER_FILL);
        assert_eq!(barrier.len(), 2);
        // Inside the missing 10%, then 20% overflowing from the right edge
        let overflow = barrier[1];
        assert!((overflow.1.x - placement.max().x).abs() < 0.01);
        assert!((overflow.1.x - overflow.0.x - placement.size.x * 0.2).abs() < 0.01);
    }

    #[test]
    fn test_hostile_gets_inset_border() {
        let anim = HealthBarAnimationState::default();
        let (hostile, _, _) = render(&npc(Attitude::Hostile, 50.0, 100.0), &plan(), &anim);
        let (neutral, _, _) = render(&npc(Attitude::Neutral, 50.0, 100.0), &plan(), &anim);
        assert_eq!(stroke_count(&hostile), 2);
        assert_eq!(stroke_count(&neutral), 1);
    }

    #[test]
    fn test_percentage_text() {
        let entity = npc(Attitude::Neutral, 420.0, 1000.0);
        let plan = ComponentPlan {
            health_percentage: true,
            ..plan()
        };
        let (buffer, placement, _) = render(&entity, &plan, &HealthBarAnimationState::default());
        assert!(buffer.contains_text("42%"));
        assert!(placement.unwrap().percent_text_width > 0.0);
    }

    #[test]
    fn test_dead_draws_burst_only() {
        let entity = npc(Attitude::Neutral, 0.0, 1000.0);
        let anim = HealthBarAnimationState {
            dead: true,
            death_burst_alpha: 1.0,
            death_burst_width: 0.5,
            ..Default::default()
        };
        let (buffer, placement, props) = render(&entity, &plan(), &anim);
        let placement = placement.unwrap();
        assert!(buffer.filled_rects_with_rgb(props.style.entity_color).is_empty());
        let burst = buffer.filled_rects_with_rgb(palette::DEATH_BURST);
        assert_eq!(burst.len(), 1);
        assert!((burst[0].1.x - burst[0].0.x - placement.size.x * 0.5).abs() < 0.01);
    }

    #[test]
    fn test_faded_out_bar_still_takes_space() {
        let entity = npc(Attitude::Neutral, 50.0, 100.0);
        let anim = HealthBarAnimationState {
            health_bar_fade_alpha: 0.0,
            ..Default::default()
        };
        let (buffer, placement, _) = render(&entity, &plan(), &anim);
        assert!(buffer.is_empty());
        assert!(placement.is_some());
    }

    #[test]
    fn test_energy_bar() {
        let fixture = Fixture::new();
        let ctx = fixture.context(0);
        let entity = EntitySnapshot::new(
            StableKey(1),
            Vec3::new(0.0, 0.0, -10.0),
            EntityDetails::Player(PlayerInfo {
                energy: Some(Pool::new(30.0, 100.0)),
                ..Default::default()
            }),
        )
        .with_health(100.0, 100.0)
        .with_distance(10.0);
        let props = fixture.props(&ctx, &entity);
        let plan = ComponentPlan {
            energy_bar: true,
            ..Default::default()
        };

        let mut buffer = CommandBuffer::new();
        let mut cursor = LayoutCursor::new(Vec2::new(500.0, 500.0), StackDirection::Down);
        let mut painter = Painter::new(&mut buffer, 1.0);
        assert!(HealthBar::new().render_energy(&mut painter, &ctx, &entity, &props, &plan, &mut cursor));

        let fill = buffer.filled_rects_with_rgb(palette::ENERGY_BAR);
        assert_eq!(fill.len(), 1);
        assert!((fill[0].1.x - fill[0].0.x - props.style.health_bar_width * 0.3).abs() < 0.01);
    }
}
