//! Floating text component for combat numbers
//!
//! Two pieces of text float around the health bar:
//!
//! - The damage number rises out of the top of the bar (or the entity's
//!   center when no bar is shown) and fades as it goes. Bigger numbers are
//!   drawn larger.
//! - Burst DPS sits to the right of the bar, after the HP% text if there is
//!   one, and follows the bar's idle fade.
//!
//! # Example
//!
//! ```rust,ignore
//! use entity_overlay::ui::FloatingText;
//!
//! // Create once (stateless renderer)
//! let floating_text = FloatingText::new();
//!
//! // Render for each entity after its health bar
//! floating_text.render(&mut painter, ctx, &props, &plan, &anim, burst_dps, placement.as_ref());
//! ```

use super::BarPlacement;
use crate::animation::HealthBarAnimationState;
use crate::color::{palette, Rgba};
use crate::draw::{Painter, TextStyle};
use crate::filter::ComponentPlan;
use crate::render::{FrameContext, VisualProperties};
use glam::Vec2;

/// DPS at or above this is shown in thousands
pub const DPS_FORMATTING_THRESHOLD: f32 = 1000.0;

/// Configuration for floating text appearance
#[derive(Debug, Clone)]
pub struct FloatingTextStyle {
    pub damage_color: Rgba,
    /// Font multiplier for a damage number of zero
    pub damage_min_scale: f32,
    /// Font multiplier reached at `damage_for_max_scale`
    pub damage_max_scale: f32,
    pub damage_for_max_scale: f32,

    pub dps_color: Rgba,
    pub dps_font_scale: f32,
    /// Gap between the bar and the DPS text
    pub dps_padding: f32,
    /// Gap between the HP% text and the DPS text
    pub dps_spacing_from_percent: f32,
    /// Offset below the origin when there is no bar
    pub dps_fallback_offset: f32,
}

impl Default for FloatingTextStyle {
    fn default() -> Self {
        FloatingTextStyle {
            damage_color: palette::DAMAGE_NUMBER,
            damage_min_scale: 2.0,
            damage_max_scale: 5.0,
            damage_for_max_scale: 400_000.0,
            dps_color: palette::BURST_DPS_TEXT,
            dps_font_scale: 0.9,
            dps_padding: 5.0,
            dps_spacing_from_percent: 4.0,
            dps_fallback_offset: 20.0,
        }
    }
}

/// Formats burst DPS, switching to thousands at 1000
///
/// ```rust
/// use entity_overlay::ui::floating_text::format_dps;
///
/// assert_eq!(format_dps(950.0), "950");
/// assert_eq!(format_dps(12_345.0), "12.3k");
/// ```
pub fn format_dps(dps: f32) -> String {
    if dps >= DPS_FORMATTING_THRESHOLD {
        format!("{:.1}k", dps / DPS_FORMATTING_THRESHOLD)
    } else {
        format!("{dps:.0}")
    }
}

/// A floating text component for damage numbers and burst DPS
///
/// This is a stateless renderer. Where the damage number is in its rise and
/// how visible it is come from the [`HealthBarAnimationState`].
pub struct FloatingText {
    style: FloatingTextStyle,
}

impl FloatingText {
    pub fn new() -> Self {
        FloatingText {
            style: FloatingTextStyle::default(),
        }
    }

    pub fn with_style(style: FloatingTextStyle) -> Self {
        FloatingText { style }
    }

    /// Font multiplier for a damage number
    pub fn damage_scale(&self, amount: f32) -> f32 {
        if amount <= 0.0 {
            return self.style.damage_min_scale;
        }
        let progress = (amount / self.style.damage_for_max_scale).min(1.0);
        self.style.damage_min_scale + progress * (self.style.damage_max_scale - self.style.damage_min_scale)
    }

    /// Renders the damage number and burst DPS for one entity
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &self,
        painter: &mut Painter<'_>,
        ctx: &FrameContext<'_>,
        props: &VisualProperties,
        plan: &ComponentPlan,
        anim: &HealthBarAnimationState,
        burst_dps: f32,
        bar: Option<&BarPlacement>,
    ) {
        let shadow = ctx.config.appearance.text_shadows;
        if plan.damage_numbers && anim.has_damage_number() {
            self.render_damage_number(painter, props, anim, bar, shadow);
        }
        if plan.burst_dps && burst_dps > 0.0 && anim.health_bar_fade_alpha > 0.0 {
            self.render_burst_dps(painter, props, anim, burst_dps, bar, shadow);
        }
    }

    fn render_damage_number(
        &self,
        painter: &mut Painter<'_>,
        props: &VisualProperties,
        anim: &HealthBarAnimationState,
        bar: Option<&BarPlacement>,
        shadow: bool,
    ) {
        let anchor = match bar {
            Some(bar) => Vec2::new(bar.top_left.x + bar.size.x * 0.5, bar.top_left.y),
            None => props.geometry.center,
        };
        let text = format!("{:.0}", anim.damage_number_to_display);
        let style = TextStyle {
            font_size: props.style.font_size * self.damage_scale(anim.damage_number_to_display),
            color: self.style.damage_color,
            shadow,
            background: false,
        };
        let height = painter.text_size(&text, style.font_size).y;
        let pos = Vec2::new(anchor.x, anchor.y - anim.damage_number_y_offset - height);
        painter.faded(anim.damage_number_alpha).text_centered(pos, &text, &style);
    }

    fn render_burst_dps(
        &self,
        painter: &mut Painter<'_>,
        props: &VisualProperties,
        anim: &HealthBarAnimationState,
        burst_dps: f32,
        bar: Option<&BarPlacement>,
        shadow: bool,
    ) {
        let text = format_dps(burst_dps);
        let style = TextStyle {
            font_size: props.style.font_size * self.style.dps_font_scale,
            color: self.style.dps_color,
            shadow,
            background: false,
        };
        let mut painter = painter.faded(anim.health_bar_fade_alpha);

        match bar {
            Some(bar) => {
                let size = painter.text_size(&text, style.font_size);
                let mut x = bar.max().x + self.style.dps_padding;
                if bar.percent_text_width > 0.0 {
                    x += bar.percent_text_width + self.style.dps_spacing_from_percent;
                }
                let pos = Vec2::new(x, bar.center_y() - size.y * 0.5);
                painter.text_at(pos, &text, &style);
            }
            None => {
                let pos = props.geometry.screen_pos + Vec2::new(0.0, self.style.dps_fallback_offset);
                painter.text_centered(pos, &text, &style);
            }
        }
    }

    pub fn style(&self) -> &FloatingTextStyle {
        &self.style
    }
}

impl Default for FloatingText {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{CommandBuffer, DrawCommand};
    use crate::entity::{EntityDetails, EntitySnapshot, NpcInfo, StableKey};
    use crate::ui::testing::Fixture;
    use glam::Vec3;

    fn npc() -> EntitySnapshot {
        EntitySnapshot::new(StableKey(4), Vec3::new(0.0, 0.0, -10.0), EntityDetails::Npc(NpcInfo::default()))
            .with_health(500.0, 1000.0)
            .with_distance(10.0)
    }

    fn plan() -> ComponentPlan {
        ComponentPlan {
            damage_numbers: true,
            burst_dps: true,
            combat_ui: true,
            ..Default::default()
        }
    }

    fn text_positions(buffer: &CommandBuffer, needle: &str) -> Vec<Vec2> {
        buffer
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { pos, text, .. } if text == needle => Some(*pos),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_format_dps() {
        assert_eq!(format_dps(999.4), "999");
        assert_eq!(format_dps(1000.0), "1.0k");
        assert_eq!(format_dps(1560.0), "1.6k");
    }

    #[test]
    fn test_damage_scale() {
        let text = FloatingText::new();
        assert_eq!(text.damage_scale(0.0), 2.0);
        assert!((text.damage_scale(200_000.0) - 3.5).abs() < 1e-4);
        assert_eq!(text.damage_scale(1e9), 5.0);
    }

    #[test]
    fn test_damage_number_rises_above_bar() {
        let fixture = Fixture::new();
        let ctx = fixture.context(0);
        let entity = npc();
        let props = fixture.props(&ctx, &entity);
        let bar = BarPlacement {
            top_left: Vec2::new(100.0, 300.0),
            size: Vec2::new(60.0, 7.0),
            percent_text_width: 0.0,
        };
        let anim = HealthBarAnimationState {
            damage_number_to_display: 100.0,
            damage_number_alpha: 0.8,
            damage_number_y_offset: 10.0,
            ..Default::default()
        };

        let mut buffer = CommandBuffer::new();
        let mut painter = Painter::new(&mut buffer, 1.0);
        FloatingText::new().render(&mut painter, &ctx, &props, &plan(), &anim, 0.0, Some(&bar));

        let positions = text_positions(&buffer, "100");
        assert!(!positions.is_empty());
        let main = positions[positions.len() - 1];
        assert!(main.y < bar.top_left.y - 10.0);
        let color = buffer.commands().last().map(DrawCommand::color).unwrap();
        assert_eq!(color.a, (255.0f32 * 0.8).round() as u8);
    }

    #[test]
    fn test_burst_dps_after_percentage() {
        let fixture = Fixture::new();
        let ctx = fixture.context(0);
        let entity = npc();
        let props = fixture.props(&ctx, &entity);
        let anim = HealthBarAnimationState::default();
        let without = BarPlacement {
            top_left: Vec2::new(100.0, 300.0),
            size: Vec2::new(60.0, 7.0),
            percent_text_width: 0.0,
        };
        let with = BarPlacement {
            percent_text_width: 18.0,
            ..without
        };

        let mut buffer = CommandBuffer::new();
        let mut painter = Painter::new(&mut buffer, 1.0);
        FloatingText::new().render(&mut painter, &ctx, &props, &plan(), &anim, 2500.0, Some(&without));
        let mut painter = Painter::new(&mut buffer, 1.0);
        FloatingText::new().render(&mut painter, &ctx, &props, &plan(), &anim, 2500.0, Some(&with));

        let positions = text_positions(&buffer, "2.5k");
        let (plain, shifted) = (positions[positions.len() / 2 - 1], positions[positions.len() - 1]);
        assert_eq!(plain.x, 165.0);
        assert_eq!(shifted.x, 165.0 + 18.0 + 4.0);
    }

    #[test]
    fn test_nothing_without_combat_ui() {
        let fixture = Fixture::new();
        let ctx = fixture.context(0);
        let entity = npc();
        let props = fixture.props(&ctx, &entity);
        let anim = HealthBarAnimationState {
            damage_number_to_display: 100.0,
            damage_number_alpha: 1.0,
            ..Default::default()
        };

        let mut buffer = CommandBuffer::new();
        let mut painter = Painter::new(&mut buffer, 1.0);
        FloatingText::new().render(&mut painter, &ctx, &props, &ComponentPlan::default(), &anim, 900.0, None);
        assert!(buffer.is_empty());
    }
}
