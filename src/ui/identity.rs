//! Name and distance line
//!
//! Draws `name • distance` centered under the box. The name takes the
//! entity's color; the separator and distance use the default text color.
//! With only one of the two enabled, that one is drawn alone. With neither,
//! nothing is drawn and the cursor does not move.

use super::entity_text_style;
use crate::color::palette;
use crate::draw::{Painter, TextRun};
use crate::entity::{EntityDetails, EntitySnapshot};
use crate::far_plane::meters_to_units;
use crate::filter::ComponentPlan;
use crate::layout::LayoutCursor;
use crate::render::{FrameContext, VisualProperties};
use crate::settings::DistanceDisplayMode;
use glam::Vec2;
use std::borrow::Cow;

/// Gap between the cursor and the top of the text
pub const TEXT_ANCHOR_GAP: f32 = 5.0;
/// Extra space left under the line
pub const IDENTITY_BOTTOM_PADDING: f32 = 3.0;
pub const SEPARATOR: &str = " • ";

/// Formats a distance in meters for display
///
/// ```rust
/// use entity_overlay::settings::DistanceDisplayMode;
/// use entity_overlay::ui::format_distance;
///
/// assert_eq!(format_distance(12.34, DistanceDisplayMode::Meters), "12.3m");
/// assert_eq!(format_distance(2.54, DistanceDisplayMode::GameUnits), "100");
/// assert_eq!(format_distance(2.54, DistanceDisplayMode::Both), "2.5m (100)");
/// ```
pub fn format_distance(meters: f32, mode: DistanceDisplayMode) -> String {
    match mode {
        DistanceDisplayMode::Meters => format!("{meters:.1}m"),
        DistanceDisplayMode::GameUnits => format!("{:.0}", meters_to_units(meters)),
        DistanceDisplayMode::Both => format!("{meters:.1}m ({:.0})", meters_to_units(meters)),
    }
}

/// The label shown for an entity; players without a name fall back to profession
pub fn display_name(entity: &EntitySnapshot) -> Cow<'_, str> {
    match &entity.details {
        EntityDetails::Player(p) if p.name.is_empty() => Cow::Owned(p.profession.to_string()),
        EntityDetails::Player(p) => Cow::Borrowed(&p.name),
        EntityDetails::Npc(n) => Cow::Borrowed(&n.name),
        EntityDetails::Gadget(g) => Cow::Owned(g.gadget_type.to_string()),
        EntityDetails::AttackTarget(_) => Cow::Borrowed("Attack Target"),
        EntityDetails::Item(item) => Cow::Owned(format!("Item [{}]", item.item_id)),
    }
}

/// Draws the identity line
#[derive(Debug, Default)]
pub struct IdentityLine;

impl IdentityLine {
    pub fn new() -> Self {
        IdentityLine
    }

    pub fn render(
        &self,
        painter: &mut Painter<'_>,
        ctx: &FrameContext<'_>,
        entity: &EntitySnapshot,
        props: &VisualProperties,
        plan: &ComponentPlan,
        cursor: &mut LayoutCursor,
    ) {
        if !plan.name && !plan.distance {
            return;
        }

        let name = if plan.name { display_name(entity) } else { Cow::Borrowed("") };
        let distance = if plan.distance {
            format_distance(entity.gameplay_distance, ctx.config.distance.display_mode)
        } else {
            String::new()
        };

        let pos = cursor.position() + Vec2::new(0.0, TEXT_ANCHOR_GAP);
        let style = entity_text_style(ctx, props, palette::DEFAULT_TEXT);

        let height = match (name.is_empty(), distance.is_empty()) {
            (false, false) => {
                let runs = [
                    TextRun::new(name, props.style.entity_color),
                    TextRun::new(SEPARATOR, palette::DEFAULT_TEXT),
                    TextRun::new(distance, palette::DEFAULT_TEXT),
                ];
                painter.text_multicolored(pos, &runs, &style)
            }
            (false, true) => {
                let style = entity_text_style(ctx, props, props.style.entity_color);
                painter.text_centered(pos, &name, &style)
            }
            (true, false) => painter.text_centered(pos, &distance, &style),
            (true, true) => return,
        };
        cursor.advance(height + IDENTITY_BOTTOM_PADDING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::CommandBuffer;
    use crate::entity::{ItemInfo, PlayerInfo, Profession, StableKey};
    use crate::layout::StackDirection;
    use crate::ui::testing::Fixture;
    use glam::Vec3;

    fn player(name: &str) -> EntitySnapshot {
        EntitySnapshot::new(
            StableKey(1),
            Vec3::new(0.0, 0.0, -10.0),
            EntityDetails::Player(PlayerInfo {
                name: name.to_string(),
                profession: Profession::Necromancer,
                ..Default::default()
            }),
        )
        .with_health(100.0, 100.0)
        .with_distance(10.0)
    }

    fn render(fixture: &Fixture, entity: &EntitySnapshot, plan: &ComponentPlan) -> (CommandBuffer, f32) {
        let ctx = fixture.context(0);
        let props = fixture.props(&ctx, entity);
        let mut buffer = CommandBuffer::new();
        let mut cursor = LayoutCursor::new(Vec2::new(100.0, 100.0), StackDirection::Down);
        let start = cursor.position().y;
        let mut painter = Painter::new(&mut buffer, 1.0);
        IdentityLine::new().render(&mut painter, &ctx, entity, &props, plan, &mut cursor);
        (buffer, cursor.position().y - start)
    }

    #[test]
    fn test_name_and_distance() {
        let plan = ComponentPlan {
            name: true,
            distance: true,
            ..Default::default()
        };
        let (buffer, advanced) = render(&Fixture::new(), &player("Rytlock"), &plan);
        let texts: Vec<_> = buffer.texts().collect();
        assert!(texts.contains(&"Rytlock"));
        assert!(texts.contains(&SEPARATOR));
        assert!(texts.contains(&"10.0m"));
        assert!(advanced > 0.0);
    }

    #[test]
    fn test_profession_fallback() {
        let plan = ComponentPlan {
            name: true,
            ..Default::default()
        };
        let (buffer, _) = render(&Fixture::new(), &player(""), &plan);
        assert!(buffer.contains_text("Necromancer"));
        assert!(!buffer.contains_text(SEPARATOR));
    }

    #[test]
    fn test_noop_when_both_disabled() {
        let (buffer, advanced) = render(&Fixture::new(), &player("Rytlock"), &ComponentPlan::default());
        assert!(buffer.is_empty());
        assert_eq!(advanced, 0.0);
    }

    #[test]
    fn test_item_label() {
        let item = EntitySnapshot::new(
            StableKey(5),
            Vec3::ZERO,
            EntityDetails::Item(ItemInfo {
                item_id: 19721,
                rarity: None,
            }),
        );
        assert_eq!(display_name(&item), "Item [19721]");
    }
}
