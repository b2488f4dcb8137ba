//! Detail lines and gear summaries
//!
//! The bottom of an entity's overlay: a stack of short centered lines, each
//! behind its own toggle. Players additionally get a gear summary above the
//! detail lines in one of three layouts:
//!
//! - Compact: `Stats: 43% Berserker's, 29% Viper's`, each stat in the color
//!   of the best rarity seen for it
//! - Top attributes: `[Power 33% | Precision 22% | Ferocity 22%]`, each
//!   attribute in its tactical role's color
//! - Detailed: one `Slot: Stat` line per equipped slot in the item's rarity
//!   color
//!
//! Line building is separate from drawing so it can be tested without a
//! draw list.

use super::entity_text_style;
use crate::color::{palette, Rgba};
use crate::draw::{Painter, TextRun};
use crate::entity::{EntityDetails, EntitySnapshot, EquipmentSlot, GearEntry, PlayerInfo};
use crate::filter::ComponentPlan;
use crate::gear::{compact_summary, top_attributes, StatCatalog};
use crate::layout::{LayoutCursor, DETAIL_LINE_SPACING};
use crate::render::{FrameContext, VisualProperties};
use crate::settings::{Config, EnergyDisplay, GearDisplayMode};
use crate::style::rarity_color;
use glam::Vec3;
use smallvec::SmallVec;

/// One detail line and its color
#[derive(Debug, Clone, PartialEq)]
pub struct DetailLine {
    pub text: String,
    pub color: Rgba,
}

impl DetailLine {
    fn plain(text: String) -> Self {
        DetailLine {
            text,
            color: palette::DEFAULT_TEXT,
        }
    }
}

pub type DetailLines = SmallVec<[DetailLine; 8]>;

fn position_line(pos: Vec3) -> DetailLine {
    DetailLine::plain(format!("Pos: ({:.1}, {:.1}, {:.1})", pos.x, pos.y, pos.z))
}

fn hp_line(entity: &EntitySnapshot) -> DetailLine {
    DetailLine::plain(format!("HP: {:.0}/{:.0}", entity.health.current, entity.health.max))
}

/// Builds the toggled detail lines for an entity
pub fn detail_lines(entity: &EntitySnapshot, config: &Config) -> DetailLines {
    let mut lines = DetailLines::new();
    match &entity.details {
        EntityDetails::Player(player) => {
            let fields = &config.players.details;
            if fields.level {
                let text = if player.scaled_level > 0 && player.scaled_level != player.level {
                    format!("Level: {} ({})", player.level, player.scaled_level)
                } else {
                    format!("Level: {}", player.level)
                };
                lines.push(DetailLine::plain(text));
            }
            if fields.profession {
                lines.push(DetailLine::plain(format!("Prof: {}", player.profession)));
            }
            if fields.attitude {
                lines.push(DetailLine::plain(format!("Attitude: {}", player.attitude)));
            }
            if fields.race {
                lines.push(DetailLine::plain(format!("Race: {}", player.race)));
            }
            if fields.hp && entity.health.has_max() {
                lines.push(hp_line(entity));
            }
            if fields.energy {
                let pool = match config.players.energy_display {
                    EnergyDisplay::Energy => player.energy,
                    EnergyDisplay::Endurance => player.endurance,
                };
                if let Some(pool) = pool.filter(|p| p.has_max()) {
                    lines.push(DetailLine::plain(format!(
                        "Energy: {:.0}/{:.0} ({:.0}%)",
                        pool.current,
                        pool.max,
                        pool.percentage() * 100.0
                    )));
                }
            }
            if fields.position {
                lines.push(position_line(entity.position));
            }
        }
        EntityDetails::Npc(npc) => {
            let fields = &config.npcs.details;
            if !npc.name.is_empty() {
                lines.push(DetailLine::plain(format!("NPC: {}", npc.name)));
            }
            if fields.level && npc.level > 0 {
                lines.push(DetailLine::plain(format!("Level: {}", npc.level)));
            }
            if fields.hp && entity.health.has_max() {
                lines.push(hp_line(entity));
            }
            if fields.attitude {
                lines.push(DetailLine::plain(format!("Attitude: {}", npc.attitude)));
            }
            if fields.rank {
                lines.push(DetailLine::plain(format!("Rank: {}", npc.rank)));
            }
            if fields.position {
                lines.push(position_line(entity.position));
            }
        }
        EntityDetails::Gadget(gadget) => {
            let fields = &config.objects.details;
            if fields.gadget_type {
                lines.push(DetailLine::plain(format!("Type: {}", gadget.gadget_type)));
            }
            if fields.health && entity.health.has_max() {
                lines.push(hp_line(entity));
            }
            if fields.resource_info {
                if let Some(node) = gadget.resource_node {
                    lines.push(DetailLine::plain(format!("Node: {node}")));
                }
            }
            if fields.gatherable_status && gadget.gatherable {
                lines.push(DetailLine::plain("Status: Gatherable".to_string()));
            }
            if fields.position {
                lines.push(position_line(entity.position));
            }
        }
        EntityDetails::AttackTarget(target) => {
            let fields = &config.objects.details;
            lines.push(DetailLine::plain("Type: Attack Target".to_string()));
            if fields.health && entity.health.has_max() {
                lines.push(hp_line(entity));
            }
            if fields.position {
                lines.push(position_line(entity.position));
            }
            lines.push(DetailLine::plain(format!("AgentID: {}", target.agent_id)));
        }
        EntityDetails::Item(item) => {
            lines.push(DetailLine::plain("Type: Item".to_string()));
            if item.item_id > 0 {
                lines.push(DetailLine::plain(format!("Item ID: {}", item.item_id)));
            }
            if let Some(rarity) = item.rarity {
                lines.push(DetailLine {
                    text: format!("Rarity: {rarity}"),
                    color: rarity_color(rarity),
                });
            }
            if config.objects.details.position {
                lines.push(position_line(entity.position));
            }
        }
    }
    lines
}

/// `Slot: Stat` lines in display order, one per equipped slot
pub fn gear_detail_lines(gear: &[GearEntry], catalog: &StatCatalog) -> DetailLines {
    let mut lines = DetailLines::new();
    for slot in EquipmentSlot::DISPLAY_ORDER {
        let Some(entry) = gear.iter().find(|g| g.slot == slot) else {
            continue;
        };
        let text = match (entry.stat_id, catalog.name(entry.stat_id)) {
            (0, _) => format!("{slot}: No Stats"),
            (_, Some(name)) => format!("{slot}: {name}"),
            (id, None) => format!("{slot}: stat({id})"),
        };
        lines.push(DetailLine {
            text,
            color: rarity_color(entry.rarity),
        });
    }
    lines
}

/// Colored runs for the single-line gear summaries; `None` when there is nothing to show
pub fn gear_summary_runs(player: &PlayerInfo, mode: GearDisplayMode, catalog: &StatCatalog) -> Option<Vec<TextRun>> {
    let mut runs = Vec::new();
    match mode {
        GearDisplayMode::Compact => {
            let summary = compact_summary(&player.gear, catalog);
            if summary.is_empty() {
                return None;
            }
            runs.push(TextRun::new("Stats: ", palette::SUMMARY_TEXT));
            for (i, stat) in summary.iter().enumerate() {
                if i > 0 {
                    runs.push(TextRun::new(", ", palette::SUMMARY_TEXT));
                }
                runs.push(TextRun::new(
                    format!("{:.0}% {}", stat.percentage, stat.name),
                    rarity_color(stat.highest_rarity),
                ));
            }
        }
        GearDisplayMode::TopAttributes => {
            let summary = top_attributes(&player.gear, catalog);
            if summary.is_empty() {
                return None;
            }
            runs.push(TextRun::new("[", palette::SUMMARY_TEXT));
            for (i, attr) in summary.iter().enumerate() {
                if i > 0 {
                    runs.push(TextRun::new(" | ", palette::SUMMARY_TEXT));
                }
                runs.push(TextRun::new(
                    format!("{} {:.0}%", attr.attribute.short_name(), attr.percentage),
                    attr.attribute.tactical_color(),
                ));
            }
            runs.push(TextRun::new("]", palette::SUMMARY_TEXT));
        }
        GearDisplayMode::Off | GearDisplayMode::Detailed => return None,
    }
    Some(runs)
}

/// Draws the gear summary and detail lines
#[derive(Debug, Default)]
pub struct DetailsPanel;

impl DetailsPanel {
    pub fn new() -> Self {
        DetailsPanel
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
        if let EntityDetails::Player(player) = &entity.details {
            self.render_gear(painter, ctx, player, props, plan.gear_display, cursor);
        }
        if plan.details {
            for line in detail_lines(entity, ctx.config) {
                self.render_line(painter, ctx, props, &line, cursor);
            }
        }
    }

    fn render_gear(
        &self,
        painter: &mut Painter<'_>,
        ctx: &FrameContext<'_>,
        player: &PlayerInfo,
        props: &VisualProperties,
        mode: GearDisplayMode,
        cursor: &mut LayoutCursor,
    ) {
        match mode {
            GearDisplayMode::Off => {}
            GearDisplayMode::Detailed => {
                for line in gear_detail_lines(&player.gear, ctx.catalog) {
                    self.render_line(painter, ctx, props, &line, cursor);
                }
            }
            GearDisplayMode::Compact | GearDisplayMode::TopAttributes => {
                if let Some(runs) = gear_summary_runs(player, mode, ctx.catalog) {
                    let style = entity_text_style(ctx, props, palette::SUMMARY_TEXT);
                    let height = painter.text_multicolored(cursor.position(), &runs, &style);
                    cursor.advance(height);
                }
            }
        }
    }

    fn render_line(
        &self,
        painter: &mut Painter<'_>,
        ctx: &FrameContext<'_>,
        props: &VisualProperties,
        line: &DetailLine,
        cursor: &mut LayoutCursor,
    ) {
        let style = entity_text_style(ctx, props, line.color);
        let height = painter.text_centered(cursor.position(), &line.text, &style);
        cursor.advance_with_spacing(height, DETAIL_LINE_SPACING);
    }
}
