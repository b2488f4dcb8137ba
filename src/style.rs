//! Per-entity visual style
//!
//! The style calculator runs once per entity per frame, before projection,
//! and decides how big and how opaque everything about that entity is.
//!
//! # Scale
//!
//! `raw = scale_factor * F / (distance + F)` where `F` is 150 m for
//! characters and `max(far_plane / 2, 150)` for gadgets and attack targets,
//! clamped to `[min_scale, max_scale]`. Scaling uses the visual (camera)
//! distance so that zooming the camera changes sizes.
//!
//! # Alpha
//!
//! With a distance limit active, entities fade over the last 11% of the limit
//! and vanish beyond it. Without one, gadgets fade from 90 m toward a floor at
//! the adaptive far plane, and characters fade from 80 m to 120 m. Fading uses
//! the gameplay distance. The curve is multiplied by the global opacity once,
//! and the result is handed to the painter.
//!
//! # Sizes
//!
//! Every element size is `base * scale * multiplier`, clamped per element.
//! Rank and hostile-player multipliers grow text and bars; the gadget health
//! multiplier grows bars only. Box thickness is never multiplied.

use crate::color::{palette, Rgba};
use crate::entity::{Attitude, EntityDetails, EntityKind, EntitySnapshot, Rank, Rarity};
use crate::error::SkipReason;
use crate::settings::Config;

pub const PLAYER_NPC_DISTANCE_FACTOR: f32 = 150.0;
pub const GADGET_MIN_DISTANCE_FACTOR: f32 = 150.0;

pub const GADGET_FADE_START: f32 = 90.0;
pub const PLAYER_NPC_FADE_START: f32 = 80.0;
pub const PLAYER_NPC_FADE_END: f32 = 120.0;

/// Fraction of the distance limit over which entities fade out
pub const LIMIT_FADE_ZONE: f32 = 0.11;

pub const MAX_FONT_SIZE: f32 = 40.0;
pub const MIN_BOX_THICKNESS: f32 = 1.0;
pub const MAX_BOX_THICKNESS: f32 = 10.0;
pub const MIN_DOT_RADIUS: f32 = 1.0;
pub const MAX_DOT_RADIUS: f32 = 15.0;
pub const MIN_HEALTH_BAR_WIDTH: f32 = 10.0;
pub const MAX_HEALTH_BAR_WIDTH: f32 = 200.0;
pub const MIN_HEALTH_BAR_HEIGHT: f32 = 2.0;
pub const MAX_HEALTH_BAR_HEIGHT: f32 = 25.0;

/// Max health at which the gadget bar multiplier reaches its ceiling
pub const GADGET_HEALTH_CEILING: f32 = 1_000_000.0;
pub const GADGET_HEALTH_MAX_MULTIPLIER: f32 = 2.0;

/// Visual properties of one entity for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualStyle {
    /// Distance scale after clamping
    pub scale: f32,
    /// Opacity from the distance limit alone
    pub distance_alpha: f32,
    /// Fade curve times global opacity; the painter applies this once
    pub final_alpha: f32,
    /// Unfaded entity color
    pub entity_color: Rgba,
    pub font_size: f32,
    pub box_thickness: f32,
    pub dot_radius: f32,
    pub health_bar_width: f32,
    pub health_bar_height: f32,
}

impl VisualStyle {
    /// The entity color with `final_alpha` folded into its alpha channel
    pub fn faded_entity_color(&self) -> Rgba {
        self.entity_color.fade(self.final_alpha)
    }
}

/// Size multipliers derived from what the entity is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityMultipliers {
    pub hostile: f32,
    pub rank: f32,
    pub gadget_health: f32,
}

impl EntityMultipliers {
    /// Applied to text
    pub fn font(&self) -> f32 {
        self.hostile * self.rank
    }

    /// Applied to health bar width and height
    pub fn health_bar(&self) -> f32 {
        self.hostile * self.rank * self.gadget_health
    }
}

/// Computes [`VisualStyle`]s for one frame
///
/// Holds the frame's adaptive far plane, so create one per frame.
pub struct StyleCalculator<'a> {
    config: &'a Config,
    far_plane: f32,
}

impl<'a> StyleCalculator<'a> {
    pub fn new(config: &'a Config, far_plane: f32) -> Self {
        StyleCalculator { config, far_plane }
    }

    /// Computes the style, or `Transparent` when the entity faded out entirely
    pub fn calculate(&self, entity: &EntitySnapshot) -> Result<VisualStyle, SkipReason> {
        let kind = entity.kind();
        let limit = self.config.distance.active_limit();

        let distance_alpha = match limit {
            Some(limit) => limit_fade_alpha(entity.gameplay_distance, limit),
            None => 1.0,
        };
        if distance_alpha <= 0.0 {
            return Err(SkipReason::Transparent);
        }

        let curve = match limit {
            Some(_) => distance_alpha,
            None => self.curve_alpha(kind, entity.gameplay_distance),
        };
        let final_alpha = (curve * self.config.appearance.global_opacity).clamp(0.0, 1.0);
        if final_alpha <= 0.0 {
            return Err(SkipReason::Transparent);
        }

        let scale = self.scale(kind, entity.visual_distance);
        let multipliers = self.multipliers(entity);
        let appearance = &self.config.appearance;

        Ok(VisualStyle {
            scale,
            distance_alpha,
            final_alpha,
            entity_color: entity_color(entity),
            font_size: final_size(
                appearance.base_font_size,
                scale,
                appearance.min_font_size,
                MAX_FONT_SIZE,
                multipliers.font(),
            ),
            box_thickness: final_size(
                appearance.base_box_thickness,
                scale,
                MIN_BOX_THICKNESS,
                MAX_BOX_THICKNESS,
                1.0,
            ),
            dot_radius: final_size(appearance.base_dot_radius, scale, MIN_DOT_RADIUS, MAX_DOT_RADIUS, 1.0),
            health_bar_width: final_size(
                appearance.base_health_bar_width,
                scale,
                MIN_HEALTH_BAR_WIDTH,
                MAX_HEALTH_BAR_WIDTH,
                multipliers.health_bar(),
            ),
            health_bar_height: final_size(
                appearance.base_health_bar_height,
                scale,
                MIN_HEALTH_BAR_HEIGHT,
                MAX_HEALTH_BAR_HEIGHT,
                multipliers.health_bar(),
            ),
        })
    }

    /// Distance scale for an entity kind at a visual distance
    pub fn scale(&self, kind: EntityKind, visual_distance: f32) -> f32 {
        let scaling = &self.config.scaling;
        let factor = match kind {
            EntityKind::Gadget | EntityKind::AttackTarget => {
                (self.far_plane * 0.5).max(GADGET_MIN_DISTANCE_FACTOR)
            }
            _ => PLAYER_NPC_DISTANCE_FACTOR,
        };
        let distance = visual_distance.max(0.0);
        let raw = scaling.scale_factor * factor / (distance + factor);
        raw.max(scaling.min_scale).min(scaling.max_scale)
    }

    /// Fade curve without a distance limit
    pub fn curve_alpha(&self, kind: EntityKind, distance: f32) -> f32 {
        let scaling = &self.config.scaling;
        match kind {
            EntityKind::Gadget | EntityKind::AttackTarget => {
                if distance <= GADGET_FADE_START {
                    return 1.0;
                }
                let range = self.far_plane - GADGET_FADE_START;
                let progress = if range > 0.0 {
                    ((distance - GADGET_FADE_START) / range).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                (1.0 - progress).max(scaling.gadget_min_alpha)
            }
            EntityKind::Player | EntityKind::Npc | EntityKind::Item => {
                let min_alpha = scaling.player_npc_min_alpha;
                if distance <= PLAYER_NPC_FADE_START {
                    1.0
                } else if distance >= PLAYER_NPC_FADE_END {
                    min_alpha
                } else {
                    let progress = (distance - PLAYER_NPC_FADE_START) / (PLAYER_NPC_FADE_END - PLAYER_NPC_FADE_START);
                    1.0 - progress * (1.0 - min_alpha)
                }
            }
        }
    }

    pub fn multipliers(&self, entity: &EntitySnapshot) -> EntityMultipliers {
        let hostile = if entity.is_hostile_player() {
            self.config.players.hostile_boost_multiplier
        } else {
            1.0
        };
        let gadget_health = match entity.kind() {
            EntityKind::Gadget | EntityKind::AttackTarget => gadget_health_multiplier(entity.health.max),
            _ => 1.0,
        };
        EntityMultipliers {
            hostile,
            rank: rank_multiplier(entity.rank()),
            gadget_health,
        }
    }
}

/// Opacity inside a distance limit: 1 until the fade zone, 0 at and beyond the limit
pub fn limit_fade_alpha(distance: f32, limit: f32) -> f32 {
    let zone = limit * LIMIT_FADE_ZONE;
    let start = limit - zone;
    if distance <= start {
        1.0
    } else if distance >= limit {
        0.0
    } else {
        1.0 - (distance - start) / zone
    }
}

pub fn rank_multiplier(rank: Rank) -> f32 {
    match rank {
        Rank::Veteran => 1.1,
        Rank::Elite => 1.25,
        Rank::Champion => 1.5,
        Rank::Legendary => 1.75,
        Rank::Normal | Rank::Ambient => 1.0,
    }
}

/// 1.0 for a weightless gadget up to 2.0 at a million max health
pub fn gadget_health_multiplier(max_health: f32) -> f32 {
    let t = (max_health / GADGET_HEALTH_CEILING).clamp(0.0, 1.0);
    1.0 + t * (GADGET_HEALTH_MAX_MULTIPLIER - 1.0)
}

fn final_size(base: f32, scale: f32, min: f32, max: f32, multiplier: f32) -> f32 {
    (base * scale * multiplier).clamp(min, max)
}

pub fn attitude_color(attitude: Attitude) -> Rgba {
    match attitude {
        Attitude::Hostile => palette::HOSTILE,
        Attitude::Friendly => palette::FRIENDLY,
        Attitude::Neutral => palette::NEUTRAL,
        Attitude::Indifferent => palette::INDIFFERENT,
        Attitude::Unknown => palette::UNKNOWN,
    }
}

pub fn rarity_color(rarity: Rarity) -> Rgba {
    match rarity {
        Rarity::Junk => palette::RARITY_JUNK,
        Rarity::Common => palette::RARITY_COMMON,
        Rarity::Fine => palette::RARITY_FINE,
        Rarity::Masterwork => palette::RARITY_MASTERWORK,
        Rarity::Rare => palette::RARITY_RARE,
        Rarity::Exotic => palette::RARITY_EXOTIC,
        Rarity::Ascended => palette::RARITY_ASCENDED,
        Rarity::Legendary => palette::RARITY_LEGENDARY,
    }
}

/// Base color of an entity before any fading
pub fn entity_color(entity: &EntitySnapshot) -> Rgba {
    match &entity.details {
        EntityDetails::Player(p) if p.is_local => palette::PLAYER,
        EntityDetails::Player(p) => attitude_color(p.attitude),
        EntityDetails::Npc(n) => attitude_color(n.attitude),
        EntityDetails::Gadget(_) | EntityDetails::AttackTarget(_) => palette::GADGET,
        EntityDetails::Item(item) => item.rarity.map_or(palette::RARITY_COMMON, rarity_color),
    }
}
