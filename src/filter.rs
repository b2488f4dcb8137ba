//! Entity filtering and component eligibility
//!
//! Two questions are answered per entity each frame:
//!
//! 1. Should it be drawn at all? ([`EntityFilter::should_render`])
//! 2. Which components should be drawn? ([`EntityFilter::plan`])
//!
//! Both are pure functions of the snapshot, the config and the entity's
//! combat state, so identical inputs always give identical answers.
//!
//! # Example
//!
//! ```rust
//! use entity_overlay::entity::{EntityDetails, EntitySnapshot, PlayerInfo, StableKey};
//! use entity_overlay::filter::EntityFilter;
//! use entity_overlay::settings::Config;
//! use glam::Vec3;
//!
//! let mut config = Config::default();
//! config.players.components.show_only_damaged = true;
//!
//! let player = EntitySnapshot::new(StableKey(1), Vec3::ZERO, EntityDetails::Player(PlayerInfo::default()))
//!     .with_health(100.0, 100.0);
//!
//! let filter = EntityFilter::new(&config);
//! assert!(filter.should_render(&player, None, 0));
//! assert!(!filter.should_render_health_bar(&player, None, 0));
//! ```

use crate::combat::EntityCombatState;
use crate::entity::{Attitude, EntityDetails, EntityKind, EntitySnapshot, GadgetType};
use crate::projection::entity_bounds;
use crate::settings::{Config, EnergyDisplay, GearDisplayMode, TrailDisplayMode};

/// Which components to draw for one entity this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComponentPlan {
    pub render_box: bool,
    pub wireframe: bool,
    pub dot: bool,
    pub circle: bool,
    pub sphere: bool,
    pub name: bool,
    pub distance: bool,
    pub details: bool,
    pub health_bar: bool,
    pub energy_bar: bool,
    pub health_percentage: bool,
    pub damage_numbers: bool,
    pub burst_dps: bool,
    /// False for entities that never show combat feedback
    pub combat_ui: bool,
    pub trail: bool,
    pub gear_display: GearDisplayMode,
}

/// Filter and eligibility decisions for one frame's config
pub struct EntityFilter<'a> {
    config: &'a Config,
}

fn death_animating(combat: Option<&EntityCombatState>, now_ms: u64) -> bool {
    combat.is_some_and(|state| state.is_death_animating(now_ms))
}

impl<'a> EntityFilter<'a> {
    pub fn new(config: &'a Config) -> Self {
        EntityFilter { config }
    }

    /// Whether the entity is drawn at all
    pub fn should_render(&self, entity: &EntitySnapshot, combat: Option<&EntityCombatState>, now_ms: u64) -> bool {
        if !self.config.kind_enabled(entity.kind()) {
            return false;
        }
        let dead = entity.health.has_max() && !entity.health.is_alive();
        let animating = death_animating(combat, now_ms);

        match &entity.details {
            EntityDetails::Player(player) => {
                let players = &self.config.players;
                if player.is_local && !players.show_local_player {
                    return false;
                }
                if dead && !animating {
                    return false;
                }
                players.attitudes.allows(player.attitude)
            }
            EntityDetails::Npc(npc) => {
                let npcs = &self.config.npcs;
                if dead && !npcs.show_dead && !animating {
                    return false;
                }
                npcs.attitudes.allows(npc.attitude) && npcs.ranks.allows(npc.rank)
            }
            EntityDetails::Gadget(gadget) => {
                let objects = &self.config.objects;
                if dead && !objects.show_dead_gadgets && !animating {
                    return false;
                }
                if objects.hide_depleted_nodes && gadget.gadget_type == GadgetType::ResourceNode && !gadget.gatherable {
                    return false;
                }
                objects.gadget_types.allows(gadget.gadget_type)
            }
            EntityDetails::AttackTarget(_) => {
                !self.config.objects.show_attack_targets_only_in_combat || combat.is_some_and(|state| state.in_burst())
            }
            EntityDetails::Item(item) => self.config.objects.item_rarities.allows(item.rarity),
        }
    }

    /// Whether the health bar is drawn
    pub fn should_render_health_bar(
        &self,
        entity: &EntitySnapshot,
        combat: Option<&EntityCombatState>,
        now_ms: u64,
    ) -> bool {
        let kind = entity.kind();
        if !self.config.toggles(kind).render_health_bar {
            return false;
        }
        let animating = death_animating(combat, now_ms);
        let health = entity.health;
        let dead = health.has_max() && !health.is_alive();

        if self.config.toggles(kind).show_only_damaged && !health.is_damaged() && !dead && !animating {
            return false;
        }

        match &entity.details {
            EntityDetails::Player(_) => !dead || animating,
            EntityDetails::Npc(_) => !dead || animating || self.config.npcs.show_dead,
            EntityDetails::Gadget(gadget) => {
                if gadget.gadget_type.hides_combat_ui() {
                    return false;
                }
                if !health.has_max() && !animating {
                    return false;
                }
                !dead || animating || self.config.objects.show_dead_gadgets
            }
            EntityDetails::AttackTarget(_) | EntityDetails::Item(_) => false,
        }
    }

    /// Whether a player's energy or endurance bar is drawn
    pub fn should_render_energy_bar(&self, entity: &EntitySnapshot) -> bool {
        let players = &self.config.players;
        match &entity.details {
            EntityDetails::Player(player) if players.render_energy_bar => {
                let pool = match players.energy_display {
                    EnergyDisplay::Energy => player.energy,
                    EnergyDisplay::Endurance => player.endurance,
                };
                pool.is_some_and(|p| p.has_max())
            }
            _ => false,
        }
    }

    /// Whether the box (2D or wireframe) is drawn
    ///
    /// Objects taller than `max_box_height` keep their other components but
    /// lose the box.
    pub fn should_render_box(&self, entity: &EntitySnapshot) -> bool {
        let kind = entity.kind();
        if !self.config.toggles(kind).render_box {
            return false;
        }
        self.box_height_allowed(entity)
    }

    fn box_height_allowed(&self, entity: &EntitySnapshot) -> bool {
        if entity.kind().is_character() {
            return true;
        }
        entity_bounds(entity, self.config).is_none_or(|bounds| bounds.height <= self.config.objects.max_box_height)
    }

    /// Whether a player's motion trail is drawn
    pub fn should_render_trail(&self, entity: &EntitySnapshot) -> bool {
        let trails = &self.config.players.trails;
        if !trails.enabled || entity.kind() != EntityKind::Player {
            return false;
        }
        match trails.display_mode {
            TrailDisplayMode::All => true,
            TrailDisplayMode::Hostile => entity.attitude() == Attitude::Hostile,
        }
    }

    /// Component decisions for an entity that passed [`should_render`](Self::should_render)
    pub fn plan(&self, entity: &EntitySnapshot, combat: Option<&EntityCombatState>, now_ms: u64) -> ComponentPlan {
        let kind = entity.kind();
        let toggles = self.config.toggles(kind);
        let objects = &self.config.objects;

        let combat_ui = match &entity.details {
            EntityDetails::Gadget(gadget) => !gadget.gadget_type.hides_combat_ui(),
            EntityDetails::Item(_) => false,
            _ => true,
        };
        let box_allowed = self.box_height_allowed(entity);
        let health_bar = self.should_render_health_bar(entity, combat, now_ms);

        ComponentPlan {
            render_box: toggles.render_box && box_allowed,
            wireframe: toggles.render_wireframe && box_allowed,
            dot: toggles.render_dot,
            circle: kind.is_object() && objects.render_circle,
            sphere: kind.is_object() && objects.render_sphere,
            name: toggles.render_name,
            distance: toggles.render_distance,
            details: toggles.render_details,
            health_bar,
            energy_bar: self.should_render_energy_bar(entity),
            health_percentage: health_bar && toggles.show_health_percentage,
            damage_numbers: combat_ui && toggles.show_damage_numbers,
            burst_dps: combat_ui && toggles.show_burst_dps,
            combat_ui,
            trail: self.should_render_trail(entity),
            gear_display: match kind {
                EntityKind::Player => self.config.players.gear_display,
                _ => GearDisplayMode::Off,
            },
        }
    }
}
