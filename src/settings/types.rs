//! Configuration types
//!
//! The pipeline reads one immutable [`Config`] per frame. Every group is a
//! Serde struct with `#[serde(default)]`, so settings files written by older
//! versions (or edited by hand) load with missing fields filled from the
//! defaults below.

use crate::entity::{EntityKind, GadgetType, PhysicsBounds, Rank, Rarity, Attitude};
use serde::{Deserialize, Serialize};

/// Root configuration snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub players: PlayerSettings,
    pub npcs: NpcSettings,
    pub objects: ObjectSettings,
    pub appearance: AppearanceSettings,
    pub distance: DistanceSettings,
    pub scaling: ScalingSettings,
    pub combat: CombatSettings,
    pub pipeline: PipelineSettings,
}

impl Config {
    /// Component toggles that apply to an entity kind
    ///
    /// Gadgets, attack targets and items share the object toggles.
    pub fn toggles(&self, kind: EntityKind) -> &ComponentToggles {
        match kind {
            EntityKind::Player => &self.players.components,
            EntityKind::Npc => &self.npcs.components,
            EntityKind::Gadget | EntityKind::AttackTarget | EntityKind::Item => &self.objects.components,
        }
    }

    /// Whether a kind is enabled at all
    pub fn kind_enabled(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Player => self.players.components.enabled,
            EntityKind::Npc => self.npcs.components.enabled,
            EntityKind::Gadget => self.objects.components.enabled,
            EntityKind::AttackTarget => self.objects.components.enabled && self.objects.show_attack_targets,
            EntityKind::Item => self.objects.components.enabled && self.objects.show_items,
        }
    }
}

/// Per-kind render switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentToggles {
    pub enabled: bool,
    pub render_box: bool,
    pub render_wireframe: bool,
    pub render_dot: bool,
    pub render_distance: bool,
    pub render_name: bool,
    pub render_details: bool,
    pub render_health_bar: bool,
    pub show_health_percentage: bool,
    pub show_damage_numbers: bool,
    pub show_burst_dps: bool,
    /// Only show the health bar once the entity is below max health
    pub show_only_damaged: bool,
}

impl ComponentToggles {
    pub fn players() -> Self {
        ComponentToggles {
            enabled: true,
            render_box: false,
            render_wireframe: false,
            render_dot: false,
            render_distance: false,
            render_name: true,
            render_details: false,
            render_health_bar: true,
            show_health_percentage: false,
            show_damage_numbers: true,
            show_burst_dps: false,
            show_only_damaged: false,
        }
    }

    pub fn npcs() -> Self {
        ComponentToggles {
            render_name: false,
            ..ComponentToggles::players()
        }
    }

    pub fn objects() -> Self {
        ComponentToggles {
            render_dot: true,
            render_name: false,
            show_only_damaged: true,
            ..ComponentToggles::players()
        }
    }
}

impl Default for ComponentToggles {
    fn default() -> Self {
        ComponentToggles::players()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttitudeFilter {
    pub hostile: bool,
    pub friendly: bool,
    pub neutral: bool,
    pub indifferent: bool,
}

impl AttitudeFilter {
    pub fn allows(&self, attitude: Attitude) -> bool {
        match attitude {
            Attitude::Hostile => self.hostile,
            Attitude::Friendly => self.friendly,
            Attitude::Neutral => self.neutral,
            Attitude::Indifferent => self.indifferent,
            Attitude::Unknown => true,
        }
    }
}

impl Default for AttitudeFilter {
    fn default() -> Self {
        AttitudeFilter {
            hostile: true,
            friendly: true,
            neutral: true,
            indifferent: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GearDisplayMode {
    #[default]
    Off,
    Compact,
    TopAttributes,
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnergyDisplay {
    #[default]
    Energy,
    Endurance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrailDisplayMode {
    All,
    #[default]
    Hostile,
}

/// How teleport gaps in a trail are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TeleportMode {
    /// Gaps are left empty
    #[default]
    Tactical,
    /// Gaps are bridged with dashed connectors
    Analysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailSettings {
    pub enabled: bool,
    pub max_points: usize,
    pub max_duration_ms: u64,
    pub display_mode: TrailDisplayMode,
    pub teleport_mode: TeleportMode,
    pub thickness: f32,
    pub teleport_distance_m: f32,
}

impl Default for TrailSettings {
    fn default() -> Self {
        TrailSettings {
            enabled: false,
            max_points: 30,
            max_duration_ms: 1000,
            display_mode: TrailDisplayMode::Hostile,
            teleport_mode: TeleportMode::Tactical,
            thickness: 2.0,
            teleport_distance_m: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerDetailFields {
    pub level: bool,
    pub profession: bool,
    pub race: bool,
    pub attitude: bool,
    pub hp: bool,
    pub energy: bool,
    pub position: bool,
}

impl Default for PlayerDetailFields {
    fn default() -> Self {
        PlayerDetailFields {
            level: true,
            profession: true,
            race: true,
            attitude: true,
            hp: true,
            energy: true,
            position: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub components: ComponentToggles,
    pub attitudes: AttitudeFilter,
    pub render_energy_bar: bool,
    pub energy_display: EnergyDisplay,
    pub show_local_player: bool,
    pub gear_display: GearDisplayMode,
    pub hostile_boost_multiplier: f32,
    pub details: PlayerDetailFields,
    pub trails: TrailSettings,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        PlayerSettings {
            components: ComponentToggles::players(),
            attitudes: AttitudeFilter::default(),
            render_energy_bar: false,
            energy_display: EnergyDisplay::Energy,
            show_local_player: false,
            gear_display: GearDisplayMode::Off,
            hostile_boost_multiplier: 2.0,
            details: PlayerDetailFields::default(),
            trails: TrailSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankFilter {
    pub normal: bool,
    pub ambient: bool,
    pub veteran: bool,
    pub elite: bool,
    pub champion: bool,
    pub legendary: bool,
}

impl RankFilter {
    pub fn allows(&self, rank: Rank) -> bool {
        match rank {
            Rank::Normal => self.normal,
            Rank::Ambient => self.ambient,
            Rank::Veteran => self.veteran,
            Rank::Elite => self.elite,
            Rank::Champion => self.champion,
            Rank::Legendary => self.legendary,
        }
    }
}

impl Default for RankFilter {
    fn default() -> Self {
        RankFilter {
            normal: true,
            ambient: true,
            veteran: true,
            elite: true,
            champion: true,
            legendary: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcDetailFields {
    pub level: bool,
    pub hp: bool,
    pub attitude: bool,
    pub rank: bool,
    pub position: bool,
}

impl Default for NpcDetailFields {
    fn default() -> Self {
        NpcDetailFields {
            level: true,
            hp: true,
            attitude: true,
            rank: true,
            position: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcSettings {
    pub components: ComponentToggles,
    pub attitudes: AttitudeFilter,
    pub ranks: RankFilter,
    /// Keep NPCs with 0 HP visible after their death animation
    pub show_dead: bool,
    /// Fade out the health bar of non-hostile NPCs that have been idle
    pub hide_idle_bars: bool,
    pub details: NpcDetailFields,
}

impl Default for NpcSettings {
    fn default() -> Self {
        NpcSettings {
            components: ComponentToggles::npcs(),
            attitudes: AttitudeFilter::default(),
            ranks: RankFilter::default(),
            show_dead: false,
            hide_idle_bars: true,
            details: NpcDetailFields::default(),
        }
    }
}

/// Per gadget type visibility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GadgetTypeFilter {
    pub destructible: bool,
    pub points: bool,
    pub crafting_stations: bool,
    pub doors: bool,
    pub interactables: bool,
    pub player_specific: bool,
    pub attack_targets: bool,
    pub portals: bool,
    pub waypoints: bool,
    pub resource_nodes: bool,
    pub props: bool,
    pub player_created: bool,
    pub vistas: bool,
    pub build_sites: bool,
    pub generic: bool,
    pub unknown: bool,
}

impl GadgetTypeFilter {
    pub fn allows(&self, gadget_type: GadgetType) -> bool {
        match gadget_type {
            GadgetType::Destructible => self.destructible,
            GadgetType::Point => self.points,
            GadgetType::Crafting => self.crafting_stations,
            GadgetType::Door => self.doors,
            GadgetType::Interact => self.interactables,
            GadgetType::PlayerSpecific => self.player_specific,
            GadgetType::AttackTarget => self.attack_targets,
            GadgetType::MapPortal => self.portals,
            GadgetType::Waypoint => self.waypoints,
            GadgetType::ResourceNode => self.resource_nodes,
            GadgetType::Prop => self.props,
            GadgetType::PlayerCreated => self.player_created,
            GadgetType::Vista => self.vistas,
            GadgetType::BuildSite => self.build_sites,
            GadgetType::Generic | GadgetType::Generic2 => self.generic,
            GadgetType::Unknown => self.unknown,
        }
    }
}

impl Default for GadgetTypeFilter {
    fn default() -> Self {
        GadgetTypeFilter {
            destructible: true,
            points: true,
            crafting_stations: true,
            doors: true,
            interactables: true,
            player_specific: true,
            attack_targets: true,
            portals: true,
            waypoints: true,
            resource_nodes: true,
            props: false,
            player_created: true,
            vistas: true,
            build_sites: true,
            generic: false,
            unknown: true,
        }
    }
}

/// Per rarity item visibility; items without a rarity are always shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityFilter {
    pub junk: bool,
    pub common: bool,
    pub fine: bool,
    pub masterwork: bool,
    pub rare: bool,
    pub exotic: bool,
    pub ascended: bool,
    pub legendary: bool,
}

impl RarityFilter {
    pub fn allows(&self, rarity: Option<Rarity>) -> bool {
        match rarity {
            None => true,
            Some(Rarity::Junk) => self.junk,
            Some(Rarity::Common) => self.common,
            Some(Rarity::Fine) => self.fine,
            Some(Rarity::Masterwork) => self.masterwork,
            Some(Rarity::Rare) => self.rare,
            Some(Rarity::Exotic) => self.exotic,
            Some(Rarity::Ascended) => self.ascended,
            Some(Rarity::Legendary) => self.legendary,
        }
    }
}

impl Default for RarityFilter {
    fn default() -> Self {
        RarityFilter {
            junk: false,
            common: false,
            fine: true,
            masterwork: true,
            rare: true,
            exotic: true,
            ascended: true,
            legendary: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectDetailFields {
    pub gadget_type: bool,
    pub health: bool,
    pub position: bool,
    pub resource_info: bool,
    pub gatherable_status: bool,
}

impl Default for ObjectDetailFields {
    fn default() -> Self {
        ObjectDetailFields {
            gadget_type: true,
            health: true,
            position: true,
            resource_info: true,
            gatherable_status: true,
        }
    }
}

/// Gadgets, attack targets and items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectSettings {
    pub components: ComponentToggles,
    pub render_circle: bool,
    pub render_sphere: bool,
    /// Boxes are suppressed for objects taller than this (meters)
    pub max_box_height: f32,
    /// Bounds used when a gadget reports none
    pub default_bounds: PhysicsBounds,
    pub show_dead_gadgets: bool,
    pub hide_depleted_nodes: bool,
    pub gadget_types: GadgetTypeFilter,
    pub show_attack_targets: bool,
    pub show_attack_targets_only_in_combat: bool,
    pub show_items: bool,
    pub item_rarities: RarityFilter,
    pub details: ObjectDetailFields,
}

impl Default for ObjectSettings {
    fn default() -> Self {
        ObjectSettings {
            components: ComponentToggles::objects(),
            render_circle: false,
            render_sphere: false,
            max_box_height: 10.0,
            default_bounds: PhysicsBounds::new(1.0, 1.0, 1.0),
            show_dead_gadgets: true,
            hide_depleted_nodes: false,
            gadget_types: GadgetTypeFilter::default(),
            show_attack_targets: true,
            show_attack_targets_only_in_combat: true,
            show_items: true,
            item_rarities: RarityFilter::default(),
            details: ObjectDetailFields::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceSettings {
    pub global_opacity: f32,
    pub text_shadows: bool,
    pub text_backgrounds: bool,
    pub base_font_size: f32,
    pub min_font_size: f32,
    pub base_box_width: f32,
    pub base_box_height: f32,
    pub base_box_thickness: f32,
    pub base_dot_radius: f32,
    pub base_health_bar_width: f32,
    pub base_health_bar_height: f32,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        AppearanceSettings {
            global_opacity: 1.0,
            text_shadows: true,
            text_backgrounds: false,
            base_font_size: 16.0,
            min_font_size: 6.0,
            base_box_width: 45.0,
            base_box_height: 90.0,
            base_box_thickness: 2.0,
            base_dot_radius: 3.0,
            base_health_bar_width: 60.0,
            base_health_bar_height: 7.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceDisplayMode {
    #[default]
    Meters,
    GameUnits,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceSettings {
    pub display_mode: DistanceDisplayMode,
    pub use_limit: bool,
    pub limit_meters: f32,
}

impl DistanceSettings {
    /// The active limit in meters, if limiting is on
    pub fn active_limit(&self) -> Option<f32> {
        (self.use_limit && self.limit_meters > 0.0).then_some(self.limit_meters)
    }
}

impl Default for DistanceSettings {
    fn default() -> Self {
        DistanceSettings {
            display_mode: DistanceDisplayMode::Meters,
            use_limit: false,
            limit_meters: 150.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingSettings {
    pub scale_factor: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Alpha players and NPCs settle at beyond the fade-out distance
    pub player_npc_min_alpha: f32,
    /// Alpha gadgets settle at beyond the adaptive far plane
    pub gadget_min_alpha: f32,
    /// Clamp fallback boxes to per-kind minimum sizes
    pub enforce_minimum_sizes: bool,
}

impl Default for ScalingSettings {
    fn default() -> Self {
        ScalingSettings {
            scale_factor: 1.0,
            min_scale: 0.25,
            max_scale: 1.0,
            player_npc_min_alpha: 0.0,
            gadget_min_alpha: 0.5,
            enforce_minimum_sizes: true,
        }
    }
}

/// How a frame's health change is turned into combat events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HealthDeltaPolicy {
    /// One event for the net change in health
    #[default]
    NetDelta,
    /// Separate damage and heal events when the snapshot reports both
    SeparateEvents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatSettings {
    pub delta_policy: HealthDeltaPolicy,
    /// Bar opacity once no combat has happened for `idle_fade_delay_ms`
    pub idle_alpha: f32,
    pub idle_fade_delay_ms: u64,
    /// Non-hostile NPC bars collapse entirely after this much idle time
    pub hide_delay_ms: u64,
    /// Combat state for entities unseen this long is evicted
    pub state_ttl_ms: u64,
}

impl Default for CombatSettings {
    fn default() -> Self {
        CombatSettings {
            delta_policy: HealthDeltaPolicy::NetDelta,
            idle_alpha: 0.5,
            idle_fade_delay_ms: 4000,
            hide_delay_ms: 8000,
            state_ttl_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Entities beyond this count in one frame are dropped
    pub max_entities_per_frame: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        PipelineSettings {
            max_entities_per_frame: 2048,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{ "players": { "components": { "render_box": true } } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.players.components.render_box);
        // Untouched fields keep their per-kind defaults
        assert!(config.players.components.render_name);
        assert!(config.objects.components.render_dot);
        assert_eq!(config.appearance.base_font_size, 16.0);
    }

    #[test]
    fn test_toggles_by_kind() {
        let config = Config::default();
        assert!(config.toggles(EntityKind::Player).render_name);
        assert!(!config.toggles(EntityKind::Npc).render_name);
        assert!(config.toggles(EntityKind::Item).show_only_damaged);
    }

    #[test]
    fn test_kind_enabled_for_sub_toggles() {
        let mut config = Config::default();
        config.objects.show_items = false;
        assert!(!config.kind_enabled(EntityKind::Item));
        assert!(config.kind_enabled(EntityKind::Gadget));
    }

    #[test]
    fn test_rarity_filter_allows_unrated() {
        let filter = RarityFilter::default();
        assert!(filter.allows(None));
        assert!(!filter.allows(Some(Rarity::Junk)));
        assert!(filter.allows(Some(Rarity::Exotic)));
    }

    #[test]
    fn test_distance_limit() {
        let mut distance = DistanceSettings::default();
        assert_eq!(distance.active_limit(), None);
        distance.use_limit = true;
        distance.limit_meters = 90.0;
        assert_eq!(distance.active_limit(), Some(90.0));
    }
}
