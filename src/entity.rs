//! Entity snapshots
//!
//! An [`EntitySnapshot`] is a frame-local value describing one game entity:
//! a common header (key, position, health, distances) plus kind-specific
//! details carried in the [`EntityDetails`] tagged variant. Renderers
//! dispatch on the tag; nothing downcasts.
//!
//! Snapshots hold no references to anything outside the frame. The combat
//! store copies the few fields it needs across frames.
//!
//! # Example
//!
//! ```rust
//! use entity_overlay::entity::{Attitude, EntityDetails, EntitySnapshot, NpcInfo, Rank, StableKey};
//! use glam::Vec3;
//!
//! let npc = EntitySnapshot::new(
//!     StableKey(7),
//!     Vec3::new(0.0, 0.0, -10.0),
//!     EntityDetails::Npc(NpcInfo {
//!         name: "Risen Knight".into(),
//!         attitude: Attitude::Hostile,
//!         rank: Rank::Veteran,
//!         level: 80,
//!     }),
//! )
//! .with_health(500.0, 1000.0)
//! .with_distance(10.0);
//!
//! assert_eq!(npc.attitude(), Attitude::Hostile);
//! assert_eq!(npc.health.percentage(), 0.5);
//! ```

use crate::stats::Pool;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier that names the same logical entity across frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StableKey(pub u64);

/// Entity kinds, declared in render order
///
/// Frames draw kinds in this order, which decides z-order when overlays
/// overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Npc,
    Gadget,
    AttackTarget,
    Item,
}

impl EntityKind {
    /// Kinds that are drawn as boxes around a character model
    pub fn is_character(self) -> bool {
        matches!(self, EntityKind::Player | EntityKind::Npc)
    }

    /// Kinds that are drawn as circles/spheres around a point
    pub fn is_object(self) -> bool {
        !self.is_character()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Attitude {
    Hostile,
    Friendly,
    Neutral,
    Indifferent,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Rank {
    #[default]
    Normal,
    Ambient,
    Veteran,
    Elite,
    Champion,
    Legendary,
}

/// Item rarity tiers, ordered from lowest to highest
///
/// The derived ordering is used for "highest rarity" comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Junk,
    Common,
    Fine,
    Masterwork,
    Rare,
    Exotic,
    Ascended,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 8] = [
        Rarity::Junk,
        Rarity::Common,
        Rarity::Fine,
        Rarity::Masterwork,
        Rarity::Rare,
        Rarity::Exotic,
        Rarity::Ascended,
        Rarity::Legendary,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Profession {
    #[default]
    None,
    Guardian,
    Warrior,
    Engineer,
    Ranger,
    Thief,
    Elementalist,
    Mesmer,
    Necromancer,
    Revenant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Race {
    Asura,
    Charr,
    Human,
    Norn,
    Sylvari,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GadgetType {
    Destructible,
    Point,
    Crafting,
    Door,
    Interact,
    PlayerSpecific,
    AttackTarget,
    MapPortal,
    Waypoint,
    ResourceNode,
    Prop,
    PlayerCreated,
    Vista,
    BuildSite,
    Generic,
    Generic2,
    #[default]
    Unknown,
}

impl GadgetType {
    /// Gadgets that never take part in combat; their health UI is suppressed
    pub fn hides_combat_ui(self) -> bool {
        matches!(
            self,
            GadgetType::Prop
                | GadgetType::Interact
                | GadgetType::ResourceNode
                | GadgetType::Waypoint
                | GadgetType::MapPortal
                | GadgetType::Generic
                | GadgetType::Generic2
                | GadgetType::Crafting
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceNodeType {
    Plant,
    Tree,
    Rock,
    Quest,
}

/// The sixteen equipment slots shown in detailed gear mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Helm,
    Shoulders,
    Chest,
    Gloves,
    Pants,
    Boots,
    Back,
    Amulet,
    Ring1,
    Ring2,
    Accessory1,
    Accessory2,
    MainhandWeapon1,
    OffhandWeapon1,
    MainhandWeapon2,
    OffhandWeapon2,
}

impl EquipmentSlot {
    /// Display order for detailed gear lines
    pub const DISPLAY_ORDER: [EquipmentSlot; 16] = [
        EquipmentSlot::Helm,
        EquipmentSlot::Shoulders,
        EquipmentSlot::Chest,
        EquipmentSlot::Gloves,
        EquipmentSlot::Pants,
        EquipmentSlot::Boots,
        EquipmentSlot::Back,
        EquipmentSlot::Amulet,
        EquipmentSlot::Ring1,
        EquipmentSlot::Ring2,
        EquipmentSlot::Accessory1,
        EquipmentSlot::Accessory2,
        EquipmentSlot::MainhandWeapon1,
        EquipmentSlot::OffhandWeapon1,
        EquipmentSlot::MainhandWeapon2,
        EquipmentSlot::OffhandWeapon2,
    ];
}

/// One equipped item: which slot, which stat combination, which rarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearEntry {
    pub slot: EquipmentSlot,
    /// Stat combination id; 0 means the item has no selectable stats
    pub stat_id: u32,
    pub rarity: Rarity,
}

/// Physical extents in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBounds {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl PhysicsBounds {
    pub const fn new(width: f32, depth: f32, height: f32) -> Self {
        PhysicsBounds { width, depth, height }
    }
}

/// Per-frame damage/healing breakdown, when the snapshot source has one
///
/// Only consulted by the `SeparateEvents` delta policy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportedCombat {
    pub damage: f32,
    pub healing: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerInfo {
    pub name: String,
    pub profession: Profession,
    pub race: Race,
    pub level: u32,
    /// Effective level after downscaling; equals `level` when not scaled
    pub scaled_level: u32,
    pub attitude: Attitude,
    pub is_local: bool,
    pub energy: Option<Pool>,
    pub endurance: Option<Pool>,
    pub gear: Vec<GearEntry>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NpcInfo {
    pub name: String,
    pub attitude: Attitude,
    pub rank: Rank,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GadgetInfo {
    pub gadget_type: GadgetType,
    pub resource_node: Option<ResourceNodeType>,
    /// For resource nodes: whether the node can still be gathered
    pub gatherable: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttackTargetInfo {
    pub agent_id: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemInfo {
    pub item_id: u32,
    pub rarity: Option<Rarity>,
}

/// Kind-specific snapshot data
#[derive(Debug, Clone, PartialEq)]
pub enum EntityDetails {
    Player(PlayerInfo),
    Npc(NpcInfo),
    Gadget(GadgetInfo),
    AttackTarget(AttackTargetInfo),
    Item(ItemInfo),
}

/// One entity as seen this frame
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    pub key: StableKey,
    pub position: Vec3,
    pub health: Pool,
    pub barrier: f32,
    pub physics_bounds: Option<PhysicsBounds>,
    /// Metric distance used for limits, fading and display
    pub gameplay_distance: f32,
    /// Camera distance used for scaling
    pub visual_distance: f32,
    pub reported: Option<ReportedCombat>,
    pub details: EntityDetails,
}

impl EntitySnapshot {
    pub fn new(key: StableKey, position: Vec3, details: EntityDetails) -> Self {
        EntitySnapshot {
            key,
            position,
            health: Pool::none(),
            barrier: 0.0,
            physics_bounds: None,
            gameplay_distance: 0.0,
            visual_distance: 0.0,
            reported: None,
            details,
        }
    }

    pub fn with_health(mut self, current: f32, max: f32) -> Self {
        self.health = Pool::new(current, max);
        self
    }

    pub fn with_barrier(mut self, barrier: f32) -> Self {
        self.barrier = barrier.max(0.0);
        self
    }

    pub fn with_bounds(mut self, bounds: PhysicsBounds) -> Self {
        self.physics_bounds = Some(bounds);
        self
    }

    /// Sets both gameplay and visual distance
    pub fn with_distance(mut self, meters: f32) -> Self {
        self.gameplay_distance = meters;
        self.visual_distance = meters;
        self
    }

    pub fn with_reported(mut self, reported: ReportedCombat) -> Self {
        self.reported = Some(reported);
        self
    }

    pub fn kind(&self) -> EntityKind {
        match self.details {
            EntityDetails::Player(_) => EntityKind::Player,
            EntityDetails::Npc(_) => EntityKind::Npc,
            EntityDetails::Gadget(_) => EntityKind::Gadget,
            EntityDetails::AttackTarget(_) => EntityKind::AttackTarget,
            EntityDetails::Item(_) => EntityKind::Item,
        }
    }

    /// Attitude for characters; `Unknown` for everything else
    pub fn attitude(&self) -> Attitude {
        match &self.details {
            EntityDetails::Player(p) => p.attitude,
            EntityDetails::Npc(n) => n.attitude,
            _ => Attitude::Unknown,
        }
    }

    /// Rank for NPCs; `Normal` for everything else
    pub fn rank(&self) -> Rank {
        match &self.details {
            EntityDetails::Npc(n) => n.rank,
            _ => Rank::Normal,
        }
    }

    pub fn is_hostile_player(&self) -> bool {
        matches!(&self.details, EntityDetails::Player(p) if p.attitude == Attitude::Hostile)
    }

    pub fn gadget_type(&self) -> Option<GadgetType> {
        match &self.details {
            EntityDetails::Gadget(g) => Some(g.gadget_type),
            _ => None,
        }
    }
}

impl fmt::Display for Attitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attitude::Hostile => "Hostile",
            Attitude::Friendly => "Friendly",
            Attitude::Neutral => "Neutral",
            Attitude::Indifferent => "Indifferent",
            Attitude::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rank::Normal => "Normal",
            Rank::Ambient => "Ambient",
            Rank::Veteran => "Veteran",
            Rank::Elite => "Elite",
            Rank::Champion => "Champion",
            Rank::Legendary => "Legendary",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rarity::Junk => "Junk",
            Rarity::Common => "Common",
            Rarity::Fine => "Fine",
            Rarity::Masterwork => "Masterwork",
            Rarity::Rare => "Rare",
            Rarity::Exotic => "Exotic",
            Rarity::Ascended => "Ascended",
            Rarity::Legendary => "Legendary",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Profession::None => "Unknown",
            Profession::Guardian => "Guardian",
            Profession::Warrior => "Warrior",
            Profession::Engineer => "Engineer",
            Profession::Ranger => "Ranger",
            Profession::Thief => "Thief",
            Profession::Elementalist => "Elementalist",
            Profession::Mesmer => "Mesmer",
            Profession::Necromancer => "Necromancer",
            Profession::Revenant => "Revenant",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Race::Asura => "Asura",
            Race::Charr => "Charr",
            Race::Human => "Human",
            Race::Norn => "Norn",
            Race::Sylvari => "Sylvari",
            Race::None => "Unknown",
        };
        f.write_str(name)
    }
}

impl fmt::Display for GadgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GadgetType::Destructible => "Destructible",
            GadgetType::Point => "Point",
            GadgetType::Crafting => "Crafting Station",
            GadgetType::Door => "Door",
            GadgetType::Interact => "Interactive",
            GadgetType::PlayerSpecific => "Player Specific",
            GadgetType::AttackTarget => "Attack Target",
            GadgetType::MapPortal => "Portal",
            GadgetType::Waypoint => "Waypoint",
            GadgetType::ResourceNode => "Resource Node",
            GadgetType::Prop => "Prop",
            GadgetType::PlayerCreated => "Player Created",
            GadgetType::Vista => "Vista",
            GadgetType::BuildSite => "Build Site",
            GadgetType::Generic | GadgetType::Generic2 => "Generic",
            GadgetType::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ResourceNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceNodeType::Plant => "Plant",
            ResourceNodeType::Tree => "Tree",
            ResourceNodeType::Rock => "Rock",
            ResourceNodeType::Quest => "Quest",
        };
        f.write_str(name)
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EquipmentSlot::Helm => "Helm",
            EquipmentSlot::Shoulders => "Shoulders",
            EquipmentSlot::Chest => "Chest",
            EquipmentSlot::Gloves => "Gloves",
            EquipmentSlot::Pants => "Pants",
            EquipmentSlot::Boots => "Boots",
            EquipmentSlot::Back => "Back",
            EquipmentSlot::Amulet => "Amulet",
            EquipmentSlot::Ring1 => "Ring 1",
            EquipmentSlot::Ring2 => "Ring 2",
            EquipmentSlot::Accessory1 => "Accessory 1",
            EquipmentSlot::Accessory2 => "Accessory 2",
            EquipmentSlot::MainhandWeapon1 => "Weapon 1",
            EquipmentSlot::OffhandWeapon1 => "Offhand 1",
            EquipmentSlot::MainhandWeapon2 => "Weapon 2",
            EquipmentSlot::OffhandWeapon2 => "Offhand 2",
        };
        f.write_str(name)
    }
}
