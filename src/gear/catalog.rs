//! Stat catalog
//!
//! Gear entries only carry a numeric stat id. The catalog maps ids to the
//! stat combination's display name and the attributes it grants. A small
//! built-in table covers the common combinations; a full table can be loaded
//! from JSON:
//!
//! ```json
//! [
//!   { "id": 161, "name": "Berserker's", "attributes": ["Power", "Precision", "CritDamage"] }
//! ]
//! ```

use crate::color::{palette, Rgba};
use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Attributes a stat combination can grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Power,
    Precision,
    Toughness,
    Vitality,
    CritDamage,
    Healing,
    ConditionDamage,
    BoonDuration,
    ConditionDuration,
}

/// Broad role of an attribute, used to color attribute summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TacticalRole {
    Offense,
    Defense,
    Support,
}

impl Attribute {
    /// Short label for compact displays
    pub fn short_name(self) -> &'static str {
        match self {
            Attribute::Power => "Power",
            Attribute::Precision => "Precision",
            Attribute::Toughness => "Toughness",
            Attribute::Vitality => "Vitality",
            Attribute::CritDamage => "Ferocity",
            Attribute::Healing => "Healing",
            Attribute::ConditionDamage => "Condi Dmg",
            Attribute::BoonDuration => "Boon Dura",
            Attribute::ConditionDuration => "Condi Dura",
        }
    }

    pub fn role(self) -> TacticalRole {
        match self {
            Attribute::Power | Attribute::Precision | Attribute::CritDamage | Attribute::ConditionDamage => {
                TacticalRole::Offense
            }
            Attribute::Toughness | Attribute::Vitality => TacticalRole::Defense,
            Attribute::Healing | Attribute::BoonDuration | Attribute::ConditionDuration => TacticalRole::Support,
        }
    }

    pub fn tactical_color(self) -> Rgba {
        match self.role() {
            TacticalRole::Offense => palette::TACTICAL_OFFENSE,
            TacticalRole::Defense => palette::TACTICAL_DEFENSE,
            TacticalRole::Support => palette::TACTICAL_SUPPORT,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// One stat combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDefinition {
    pub id: u32,
    pub name: String,
    pub attributes: Vec<Attribute>,
}

/// Lookup table from stat id to [`StatDefinition`]
#[derive(Debug, Clone, Default)]
pub struct StatCatalog {
    stats: HashMap<u32, StatDefinition>,
}

impl StatCatalog {
    /// An empty catalog; every gear entry counts as "No Stats"
    pub fn empty() -> Self {
        StatCatalog::default()
    }

    /// The built-in table of common stat combinations
    pub fn builtin() -> Self {
        use Attribute::*;
        let table: [(u32, &str, &[Attribute]); 13] = [
            (161, "Berserker's", &[Power, Precision, CritDamage]),
            (160, "Soldier's", &[Power, Toughness, Vitality]),
            (155, "Valkyrie's", &[Power, Vitality, CritDamage]),
            (1026, "Assassin's", &[Precision, Power, CritDamage]),
            (1130, "Viper's", &[Power, ConditionDamage, Precision, ConditionDuration]),
            (1067, "Sinister's", &[ConditionDamage, Power, Precision]),
            (1125, "Harrier's", &[Power, Healing, BoonDuration]),
            (1123, "Minstrel's", &[Toughness, Healing, Vitality, BoonDuration]),
            (
                656,
                "Celestial",
                &[
                    Power,
                    Precision,
                    Toughness,
                    Vitality,
                    CritDamage,
                    Healing,
                    ConditionDamage,
                    BoonDuration,
                    ConditionDuration,
                ],
            ),
            (1430, "Trailblazer's", &[Toughness, ConditionDamage, Vitality, ConditionDuration]),
            (1097, "Diviner's", &[Power, BoonDuration, Precision, CritDamage]),
            (584, "Cleric's", &[Healing, Power, Toughness]),
            (1111, "Dire", &[ConditionDamage, Toughness, Vitality]),
        ];

        let stats = table
            .into_iter()
            .map(|(id, name, attributes)| {
                (
                    id,
                    StatDefinition {
                        id,
                        name: name.to_string(),
                        attributes: attributes.to_vec(),
                    },
                )
            })
            .collect();
        StatCatalog { stats }
    }

    /// Parses a JSON array of [`StatDefinition`]s
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let definitions: Vec<StatDefinition> = serde_json::from_str(json)?;
        let mut stats = HashMap::with_capacity(definitions.len());
        for definition in definitions {
            let id = definition.id;
            if stats.insert(id, definition).is_some() {
                return Err(CatalogError::DuplicateId(id));
            }
        }
        Ok(StatCatalog { stats })
    }

    /// Looks up a stat id; 0 and unknown ids return `None`
    pub fn get(&self, stat_id: u32) -> Option<&StatDefinition> {
        if stat_id == 0 {
            return None;
        }
        self.stats.get(&stat_id)
    }

    pub fn name(&self, stat_id: u32) -> Option<&str> {
        self.get(stat_id).map(|s| s.name.as_str())
    }

    pub fn attributes(&self, stat_id: u32) -> &[Attribute] {
        self.get(stat_id).map_or(&[], |s| s.attributes.as_slice())
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}
