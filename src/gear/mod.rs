//! Gear summarization
//!
//! Turns a player's equipment list into short ranked summaries for the
//! details panel:
//!
//! - [`compact_summary`]: the most common stat combinations, with the highest
//!   rarity seen for each
//! - [`top_attributes`]: the most common attributes across all combinations
//! - [`highest_rarity`]: the best rarity of any equipped item
//!
//! Entries with stat id 0 or an id the catalog does not know count as
//! "No Stats" and are left out of both summaries. Ranking is a stable sort on
//! percentage, so ties keep the order in which stats were first seen.
//!
//! # Example
//!
//! ```rust
//! use entity_overlay::entity::{EquipmentSlot, GearEntry, Rarity};
//! use entity_overlay::gear::{compact_summary, StatCatalog};
//!
//! let gear = [
//!     GearEntry { slot: EquipmentSlot::Helm, stat_id: 161, rarity: Rarity::Ascended },
//!     GearEntry { slot: EquipmentSlot::Chest, stat_id: 161, rarity: Rarity::Exotic },
//!     GearEntry { slot: EquipmentSlot::Boots, stat_id: 160, rarity: Rarity::Exotic },
//! ];
//! let catalog = StatCatalog::builtin();
//! let summary = compact_summary(&gear, &catalog);
//! assert_eq!(summary[0].name, "Berserker's");
//! assert_eq!(summary[0].highest_rarity, Rarity::Ascended);
//! ```

pub mod catalog;

pub use catalog::{Attribute, StatCatalog, StatDefinition, TacticalRole};

use crate::entity::{GearEntry, Rarity};
use smallvec::SmallVec;

/// How many entries each summary keeps
pub const SUMMARY_TOP_COUNT: usize = 3;

/// One stat combination in a compact summary
#[derive(Debug, Clone, PartialEq)]
pub struct CompactStat<'a> {
    pub name: &'a str,
    pub count: usize,
    /// Share of typed items, 0-100
    pub percentage: f32,
    pub highest_rarity: Rarity,
}

/// One attribute in an attribute summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominantAttribute {
    pub attribute: Attribute,
    pub count: usize,
    /// Share of all attribute occurrences, 0-100
    pub percentage: f32,
}

pub type CompactSummary<'a> = SmallVec<[CompactStat<'a>; SUMMARY_TOP_COUNT]>;
pub type AttributeSummary = SmallVec<[DominantAttribute; SUMMARY_TOP_COUNT]>;

/// Top stat combinations by share of typed items
pub fn compact_summary<'a>(gear: &[GearEntry], catalog: &'a StatCatalog) -> CompactSummary<'a> {
    let mut stats: SmallVec<[CompactStat<'a>; 16]> = SmallVec::new();
    let mut typed_items = 0usize;

    for entry in gear {
        let Some(name) = catalog.name(entry.stat_id) else {
            continue;
        };
        typed_items += 1;
        match stats.iter_mut().find(|s| s.name == name) {
            Some(stat) => {
                stat.count += 1;
                stat.highest_rarity = stat.highest_rarity.max(entry.rarity);
            }
            None => stats.push(CompactStat {
                name,
                count: 1,
                percentage: 0.0,
                highest_rarity: entry.rarity,
            }),
        }
    }
    if typed_items == 0 {
        return SmallVec::new();
    }

    for stat in stats.iter_mut() {
        stat.percentage = stat.count as f32 / typed_items as f32 * 100.0;
    }
    stats.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    stats.into_iter().take(SUMMARY_TOP_COUNT).collect()
}

/// Top attributes by share of all attribute occurrences
pub fn top_attributes(gear: &[GearEntry], catalog: &StatCatalog) -> AttributeSummary {
    let mut counts: SmallVec<[(Attribute, usize); 16]> = SmallVec::new();
    for entry in gear {
        for &attribute in catalog.attributes(entry.stat_id) {
            match counts.iter_mut().find(|(a, _)| *a == attribute) {
                Some((_, count)) => *count += 1,
                None => counts.push((attribute, 1)),
            }
        }
    }

    let total: usize = counts.iter().map(|(_, c)| c).sum();
    if total == 0 {
        return SmallVec::new();
    }

    let mut ranked: SmallVec<[DominantAttribute; 16]> = counts
        .into_iter()
        .map(|(attribute, count)| DominantAttribute {
            attribute,
            count,
            percentage: count as f32 / total as f32 * 100.0,
        })
        .collect();
    ranked.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    ranked.into_iter().take(SUMMARY_TOP_COUNT).collect()
}

/// Best rarity of any equipped item
pub fn highest_rarity(gear: &[GearEntry]) -> Option<Rarity> {
    gear.iter().map(|entry| entry.rarity).max()
}
