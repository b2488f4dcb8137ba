//! Combat tracking across frames
//!
//! Snapshots only say how much health an entity has right now. This module
//! turns frame-to-frame differences into damage and heal events, damage
//! bursts, deaths and revivals, and keeps a short position history for
//! trails.
//!
//! # Architecture
//!
//! - `ring`: fixed-capacity [`RingBuffer`] used for every history
//! - `state`: [`EntityCombatState`], the memory kept per stable key
//! - `store`: [`CombatStateStore`], which owns the states and runs the
//!   per-frame update pass and eviction
//!
//! # Example
//!
//! ```rust
//! use entity_overlay::combat::CombatStateStore;
//! use entity_overlay::entity::{EntityDetails, EntitySnapshot, NpcInfo, StableKey};
//! use entity_overlay::settings::Config;
//! use glam::Vec3;
//!
//! let config = Config::default();
//! let mut store = CombatStateStore::new();
//! let npc = |hp: f32| {
//!     EntitySnapshot::new(StableKey(1), Vec3::ZERO, EntityDetails::Npc(NpcInfo::default()))
//!         .with_health(hp, 1000.0)
//! };
//!
//! store.update(&npc(1000.0), 0, &config);
//! let state = store.update(&npc(900.0), 1000, &config);
//! assert_eq!(state.accumulated_damage, 100.0);
//! assert!((store.burst_dps(StableKey(1), 1100) - 1000.0).abs() < 0.1);
//! ```

pub mod ring;
pub mod state;
pub mod store;

pub use ring::RingBuffer;
pub use state::{DamageEvent, DamageNumber, EntityCombatState, HealEvent, LifeState, PositionSample};
pub use store::CombatStateStore;

/// Health changes smaller than this are noise
pub const HEALTH_DELTA_EPSILON: f32 = 0.01;

/// A burst ends once this long has passed since it started with no new damage
pub const BURST_WINDOW_MS: u64 = 3000;

/// Heals closer together than this extend one overlay
pub const BURST_HEAL_WINDOW_MS: u64 = 350;

/// Hits closer together than this share one damage number
pub const DAMAGE_NUMBER_COALESCE_MS: u64 = 400;

/// Max-health changes larger than this are state changes, not damage
pub const MAX_HEALTH_CHANGE_THRESHOLD: f32 = 1.0;

/// Minimum movement in meters before a new trail point is recorded
pub const MIN_POSITION_CHANGE: f32 = 0.1;

/// Time constant of the barrier low-pass filter
pub const BARRIER_TIME_CONSTANT_MS: f32 = 80.0;

/// Burst DPS stays 0 until the burst is this old
pub const MIN_BURST_DPS_WINDOW_MS: u64 = 100;
