//! Per-entity combat state
//!
//! [`EntityCombatState`] is everything the overlay remembers about one
//! entity between frames: the health/barrier baselines used to detect
//! changes, the current damage burst, bounded event and position histories,
//! and the alive/dead state.
//!
//! It copies the few snapshot fields it needs and never refers back to a
//! snapshot.

use super::ring::RingBuffer;
use crate::entity::EntitySnapshot;
use glam::Vec3;

pub const DAMAGE_EVENT_CAPACITY: usize = 32;
pub const HEAL_EVENT_CAPACITY: usize = 16;
/// Upper bound on trail points regardless of configuration
pub const POSITION_HISTORY_CAPACITY: usize = 64;

/// Length of the death burst animation
pub const DEATH_ANIMATION_DURATION_MS: u64 = 800;

/// One detected loss of health
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    pub timestamp_ms: u64,
    pub amount: f32,
}

/// One detected gain of health, with the bar percentages around it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealEvent {
    pub timestamp_ms: u64,
    pub amount: f32,
    pub start_percent: f32,
    pub end_percent: f32,
}

/// A recorded world position for trails
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    pub position: Vec3,
    pub timestamp_ms: u64,
}

/// A floating damage number in flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageNumber {
    /// Summed magnitude of every coalesced hit
    pub amount: f32,
    /// When the current rise animation started
    pub started_ms: u64,
    /// When the most recent hit was folded in
    pub last_hit_ms: u64,
}

/// Life state of a tracked entity
///
/// `Dead` carries the timestamp of the observed transition so the death
/// burst can be timed from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifeState {
    #[default]
    Alive,
    Dead { since_ms: u64 },
}

impl LifeState {
    pub fn is_alive(&self) -> bool {
        matches!(self, LifeState::Alive)
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, LifeState::Dead { .. })
    }

    /// Time of death, `None` while alive
    pub fn death_time(&self) -> Option<u64> {
        match self {
            LifeState::Alive => None,
            LifeState::Dead { since_ms } => Some(*since_ms),
        }
    }
}

/// Cross-frame combat memory for one stable key
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCombatState {
    pub last_known_health: f32,
    pub last_known_max_health: f32,
    pub last_known_barrier: f32,
    /// Barrier after the low-pass filter
    pub animated_barrier: f32,

    /// Start of the current damage burst
    pub burst_start_ms: Option<u64>,
    pub accumulated_damage: f32,
    /// Highest health percent seen since the burst started
    pub burst_peak_percent: f32,

    pub damage_events: RingBuffer<DamageEvent, DAMAGE_EVENT_CAPACITY>,
    pub heal_events: RingBuffer<HealEvent, HEAL_EVENT_CAPACITY>,
    pub position_history: RingBuffer<PositionSample, POSITION_HISTORY_CAPACITY>,

    pub life: LifeState,

    pub last_hit_ms: Option<u64>,
    /// Health percent in the frame before the latest hit
    pub damage_flash_start_percent: f32,
    pub last_heal_ms: Option<u64>,
    /// Start percent of the current heal overlay
    pub heal_start_percent: f32,
    pub damage_number: Option<DamageNumber>,

    /// Last time anything happened: first sighting, hit, heal or revival
    pub last_activity_ms: u64,
    pub first_seen_ms: u64,
    pub last_seen_ms: u64,
}

impl EntityCombatState {
    /// A fresh baseline from the entity as it is now
    pub fn new(entity: &EntitySnapshot, now_ms: u64) -> Self {
        let mut history = RingBuffer::new();
        history.push(PositionSample {
            position: entity.position,
            timestamp_ms: now_ms,
        });
        EntityCombatState {
            last_known_health: entity.health.current,
            last_known_max_health: entity.health.max,
            last_known_barrier: entity.barrier,
            animated_barrier: entity.barrier,
            burst_start_ms: None,
            accumulated_damage: 0.0,
            burst_peak_percent: 0.0,
            damage_events: RingBuffer::new(),
            heal_events: RingBuffer::new(),
            position_history: history,
            life: if entity.health.has_max() && !entity.health.is_alive() {
                LifeState::Dead { since_ms: 0 }
            } else {
                LifeState::Alive
            },
            last_hit_ms: None,
            damage_flash_start_percent: 0.0,
            last_heal_ms: None,
            heal_start_percent: 0.0,
            damage_number: None,
            last_activity_ms: now_ms,
            first_seen_ms: now_ms,
            last_seen_ms: now_ms,
        }
    }

    /// Last known health as a fraction of last known max
    pub fn health_percent(&self) -> f32 {
        if self.last_known_max_health <= 0.0 {
            0.0
        } else {
            (self.last_known_health / self.last_known_max_health).clamp(0.0, 1.0)
        }
    }

    pub fn in_burst(&self) -> bool {
        self.burst_start_ms.is_some()
    }

    /// Damage per second over the current burst
    ///
    /// Zero until the burst is at least 100 ms old.
    pub fn burst_dps(&self, now_ms: u64) -> f32 {
        match self.burst_start_ms {
            Some(start) => {
                let elapsed = now_ms.saturating_sub(start);
                if elapsed >= super::MIN_BURST_DPS_WINDOW_MS {
                    self.accumulated_damage / (elapsed as f32 / 1000.0)
                } else {
                    0.0
                }
            }
            None => 0.0,
        }
    }

    /// Whether the death burst is still playing
    ///
    /// Entities first seen already dead never animate.
    pub fn is_death_animating(&self, now_ms: u64) -> bool {
        match self.life {
            LifeState::Dead { since_ms } if since_ms > 0 => {
                now_ms.saturating_sub(since_ms) < DEATH_ANIMATION_DURATION_MS
            }
            _ => false,
        }
    }

    /// Newest damage event
    pub fn last_damage(&self) -> Option<&DamageEvent> {
        self.damage_events.back()
    }

    /// Newest heal event
    pub fn last_heal(&self) -> Option<&HealEvent> {
        self.heal_events.back()
    }

    pub(crate) fn clear_burst(&mut self) {
        self.burst_start_ms = None;
        self.accumulated_damage = 0.0;
        self.burst_peak_percent = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityDetails, NpcInfo, StableKey};

    fn npc(health: f32) -> EntitySnapshot {
        EntitySnapshot::new(StableKey(1), Vec3::ZERO, EntityDetails::Npc(NpcInfo::default()))
            .with_health(health, 1000.0)
            .with_barrier(50.0)
    }

    #[test]
    fn test_life_state() {
        let alive = LifeState::Alive;
        assert!(alive.is_alive());
        assert_eq!(alive.death_time(), None);

        let dead = LifeState::Dead { since_ms: 5000 };
        assert!(dead.is_dead());
        assert_eq!(dead.death_time(), Some(5000));
    }

    #[test]
    fn test_new_state_is_baseline() {
        let state = EntityCombatState::new(&npc(400.0), 100);
        assert_eq!(state.last_known_health, 400.0);
        assert_eq!(state.animated_barrier, 50.0);
        assert!(!state.in_burst());
        assert!(state.life.is_alive());
        assert_eq!(state.position_history.len(), 1);
        assert!((state.health_percent() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_first_seen_dead_does_not_animate() {
        let state = EntityCombatState::new(&npc(0.0), 100);
        assert!(state.life.is_dead());
        assert!(!state.is_death_animating(150));
    }

    #[test]
    fn test_burst_dps() {
        let mut state = EntityCombatState::new(&npc(1000.0), 0);
        assert_eq!(state.burst_dps(500), 0.0);
        state.burst_start_ms = Some(1000);
        state.accumulated_damage = 100.0;
        assert_eq!(state.burst_dps(1050), 0.0);
        assert!((state.burst_dps(1100) - 1000.0).abs() < 1e-3);
        assert!((state.burst_dps(3000) - 50.0).abs() < 1e-3);
    }
}
