//! Combat state store
//!
//! The store owns one [`EntityCombatState`] per stable key and runs the
//! update pass: once per entity per frame, before any animation or rendering
//! reads the state.
//!
//! # Update Pass
//!
//! 1. First sighting creates a baseline; nothing is recorded
//! 2. A max-health jump (downed, mount, transform) moves the baselines and
//!    skips the frame
//! 3. A gadget dropping from full to zero is a respawn, not a death
//! 4. The barrier low-pass filter advances by the frame's `dt`
//! 5. The health delta becomes damage or heal events
//! 6. Death and revival transitions
//! 7. A burst with no damage for 3 s is reset
//! 8. Position history is sampled and aged
//!
//! Entries unseen for longer than the configured TTL are evicted by
//! [`CombatStateStore::evict_stale`] at the end of the frame.

use super::state::{
    DamageEvent, DamageNumber, EntityCombatState, HealEvent, LifeState, PositionSample, POSITION_HISTORY_CAPACITY,
};
use super::{
    BARRIER_TIME_CONSTANT_MS, BURST_HEAL_WINDOW_MS, BURST_WINDOW_MS, DAMAGE_NUMBER_COALESCE_MS, HEALTH_DELTA_EPSILON,
    MAX_HEALTH_CHANGE_THRESHOLD, MIN_POSITION_CHANGE,
};
use crate::entity::{EntityKind, EntitySnapshot, StableKey};
use crate::settings::{Config, HealthDeltaPolicy, TrailSettings};
use std::collections::HashMap;
use tracing::trace;

/// Process-wide combat memory, keyed by stable key
#[derive(Debug, Default)]
pub struct CombatStateStore {
    states: HashMap<StableKey, EntityCombatState>,
}

impl CombatStateStore {
    pub fn new() -> Self {
        CombatStateStore {
            states: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, key: StableKey) -> Option<&EntityCombatState> {
        self.states.get(&key)
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Burst DPS for a key, 0 when untracked
    pub fn burst_dps(&self, key: StableKey, now_ms: u64) -> f32 {
        self.get(key).map_or(0.0, |s| s.burst_dps(now_ms))
    }

    /// Runs the update pass for one entity and returns its state
    pub fn update(&mut self, entity: &EntitySnapshot, now_ms: u64, config: &Config) -> &EntityCombatState {
        let trail = &config.players.trails;
        let policy = config.combat.delta_policy;

        let state = self
            .states
            .entry(entity.key)
            .and_modify(|state| apply_update(state, entity, now_ms, policy, trail))
            .or_insert_with(|| {
                trace!(key = entity.key.0, "tracking new entity");
                EntityCombatState::new(entity, now_ms)
            });
        &*state
    }

    /// Drops entries unseen for more than `ttl_ms`, returning how many went
    pub fn evict_stale(&mut self, now_ms: u64, ttl_ms: u64) -> usize {
        let before = self.states.len();
        self.states
            .retain(|_, state| now_ms.saturating_sub(state.last_seen_ms) <= ttl_ms);
        let evicted = before - self.states.len();
        if evicted > 0 {
            trace!(evicted, remaining = self.states.len(), "evicted stale combat state");
        }
        evicted
    }
}

fn apply_update(
    state: &mut EntityCombatState,
    entity: &EntitySnapshot,
    now_ms: u64,
    policy: HealthDeltaPolicy,
    trail: &TrailSettings,
) {
    // Clock regression counts as no time passing
    let dt_ms = now_ms.saturating_sub(state.last_seen_ms);
    let now_ms = now_ms.max(state.last_seen_ms);

    let health = entity.health.current;
    let max_health = entity.health.max;

    if state.last_known_max_health > 0.0 && (max_health - state.last_known_max_health).abs() > MAX_HEALTH_CHANGE_THRESHOLD {
        swallow_max_health_change(state, entity, now_ms);
        finish_update(state, entity, now_ms, trail);
        return;
    }

    if entity.kind() == EntityKind::Gadget
        && state.last_known_max_health > 0.0
        && state.last_known_health >= state.last_known_max_health
        && health <= 0.0
    {
        trace!(key = entity.key.0, "gadget respawn");
        let first_seen = state.first_seen_ms;
        let history = state.position_history;
        *state = EntityCombatState::new(entity, now_ms);
        state.first_seen_ms = first_seen;
        state.position_history = history;
        state.life = LifeState::Alive;
        finish_update(state, entity, now_ms, trail);
        return;
    }

    advance_barrier(state, entity.barrier, dt_ms);

    let previous_percent = state.health_percent();
    let current_percent = entity.health.percentage();
    let delta = state.last_known_health - health;

    match (policy, entity.reported) {
        (HealthDeltaPolicy::SeparateEvents, Some(reported)) => {
            if reported.damage > HEALTH_DELTA_EPSILON {
                record_damage(state, reported.damage, previous_percent, now_ms);
            }
            if reported.healing > HEALTH_DELTA_EPSILON {
                record_heal(state, reported.healing, previous_percent, current_percent, now_ms);
            }
        }
        _ => {
            if delta > HEALTH_DELTA_EPSILON {
                record_damage(state, delta, previous_percent, now_ms);
            } else if delta < -HEALTH_DELTA_EPSILON {
                record_heal(state, -delta, previous_percent, current_percent, now_ms);
            }
        }
    }

    update_life(state, entity, now_ms);

    if state.in_burst() {
        state.burst_peak_percent = state.burst_peak_percent.max(current_percent);
    }

    if let Some(start) = state.burst_start_ms {
        let quiet = state
            .last_hit_ms
            .is_none_or(|hit| now_ms.saturating_sub(hit) > BURST_WINDOW_MS);
        if now_ms.saturating_sub(start) > BURST_WINDOW_MS && quiet {
            state.clear_burst();
        }
    }

    finish_update(state, entity, now_ms, trail);
}

fn swallow_max_health_change(state: &mut EntityCombatState, entity: &EntitySnapshot, now_ms: u64) {
    trace!(
        key = entity.key.0,
        old_max = state.last_known_max_health,
        new_max = entity.health.max,
        "max health changed, skipping delta"
    );
    state.last_known_barrier = entity.barrier;
    state.animated_barrier = entity.barrier;
    if entity.health.is_alive() {
        state.life = LifeState::Alive;
        state.clear_burst();
    } else {
        // The delta is dropped, but a death in this frame still counts
        update_life(state, entity, now_ms);
    }
}

fn advance_barrier(state: &mut EntityCombatState, barrier: f32, dt_ms: u64) {
    if dt_ms == 0 {
        return;
    }
    let k = 1.0 - (-(dt_ms as f32) / BARRIER_TIME_CONSTANT_MS).exp();
    state.animated_barrier += (barrier - state.animated_barrier) * k;
    if (state.animated_barrier - barrier).abs() < 0.5 {
        state.animated_barrier = barrier;
    }
}

fn record_damage(state: &mut EntityCombatState, amount: f32, previous_percent: f32, now_ms: u64) {
    state.damage_events.push(DamageEvent {
        timestamp_ms: now_ms,
        amount,
    });
    state.accumulated_damage += amount;
    if state.burst_start_ms.is_none() {
        state.burst_start_ms = Some(now_ms);
        state.burst_peak_percent = previous_percent;
    }
    state.last_hit_ms = Some(now_ms);
    state.damage_flash_start_percent = previous_percent;
    state.last_activity_ms = now_ms;

    state.damage_number = Some(match state.damage_number {
        Some(number) if now_ms.saturating_sub(number.last_hit_ms) <= DAMAGE_NUMBER_COALESCE_MS => DamageNumber {
            amount: number.amount + amount,
            started_ms: now_ms,
            last_hit_ms: now_ms,
        },
        _ => DamageNumber {
            amount,
            started_ms: now_ms,
            last_hit_ms: now_ms,
        },
    });
}

fn record_heal(state: &mut EntityCombatState, amount: f32, previous_percent: f32, current_percent: f32, now_ms: u64) {
    let within_burst = state
        .last_heal_ms
        .is_some_and(|last| now_ms.saturating_sub(last) <= BURST_HEAL_WINDOW_MS);
    if !within_burst {
        state.heal_start_percent = previous_percent;
    }
    state.heal_events.push(HealEvent {
        timestamp_ms: now_ms,
        amount,
        start_percent: previous_percent,
        end_percent: current_percent,
    });
    state.last_heal_ms = Some(now_ms);
    state.last_activity_ms = now_ms;
}

fn update_life(state: &mut EntityCombatState, entity: &EntitySnapshot, now_ms: u64) {
    if !entity.health.has_max() {
        return;
    }
    let health = entity.health.current;
    match state.life {
        LifeState::Alive if state.last_known_health > 0.0 && health <= 0.0 => {
            trace!(key = entity.key.0, "entity died");
            state.life = LifeState::Dead { since_ms: now_ms };
        }
        LifeState::Dead { .. } if health > 0.0 => {
            trace!(key = entity.key.0, "entity revived");
            state.life = LifeState::Alive;
            state.clear_burst();
            state.last_hit_ms = None;
            state.last_heal_ms = None;
            state.damage_number = None;
            state.last_activity_ms = now_ms;
        }
        _ => {}
    }
}

fn finish_update(state: &mut EntityCombatState, entity: &EntitySnapshot, now_ms: u64, trail: &TrailSettings) {
    record_position(state, entity, now_ms, trail);
    state.last_known_health = entity.health.current;
    state.last_known_max_health = entity.health.max;
    state.last_known_barrier = entity.barrier;
    state.last_seen_ms = now_ms;
}

fn record_position(state: &mut EntityCombatState, entity: &EntitySnapshot, now_ms: u64, trail: &TrailSettings) {
    let history = &mut state.position_history;
    let moved = history
        .back()
        .is_none_or(|last| last.position.distance(entity.position) >= MIN_POSITION_CHANGE);
    if moved {
        history.push(PositionSample {
            position: entity.position,
            timestamp_ms: now_ms,
        });
    }
    history.keep_newest(trail.max_points.clamp(1, POSITION_HISTORY_CAPACITY));
    let max_age = trail.max_duration_ms;
    history.drop_front_while(|sample| now_ms.saturating_sub(sample.timestamp_ms) > max_age);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityDetails, GadgetInfo, NpcInfo, PlayerInfo, ReportedCombat};
    use glam::Vec3;

    fn npc(health: f32, max: f32) -> EntitySnapshot {
        EntitySnapshot::new(StableKey(42), Vec3::ZERO, EntityDetails::Npc(NpcInfo::default())).with_health(health, max)
    }

    fn player_at(pos: Vec3) -> EntitySnapshot {
        EntitySnapshot::new(StableKey(7), pos, EntityDetails::Player(PlayerInfo::default())).with_health(100.0, 100.0)
    }

    #[test]
    fn test_first_sighting_records_nothing() {
        let mut store = CombatStateStore::new();
        let state = store.update(&npc(500.0, 1000.0), 0, &Config::default());
        assert!(state.damage_events.is_empty());
        assert!(state.heal_events.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_damage_burst() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&npc(1000.0, 1000.0), 0, &config);
        let state = store.update(&npc(900.0, 1000.0), 1000, &config);

        assert_eq!(
            state.last_damage(),
            Some(&DamageEvent {
                timestamp_ms: 1000,
                amount: 100.0
            })
        );
        assert_eq!(state.burst_start_ms, Some(1000));
        assert_eq!(state.accumulated_damage, 100.0);
        assert_eq!(state.burst_peak_percent, 1.0);
        assert!((store.burst_dps(StableKey(42), 1100) - 1000.0).abs() < 1e-2);
    }

    #[test]
    fn test_tiny_delta_ignored() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&npc(1000.0, 1000.0), 0, &config);
        let state = store.update(&npc(999.995, 1000.0), 16, &config);
        assert!(state.damage_events.is_empty());
    }

    #[test]
    fn test_heal_event_percentages() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&npc(400.0, 1000.0), 0, &config);
        let state = store.update(&npc(700.0, 1000.0), 16, &config);
        let heal = state.last_heal().unwrap();
        assert!((heal.start_percent - 0.4).abs() < 1e-6);
        assert!((heal.end_percent - 0.7).abs() < 1e-6);
        assert_eq!(heal.amount, 300.0);
        assert!((state.heal_start_percent - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_rapid_heals_keep_overlay_start() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&npc(400.0, 1000.0), 0, &config);
        store.update(&npc(500.0, 1000.0), 100, &config);
        let state = store.update(&npc(600.0, 1000.0), 300, &config);
        assert!((state.heal_start_percent - 0.4).abs() < 1e-6);

        let state = store.update(&npc(700.0, 1000.0), 1000, &config);
        assert!((state.heal_start_percent - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_death_is_idempotent_and_revival_resets() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&npc(500.0, 1000.0), 4000, &config);
        let state = store.update(&npc(0.0, 1000.0), 5000, &config);
        assert_eq!(state.life, LifeState::Dead { since_ms: 5000 });

        for t in [5100, 5200, 5300] {
            let state = store.update(&npc(0.0, 1000.0), t, &config);
            assert_eq!(state.life.death_time(), Some(5000));
        }

        let state = store.update(&npc(50.0, 1000.0), 5500, &config);
        assert!(state.life.is_alive());
        assert!(!state.in_burst());
        assert_eq!(state.last_hit_ms, None);
        assert_eq!(state.last_heal_ms, None);
    }

    #[test]
    fn test_burst_resets_after_quiet_window() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&npc(1000.0, 1000.0), 0, &config);
        store.update(&npc(900.0, 1000.0), 1000, &config);
        let state = store.update(&npc(900.0, 1000.0), 3500, &config);
        assert!(state.in_burst());
        let state = store.update(&npc(900.0, 1000.0), 4100, &config);
        assert!(!state.in_burst());
        assert_eq!(state.accumulated_damage, 0.0);
    }

    #[test]
    fn test_max_health_change_is_swallowed() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&npc(1000.0, 1000.0), 0, &config);
        let state = store.update(&npc(200.0, 250.0), 16, &config);
        assert!(state.damage_events.is_empty());
        assert_eq!(state.last_known_max_health, 250.0);
        let state = store.update(&npc(150.0, 250.0), 32, &config);
        assert_eq!(state.last_damage().map(|d| d.amount), Some(50.0));
    }

    #[test]
    fn test_death_during_max_health_change() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&npc(500.0, 1000.0), 0, &config);
        let state = store.update(&npc(0.0, 800.0), 16, &config);
        assert!(state.damage_events.is_empty());
        assert_eq!(state.life, LifeState::Dead { since_ms: 16 });

        let state = store.update(&npc(0.0, 800.0), 32, &config);
        assert_eq!(state.life.death_time(), Some(16));
    }

    #[test]
    fn test_gadget_respawn_is_not_death() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        let gadget = |health: f32| {
            EntitySnapshot::new(StableKey(9), Vec3::ZERO, EntityDetails::Gadget(GadgetInfo::default()))
                .with_health(health, 5000.0)
        };
        store.update(&gadget(5000.0), 0, &config);
        let state = store.update(&gadget(0.0), 16, &config);
        assert!(state.life.is_alive());
        assert!(state.damage_events.is_empty());
    }

    #[test]
    fn test_net_delta_policy_ignores_breakdown() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&npc(1000.0, 1000.0), 0, &config);
        let snapshot = npc(950.0, 1000.0).with_reported(ReportedCombat {
            damage: 150.0,
            healing: 100.0,
        });
        let state = store.update(&snapshot, 16, &config);
        assert_eq!(state.damage_events.len(), 1);
        assert_eq!(state.last_damage().map(|d| d.amount), Some(50.0));
        assert!(state.heal_events.is_empty());
    }

    #[test]
    fn test_separate_events_policy() {
        let mut config = Config::default();
        config.combat.delta_policy = HealthDeltaPolicy::SeparateEvents;
        let mut store = CombatStateStore::new();
        store.update(&npc(1000.0, 1000.0), 0, &config);
        let snapshot = npc(950.0, 1000.0).with_reported(ReportedCombat {
            damage: 150.0,
            healing: 100.0,
        });
        let state = store.update(&snapshot, 16, &config);
        assert_eq!(state.last_damage().map(|d| d.amount), Some(150.0));
        assert_eq!(state.last_heal().map(|h| h.amount), Some(100.0));
        assert_eq!(state.accumulated_damage, 150.0);

        // Without a breakdown the net delta is used
        let state = store.update(&npc(900.0, 1000.0), 32, &config);
        assert_eq!(state.last_damage().map(|d| d.amount), Some(50.0));
    }

    #[test]
    fn test_damage_numbers_coalesce() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&npc(1000.0, 1000.0), 0, &config);
        store.update(&npc(900.0, 1000.0), 100, &config);
        let state = store.update(&npc(850.0, 1000.0), 400, &config);
        let number = state.damage_number.unwrap();
        assert_eq!(number.amount, 150.0);
        assert_eq!(number.started_ms, 400);

        let state = store.update(&npc(800.0, 1000.0), 1000, &config);
        assert_eq!(state.damage_number.unwrap().amount, 50.0);
    }

    #[test]
    fn test_barrier_low_pass() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&npc(1000.0, 1000.0), 0, &config);
        let state = store.update(&npc(1000.0, 1000.0).with_barrier(100.0), 80, &config);
        // One time constant covers ~63% of the step
        assert!((state.animated_barrier - 63.2).abs() < 0.5);

        // A regressing clock does not advance the filter
        let before = state.animated_barrier;
        let state = store.update(&npc(1000.0, 1000.0).with_barrier(100.0), 40, &config);
        assert_eq!(state.animated_barrier, before);
    }

    #[test]
    fn test_position_history_threshold_and_age() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&player_at(Vec3::ZERO), 0, &config);
        let state = store.update(&player_at(Vec3::new(0.05, 0.0, 0.0)), 16, &config);
        assert_eq!(state.position_history.len(), 1);

        let state = store.update(&player_at(Vec3::new(1.0, 0.0, 0.0)), 32, &config);
        assert_eq!(state.position_history.len(), 2);

        let state = store.update(&player_at(Vec3::new(2.0, 0.0, 0.0)), 1020, &config);
        // The sample from t=0 is older than 1000 ms
        assert_eq!(state.position_history.len(), 2);
        assert_eq!(state.position_history.front().map(|p| p.timestamp_ms), Some(32));
    }

    #[test]
    fn test_position_history_point_cap() {
        let mut config = Config::default();
        config.players.trails.max_points = 5;
        config.players.trails.max_duration_ms = 100_000;
        let mut store = CombatStateStore::new();
        for i in 0..20 {
            store.update(&player_at(Vec3::new(i as f32, 0.0, 0.0)), i * 16, &config);
        }
        assert_eq!(store.get(StableKey(7)).unwrap().position_history.len(), 5);
    }

    #[test]
    fn test_eviction() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&npc(1000.0, 1000.0), 0, &config);
        store.update(&player_at(Vec3::ZERO), 2500, &config);
        assert_eq!(store.evict_stale(3000, 3000), 0);
        assert_eq!(store.evict_stale(3001, 3000), 1);
        assert!(store.get(StableKey(42)).is_none());
        assert!(store.get(StableKey(7)).is_some());
    }
}
