//! Health bar animation engine
//!
//! Animations are pure functions of a combat state and the current time:
//! nothing here mutates state or runs between frames. Each frame the
//! pipeline asks [`HealthBarAnimator::animate`] for a
//! [`HealthBarAnimationState`], and the status bar renderer draws from it.
//!
//! # Channels
//!
//! - bar fade: full while combat is recent, `idle_alpha` once idle, hidden
//!   for idle non-hostile NPCs when configured
//! - damage accumulator: holds the burst's peak health percent, then recedes
//! - damage and heal flashes: exponential decay from 1
//! - damage number: rises and fades over 1.2 s
//! - heal overlay: from the heal's start percent to the current percent
//! - barrier: the low-pass filtered amount from the combat state
//! - death burst: shrinks and fades over 800 ms
//!
//! While dead only the death burst is active.

use crate::combat::state::DEATH_ANIMATION_DURATION_MS;
use crate::combat::{EntityCombatState, LifeState};
use crate::settings::CombatSettings;
use crate::stats::Pool;

/// Fade from full opacity to the idle alpha once the idle delay passes
pub const IDLE_FADE_DURATION_MS: u64 = 500;

pub const ACCUMULATOR_HOLD_MS: u64 = 1800;
pub const ACCUMULATOR_FADE_MS: u64 = 1000;

pub const DAMAGE_FLASH_HALF_LIFE_MS: f32 = 120.0;
pub const HEAL_FLASH_HALF_LIFE_MS: f32 = 80.0;
/// Flashes below this alpha are treated as finished
pub const FLASH_CUTOFF: f32 = 0.01;

pub const DAMAGE_NUMBER_TTL_MS: u64 = 1200;
/// Fraction of the damage number's life spent fading in
pub const DAMAGE_NUMBER_FADE_IN: f32 = 0.15;
pub const DAMAGE_NUMBER_MAX_RISE: f32 = 50.0;

pub const HEAL_OVERLAY_TTL_MS: u64 = 2000;
pub const HEAL_OVERLAY_FADE_MS: u64 = 400;

/// Death burst width at the end of the animation
pub const DEATH_BURST_MIN_WIDTH: f32 = 0.3;

pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// `0.5^(elapsed / half_life)`, snapped to 0 below the cutoff
pub fn flash_decay(elapsed_ms: u64, half_life_ms: f32) -> f32 {
    let alpha = 0.5f32.powf(elapsed_ms as f32 / half_life_ms);
    if alpha < FLASH_CUTOFF { 0.0 } else { alpha }
}

/// Every animated value the status bar renderer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthBarAnimationState {
    pub dead: bool,
    pub health_bar_fade_alpha: f32,

    pub damage_accumulator_percent: f32,
    pub damage_accumulator_alpha: f32,

    pub damage_flash_alpha: f32,
    pub damage_flash_start_percent: f32,

    pub damage_number_to_display: f32,
    pub damage_number_alpha: f32,
    pub damage_number_y_offset: f32,

    pub heal_overlay_start_percent: f32,
    pub heal_overlay_end_percent: f32,
    pub heal_overlay_alpha: f32,
    pub heal_flash_alpha: f32,

    pub animated_barrier: f32,

    pub death_burst_alpha: f32,
    pub death_burst_width: f32,
}

impl Default for HealthBarAnimationState {
    fn default() -> Self {
        HealthBarAnimationState {
            dead: false,
            health_bar_fade_alpha: 1.0,
            damage_accumulator_percent: 0.0,
            damage_accumulator_alpha: 0.0,
            damage_flash_alpha: 0.0,
            damage_flash_start_percent: 0.0,
            damage_number_to_display: 0.0,
            damage_number_alpha: 0.0,
            damage_number_y_offset: 0.0,
            heal_overlay_start_percent: 0.0,
            heal_overlay_end_percent: 0.0,
            heal_overlay_alpha: 0.0,
            heal_flash_alpha: 0.0,
            animated_barrier: 0.0,
            death_burst_alpha: 0.0,
            death_burst_width: 0.0,
        }
    }
}

impl HealthBarAnimationState {
    pub fn has_damage_number(&self) -> bool {
        self.damage_number_alpha > 0.0 && self.damage_number_to_display > 0.0
    }

    pub fn is_death_bursting(&self) -> bool {
        self.death_burst_alpha > 0.0
    }
}

/// Turns combat state into animation channels
pub struct HealthBarAnimator<'a> {
    settings: &'a CombatSettings,
}

impl<'a> HealthBarAnimator<'a> {
    pub fn new(settings: &'a CombatSettings) -> Self {
        HealthBarAnimator { settings }
    }

    /// Animates one entity
    ///
    /// `hide_when_idle` enables the full collapse after the hide delay
    /// (used for non-hostile NPCs).
    pub fn animate(
        &self,
        state: &EntityCombatState,
        health: Pool,
        hide_when_idle: bool,
        now_ms: u64,
    ) -> HealthBarAnimationState {
        let mut anim = HealthBarAnimationState {
            animated_barrier: state.animated_barrier,
            ..Default::default()
        };

        if let LifeState::Dead { since_ms } = state.life {
            anim.dead = true;
            let elapsed = now_ms.saturating_sub(since_ms);
            if since_ms > 0 && elapsed < DEATH_ANIMATION_DURATION_MS {
                let eased = ease_out_cubic(elapsed as f32 / DEATH_ANIMATION_DURATION_MS as f32);
                anim.death_burst_alpha = 1.0 - eased;
                anim.death_burst_width = 1.0 - (1.0 - DEATH_BURST_MIN_WIDTH) * eased;
                anim.health_bar_fade_alpha = 1.0;
            } else {
                anim.health_bar_fade_alpha = 0.0;
            }
            return anim;
        }

        anim.health_bar_fade_alpha = self.idle_fade(state, hide_when_idle, now_ms);
        if anim.health_bar_fade_alpha <= 0.0 {
            return anim;
        }

        let current = health.percentage();
        self.animate_accumulator(state, current, now_ms, &mut anim);
        self.animate_flashes(state, now_ms, &mut anim);
        self.animate_damage_number(state, now_ms, &mut anim);
        self.animate_heal_overlay(state, current, now_ms, &mut anim);
        anim
    }

    fn idle_fade(&self, state: &EntityCombatState, hide_when_idle: bool, now_ms: u64) -> f32 {
        let idle = now_ms.saturating_sub(state.last_activity_ms);
        let ramp = |delay: u64, from: f32, to: f32| {
            let t = (idle.saturating_sub(delay) as f32 / IDLE_FADE_DURATION_MS as f32).clamp(0.0, 1.0);
            from + (to - from) * t
        };

        let idle_alpha = self.settings.idle_alpha.clamp(0.0, 1.0);
        if hide_when_idle && idle >= self.settings.hide_delay_ms {
            return ramp(self.settings.hide_delay_ms, idle_alpha, 0.0);
        }
        if idle >= self.settings.idle_fade_delay_ms {
            return ramp(self.settings.idle_fade_delay_ms, 1.0, idle_alpha);
        }
        1.0
    }

    fn animate_accumulator(&self, state: &EntityCombatState, current: f32, now_ms: u64, anim: &mut HealthBarAnimationState) {
        let (Some(_), Some(last_hit)) = (state.burst_start_ms, state.last_hit_ms) else {
            return;
        };
        let peak = state.burst_peak_percent.max(current);
        let hold_end = last_hit + ACCUMULATOR_HOLD_MS;
        if now_ms < hold_end {
            anim.damage_accumulator_percent = peak;
            anim.damage_accumulator_alpha = 1.0;
            return;
        }
        let t = (now_ms - hold_end) as f32 / ACCUMULATOR_FADE_MS as f32;
        if t >= 1.0 {
            anim.damage_accumulator_percent = current;
            anim.damage_accumulator_alpha = 0.0;
        } else {
            anim.damage_accumulator_percent = peak + (current - peak) * t;
            anim.damage_accumulator_alpha = 1.0 - t;
        }
    }

    fn animate_flashes(&self, state: &EntityCombatState, now_ms: u64, anim: &mut HealthBarAnimationState) {
        if let Some(last_hit) = state.last_hit_ms {
            anim.damage_flash_alpha = flash_decay(now_ms.saturating_sub(last_hit), DAMAGE_FLASH_HALF_LIFE_MS);
            anim.damage_flash_start_percent = state.damage_flash_start_percent.min(1.0);
        }
        if let Some(last_heal) = state.last_heal_ms {
            anim.heal_flash_alpha = flash_decay(now_ms.saturating_sub(last_heal), HEAL_FLASH_HALF_LIFE_MS);
        }
    }

    fn animate_damage_number(&self, state: &EntityCombatState, now_ms: u64, anim: &mut HealthBarAnimationState) {
        let Some(number) = state.damage_number else {
            return;
        };
        let elapsed = now_ms.saturating_sub(number.started_ms);
        if elapsed >= DAMAGE_NUMBER_TTL_MS {
            return;
        }
        let p = elapsed as f32 / DAMAGE_NUMBER_TTL_MS as f32;
        let alpha = if p < DAMAGE_NUMBER_FADE_IN {
            p / DAMAGE_NUMBER_FADE_IN
        } else {
            let t = (p - DAMAGE_NUMBER_FADE_IN) / (1.0 - DAMAGE_NUMBER_FADE_IN);
            1.0 - t * t
        };
        anim.damage_number_to_display = number.amount;
        anim.damage_number_alpha = alpha.clamp(0.0, 1.0);
        anim.damage_number_y_offset = p * DAMAGE_NUMBER_MAX_RISE;
    }

    fn animate_heal_overlay(&self, state: &EntityCombatState, current: f32, now_ms: u64, anim: &mut HealthBarAnimationState) {
        let Some(last_heal) = state.last_heal_ms else {
            return;
        };
        let elapsed = now_ms.saturating_sub(last_heal);
        if elapsed >= HEAL_OVERLAY_TTL_MS {
            return;
        }
        let fade_start = HEAL_OVERLAY_TTL_MS - HEAL_OVERLAY_FADE_MS;
        anim.heal_overlay_start_percent = state.heal_start_percent;
        anim.heal_overlay_end_percent = current;
        anim.heal_overlay_alpha = if elapsed <= fade_start {
            1.0
        } else {
            1.0 - (elapsed - fade_start) as f32 / HEAL_OVERLAY_FADE_MS as f32
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::CombatStateStore;
    use crate::entity::{EntityDetails, EntitySnapshot, NpcInfo, StableKey};
    use crate::settings::Config;
    use glam::Vec3;

    fn npc(health: f32) -> EntitySnapshot {
        EntitySnapshot::new(StableKey(1), Vec3::ZERO, EntityDetails::Npc(NpcInfo::default())).with_health(health, 1000.0)
    }

    fn animate_at(store: &CombatStateStore, health: f32, now: u64) -> HealthBarAnimationState {
        let config = Config::default();
        let state = store.get(StableKey(1)).unwrap();
        HealthBarAnimator::new(&config.combat).animate(state, Pool::new(health, 1000.0), false, now)
    }

    #[test]
    fn test_easing() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
        assert!((flash_decay(120, 120.0) - 0.5).abs() < 1e-6);
        assert_eq!(flash_decay(2000, 120.0), 0.0);
    }

    #[test]
    fn test_damage_hit_channels() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&npc(1000.0), 0, &config);
        store.update(&npc(900.0), 1000, &config);

        let anim = animate_at(&store, 900.0, 1100);
        assert!(anim.damage_flash_alpha > 0.0);
        assert_eq!(anim.damage_flash_start_percent, 1.0);
        assert_eq!(anim.damage_number_to_display, 100.0);
        assert!(anim.has_damage_number());
        assert_eq!(anim.damage_accumulator_percent, 1.0);
        assert_eq!(anim.damage_accumulator_alpha, 1.0);

        // Fading in during the first 15% of the number's life
        let early = animate_at(&store, 900.0, 1060);
        assert!(early.damage_number_alpha < 1.0);
        assert!(animate_at(&store, 900.0, 2300).damage_number_alpha == 0.0);
    }

    #[test]
    fn test_accumulator_holds_then_recedes() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&npc(1000.0), 0, &config);
        store.update(&npc(600.0), 1000, &config);

        let mut last = f32::MAX;
        for t in (1000..2800).step_by(100) {
            let anim = animate_at(&store, 600.0, t);
            assert_eq!(anim.damage_accumulator_percent, 1.0);
            last = last.min(anim.damage_accumulator_percent);
        }
        for t in (2800..3800).step_by(100) {
            let anim = animate_at(&store, 600.0, t);
            assert!(anim.damage_accumulator_percent <= last);
            last = anim.damage_accumulator_percent;
        }
        assert_eq!(animate_at(&store, 600.0, 3800).damage_accumulator_alpha, 0.0);
    }

    #[test]
    fn test_heal_overlay() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&npc(400.0), 0, &config);
        store.update(&npc(700.0), 100, &config);

        let anim = animate_at(&store, 700.0, 100);
        assert!((anim.heal_overlay_start_percent - 0.4).abs() < 1e-6);
        assert!((anim.heal_overlay_end_percent - 0.7).abs() < 1e-6);
        assert_eq!(anim.heal_overlay_alpha, 1.0);
        assert_eq!(anim.heal_flash_alpha, 1.0);

        let later = animate_at(&store, 700.0, 150);
        assert!(later.heal_flash_alpha < 1.0 && later.heal_flash_alpha > 0.0);

        let fading = animate_at(&store, 700.0, 1900);
        assert!(fading.heal_overlay_alpha > 0.0 && fading.heal_overlay_alpha < 1.0);
        assert_eq!(animate_at(&store, 700.0, 2100).heal_overlay_alpha, 0.0);
    }

    #[test]
    fn test_death_burst() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&npc(500.0), 4000, &config);
        store.update(&npc(0.0), 5000, &config);

        let start = animate_at(&store, 0.0, 5000);
        assert!(start.dead);
        assert_eq!(start.death_burst_alpha, 1.0);
        assert_eq!(start.death_burst_width, 1.0);
        // Living channels are off while dead
        assert_eq!(start.damage_flash_alpha, 0.0);

        let mid = animate_at(&store, 0.0, 5400);
        assert!(mid.death_burst_width > DEATH_BURST_MIN_WIDTH && mid.death_burst_width < 1.0);

        let done = animate_at(&store, 0.0, 5800);
        assert_eq!(done.death_burst_alpha, 0.0);
        assert_eq!(done.health_bar_fade_alpha, 0.0);
    }

    #[test]
    fn test_idle_fade() {
        let config = Config::default();
        let mut store = CombatStateStore::new();
        store.update(&npc(1000.0), 0, &config);
        let state = store.get(StableKey(1)).unwrap();
        let animator = HealthBarAnimator::new(&config.combat);
        let health = Pool::new(1000.0, 1000.0);

        assert_eq!(animator.animate(state, health, false, 1000).health_bar_fade_alpha, 1.0);
        assert_eq!(animator.animate(state, health, false, 6000).health_bar_fade_alpha, 0.5);
        assert_eq!(animator.animate(state, health, false, 20_000).health_bar_fade_alpha, 0.5);
        assert_eq!(animator.animate(state, health, true, 9000).health_bar_fade_alpha, 0.0);
    }
}
