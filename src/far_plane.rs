//! Adaptive far plane
//!
//! Players and NPCs only stream in within a couple of hundred meters, but
//! gadgets (waypoints, vistas, resource nodes) can be a kilometer away. The
//! far plane tracks how deep the current scene actually is, using gadget
//! distances only, so gadget scaling and fading adapt to the map.
//!
//! Recalculated at most once per second:
//! - no gadgets: target 800 m
//! - fewer than 10: target is the average distance
//! - otherwise: target is the 95th percentile
//!
//! The target is clamped to `[100, 3000]` and the current value moves halfway
//! toward it on each recalculation.

use tracing::debug;

pub const FAR_PLANE_INITIAL: f32 = 1500.0;
pub const FAR_PLANE_DEFAULT: f32 = 800.0;
pub const FAR_PLANE_MIN: f32 = 100.0;
pub const FAR_PLANE_MAX: f32 = 3000.0;
pub const RECALC_INTERVAL_MS: u64 = 1000;
pub const MIN_ENTITIES_FOR_PERCENTILE: usize = 10;
pub const PERCENTILE_THRESHOLD: f32 = 0.95;
pub const SMOOTHING_FACTOR: f32 = 0.5;

/// Game units per meter (one unit is exactly 0.0254 m)
pub const UNITS_PER_METER: f32 = 1.0 / 0.0254;

pub fn meters_to_units(meters: f32) -> f32 {
    meters * UNITS_PER_METER
}

pub fn units_to_meters(units: f32) -> f32 {
    units / UNITS_PER_METER
}

#[derive(Debug, Clone)]
pub struct AdaptiveFarPlane {
    current: f32,
    last_recalc_ms: Option<u64>,
    samples: Vec<f32>,
}

impl AdaptiveFarPlane {
    pub fn new() -> Self {
        AdaptiveFarPlane {
            current: FAR_PLANE_INITIAL,
            last_recalc_ms: None,
            samples: Vec::new(),
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = FAR_PLANE_INITIAL;
        self.last_recalc_ms = None;
    }

    /// Feeds this frame's gadget distances and returns the far plane to use
    ///
    /// The first call only starts the interval timer.
    pub fn update<I>(&mut self, now_ms: u64, gadget_distances: I) -> f32
    where
        I: IntoIterator<Item = f32>,
    {
        let Some(last) = self.last_recalc_ms else {
            self.last_recalc_ms = Some(now_ms);
            return self.current;
        };
        if now_ms.saturating_sub(last) < RECALC_INTERVAL_MS {
            return self.current;
        }
        self.last_recalc_ms = Some(now_ms);

        self.samples.clear();
        self.samples
            .extend(gadget_distances.into_iter().filter(|d| d.is_finite() && *d >= 0.0));

        let target = self.target();
        let old = self.current;
        self.current = (old + (target - old) * SMOOTHING_FACTOR).clamp(FAR_PLANE_MIN, FAR_PLANE_MAX);
        debug!(
            samples = self.samples.len(),
            target,
            old,
            new = self.current,
            "adaptive far plane recalculated"
        );
        self.current
    }

    fn target(&mut self) -> f32 {
        let count = self.samples.len();
        if count == 0 {
            return FAR_PLANE_DEFAULT;
        }
        let raw = if count < MIN_ENTITIES_FOR_PERCENTILE {
            self.samples.iter().sum::<f32>() / count as f32
        } else {
            let index = ((count as f32 * PERCENTILE_THRESHOLD) as usize).min(count - 1);
            let (_, value, _) = self.samples.select_nth_unstable_by(index, |a, b| a.total_cmp(b));
            *value
        };
        raw.clamp(FAR_PLANE_MIN, FAR_PLANE_MAX)
    }
}

impl Default for AdaptiveFarPlane {
    fn default() -> Self {
        Self::new()
    }
}
