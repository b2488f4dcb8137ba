//! Resource pools (health, energy, endurance)
//!
//! Snapshots report every resource as a current/max pair. [`Pool`] wraps the
//! pair so percentage math lives in one place and "no max" is handled
//! uniformly: a pool whose max is zero has no concept of fullness and reports
//! 0% rather than dividing by zero.
//!
//! # Example
//!
//! ```rust
//! use entity_overlay::stats::Pool;
//!
//! let health = Pool::new(700.0, 1000.0);
//! assert_eq!(health.percentage(), 0.7);
//! assert!(health.is_alive());
//! ```

use serde::{Deserialize, Serialize};

/// A current/max resource reading
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pool {
    pub current: f32,
    pub max: f32,
}

impl Pool {
    pub fn new(current: f32, max: f32) -> Self {
        Pool {
            current: current.max(0.0),
            max: max.max(0.0),
        }
    }

    /// A pool with no maximum ("no health concept")
    pub fn none() -> Self {
        Pool::default()
    }

    /// Whether the pool has a meaningful maximum
    pub fn has_max(&self) -> bool {
        self.max > 0.0
    }

    /// Current value as a fraction of max, clamped to 0.0-1.0
    ///
    /// Returns 0.0 when the pool has no maximum.
    pub fn percentage(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            (self.current / self.max).clamp(0.0, 1.0)
        }
    }

    /// Converts an absolute amount to a fraction of this pool's max
    pub fn fraction_of_max(&self, amount: f32) -> f32 {
        if self.max <= 0.0 { 0.0 } else { amount / self.max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn is_full(&self) -> bool {
        self.has_max() && self.current >= self.max
    }

    /// True when below max by more than a rounding error
    pub fn is_damaged(&self) -> bool {
        self.has_max() && self.current < self.max - 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(Pool::new(50.0, 200.0).percentage(), 0.25);
    }

    #[test]
    fn test_zero_max_has_no_percentage() {
        let pool = Pool::new(10.0, 0.0);
        assert!(!pool.has_max());
        assert_eq!(pool.percentage(), 0.0);
        assert_eq!(pool.fraction_of_max(5.0), 0.0);
    }

    #[test]
    fn test_overheal_clamps() {
        assert_eq!(Pool::new(120.0, 100.0).percentage(), 1.0);
    }

    #[test]
    fn test_negative_inputs_clamp_to_zero() {
        let pool = Pool::new(-5.0, 100.0);
        assert_eq!(pool.current, 0.0);
        assert!(!pool.is_alive());
    }

    #[test]
    fn test_damaged_and_full() {
        assert!(Pool::new(100.0, 100.0).is_full());
        assert!(!Pool::new(100.0, 100.0).is_damaged());
        assert!(Pool::new(90.0, 100.0).is_damaged());
        assert!(!Pool::none().is_damaged());
    }
}
