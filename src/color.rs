//! Straight-alpha RGBA8 colors and the overlay palette
//!
//! Every color in the overlay is a straight (non pre-multiplied) [`Rgba`] value.
//! Opacity from distance fading, combat animations and the global opacity
//! setting is folded in at submission time by [`Rgba::fade`], so the palette
//! below always describes the fully opaque look of an element.
//!
//! # Example
//!
//! ```rust
//! use entity_overlay::color::{palette, Rgba};
//!
//! let faded = palette::PLAYER.fade(0.5);
//! assert_eq!(faded.a, 115);
//! ```

use serde::{Deserialize, Serialize};

/// An 8-bit per channel color with straight alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Creates a color from all four channels
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    /// Creates a fully opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }

    /// Returns the same color with the alpha channel replaced
    pub const fn with_alpha(self, a: u8) -> Self {
        Rgba { a, ..self }
    }

    /// Multiplies the alpha channel by `factor` (clamped to 0.0-1.0)
    ///
    /// The result is rounded to the nearest integer so repeated fades of the
    /// same input are stable.
    pub fn fade(self, factor: f32) -> Self {
        let factor = if factor.is_finite() { factor.clamp(0.0, 1.0) } else { 0.0 };
        let a = (self.a as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Rgba { a, ..self }
    }

    /// Scales the RGB channels by `factor`, leaving alpha untouched
    ///
    /// Used for depth shading where a brightness of 0.5 halves every channel.
    pub fn scale_rgb(self, factor: f32) -> Self {
        let scale = |c: u8| (c as f32 * factor.max(0.0)).round().clamp(0.0, 255.0) as u8;
        Rgba {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }

    /// Alpha as a 0.0-1.0 fraction
    pub fn alpha_f32(self) -> f32 {
        self.a as f32 / 255.0
    }

    /// Packs the color as `0xRRGGBBAA`
    pub const fn to_packed(self) -> u32 {
        ((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | self.a as u32
    }

    /// Unpacks a `0xRRGGBBAA` value
    pub const fn from_packed(packed: u32) -> Self {
        Rgba {
            r: (packed >> 24) as u8,
            g: (packed >> 16) as u8,
            b: (packed >> 8) as u8,
            a: packed as u8,
        }
    }
}

/// Fixed colors used by the renderers
pub mod palette {
    use super::Rgba;

    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const DEFAULT_TEXT: Rgba = Rgba::rgb(255, 255, 255);
    pub const SUMMARY_TEXT: Rgba = Rgba::rgb(200, 210, 255);

    pub const PLAYER: Rgba = Rgba::rgba(30, 144, 255, 230);
    pub const HOSTILE: Rgba = Rgba::rgba(255, 80, 80, 210);
    pub const FRIENDLY: Rgba = Rgba::rgba(100, 255, 100, 210);
    pub const NEUTRAL: Rgba = Rgba::rgba(127, 255, 0, 210);
    pub const INDIFFERENT: Rgba = Rgba::rgba(240, 240, 240, 210);
    pub const UNKNOWN: Rgba = Rgba::rgba(255, 0, 255, 210);
    pub const GADGET: Rgba = Rgba::rgba(255, 165, 80, 200);

    pub const ENERGY_BAR: Rgba = Rgba::rgba(0, 120, 255, 220);

    pub const TEXT_SHADOW: Rgba = Rgba::rgba(0, 0, 0, 180);
    pub const TEXT_BACKGROUND: Rgba = Rgba::rgba(0, 0, 0, 180);
    pub const OUTER_STROKE: Rgba = Rgba::rgba(0, 0, 0, 160);

    pub const BAR_BACKGROUND: Rgba = Rgba::rgba(0, 0, 0, 180);
    pub const BAR_BORDER: Rgba = Rgba::rgba(0, 0, 0, 100);
    pub const HEAL_OVERLAY: Rgba = Rgba::rgba(120, 255, 160, 200);
    pub const HEAL_FLASH: Rgba = Rgba::rgba(220, 255, 255, 255);
    pub const DAMAGE_ACCUMULATOR: Rgba = Rgba::rgba(255, 170, 60, 180);
    pub const DAMAGE_FLASH: Rgba = Rgba::rgba(255, 255, 255, 255);
    pub const BARRIER_FILL: Rgba = Rgba::rgba(255, 230, 180, 240);
    pub const BARRIER_SEPARATOR: Rgba = Rgba::rgba(255, 255, 255, 210);
    pub const DEATH_BURST: Rgba = Rgba::rgba(200, 255, 255, 255);
    pub const BURST_DPS_TEXT: Rgba = Rgba::rgba(255, 200, 50, 255);
    pub const DAMAGE_NUMBER: Rgba = Rgba::rgba(255, 255, 255, 255);

    pub const TRAIL_HOSTILE: Rgba = Rgba::rgba(255, 80, 80, 200);
    pub const TELEPORT_CONNECTOR: Rgba = Rgba::rgba(200, 200, 200, 255);

    pub const TACTICAL_OFFENSE: Rgba = Rgba::rgb(255, 80, 80);
    pub const TACTICAL_DEFENSE: Rgba = Rgba::rgb(30, 144, 255);
    pub const TACTICAL_SUPPORT: Rgba = Rgba::rgb(100, 255, 100);

    pub const RARITY_JUNK: Rgba = Rgba::rgb(170, 170, 170);
    pub const RARITY_COMMON: Rgba = Rgba::rgb(255, 255, 255);
    pub const RARITY_FINE: Rgba = Rgba::rgb(98, 164, 218);
    pub const RARITY_MASTERWORK: Rgba = Rgba::rgb(26, 147, 6);
    pub const RARITY_RARE: Rgba = Rgba::rgb(252, 208, 11);
    pub const RARITY_EXOTIC: Rgba = Rgba::rgb(255, 164, 5);
    pub const RARITY_ASCENDED: Rgba = Rgba::rgb(251, 62, 141);
    pub const RARITY_LEGENDARY: Rgba = Rgba::rgb(139, 79, 219);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_scales_alpha_only() {
        let c = Rgba::rgba(10, 20, 30, 200).fade(0.5);
        assert_eq!(c, Rgba::rgba(10, 20, 30, 100));
    }

    #[test]
    fn test_fade_clamps_factor() {
        let c = Rgba::rgba(1, 2, 3, 200);
        assert_eq!(c.fade(2.0).a, 200);
        assert_eq!(c.fade(-1.0).a, 0);
        assert_eq!(c.fade(f32::NAN).a, 0);
    }

    #[test]
    fn test_compounded_fade_matches_product() {
        // 200 * 0.8 * 0.5 = 80
        let direct = palette::GADGET.fade(0.8 * 0.5);
        assert_eq!(direct.a, 80);
    }

    #[test]
    fn test_packing() {
        let c = Rgba::rgba(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.to_packed(), 0x1234_5678);
        assert_eq!(Rgba::from_packed(0x1234_5678), c);
    }

    #[test]
    fn test_scale_rgb() {
        let c = Rgba::rgba(200, 100, 50, 42).scale_rgb(0.5);
        assert_eq!(c, Rgba::rgba(100, 50, 25, 42));
    }
}
