//! Per-entity overlay components
//!
//! Each component draws one part of an entity's overlay through a
//! [`Painter`](crate::draw::Painter) and, for the stacked parts, a [`LayoutCursor`](crate::layout::LayoutCursor). Components are
//! stateless: everything that varies per entity comes in through the
//! arguments, everything that varies per frame through [`FrameContext`].
//!
//! # Architecture
//!
//! Components are **stateless renderers** that:
//! - Read the entity, its [`VisualProperties`] and its
//!   [`ComponentPlan`](crate::filter::ComponentPlan)
//! - Draw with raw palette colors; the painter applies the entity's fade
//! - Advance the layout cursor by whatever height they consumed
//! - Are created once and reused across all entities
//!
//! # Available Components
//!
//! - [`GeometryRenderer`] - Box, wireframe, circle and dot
//! - [`GyroscopicSphere`] - Three-ring sphere around objects
//! - [`IdentityLine`] - "name • distance" line under the box
//! - [`HealthBar`] - Layered health bar and the energy bar below it
//! - [`FloatingText`] - Damage numbers and burst DPS next to the bar
//! - [`DetailsPanel`] - Detail lines and the gear summary
//! - [`TrailRenderer`] - Smoothed motion trail for players
//!
//! # Example Usage
//!
//! ```rust,ignore
//! let health_bar = HealthBar::new();
//!
//! // In the frame loop, for each visible entity
//! let placement = health_bar.render(&mut painter, entity, &props, &plan, &anim, &mut cursor);
//! floating_text.render(&mut painter, ctx, &props, &plan, &anim, burst_dps, placement.as_ref());
//! ```

pub mod details;
pub mod floating_text;
pub mod geometry;
pub mod health_bar;
pub mod identity;
pub mod sphere;
pub mod trail;

pub use details::DetailsPanel;
pub use floating_text::{FloatingText, FloatingTextStyle};
pub use geometry::{GeometryRenderer, GeometryStyle};
pub use health_bar::{BarPlacement, HealthBar, HealthBarStyle};
pub use identity::{format_distance, IdentityLine};
pub use sphere::GyroscopicSphere;
pub use trail::{catmull_rom, split_at_teleports, TrailRenderer};

use crate::color::Rgba;
use crate::draw::TextStyle;
use crate::render::{FrameContext, VisualProperties};

/// Text style at the entity's font size, honoring the shadow/background toggles
pub(crate) fn entity_text_style(ctx: &FrameContext<'_>, props: &VisualProperties, color: Rgba) -> TextStyle {
    TextStyle {
        font_size: props.style.font_size,
        color,
        shadow: ctx.config.appearance.text_shadows,
        background: ctx.config.appearance.text_backgrounds,
    }
}
