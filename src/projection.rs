//! World-to-screen projection
//!
//! This module turns an entity's world position and extents into the 2D
//! geometry every renderer anchors to: the projected origin, the 2D bounding
//! box of its eight projected AABB corners, a center point and a circle
//! radius for point-like objects.
//!
//! # Algorithm
//!
//! 1. Clip-space position `c = P * V * (pos, 1)`; `c.w < -2` means the entity
//!    is behind the camera and nothing else is attempted
//! 2. `c.w > 0` gives a valid screen-space origin
//! 3. The eight AABB corners are projected independently; valid corners
//!    define the 2D box
//! 4. With fewer than two valid corners but a valid origin, a 2D box sized by
//!    the configured base box and the entity's scale is used instead
//! 5. The box is tested for overlap with the viewport
//!
//! Corners are indexed so renderers know which face an edge belongs to:
//! `0..4` is the bottom ring and `4..8` the top ring, each ordered
//! `(-x,-z) (+x,-z) (+x,+z) (-x,+z)`.

use crate::entity::{EntityKind, EntitySnapshot, PhysicsBounds};
use crate::error::SkipReason;
use crate::settings::Config;
use glam::{Mat4, Vec2, Vec3};

/// Clip-space `w` below which an entity counts as behind the camera
pub const BEHIND_CAMERA_W: f32 = -2.0;

/// Smallest `w` treated as a usable projection
const MIN_CLIP_W: f32 = 1e-4;

/// Default character extents in meters
pub const PLAYER_BOUNDS: PhysicsBounds = PhysicsBounds::new(0.6, 0.6, 1.4);
pub const NPC_BOUNDS: PhysicsBounds = PhysicsBounds::new(0.6, 0.6, 0.6);

/// Minimum fallback box sizes in pixels
pub const PLAYER_MIN_WIDTH: f32 = 10.0;
pub const PLAYER_MIN_HEIGHT: f32 = 20.0;
pub const NPC_MIN_WIDTH: f32 = 15.0;
pub const NPC_MIN_HEIGHT: f32 = 15.0;
pub const GADGET_MIN_SIZE: f32 = 3.0;

/// Object circle radius as a fraction of the base box width
pub const GADGET_CIRCLE_RADIUS_RATIO: f32 = 0.15;

/// The twelve wireframe edges as corner index pairs
pub const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Camera matrices and position for one frame
///
/// View is right-handed with +Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub view: Mat4,
    pub projection: Mat4,
    pub position: Vec3,
}

impl Camera {
    pub fn new(view: Mat4, projection: Mat4, position: Vec3) -> Self {
        Camera {
            view,
            projection,
            position,
        }
    }

    /// A perspective camera at `eye` looking at `target`
    pub fn look_at(eye: Vec3, target: Vec3, fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Self {
        Camera {
            view: Mat4::look_at_rh(eye, target, Vec3::Y),
            projection: Mat4::perspective_rh_gl(fov_y_radians, aspect, near, far),
            position: eye,
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// World-space direction the camera looks along
    pub fn forward(&self) -> Vec3 {
        self.view.inverse().transform_vector3(Vec3::NEG_Z).normalize_or_zero()
    }
}

/// Projected screen geometry for one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityGeometry {
    /// Projected world origin (feet for characters)
    pub screen_pos: Vec2,
    pub origin_valid: bool,
    pub box_min: Vec2,
    pub box_max: Vec2,
    pub center: Vec2,
    /// Projected AABB corners; `None` where a corner did not project
    pub corners: [Option<Vec2>; 8],
    /// True when the box came from projected corners rather than the 2D fallback
    pub has_projected_box: bool,
    pub circle_radius: f32,
    /// Vertical extent of the entity in meters
    pub world_height: f32,
    pub is_on_screen: bool,
}

impl EntityGeometry {
    pub fn valid_corner_count(&self) -> usize {
        self.corners.iter().filter(|c| c.is_some()).count()
    }

    pub fn box_width(&self) -> f32 {
        self.box_max.x - self.box_min.x
    }

    pub fn box_height(&self) -> f32 {
        self.box_max.y - self.box_min.y
    }
}

/// Projects world points and entities for one frame's camera
pub struct ScreenProjector {
    view_projection: Mat4,
    viewport: Vec2,
}

impl ScreenProjector {
    pub fn new(camera: &Camera, viewport: Vec2) -> Self {
        ScreenProjector {
            view_projection: camera.view_projection(),
            viewport,
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Projects a world point; `None` when it is behind the camera or degenerate
    pub fn project_point(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection * world.extend(1.0);
        if !(clip.w > MIN_CLIP_W) {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let screen = Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        );
        screen.is_finite().then_some(screen)
    }

    /// Whether a screen rectangle overlaps the viewport
    pub fn overlaps_viewport(&self, min: Vec2, max: Vec2) -> bool {
        min.x < self.viewport.x && max.x > 0.0 && min.y < self.viewport.y && max.y > 0.0
    }

    /// Projects an entity into screen geometry
    ///
    /// `scale` is the entity's distance scale, used to size fallback boxes
    /// and object circles.
    pub fn project_entity(
        &self,
        entity: &EntitySnapshot,
        scale: f32,
        config: &Config,
    ) -> Result<EntityGeometry, SkipReason> {
        let kind = entity.kind();
        let clip = self.view_projection * entity.position.extend(1.0);
        if !clip.w.is_finite() || clip.w < BEHIND_CAMERA_W {
            return Err(SkipReason::BehindCamera);
        }

        let origin = self.project_point(entity.position);
        let bounds = entity_bounds(entity, config);

        let mut corners = [None; 8];
        if let Some(bounds) = bounds {
            for (i, corner) in aabb_corners(entity.position, bounds).into_iter().enumerate() {
                corners[i] = self.project_point(corner);
            }
        }

        let mut box_min = Vec2::splat(f32::MAX);
        let mut box_max = Vec2::splat(f32::MIN);
        let mut valid = 0;
        for corner in corners.iter().flatten() {
            box_min = box_min.min(*corner);
            box_max = box_max.max(*corner);
            valid += 1;
        }

        let appearance = &config.appearance;
        let circle_radius = if kind.is_object() {
            (GADGET_MIN_SIZE * 0.5).max(appearance.base_box_width * GADGET_CIRCLE_RADIUS_RATIO * scale)
        } else {
            0.0
        };

        let has_projected_box = valid >= 2;
        let screen_pos = match (origin, has_projected_box) {
            (Some(pos), _) => pos,
            (None, true) => Vec2::new((box_min.x + box_max.x) * 0.5, box_max.y),
            (None, false) => {
                return Err(if clip.w <= 0.0 {
                    SkipReason::BehindCamera
                } else {
                    SkipReason::Degenerate
                });
            }
        };

        if !has_projected_box {
            let (min, max) = fallback_box(kind, screen_pos, scale, circle_radius, config);
            box_min = min;
            box_max = max;
        }

        let center = if kind.is_character() {
            (box_min + box_max) * 0.5
        } else {
            screen_pos
        };
        let circle_radius = if kind.is_character() {
            (box_max.x - box_min.x).max(GADGET_MIN_SIZE) * 0.5
        } else {
            circle_radius
        };

        Ok(EntityGeometry {
            screen_pos,
            origin_valid: origin.is_some(),
            box_min,
            box_max,
            center,
            corners,
            has_projected_box,
            circle_radius,
            world_height: bounds.map_or(0.0, |b| b.height),
            is_on_screen: self.overlaps_viewport(box_min, box_max),
        })
    }
}

/// Extents for an entity: reported bounds, else kind defaults (items are points)
pub fn entity_bounds(entity: &EntitySnapshot, config: &Config) -> Option<PhysicsBounds> {
    if let Some(bounds) = entity.physics_bounds {
        return Some(bounds);
    }
    match entity.kind() {
        EntityKind::Player => Some(PLAYER_BOUNDS),
        EntityKind::Npc => Some(NPC_BOUNDS),
        EntityKind::Gadget | EntityKind::AttackTarget => Some(config.objects.default_bounds),
        EntityKind::Item => None,
    }
}

/// The eight world-space corners of an entity's AABB, feet at `origin`
pub fn aabb_corners(origin: Vec3, bounds: PhysicsBounds) -> [Vec3; 8] {
    let hw = bounds.width * 0.5;
    let hd = bounds.depth * 0.5;
    let ring = [(-hw, -hd), (hw, -hd), (hw, hd), (-hw, hd)];
    let mut corners = [Vec3::ZERO; 8];
    for (i, (dx, dz)) in ring.iter().enumerate() {
        corners[i] = origin + Vec3::new(*dx, 0.0, *dz);
        corners[i + 4] = origin + Vec3::new(*dx, bounds.height, *dz);
    }
    corners
}

fn fallback_box(kind: EntityKind, screen_pos: Vec2, scale: f32, circle_radius: f32, config: &Config) -> (Vec2, Vec2) {
    let appearance = &config.appearance;
    let enforce = config.scaling.enforce_minimum_sizes;
    match kind {
        EntityKind::Player | EntityKind::Npc => {
            let (min_w, min_h) = if kind == EntityKind::Player {
                (PLAYER_MIN_WIDTH, PLAYER_MIN_HEIGHT)
            } else {
                (NPC_MIN_WIDTH, NPC_MIN_HEIGHT)
            };
            let mut width = appearance.base_box_width * scale;
            let mut height = appearance.base_box_height * scale;
            if enforce {
                width = width.max(min_w);
                height = height.max(min_h);
            }
            (
                Vec2::new(screen_pos.x - width * 0.5, screen_pos.y - height),
                Vec2::new(screen_pos.x + width * 0.5, screen_pos.y),
            )
        }
        _ => {
            let half = if enforce {
                circle_radius.max(GADGET_MIN_SIZE * 0.5)
            } else {
                circle_radius
            };
            (screen_pos - Vec2::splat(half), screen_pos + Vec2::splat(half))
        }
    }
}
