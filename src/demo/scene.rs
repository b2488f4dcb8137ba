//! Synthetic scene for the demo window
//!
//! Everything here is a pure function of the clock, so the pipeline sees
//! the same kind of frame-to-frame changes a real snapshot source would
//! produce:
//!
//! - A hostile player circling the arena who blinks 25 m sideways every
//!   six seconds (teleport gaps in its trail)
//! - A veteran NPC taking periodic hits until it dies and respawns
//! - A friendly NPC that is knocked down and healed back up in ticks
//! - A friendly player with gear, a resource node, an attack target and loot

use entity_overlay::entity::{
    AttackTargetInfo, Attitude, EntityDetails, EntitySnapshot, EquipmentSlot, GadgetInfo, GadgetType, GearEntry,
    ItemInfo, NpcInfo, PhysicsBounds, PlayerInfo, Profession, Race, Rank, Rarity, ResourceNodeType, StableKey,
};
use entity_overlay::projection::Camera;
use entity_overlay::sources::{CameraSource, SnapshotSource};
use entity_overlay::stats::Pool;
use glam::{Vec2, Vec3};

const ARENA_CENTER: Vec3 = Vec3::new(0.0, 0.0, -30.0);
const CIRCLE_RADIUS: f32 = 8.0;
const BLINK_PERIOD_MS: u64 = 6000;
const BLINK_DURATION_MS: u64 = 1500;
const BLINK_OFFSET: f32 = 25.0;

const VETERAN_CYCLE_MS: u64 = 12_000;
const VETERAN_HIT_INTERVAL_MS: u64 = 700;
const VETERAN_HIT: f32 = 1200.0;
const VETERAN_MAX_HP: f32 = 10_000.0;
const VETERAN_RESPAWN_MS: u64 = 9000;

const MEDIC_CYCLE_MS: u64 = 5000;
const MEDIC_MAX_HP: f32 = 10_000.0;
const MEDIC_LOW_HP: f32 = 4000.0;
const MEDIC_HEAL_TICK: f32 = 1500.0;

const HUMAN_BOUNDS: PhysicsBounds = PhysicsBounds::new(0.8, 0.8, 1.9);
const LARGE_BOUNDS: PhysicsBounds = PhysicsBounds::new(1.6, 1.6, 2.6);

pub struct DemoScene {
    viewport: Vec2,
    camera_position: Vec3,
}

impl DemoScene {
    pub fn new(viewport: Vec2) -> Self {
        DemoScene {
            viewport,
            camera_position: Vec3::new(0.0, 3.0, 6.0),
        }
    }

    fn camera_at(&self, now_ms: u64) -> Camera {
        let sway = (now_ms as f32 * 0.0003).sin() * 3.0;
        let eye = Vec3::new(sway, 3.0, 6.0);
        let aspect = self.viewport.x / self.viewport.y.max(1.0);
        Camera::look_at(eye, Vec3::new(0.0, 1.0, -30.0), 60f32.to_radians(), aspect, 0.1, 5000.0)
    }

    fn place(&self, snapshot: EntitySnapshot) -> EntitySnapshot {
        let distance = snapshot.position.distance(self.camera_position);
        snapshot.with_distance(distance)
    }

    fn runner(&self, now_ms: u64) -> EntitySnapshot {
        let angle = now_ms as f32 * 0.0012;
        let mut position = ARENA_CENTER + Vec3::new(angle.cos() * CIRCLE_RADIUS, 0.0, angle.sin() * CIRCLE_RADIUS);
        if now_ms % BLINK_PERIOD_MS < BLINK_DURATION_MS {
            position.x += BLINK_OFFSET;
        }

        let info = PlayerInfo {
            name: "Vexa Thornwhisper".to_string(),
            profession: Profession::Thief,
            race: Race::Sylvari,
            level: 80,
            scaled_level: 80,
            attitude: Attitude::Hostile,
            energy: Some(Pool::new(70.0, 100.0)),
            endurance: Some(Pool::new(100.0, 100.0)),
            ..Default::default()
        };
        self.place(
            EntitySnapshot::new(StableKey(1), position, EntityDetails::Player(info))
                .with_health(18_000.0, 18_000.0)
                .with_bounds(HUMAN_BOUNDS),
        )
    }

    fn ally(&self) -> EntitySnapshot {
        let gear = vec![
            GearEntry { slot: EquipmentSlot::Helm, stat_id: 161, rarity: Rarity::Ascended },
            GearEntry { slot: EquipmentSlot::Chest, stat_id: 161, rarity: Rarity::Ascended },
            GearEntry { slot: EquipmentSlot::Back, stat_id: 1026, rarity: Rarity::Legendary },
            GearEntry { slot: EquipmentSlot::Amulet, stat_id: 155, rarity: Rarity::Exotic },
        ];
        let info = PlayerInfo {
            name: "Brannoc Ironhide".to_string(),
            profession: Profession::Guardian,
            race: Race::Norn,
            level: 80,
            scaled_level: 42,
            attitude: Attitude::Friendly,
            energy: Some(Pool::new(40.0, 100.0)),
            gear,
            ..Default::default()
        };
        self.place(
            EntitySnapshot::new(StableKey(2), Vec3::new(-6.0, 0.0, -18.0), EntityDetails::Player(info))
                .with_health(15_000.0, 22_000.0)
                .with_barrier(3000.0)
                .with_bounds(HUMAN_BOUNDS),
        )
    }

    fn veteran(&self, now_ms: u64) -> EntitySnapshot {
        let t = now_ms % VETERAN_CYCLE_MS;
        let health = if t >= VETERAN_RESPAWN_MS {
            VETERAN_MAX_HP
        } else {
            let hits = (t / VETERAN_HIT_INTERVAL_MS) as f32;
            (VETERAN_MAX_HP - hits * VETERAN_HIT).max(0.0)
        };
        let info = NpcInfo {
            name: "Risen Brute".to_string(),
            attitude: Attitude::Hostile,
            rank: Rank::Veteran,
            level: 78,
        };
        self.place(
            EntitySnapshot::new(StableKey(10), Vec3::new(5.0, 0.0, -22.0), EntityDetails::Npc(info))
                .with_health(health, VETERAN_MAX_HP)
                .with_bounds(LARGE_BOUNDS),
        )
    }

    fn medic(&self, now_ms: u64) -> EntitySnapshot {
        let ticks = ((now_ms % MEDIC_CYCLE_MS) / 1000) as f32;
        let health = (MEDIC_LOW_HP + ticks * MEDIC_HEAL_TICK).min(MEDIC_MAX_HP);
        let info = NpcInfo {
            name: "Field Medic".to_string(),
            attitude: Attitude::Friendly,
            rank: Rank::Normal,
            level: 80,
        };
        self.place(
            EntitySnapshot::new(StableKey(11), Vec3::new(-3.0, 0.0, -26.0), EntityDetails::Npc(info))
                .with_health(health, MEDIC_MAX_HP)
                .with_bounds(HUMAN_BOUNDS),
        )
    }

    fn objects(&self, out: &mut Vec<EntitySnapshot>) {
        let node = GadgetInfo {
            gadget_type: GadgetType::ResourceNode,
            resource_node: Some(ResourceNodeType::Tree),
            gatherable: true,
        };
        out.push(self.place(EntitySnapshot::new(
            StableKey(20),
            Vec3::new(12.0, 0.0, -40.0),
            EntityDetails::Gadget(node),
        )));

        let destructible = GadgetInfo {
            gadget_type: GadgetType::Destructible,
            ..Default::default()
        };
        out.push(
            self.place(
                EntitySnapshot::new(StableKey(21), Vec3::new(-12.0, 0.0, -45.0), EntityDetails::Gadget(destructible))
                    .with_health(2500.0, 5000.0),
            ),
        );

        out.push(
            self.place(
                EntitySnapshot::new(
                    StableKey(30),
                    Vec3::new(0.0, 2.0, -60.0),
                    EntityDetails::AttackTarget(AttackTargetInfo { agent_id: 4711 }),
                )
                .with_health(80_000.0, 100_000.0),
            ),
        );

        let loot = [(40, 24_812, Rarity::Exotic, -1.5), (41, 19_721, Rarity::Fine, 0.0), (42, 70_820, Rarity::Legendary, 1.5)];
        for (key, item_id, rarity, x) in loot {
            let info = ItemInfo {
                item_id,
                rarity: Some(rarity),
            };
            out.push(self.place(EntitySnapshot::new(
                StableKey(key),
                Vec3::new(x, 0.0, -14.0),
                EntityDetails::Item(info),
            )));
        }
    }
}

impl SnapshotSource for DemoScene {
    fn fill_frame(&mut self, now_ms: u64, out: &mut Vec<EntitySnapshot>) {
        self.camera_position = self.camera_at(now_ms).position;

        out.clear();
        // Objects first: the pipeline must sort kinds itself
        self.objects(out);
        out.push(self.veteran(now_ms));
        out.push(self.medic(now_ms));
        out.push(self.runner(now_ms));
        out.push(self.ally());
    }
}

impl CameraSource for DemoScene {
    fn camera(&mut self, now_ms: u64) -> Option<Camera> {
        Some(self.camera_at(now_ms))
    }
}
