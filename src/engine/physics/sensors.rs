// Ray-cast contact probes for character bodies

use glam::Vec2;
use rapier2d::prelude::QueryFilter;

use super::body::RigidBodyHandle;
use super::collision::CollisionGroups;
use super::world::PhysicsWorld;

/// How far below the feet / beside the body a surface still counts as contact
const DEFAULT_SKIN: f32 = 0.1;

/// Ground and wall contact for one body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub ground: bool,
    pub wall: bool,
}

/// Probes sized to a character's collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactProbe {
    half_width: f32,
    half_height: f32,
    skin: f32,
}

impl ContactProbe {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            half_width: width / 2.0,
            half_height: height / 2.0,
            skin: DEFAULT_SKIN,
        }
    }

    pub fn with_skin(mut self, skin: f32) -> Self {
        self.skin = skin.max(0.0);
        self
    }

    /// Probe ground below and a wall on `side` (+1 right, -1 left)
    pub fn probe(&self, world: &PhysicsWorld, body: RigidBodyHandle, side: f32) -> Contacts {
        let Some((position, _)) = world.body_state(body) else {
            return Contacts::default();
        };
        let filter = QueryFilter::default()
            .exclude_rigid_body(body)
            .exclude_sensors()
            .groups(CollisionGroups::terrain_probe());

        // Start slightly inside the collider so touching surfaces are hit
        let inset = 0.05;

        let ground_origin = Vec2::new(position.x, position.y - self.half_height + inset);
        let ground = world
            .cast_ray(ground_origin, Vec2::NEG_Y, inset + self.skin, filter)
            .is_some();

        let direction = if side < 0.0 { -1.0 } else { 1.0 };
        let wall_origin = Vec2::new(position.x + direction * (self.half_width - inset), position.y);
        let wall = world
            .cast_ray(wall_origin, Vec2::new(direction, 0.0), inset + self.skin, filter)
            .is_some();

        Contacts { ground, wall }
    }
}
