// Bodies and colliders for what an arena holds: characters and terrain boxes

use glam::Vec2;
use rapier2d::prelude::*;

use super::collision::CollisionGroups;

pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

/// Vertical capsule filling a `width` x `height` character box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleShape {
    /// Half length of the straight segment between the two caps
    pub half_segment: Real,
    pub radius: Real,
}

impl CapsuleShape {
    pub fn fitting(width: Real, height: Real) -> Self {
        let radius = width / 2.0;
        Self {
            half_segment: (height / 2.0 - radius).max(0.0),
            radius,
        }
    }

    pub fn half_height(&self) -> Real {
        self.half_segment + self.radius
    }
}

/// Rigid body and collider presets
pub mod presets {
    use super::*;

    /// Dynamic so the solver stops it at walls, but without world gravity or
    /// damping: the simulation sets its velocity every tick
    pub fn character_body(position: Vec2) -> RigidBody {
        RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y])
            .locked_axes(LockedAxes::ROTATION_LOCKED)
            .gravity_scale(0.0)
            .linear_damping(0.0)
            .can_sleep(false)
            .ccd_enabled(true)
            .build()
    }

    pub fn character_collider(width: Real, height: Real) -> Collider {
        let shape = CapsuleShape::fitting(width, height);
        ColliderBuilder::capsule_y(shape.half_segment, shape.radius)
            .collision_groups(CollisionGroups::Character.to_interaction_groups())
            // Frictionless so sliding along walls and floors is not damped
            .friction(0.0)
            .restitution(0.0)
            .build()
    }

    /// Floors, platforms and walls
    pub fn terrain_body(center: Vec2) -> RigidBody {
        RigidBodyBuilder::fixed()
            .translation(vector![center.x, center.y])
            .build()
    }

    pub fn terrain_collider(size: Vec2) -> Collider {
        ColliderBuilder::cuboid(size.x / 2.0, size.y / 2.0)
            .collision_groups(CollisionGroups::Terrain.to_interaction_groups())
            .friction(0.0)
            .restitution(0.0)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capsule_fits_box() {
        let shape = CapsuleShape::fitting(1.0, 2.0);
        assert_eq!(shape.radius, 0.5);
        assert_eq!(shape.half_segment, 0.5);
        assert_eq!(shape.half_height(), 1.0);

        // Wider than tall collapses to a circle
        let ball = CapsuleShape::fitting(2.0, 1.0);
        assert_eq!(ball.half_segment, 0.0);
    }

    #[test]
    fn test_character_preset() {
        let body = presets::character_body(Vec2::new(3.0, 4.0));
        let collider = presets::character_collider(1.0, 2.0);

        assert_eq!(body.body_type(), RigidBodyType::Dynamic);
        assert!(body.is_rotation_locked());
        assert_eq!(body.gravity_scale(), 0.0);
        assert_eq!(body.translation().x, 3.0);
        assert_eq!(collider.friction(), 0.0);
        assert!(!collider.is_sensor());
    }

    #[test]
    fn test_terrain_preset_is_fixed() {
        let body = presets::terrain_body(Vec2::new(0.0, -5.0));
        let collider = presets::terrain_collider(Vec2::new(20.0, 1.0));
        assert_eq!(body.body_type(), RigidBodyType::Fixed);
        assert_eq!(
            collider.collision_groups(),
            CollisionGroups::Terrain.to_interaction_groups()
        );
    }
}
