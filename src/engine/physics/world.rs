use glam::Vec2;
use rapier2d::prelude::*;
use std::collections::HashMap;

use super::body::presets;

/// Rapier world holding terrain and character bodies.
///
/// Character gravity is computed by the simulation core, so the world itself
/// has none. Bodies move only by the velocity the arena hands them.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,

    /// Character body -> character id
    owners: HashMap<RigidBodyHandle, u32>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity: vector![0.0, 0.0],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            owners: HashMap::new(),
        }
    }

    /// Advance by one timestep
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Refresh ray-cast data after colliders were added or moved outside a step
    pub fn update_queries(&mut self) {
        self.query_pipeline
            .update(&self.rigid_body_set, &self.collider_set);
    }

    /// Static box centred on `center`
    pub fn add_terrain(&mut self, center: Vec2, size: Vec2) -> RigidBodyHandle {
        let handle = self.rigid_body_set.insert(presets::terrain_body(center));
        self.collider_set.insert_with_parent(
            presets::terrain_collider(size),
            handle,
            &mut self.rigid_body_set,
        );
        self.update_queries();
        handle
    }

    /// Capsule body for character `owner`, `width` x `height` overall
    pub fn add_character(
        &mut self,
        owner: u32,
        position: Vec2,
        width: Real,
        height: Real,
    ) -> RigidBodyHandle {
        let handle = self.rigid_body_set.insert(presets::character_body(position));
        self.collider_set.insert_with_parent(
            presets::character_collider(width, height),
            handle,
            &mut self.rigid_body_set,
        );
        self.owners.insert(handle, owner);
        self.update_queries();
        handle
    }

    /// Remove a body together with its colliders
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        self.owners.remove(&handle);
    }

    /// Character id a body was added for
    pub fn owner(&self, handle: RigidBodyHandle) -> Option<u32> {
        self.owners.get(&handle).copied()
    }

    /// Position and velocity of a body
    pub fn body_state(&self, handle: RigidBodyHandle) -> Option<(Vec2, Vec2)> {
        self.rigid_body_set.get(handle).map(|body| {
            let position = body.translation();
            let velocity = body.linvel();
            (
                Vec2::new(position.x, position.y),
                Vec2::new(velocity.x, velocity.y),
            )
        })
    }

    pub fn set_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec2) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(vector![velocity.x, velocity.y], true);
        }
    }

    /// Teleport a body and stop it
    pub fn set_position(&mut self, handle: RigidBodyHandle, position: Vec2) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_translation(vector![position.x, position.y], true);
            body.set_linvel(vector![0.0, 0.0], true);
        }
    }

    /// Distance to the first collider hit along `direction`, if any within
    /// `max_distance`
    pub fn cast_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: Real,
        filter: QueryFilter,
    ) -> Option<Real> {
        let ray = Ray::new(point![origin.x, origin.y], vector![direction.x, direction.y]);
        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(_, distance)| distance)
    }

    pub fn gravity(&self) -> Vec2 {
        Vec2::new(self.gravity.x, self.gravity.y)
    }

    pub fn set_timestep(&mut self, dt: Real) {
        self.integration_parameters.dt = dt;
    }

    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
