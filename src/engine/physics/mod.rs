// Physics collaborator using rapier2d: bodies, terrain and contact probes

pub mod body;
mod collision;
mod sensors;
mod world;

pub use body::{presets, CapsuleShape, ColliderHandle, RigidBodyHandle};
pub use collision::CollisionGroups;
pub use sensors::{ContactProbe, Contacts};
pub use world::PhysicsWorld;

// Re-export commonly used rapier types for convenience
pub use rapier2d::prelude::{QueryFilter, Real};
