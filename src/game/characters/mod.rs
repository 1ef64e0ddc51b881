// Character system
//
// Everything that belongs to one simulated character:
// - Template configuration loaded at spawn
// - Movement state machine (ground, air, dash, wall slide)
// - Combat state (stun, attack window, knockback)
// - The character entity and its death handling
// - Edge-triggered events for presentation collaborators

pub mod character;
pub mod combat;
pub mod config;
pub mod events;
pub mod movement;

// Re-export commonly used types
pub use character::{Character, CharacterId, DeathHandler, EnemyDeath, PlayerDeath};
pub use combat::{CombatState, DamageOutcome};
pub use config::{CharacterConfig, CombatConfig, ConfigError, MovementConfig, WallJumpLockout};
pub use events::{CharacterEvent, JumpKind};
pub use movement::{Facing, MovementInput, MovementMode, MovementState, SensorReadings};
