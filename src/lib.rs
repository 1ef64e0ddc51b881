// Fixed-step character movement and combat simulation for a 2D platformer.
//
// - `core`: math helpers and countdown timers
// - `engine`: fixed-step clock, rapier physics collaborator, input, assets
// - `game`: attributes, character state machines, the per-tick step, arena

pub mod core;
pub mod engine;
pub mod game;

pub use game::arena::{Arena, EventBatch};
pub use game::characters::{Character, CharacterConfig, CharacterEvent, CharacterId};
pub use game::simulation::{MotionIntent, SimulationStep, TickInput, TickOutput};
