// Game-side simulation: attributes, characters, the per-tick step and the arena

pub mod arena;
pub mod attributes;
pub mod characters;
pub mod simulation;
