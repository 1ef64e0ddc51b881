// Engine modules: fixed-step clock, physics, input, assets

pub mod assets;
pub mod game_loop;
pub mod input;
pub mod physics;
