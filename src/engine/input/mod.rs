// Input handling
//
// Collects press/release events per frame and turns them into one
// `TickInput` per fixed simulation tick.
//
// - `action`: game actions and press/release events
// - `buffer`: latches edges until a tick consumes them
// - `player`: per-player held state and tick sampling
// - `script`: timed action events for headless runs

pub mod action;
pub mod buffer;
pub mod player;
pub mod script;

// Re-export commonly used types
pub use action::{Action, ActionEvent};
pub use player::PlayerInput;
pub use script::{InputScript, ScriptedInput};
