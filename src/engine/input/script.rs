// Timed input playback for headless runs and tests

use serde::{Deserialize, Serialize};

use super::action::ActionEvent;
use super::player::PlayerInput;

/// One event fired at `at` seconds of simulated time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedInput {
    pub at: f32,
    pub event: ActionEvent,
}

/// Ordered list of timed action events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    entries: Vec<ScriptedInput>,
    #[serde(skip)]
    cursor: usize,
}

impl InputScript {
    pub fn new(mut entries: Vec<ScriptedInput>) -> Self {
        entries.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self { entries, cursor: 0 }
    }

    /// Parse a RON list of entries
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        let entries: Vec<ScriptedInput> = ron::from_str(text)?;
        Ok(Self::new(entries))
    }

    /// Deliver every event due at or before `now` to `player`
    pub fn feed(&mut self, now: f32, player: &mut PlayerInput) -> usize {
        let start = self.cursor;
        while let Some(entry) = self.entries.get(self.cursor) {
            if entry.at > now {
                break;
            }
            player.apply(entry.event);
            self.cursor += 1;
        }
        self.cursor - start
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.entries.len()
    }

    /// Time of the last event
    pub fn duration(&self) -> f32 {
        self.entries.last().map_or(0.0, |e| e.at)
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}
