// Per-player input state, sampled once per simulation tick

use super::action::{Action, ActionEvent};
use super::buffer::InputBuffer;
use crate::game::simulation::TickInput;
use std::collections::HashSet;

/// Input state for a single player
#[derive(Debug)]
pub struct PlayerInput {
    player_id: usize,

    /// Actions currently held
    pressed: HashSet<Action>,

    /// Press / release edges not yet delivered to a tick
    buffer: InputBuffer,

    /// Ignore everything (e.g. while the character is dead)
    enabled: bool,
}

impl PlayerInput {
    pub fn new(player_id: usize) -> Self {
        Self {
            player_id,
            pressed: HashSet::new(),
            buffer: InputBuffer::new(),
            enabled: true,
        }
    }

    pub fn player_id(&self) -> usize {
        self.player_id
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling drops held actions and pending edges
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled && !enabled {
            self.reset();
        }
        self.enabled = enabled;
    }

    /// Register an action press
    pub fn press(&mut self, action: Action) {
        if !self.enabled {
            return;
        }
        if self.pressed.insert(action) && !action.is_axis() {
            self.buffer.push(ActionEvent::Pressed(action));
        }
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) && !action.is_axis() {
            self.buffer.push(ActionEvent::Released(action));
        }
    }

    pub fn apply(&mut self, event: ActionEvent) {
        match event {
            ActionEvent::Pressed(action) => self.press(action),
            ActionEvent::Released(action) => self.release(action),
        }
    }

    /// Build the input for one tick, consuming latched edges.
    /// Call once per fixed tick.
    pub fn tick_input(&mut self) -> TickInput {
        let (horizontal, vertical) = self.get_direction();
        let input = TickInput {
            horizontal,
            vertical,
            jump_pressed: self.buffer.consume(ActionEvent::Pressed(Action::Jump)),
            jump_released: self.buffer.consume(ActionEvent::Released(Action::Jump)),
            dash_requested: self.buffer.consume(ActionEvent::Pressed(Action::Dash)),
            attack_requested: self.buffer.consume(ActionEvent::Pressed(Action::Attack)),
        };
        self.buffer.update();
        input
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.buffer.clear();
    }

    /// Directional input, each axis in -1.0..=1.0.
    /// Returns (horizontal, vertical)
    pub fn get_direction(&self) -> (f32, f32) {
        let mut horizontal = 0.0;
        let mut vertical = 0.0;

        if self.is_pressed(Action::MoveLeft) {
            horizontal -= 1.0;
        }
        if self.is_pressed(Action::MoveRight) {
            horizontal += 1.0;
        }
        if self.is_pressed(Action::Down) {
            vertical -= 1.0;
        }
        if self.is_pressed(Action::Up) {
            vertical += 1.0;
        }

        (horizontal, vertical)
    }
}
