// Game action definitions

use serde::{Deserialize, Serialize};

/// Represents all possible in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    // Movement
    MoveLeft,
    MoveRight,
    Up,
    Down,

    // Discrete actions, delivered to the simulation as edges
    Jump,
    Dash,
    Attack,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Up,
        Action::Down,
        Action::Jump,
        Action::Dash,
        Action::Attack,
    ];

    /// Actions read as held axes rather than press/release edges
    pub fn is_axis(self) -> bool {
        matches!(
            self,
            Action::MoveLeft | Action::MoveRight | Action::Up | Action::Down
        )
    }
}

/// A press or release of one action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionEvent {
    Pressed(Action),
    Released(Action),
}

impl ActionEvent {
    pub fn action(&self) -> Action {
        match self {
            Self::Pressed(action) | Self::Released(action) => *action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_equality() {
        assert_eq!(Action::Jump, Action::Jump);
        assert_ne!(Action::Jump, Action::Dash);
    }

    #[test]
    fn test_axis_actions() {
        assert!(Action::MoveLeft.is_axis());
        assert!(Action::Down.is_axis());
        assert!(!Action::Jump.is_axis());
        assert_eq!(Action::ALL.iter().filter(|a| a.is_axis()).count(), 4);
    }

    #[test]
    fn test_event_action() {
        assert_eq!(ActionEvent::Pressed(Action::Dash).action(), Action::Dash);
        assert_eq!(ActionEvent::Released(Action::Jump).action(), Action::Jump);
    }

    #[test]
    fn test_event_from_ron() {
        let event: ActionEvent = ron::from_str("Pressed(Jump)").unwrap();
        assert_eq!(event, ActionEvent::Pressed(Action::Jump));
    }
}
