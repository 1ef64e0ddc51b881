// Edge-triggered notifications for physics / animation / UI collaborators

use glam::Vec2;

use super::movement::Facing;
use crate::game::attributes::AttributeEvent;

/// Which kind of jump was performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JumpKind {
    /// From the ground, or within coyote time
    Ground,
    /// Mid-air extra jump
    Double,
    /// Off a wall while sliding
    Wall,
}

/// Something that changed during a tick. Each variant fires once per edge,
/// never on every tick a condition holds.
#[derive(Debug, Clone, PartialEq)]
pub enum CharacterEvent {
    Landed,
    TookOff,
    Jumped(JumpKind),
    DashStarted,
    DashEnded,
    WallSlideStarted,
    WallSlideEnded,
    FacingChanged(Facing),
    StunnedChanged(bool),
    AttackingChanged(bool),
    Damaged { amount: f32, knockback: Vec2 },
    Attribute(AttributeEvent),
    Died,
}

impl CharacterEvent {
    /// Short tag for logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Landed => "landed",
            Self::TookOff => "took_off",
            Self::Jumped(_) => "jumped",
            Self::DashStarted => "dash_started",
            Self::DashEnded => "dash_ended",
            Self::WallSlideStarted => "wall_slide_started",
            Self::WallSlideEnded => "wall_slide_ended",
            Self::FacingChanged(_) => "facing_changed",
            Self::StunnedChanged(_) => "stunned_changed",
            Self::AttackingChanged(_) => "attacking_changed",
            Self::Damaged { .. } => "damaged",
            Self::Attribute(_) => "attribute",
            Self::Died => "died",
        }
    }
}
