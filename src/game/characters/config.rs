// Character templates: movement tuning, combat tuning and attributes.
// Loaded once at spawn and never mutated afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::attributes::{AttributeKind, AttributeTemplate, HEALTH, MANA, STAMINA};

/// Template validation failures
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("attribute template with an empty name")]
    EmptyAttributeName,

    #[error("duplicate attribute '{0}'")]
    DuplicateAttribute(String),

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },
}

/// How a wall jump hands horizontal control back to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WallJumpLockout {
    /// Unlock by distance travelled away from the wall-jump origin.
    ///
    /// Past `unlock`: control returns. Past `kick`: control returns and the
    /// horizontal velocity is pushed to `kick_speed`. Past `cancel` (or back
    /// towards the wall): lockout ends and horizontal velocity is zeroed.
    /// Falling faster than `fall_cancel_speed` ends the lockout as well.
    DistanceBands {
        unlock: f32,
        kick: f32,
        cancel: f32,
        kick_speed: f32,
        fall_cancel_speed: f32,
    },
    /// Lock input for a fixed time
    Timer { duration: f32 },
}

impl Default for WallJumpLockout {
    fn default() -> Self {
        Self::DistanceBands {
            unlock: 0.5,
            kick: 1.0,
            cancel: 2.0,
            kick_speed: 10.0,
            fall_cancel_speed: 0.5,
        }
    }
}

/// Movement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Maximum horizontal speed on ground (units/second)
    pub move_speed: f32,
    /// Fraction of the speed gap left after one second (0 = instant)
    pub movement_smoothing: f32,
    /// Whether horizontal input steers while airborne
    pub air_control: bool,
    /// Target speed multiplier while airborne
    pub air_control_factor: f32,

    // Jump
    pub jump_height: f32,
    pub time_to_apex: f32,
    pub fall_multiplier: f32,
    /// Gravity multiplier while rising with the jump button released
    pub low_jump_multiplier: f32,
    pub max_fall_speed: f32,
    pub double_jump: bool,
    pub double_jump_factor: f32,
    pub coyote_time: f32,
    pub jump_buffer_time: f32,

    // Dash
    pub dash_force: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    pub air_dash: bool,
    /// Zero vertical velocity when a dash starts (otherwise it is preserved)
    pub dash_resets_vertical: bool,

    // Wall
    pub wall_slide_speed: f32,
    /// Horizontal speed pressing the character into the wall while sliding
    pub wall_stick_speed: f32,
    /// Contact loss is ignored for this long after a slide starts
    pub wall_recheck_delay: f32,
    /// Delay between pushing away from the wall and letting go
    pub wall_release_delay: f32,
    /// Horizontal wall-jump speed as a multiple of the jump velocity
    pub wall_jump_push: f32,
    pub wall_jump_lockout: WallJumpLockout,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 10.0,
            movement_smoothing: 0.001,
            air_control: true,
            air_control_factor: 0.5,

            jump_height: 3.0,
            time_to_apex: 0.4,
            fall_multiplier: 2.5,
            low_jump_multiplier: 2.0,
            max_fall_speed: 25.0,
            double_jump: true,
            double_jump_factor: 1.0 / 1.2,
            coyote_time: 0.15,
            jump_buffer_time: 0.15,

            dash_force: 20.0,
            dash_duration: 0.2,
            dash_cooldown: 1.0,
            air_dash: true,
            dash_resets_vertical: true,

            wall_slide_speed: 5.0,
            wall_stick_speed: 2.0,
            wall_recheck_delay: 0.1,
            wall_release_delay: 0.1,
            wall_jump_push: 1.2,
            wall_jump_lockout: WallJumpLockout::default(),
        }
    }
}

impl MovementConfig {
    /// Downward acceleration derived from jump height and time to apex (negative)
    pub fn gravity(&self) -> f32 {
        -(2.0 * self.jump_height) / (self.time_to_apex * self.time_to_apex)
    }

    /// Launch speed that reaches `jump_height` in `time_to_apex`
    pub fn jump_velocity(&self) -> f32 {
        self.gravity().abs() * self.time_to_apex
    }

    pub fn double_jump_velocity(&self) -> f32 {
        self.jump_velocity() * self.double_jump_factor
    }
}

/// Combat tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub knockback_force: f32,
    pub hit_stun: f32,
    /// Invulnerability after a hit; 0 disables it
    pub invulnerability: f32,
    pub armor: f32,
    pub attack_damage: f32,
    pub attack_window: f32,
    /// Resource spent by dashing / attacking
    pub cost_resource: String,
    pub dash_cost: f32,
    pub attack_cost: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            knockback_force: 15.0,
            hit_stun: 0.1,
            invulnerability: 0.0,
            armor: 0.0,
            attack_damage: 10.0,
            attack_window: 0.3,
            cost_resource: STAMINA.to_string(),
            dash_cost: 0.0,
            attack_cost: 0.0,
        }
    }
}

/// Complete per-character template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub name: String,
    pub movement: MovementConfig,
    pub combat: CombatConfig,
    pub attributes: Vec<AttributeTemplate>,

    // Dimensions (for physics collider)
    pub width: f32,
    pub height: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl CharacterConfig {
    /// The player template: health, mana and regenerating stamina
    pub fn standard() -> Self {
        Self {
            name: "Player".to_string(),
            movement: MovementConfig::default(),
            combat: CombatConfig::default(),
            attributes: vec![
                AttributeTemplate::new(HEALTH, AttributeKind::Health, 100.0),
                AttributeTemplate::new(MANA, AttributeKind::Resource, 50.0).regenerating(2.0, 3.0),
                AttributeTemplate::new(STAMINA, AttributeKind::Resource, 100.0)
                    .regenerating(25.0, 1.0),
            ],
            width: 1.0,
            height: 2.0,
        }
    }

    /// A slow enemy: no air dash, no double jump, health only
    pub fn grunt() -> Self {
        Self {
            name: "Grunt".to_string(),
            movement: MovementConfig {
                move_speed: 5.0,
                double_jump: false,
                air_dash: false,
                ..MovementConfig::default()
            },
            combat: CombatConfig {
                knockback_force: 8.0,
                armor: 2.0,
                ..CombatConfig::default()
            },
            attributes: vec![AttributeTemplate::new(HEALTH, AttributeKind::Health, 40.0)],
            width: 1.0,
            height: 1.5,
        }
    }

    /// Check the template for values the simulation cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.movement;
        let c = &self.combat;

        positive("movement.time_to_apex", m.time_to_apex)?;
        positive("movement.dash_duration", m.dash_duration)?;
        positive("width", self.width)?;
        positive("height", self.height)?;

        for (field, value) in [
            ("movement.move_speed", m.move_speed),
            ("movement.movement_smoothing", m.movement_smoothing),
            ("movement.air_control_factor", m.air_control_factor),
            ("movement.jump_height", m.jump_height),
            ("movement.fall_multiplier", m.fall_multiplier),
            ("movement.low_jump_multiplier", m.low_jump_multiplier),
            ("movement.max_fall_speed", m.max_fall_speed),
            ("movement.double_jump_factor", m.double_jump_factor),
            ("movement.coyote_time", m.coyote_time),
            ("movement.jump_buffer_time", m.jump_buffer_time),
            ("movement.dash_force", m.dash_force),
            ("movement.dash_cooldown", m.dash_cooldown),
            ("movement.wall_slide_speed", m.wall_slide_speed),
            ("movement.wall_stick_speed", m.wall_stick_speed),
            ("movement.wall_recheck_delay", m.wall_recheck_delay),
            ("movement.wall_release_delay", m.wall_release_delay),
            ("movement.wall_jump_push", m.wall_jump_push),
            ("combat.knockback_force", c.knockback_force),
            ("combat.hit_stun", c.hit_stun),
            ("combat.invulnerability", c.invulnerability),
            ("combat.armor", c.armor),
            ("combat.attack_damage", c.attack_damage),
            ("combat.attack_window", c.attack_window),
            ("combat.dash_cost", c.dash_cost),
            ("combat.attack_cost", c.attack_cost),
        ] {
            non_negative(field, value)?;
        }

        match m.wall_jump_lockout {
            WallJumpLockout::DistanceBands {
                unlock,
                kick,
                cancel,
                kick_speed,
                fall_cancel_speed,
            } => {
                non_negative("wall_jump_lockout.unlock", unlock)?;
                non_negative("wall_jump_lockout.kick", kick)?;
                non_negative("wall_jump_lockout.cancel", cancel)?;
                non_negative("wall_jump_lockout.kick_speed", kick_speed)?;
                non_negative("wall_jump_lockout.fall_cancel_speed", fall_cancel_speed)?;
            }
            WallJumpLockout::Timer { duration } => {
                non_negative("wall_jump_lockout.duration", duration)?;
            }
        }

        let mut seen: Vec<String> = Vec::with_capacity(self.attributes.len());
        for template in &self.attributes {
            if template.name.trim().is_empty() {
                return Err(ConfigError::EmptyAttributeName);
            }
            let lowered = template.name.to_lowercase();
            if seen.contains(&lowered) {
                return Err(ConfigError::DuplicateAttribute(template.name.clone()));
            }
            seen.push(lowered);

            non_negative("attribute.regen_rate", template.regen_rate)?;
            non_negative("attribute.regen_delay", template.regen_delay)?;
            if !template.max_value.is_finite() {
                return Err(ConfigError::NotFinite {
                    field: "attribute.max_value",
                });
            }
        }

        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    non_negative(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}
