// Fixed-tick orchestrator
//
// One step per character per tick, always in the same order:
// timers, movement transitions, combat effects, attribute regeneration,
// then the outgoing velocity intent and the events raised along the way.

use glam::Vec2;
use log::trace;

use super::attributes::AttributeEvent;
use super::characters::{Character, CharacterEvent, MovementInput, SensorReadings};

/// Input for one tick: axes in [-1, 1] plus edge signals
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub horizontal: f32,
    pub vertical: f32,
    pub jump_pressed: bool,
    pub jump_released: bool,
    pub dash_requested: bool,
    pub attack_requested: bool,
}

impl TickInput {
    /// Everything a stunned or dead character is not allowed to do removed
    fn restrained(&self) -> Self {
        Self {
            jump_released: self.jump_released,
            ..Self::default()
        }
    }

    fn movement(&self) -> MovementInput {
        MovementInput {
            horizontal: self.horizontal.clamp(-1.0, 1.0),
            vertical: self.vertical.clamp(-1.0, 1.0),
            jump_pressed: self.jump_pressed,
            jump_released: self.jump_released,
        }
    }
}

/// Velocity the physics collaborator should give the body
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionIntent {
    pub velocity: Vec2,
}

/// Result of one step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutput {
    pub intent: MotionIntent,
    pub events: Vec<CharacterEvent>,
}

/// Runs the per-tick update. Holds scratch buffers only, so one instance can
/// step any number of characters.
#[derive(Debug, Default)]
pub struct SimulationStep {
    attribute_events: Vec<AttributeEvent>,
}

impl SimulationStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(
        &mut self,
        character: &mut Character,
        input: &TickInput,
        sensors: &SensorReadings,
        dt: f32,
    ) -> TickOutput {
        let mut events = std::mem::take(&mut character.pending);
        self.attribute_events.clear();

        character.now += dt;
        let now = character.now;
        let alive = character.is_alive();

        let input = if character.combat.can_move(alive) {
            *input
        } else {
            input.restrained()
        };
        let movement_input = input.movement();
        let mut velocity = sensors.velocity;
        let dash_cost = character.config.combat.dash_cost;
        let attack_cost = character.config.combat.attack_cost;

        // Timers
        character.movement.advance_timers(
            &character.config.movement,
            sensors,
            movement_input.jump_pressed,
            &mut velocity,
            dt,
        );
        character.combat.advance_timers(dt);

        // Movement transitions
        character.movement.apply_ground_contact(sensors, &mut events);

        let dash = input.dash_requested
            && character
                .combat
                .can_dash(alive, character.movement.is_dashing())
            && character.movement.can_dash(&character.config.movement)
            && self.pay(character, dash_cost, now);

        character.movement.resolve(
            &character.config.movement,
            &movement_input,
            sensors,
            dash,
            &mut velocity,
            dt,
            &mut events,
        );

        if let Some(knockback) = character.combat.take_knockback() {
            character.movement.interrupt(sensors, &mut events);
            velocity = knockback;
        }

        // Combat effects
        character.combat.resolve(&mut events);
        if input.attack_requested
            && character.combat.can_attack(alive)
            && self.pay(character, attack_cost, now)
        {
            character
                .combat
                .start_attack(&character.config.combat, &mut events);
        }

        // Regeneration
        character
            .attributes
            .tick(dt, now, &mut self.attribute_events);
        character.absorb_attribute_events(&mut self.attribute_events, &mut events);

        for event in &events {
            trace!("character {}: {}", character.id, event.label());
        }

        TickOutput {
            intent: MotionIntent { velocity },
            events,
        }
    }

    /// Spend `cost` from the configured resource. Characters without that
    /// resource pay nothing.
    fn pay(&mut self, character: &mut Character, cost: f32, now: f32) -> bool {
        if cost <= 0.0 {
            return true;
        }
        let resource = &character.config.combat.cost_resource;
        character
            .attributes
            .try_consume(resource, cost, now, &mut self.attribute_events)
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::characters::{CharacterConfig, MovementMode};
    use approx::assert_abs_diff_eq;

    const DT: f32 = 1.0 / 60.0;

    fn grounded() -> SensorReadings {
        SensorReadings {
            grounded: true,
            ..SensorReadings::default()
        }
    }

    #[test]
    fn test_first_step_reports_initial_attributes() {
        let mut character = Character::player(0, CharacterConfig::standard());
        let mut sim = SimulationStep::new();
        let out = sim.step(&mut character, &TickInput::default(), &grounded(), DT);
        assert_eq!(
            out.events
                .iter()
                .filter(|e| matches!(e, CharacterEvent::Attribute(_)))
                .count(),
            3
        );
        let out = sim.step(&mut character, &TickInput::default(), &grounded(), DT);
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_stunned_character_ignores_input() {
        let mut character = Character::player(0, CharacterConfig::standard());
        character.apply_stun(1.0);
        let mut sim = SimulationStep::new();
        let input = TickInput {
            horizontal: 1.0,
            jump_pressed: true,
            dash_requested: true,
            attack_requested: true,
            ..TickInput::default()
        };
        let out = sim.step(&mut character, &input, &grounded(), DT);
        assert_eq!(character.movement.mode(), MovementMode::Grounded);
        assert!(!character.combat.is_attacking());
        assert_abs_diff_eq!(out.intent.velocity.y, 0.0);
    }

    #[test]
    fn test_knockback_replaces_velocity_and_ends_dash() {
        let mut character = Character::player(0, CharacterConfig::standard());
        let mut sim = SimulationStep::new();
        let dash = TickInput {
            dash_requested: true,
            ..TickInput::default()
        };
        sim.step(&mut character, &dash, &grounded(), DT);
        assert!(character.movement.is_dashing());

        character.apply_damage(10.0, Vec2::X);
        let out = sim.step(&mut character, &TickInput::default(), &grounded(), DT);
        assert!(!character.movement.is_dashing());
        assert!(out.events.contains(&CharacterEvent::DashEnded));
        assert_abs_diff_eq!(out.intent.velocity.x, -15.0);
    }

    #[test]
    fn test_dash_cost_gates_dash() {
        let mut config = CharacterConfig::standard();
        config.combat.dash_cost = 60.0;
        config.movement.dash_cooldown = 0.0;
        let mut character = Character::player(0, config);
        let mut sim = SimulationStep::new();
        let dash = TickInput {
            dash_requested: true,
            ..TickInput::default()
        };

        let out = sim.step(&mut character, &dash, &grounded(), DT);
        assert!(out.events.contains(&CharacterEvent::DashStarted));
        assert_eq!(character.attributes.stamina().map(|s| s.current()), Some(40.0));

        // Let the dash finish, then try again without enough stamina
        for _ in 0..15 {
            sim.step(&mut character, &TickInput::default(), &grounded(), DT);
        }
        let out = sim.step(&mut character, &dash, &grounded(), DT);
        assert!(!out.events.contains(&CharacterEvent::DashStarted));
    }

    #[test]
    fn test_attack_window_opens_and_closes() {
        let mut character = Character::player(0, CharacterConfig::standard());
        let mut sim = SimulationStep::new();
        let attack = TickInput {
            attack_requested: true,
            ..TickInput::default()
        };
        let out = sim.step(&mut character, &attack, &grounded(), DT);
        assert!(out.events.contains(&CharacterEvent::AttackingChanged(true)));

        let mut closed = false;
        for _ in 0..30 {
            let out = sim.step(&mut character, &TickInput::default(), &grounded(), DT);
            closed |= out.events.contains(&CharacterEvent::AttackingChanged(false));
        }
        assert!(closed);
        assert!(!character.combat.is_attacking());
    }

    #[test]
    fn test_dead_character_keeps_falling() {
        let mut character = Character::player(0, CharacterConfig::standard());
        character.apply_damage(1000.0, Vec2::X);
        let mut sim = SimulationStep::new();
        let out = sim.step(&mut character, &TickInput::default(), &grounded(), DT);
        assert!(out.events.contains(&CharacterEvent::Died));

        let airborne = SensorReadings::default();
        let mut velocity = Vec2::ZERO;
        for _ in 0..10 {
            let sensors = SensorReadings {
                velocity,
                ..airborne
            };
            velocity = sim
                .step(
                    &mut character,
                    &TickInput {
                        jump_pressed: true,
                        ..TickInput::default()
                    },
                    &sensors,
                    DT,
                )
                .intent
                .velocity;
        }
        assert!(velocity.y < 0.0);
    }
}
