// Character entity: template, attributes, movement and combat state

use std::fmt;

use glam::Vec2;
use log::info;

use super::combat::{CombatState, DamageOutcome};
use super::config::CharacterConfig;
use super::events::CharacterEvent;
use super::movement::{Facing, MovementState};
use crate::game::attributes::{AttributeEvent, AttributeSet};

/// Unique identifier for a character
pub type CharacterId = u32;

/// Archetype-specific reaction to death, injected at spawn
pub trait DeathHandler: fmt::Debug + Send {
    /// Called once per life, on the tick health runs out
    fn on_death(&mut self, id: CharacterId, name: &str);

    /// Called when the character is brought back
    fn on_respawn(&mut self, _id: CharacterId) {}

    /// Whether the owner should remove this character
    fn should_despawn(&self) -> bool {
        false
    }

    /// Whether input should still be routed to this character
    fn accepts_input(&self) -> bool {
        true
    }
}

/// Player death: input is cut until respawn
#[derive(Debug, Default)]
pub struct PlayerDeath {
    input_disabled: bool,
    deaths: u32,
}

impl PlayerDeath {
    pub fn deaths(&self) -> u32 {
        self.deaths
    }
}

impl DeathHandler for PlayerDeath {
    fn on_death(&mut self, id: CharacterId, name: &str) {
        self.input_disabled = true;
        self.deaths += 1;
        info!("Player {} ({}) died, input disabled", name, id);
    }

    fn on_respawn(&mut self, _id: CharacterId) {
        self.input_disabled = false;
    }

    fn accepts_input(&self) -> bool {
        !self.input_disabled
    }
}

/// Enemy death: flagged for despawn
#[derive(Debug, Default)]
pub struct EnemyDeath {
    despawn: bool,
}

impl DeathHandler for EnemyDeath {
    fn on_death(&mut self, id: CharacterId, name: &str) {
        self.despawn = true;
        info!("Enemy {} ({}) died, marked for despawn", name, id);
    }

    fn on_respawn(&mut self, _id: CharacterId) {
        self.despawn = false;
    }

    fn should_despawn(&self) -> bool {
        self.despawn
    }
}

/// One simulated character. Owned and ticked by a single caller.
#[derive(Debug)]
pub struct Character {
    pub id: CharacterId,
    pub config: CharacterConfig,
    pub attributes: AttributeSet,
    pub movement: MovementState,
    pub combat: CombatState,

    /// Simulation clock in seconds, advanced by each step
    pub(crate) now: f32,
    dead: bool,
    death_handler: Box<dyn DeathHandler>,
    /// Events raised between ticks (damage, respawn), reported by the next step
    pub(crate) pending: Vec<CharacterEvent>,
}

impl Character {
    pub fn new(id: CharacterId, config: CharacterConfig, death_handler: Box<dyn DeathHandler>) -> Self {
        let mut attribute_events = Vec::new();
        let attributes = AttributeSet::from_templates(&config.attributes, 0.0, &mut attribute_events);

        let mut character = Self {
            id,
            config,
            attributes,
            movement: MovementState::new(Facing::Right),
            combat: CombatState::new(),
            now: 0.0,
            dead: false,
            death_handler,
            pending: Vec::new(),
        };
        // Initial values, so HUD bindings see them on the first tick
        let mut pending = Vec::new();
        character.absorb_attribute_events(&mut attribute_events, &mut pending);
        character.pending = pending;
        character
    }

    /// Player archetype
    pub fn player(id: CharacterId, config: CharacterConfig) -> Self {
        Self::new(id, config, Box::new(PlayerDeath::default()))
    }

    /// Enemy archetype
    pub fn enemy(id: CharacterId, config: CharacterConfig) -> Self {
        Self::new(id, config, Box::new(EnemyDeath::default()))
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn now(&self) -> f32 {
        self.now
    }

    pub fn is_alive(&self) -> bool {
        !self.dead && self.attributes.is_alive()
    }

    pub fn death_handler(&self) -> &dyn DeathHandler {
        self.death_handler.as_ref()
    }

    /// Hit the character. Resulting events are reported by the next step.
    pub fn apply_damage(&mut self, amount: f32, source_direction: Vec2) -> DamageOutcome {
        let mut events = std::mem::take(&mut self.pending);
        let mut attribute_events = Vec::new();

        let outcome = self.combat.apply_damage(
            &mut self.attributes,
            amount,
            source_direction,
            &self.config.combat,
            self.now,
            &mut events,
            &mut attribute_events,
        );
        self.absorb_attribute_events(&mut attribute_events, &mut events);

        self.pending = events;
        outcome
    }

    pub fn apply_stun(&mut self, duration: f32) {
        self.combat.apply_stun(duration, &mut self.pending);
    }

    /// Restore health; dead characters stay dead until respawned
    pub fn heal(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        let mut attribute_events = Vec::new();
        let healed = self.attributes.heal(amount, self.now, &mut attribute_events);
        let mut events = std::mem::take(&mut self.pending);
        self.absorb_attribute_events(&mut attribute_events, &mut events);
        self.pending = events;
        healed
    }

    /// Rebuild attributes from the template and reset movement and combat
    pub fn respawn(&mut self) {
        let mut attribute_events = Vec::new();
        self.attributes
            .initialize_from(&self.config.attributes, self.now, &mut attribute_events);
        self.movement.reset();
        self.combat.reset();
        self.dead = false;
        self.death_handler.on_respawn(self.id);

        let mut events = std::mem::take(&mut self.pending);
        self.absorb_attribute_events(&mut attribute_events, &mut events);
        self.pending = events;
        info!("{} ({}) respawned", self.config.name, self.id);
    }

    /// Turn attribute notifications into character events, running the death
    /// handler on the first set-level death
    pub(crate) fn absorb_attribute_events(
        &mut self,
        attribute_events: &mut Vec<AttributeEvent>,
        events: &mut Vec<CharacterEvent>,
    ) {
        for event in attribute_events.drain(..) {
            match event {
                AttributeEvent::OwnerDied => {
                    if !self.dead {
                        self.dead = true;
                        self.death_handler.on_death(self.id, &self.config.name);
                        events.push(CharacterEvent::Died);
                    }
                }
                other => events.push(CharacterEvent::Attribute(other)),
            }
        }
    }
}
