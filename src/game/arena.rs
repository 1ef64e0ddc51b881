// Arena: characters bound to rapier bodies
//
// Each tick probes contacts, runs the simulation step for every character,
// hands the resulting velocity to the physics world and steps it once.
// Characters never see each other's state during a tick, so the order they
// are stepped in does not matter.

use std::collections::HashMap;

use glam::Vec2;
use log::{debug, info};

use super::characters::{
    Character, CharacterConfig, CharacterEvent, CharacterId, DamageOutcome, DeathHandler,
    EnemyDeath, PlayerDeath, SensorReadings,
};
use super::simulation::{SimulationStep, TickInput};
use crate::engine::game_loop::FIXED_TIMESTEP;
use crate::engine::physics::{ContactProbe, PhysicsWorld, RigidBodyHandle};

/// Extra horizontal reach of a melee attack beyond the attacker's half width
const ATTACK_REACH: f32 = 1.0;

/// A character and its body
#[derive(Debug)]
pub struct Fighter {
    pub character: Character,
    body: RigidBodyHandle,
    probe: ContactProbe,
    spawn_point: Vec2,
}

impl Fighter {
    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.spawn_point
    }
}

/// Events one character produced during a tick
#[derive(Debug, Clone, PartialEq)]
pub struct EventBatch {
    pub id: CharacterId,
    pub events: Vec<CharacterEvent>,
}

/// Owns the physics world and every simulated character in it
pub struct Arena {
    physics: PhysicsWorld,
    fighters: Vec<Fighter>,
    simulation: SimulationStep,
    next_id: CharacterId,
    dt: f32,
}

impl Arena {
    pub fn new() -> Self {
        let mut physics = PhysicsWorld::new();
        physics.set_timestep(FIXED_TIMESTEP);
        Self {
            physics,
            fighters: Vec::new(),
            simulation: SimulationStep::new(),
            next_id: 0,
            dt: FIXED_TIMESTEP,
        }
    }

    /// Floor, wall or platform: an axis-aligned box centred on `center`
    pub fn add_terrain(&mut self, center: Vec2, size: Vec2) {
        self.physics.add_terrain(center, size);
    }

    pub fn spawn(
        &mut self,
        config: CharacterConfig,
        position: Vec2,
        death_handler: Box<dyn DeathHandler>,
    ) -> CharacterId {
        let id = self.next_id;
        self.next_id += 1;

        let body = self
            .physics
            .add_character(id, position, config.width, config.height);

        info!(
            "Spawned {} ({}) at ({:.1}, {:.1})",
            config.name, id, position.x, position.y
        );

        let probe = ContactProbe::new(config.width, config.height);
        self.fighters.push(Fighter {
            character: Character::new(id, config, death_handler),
            body,
            probe,
            spawn_point: position,
        });
        id
    }

    pub fn spawn_player(&mut self, config: CharacterConfig, position: Vec2) -> CharacterId {
        self.spawn(config, position, Box::new(PlayerDeath::default()))
    }

    pub fn spawn_enemy(&mut self, config: CharacterConfig, position: Vec2) -> CharacterId {
        self.spawn(config, position, Box::new(EnemyDeath::default()))
    }

    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.fighter(id).map(|f| &f.character)
    }

    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.fighters
            .iter_mut()
            .find(|f| f.character.id == id)
            .map(|f| &mut f.character)
    }

    pub fn fighter(&self, id: CharacterId) -> Option<&Fighter> {
        self.fighters.iter().find(|f| f.character.id == id)
    }

    pub fn ids(&self) -> Vec<CharacterId> {
        self.fighters.iter().map(|f| f.character.id).collect()
    }

    pub fn len(&self) -> usize {
        self.fighters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fighters.is_empty()
    }

    pub fn position(&self, id: CharacterId) -> Option<Vec2> {
        let fighter = self.fighter(id)?;
        self.physics.body_state(fighter.body).map(|(p, _)| p)
    }

    pub fn velocity(&self, id: CharacterId) -> Option<Vec2> {
        let fighter = self.fighter(id)?;
        self.physics.body_state(fighter.body).map(|(_, v)| v)
    }

    /// What the sensor collaborator reports for a character right now
    pub fn sense(&self, id: CharacterId) -> Option<SensorReadings> {
        self.fighter(id).map(|f| sense(&self.physics, f))
    }

    /// Hit `target` from a source at `source_position`
    pub fn apply_damage(
        &mut self,
        target: CharacterId,
        amount: f32,
        source_position: Vec2,
    ) -> Option<DamageOutcome> {
        let position = self.position(target)?;
        let character = self.get_mut(target)?;
        Some(character.apply_damage(amount, source_position - position))
    }

    /// One fixed tick for every character. Characters without an entry in
    /// `inputs` get neutral input.
    pub fn tick(&mut self, inputs: &HashMap<CharacterId, TickInput>) -> Vec<EventBatch> {
        let neutral = TickInput::default();
        let mut batches = Vec::with_capacity(self.fighters.len());

        for fighter in &mut self.fighters {
            let sensors = sense(&self.physics, fighter);
            let input = inputs.get(&fighter.character.id).unwrap_or(&neutral);

            let output = self
                .simulation
                .step(&mut fighter.character, input, &sensors, self.dt);
            self.physics
                .set_velocity(fighter.body, output.intent.velocity);

            batches.push(EventBatch {
                id: fighter.character.id,
                events: output.events,
            });
        }

        self.physics.step();
        self.resolve_attacks(&batches);
        batches
    }

    /// Attacks that opened this tick hit every other living character in
    /// front of the attacker within reach
    fn resolve_attacks(&mut self, batches: &[EventBatch]) {
        let attackers: Vec<CharacterId> = batches
            .iter()
            .filter(|b| b.events.contains(&CharacterEvent::AttackingChanged(true)))
            .map(|b| b.id)
            .collect();

        for attacker in attackers {
            let Some(fighter) = self.fighter(attacker) else {
                continue;
            };
            let Some(origin) = self.position(attacker) else {
                continue;
            };
            let facing = fighter.character.movement.facing().sign();
            let reach = fighter.character.config.width / 2.0 + ATTACK_REACH;
            let height = fighter.character.config.height;
            let damage = fighter.character.config.combat.attack_damage;

            let targets: Vec<CharacterId> = self
                .fighters
                .iter()
                .filter(|f| f.character.id != attacker && f.character.is_alive())
                .filter(|f| {
                    self.physics.body_state(f.body).is_some_and(|(p, _)| {
                        let ahead = (p.x - origin.x) * facing;
                        let reach = reach + f.character.config.width / 2.0;
                        ahead >= 0.0 && ahead <= reach && (p.y - origin.y).abs() <= height
                    })
                })
                .map(|f| f.character.id)
                .collect();

            for target in targets {
                let outcome = self.apply_damage(target, damage, origin);
                debug!("{} hit {}: {:?}", attacker, target, outcome);
            }
        }
    }

    /// Bring a dead character back at its spawn point
    pub fn respawn(&mut self, id: CharacterId) -> bool {
        let Some(fighter) = self.fighters.iter_mut().find(|f| f.character.id == id) else {
            return false;
        };
        fighter.character.respawn();
        self.physics.set_position(fighter.body, fighter.spawn_point);
        self.physics.update_queries();
        true
    }

    /// Remove characters whose death handler asked for it
    pub fn despawn_dead(&mut self) -> Vec<CharacterId> {
        let mut removed = Vec::new();
        let physics = &mut self.physics;
        self.fighters.retain(|f| {
            if f.character.death_handler().should_despawn() {
                physics.remove_body(f.body);
                removed.push(f.character.id);
                false
            } else {
                true
            }
        });
        for id in &removed {
            info!("Despawned character {}", id);
        }
        removed
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

fn sense(physics: &PhysicsWorld, fighter: &Fighter) -> SensorReadings {
    let (position, velocity) = physics.body_state(fighter.body).unwrap_or_default();
    let side = fighter.character.movement.wall_probe_facing().sign();
    let contacts = fighter.probe.probe(physics, fighter.body, side);
    SensorReadings {
        grounded: contacts.ground,
        wall_contact: contacts.wall,
        velocity,
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::characters::MovementMode;

    /// Floor top at y = 0, walls at x = -10 and x = 10
    fn arena() -> Arena {
        let mut arena = Arena::new();
        arena.add_terrain(Vec2::new(0.0, -0.5), Vec2::new(40.0, 1.0));
        arena.add_terrain(Vec2::new(-10.5, 10.0), Vec2::new(1.0, 20.0));
        arena.add_terrain(Vec2::new(10.5, 10.0), Vec2::new(1.0, 20.0));
        arena
    }

    fn run(arena: &mut Arena, ticks: usize) -> Vec<EventBatch> {
        let mut all = Vec::new();
        for _ in 0..ticks {
            all.extend(arena.tick(&HashMap::new()));
        }
        all
    }

    #[test]
    fn test_spawned_on_floor_is_grounded() {
        let mut arena = arena();
        let id = arena.spawn_player(CharacterConfig::standard(), Vec2::new(0.0, 1.0));
        assert!(arena.sense(id).is_some_and(|s| s.grounded));
        run(&mut arena, 10);
        assert_eq!(arena.get(id).map(|c| c.movement.mode()), Some(MovementMode::Grounded));
    }

    #[test]
    fn test_falls_and_lands() {
        let mut arena = arena();
        let id = arena.spawn_player(CharacterConfig::standard(), Vec2::new(0.0, 5.0));
        let events = run(&mut arena, 120);
        assert!(events
            .iter()
            .any(|b| b.id == id && b.events.contains(&CharacterEvent::Landed)));
        let y = arena.position(id).map_or(f32::MAX, |p| p.y);
        assert!((y - 1.0).abs() < 0.1, "resting height was {y}");
    }

    #[test]
    fn test_melee_hits_enemy_in_front() {
        let mut arena = arena();
        let player = arena.spawn_player(CharacterConfig::standard(), Vec2::new(0.0, 1.0));
        let enemy = arena.spawn_enemy(CharacterConfig::grunt(), Vec2::new(1.2, 0.75));
        run(&mut arena, 5);

        let mut inputs = HashMap::new();
        inputs.insert(
            player,
            TickInput {
                attack_requested: true,
                ..TickInput::default()
            },
        );
        arena.tick(&inputs);

        let health = arena
            .get(enemy)
            .and_then(|c| c.attributes.health())
            .map(|h| h.current());
        // 10 damage minus 2 armor
        assert_eq!(health, Some(32.0));
    }

    #[test]
    fn test_dead_enemy_despawns() {
        let mut arena = arena();
        let enemy = arena.spawn_enemy(CharacterConfig::grunt(), Vec2::new(3.0, 0.75));
        arena.apply_damage(enemy, 500.0, Vec2::new(0.0, 0.75));
        let events = run(&mut arena, 1);
        assert!(events[0].events.contains(&CharacterEvent::Died));

        assert_eq!(arena.despawn_dead(), vec![enemy]);
        assert!(arena.is_empty());
        assert_eq!(arena.physics().body_count(), 3);
    }

    #[test]
    fn test_player_respawns_at_spawn_point() {
        let mut arena = arena();
        let player = arena.spawn_player(CharacterConfig::standard(), Vec2::new(-3.0, 1.0));
        arena.apply_damage(player, 500.0, Vec2::new(0.0, 1.0));
        run(&mut arena, 30);
        assert!(arena.despawn_dead().is_empty());

        assert!(arena.respawn(player));
        assert!(arena.get(player).is_some_and(|c| c.is_alive()));
        let x = arena.position(player).map_or(f32::MAX, |p| p.x);
        assert!((x + 3.0).abs() < 1e-3);
    }
}
