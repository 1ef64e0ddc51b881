// End-to-end behaviour of one character driven tick by tick, with the
// outgoing velocity fed straight back as the next sensor reading.

use approx::assert_abs_diff_eq;
use glam::Vec2;

use vania_sim::game::attributes::{AttributeKind, AttributeTemplate, HEALTH, STAMINA};
use vania_sim::game::characters::{
    Character, CharacterConfig, CharacterEvent, DamageOutcome, JumpKind, MovementMode,
    SensorReadings,
};
use vania_sim::{SimulationStep, TickInput, TickOutput};

const DT: f32 = 0.05;

struct Harness {
    character: Character,
    sim: SimulationStep,
    sensors: SensorReadings,
}

impl Harness {
    fn new(config: CharacterConfig) -> Self {
        Self {
            character: Character::player(0, config),
            sim: SimulationStep::new(),
            sensors: SensorReadings {
                grounded: true,
                ..SensorReadings::default()
            },
        }
    }

    fn airborne(mut self) -> Self {
        self.sensors.grounded = false;
        self
    }

    fn step(&mut self, input: TickInput) -> TickOutput {
        let out = self.sim.step(&mut self.character, &input, &self.sensors, DT);
        self.sensors.velocity = out.intent.velocity;
        self.sensors.position += out.intent.velocity * DT;
        out
    }

    fn idle(&mut self) -> TickOutput {
        self.step(TickInput::default())
    }

    fn idle_for(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.idle();
        }
    }

    fn health(&self) -> f32 {
        self.character
            .attributes
            .get(HEALTH)
            .map_or(f32::NAN, |h| h.current())
    }
}

fn instant() -> CharacterConfig {
    let mut config = CharacterConfig::standard();
    config.movement.movement_smoothing = 0.0;
    config
}

fn single_jump() -> CharacterConfig {
    let mut config = instant();
    config.movement.double_jump = false;
    config
}

fn jump() -> TickInput {
    TickInput {
        jump_pressed: true,
        ..TickInput::default()
    }
}

fn dash() -> TickInput {
    TickInput {
        dash_requested: true,
        ..TickInput::default()
    }
}

fn jumped(out: &TickOutput) -> bool {
    out.events.contains(&CharacterEvent::Jumped(JumpKind::Ground))
}

#[test]
fn hit_reduces_health_and_stuns_briefly() {
    let mut h = Harness::new(instant());
    h.idle();

    let outcome = h.character.apply_damage(15.0, Vec2::new(1.0, 0.0));
    assert_eq!(
        outcome,
        DamageOutcome::Applied {
            dealt: 15.0,
            lethal: false
        }
    );
    assert_abs_diff_eq!(h.health(), 85.0);
    assert!(h.character.combat.is_stunned());

    let first = h.idle();
    assert!(first.events.contains(&CharacterEvent::StunnedChanged(true)));
    assert!(h.character.combat.is_stunned());

    let second = h.idle();
    assert!(second.events.contains(&CharacterEvent::StunnedChanged(false)));
    assert!(!h.character.combat.is_stunned());
}

#[test]
fn knockback_pushes_away_from_source() {
    let mut h = Harness::new(instant());
    h.idle();

    h.character.apply_damage(15.0, Vec2::new(1.0, 0.0));
    let out = h.idle();
    assert_abs_diff_eq!(out.intent.velocity.x, -15.0, epsilon = 1e-4);
    assert_abs_diff_eq!(out.intent.velocity.y, 0.0, epsilon = 1e-4);
    assert!(out.events.iter().any(|e| matches!(
        e,
        CharacterEvent::Damaged { amount, .. } if (*amount - 15.0).abs() < 1e-4
    )));
}

#[test]
fn stunned_character_ignores_movement_input() {
    let mut h = Harness::new(instant());
    h.idle();
    h.character.apply_stun(1.0);

    let out = h.step(TickInput {
        horizontal: 1.0,
        jump_pressed: true,
        ..TickInput::default()
    });
    assert_abs_diff_eq!(out.intent.velocity.x, 0.0);
    assert!(!jumped(&out));
}

#[test]
fn dash_follows_bell_curve() {
    let mut h = Harness::new(instant());
    h.idle();

    let start = h.step(dash());
    assert!(start.events.contains(&CharacterEvent::DashStarted));
    assert_eq!(h.character.movement.mode(), MovementMode::Dashing);
    assert_abs_diff_eq!(start.intent.velocity.x, 0.0, epsilon = 1e-4);

    let quarter = h.idle();
    let peak = h.idle();
    let three_quarters = h.idle();
    assert_abs_diff_eq!(peak.intent.velocity.x, 20.0, epsilon = 1e-3);
    assert!(quarter.intent.velocity.x > 0.0 && quarter.intent.velocity.x < 20.0);
    assert_abs_diff_eq!(
        quarter.intent.velocity.x,
        three_quarters.intent.velocity.x,
        epsilon = 1e-3
    );

    let end = h.idle();
    assert!(end.events.contains(&CharacterEvent::DashEnded));
    assert_eq!(h.character.movement.mode(), MovementMode::Grounded);
    assert_abs_diff_eq!(end.intent.velocity.x, 0.0);
}

#[test]
fn dash_cooldown_blocks_early_requests() {
    let mut h = Harness::new(instant());
    h.idle();
    assert!(h.step(dash()).events.contains(&CharacterEvent::DashStarted));

    // 0.5s after the dash
    h.idle_for(9);
    let early = h.step(dash());
    assert!(!early.events.contains(&CharacterEvent::DashStarted));

    // 1.1s after the dash
    h.idle_for(11);
    let late = h.step(dash());
    assert!(late.events.contains(&CharacterEvent::DashStarted));
}

#[test]
fn jump_pressed_just_before_landing_is_buffered() {
    let mut h = Harness::new(single_jump()).airborne();
    h.idle_for(3);
    assert_eq!(h.character.movement.mode(), MovementMode::Airborne);

    let pressed = h.step(jump());
    assert!(!jumped(&pressed));
    h.idle();

    h.sensors.grounded = true;
    let landed = h.idle();
    assert!(landed.events.contains(&CharacterEvent::Landed));
    assert!(jumped(&landed));
    assert!(landed.intent.velocity.y > 0.0);
}

#[test]
fn stale_buffered_jump_is_dropped() {
    let mut h = Harness::new(single_jump()).airborne();
    h.idle_for(3);

    h.step(jump());
    h.idle_for(4);

    h.sensors.grounded = true;
    let landed = h.idle();
    assert!(landed.events.contains(&CharacterEvent::Landed));
    assert!(!jumped(&landed));
}

#[test]
fn coyote_time_allows_late_jump() {
    let mut h = Harness::new(single_jump());
    h.idle_for(3);

    h.sensors.grounded = false;
    let left = h.idle();
    assert!(left.events.contains(&CharacterEvent::TookOff));

    let late = h.step(jump());
    assert!(jumped(&late));
}

#[test]
fn coyote_time_runs_out() {
    let mut h = Harness::new(single_jump());
    h.idle_for(3);

    h.sensors.grounded = false;
    h.idle_for(4);

    let late = h.step(jump());
    assert!(!jumped(&late));
}

#[test]
fn regeneration_waits_for_delay_after_spending() {
    let mut config = instant();
    config.attributes = vec![
        AttributeTemplate::new(HEALTH, AttributeKind::Health, 100.0),
        AttributeTemplate::new(STAMINA, AttributeKind::Resource, 100.0).regenerating(10.0, 2.0),
    ];
    config.combat.dash_cost = 20.0;

    let mut h = Harness::new(config);
    let stamina = |h: &Harness| {
        h.character
            .attributes
            .stamina()
            .map_or(f32::NAN, |s| s.current())
    };

    // Dash at t = 0.05 spends 20
    assert!(h.step(dash()).events.contains(&CharacterEvent::DashStarted));
    assert_abs_diff_eq!(stamina(&h), 80.0);

    // t = 1.95: 1.9s after spending
    h.idle_for(38);
    assert_abs_diff_eq!(stamina(&h), 80.0);

    // t = 2.15: 2.1s after spending
    h.idle_for(4);
    assert!(stamina(&h) > 80.0);
}

#[test]
fn dash_without_enough_stamina_is_refused() {
    let mut config = instant();
    config.combat.dash_cost = 150.0;

    let mut h = Harness::new(config);
    h.idle();
    let out = h.step(dash());
    assert!(!out.events.contains(&CharacterEvent::DashStarted));
    assert_eq!(h.character.movement.mode(), MovementMode::Grounded);
}

#[test]
fn lethal_hit_reports_death_once() {
    let mut h = Harness::new(instant());
    h.idle();

    let outcome = h.character.apply_damage(500.0, Vec2::new(-1.0, 0.0));
    assert_eq!(
        outcome,
        DamageOutcome::Applied {
            dealt: 500.0,
            lethal: true
        }
    );
    assert_eq!(h.character.apply_damage(5.0, Vec2::X), DamageOutcome::Ignored);

    let out = h.idle();
    assert_eq!(
        out.events
            .iter()
            .filter(|e| **e == CharacterEvent::Died)
            .count(),
        1
    );
    assert!(!h.character.is_alive());
    assert!(!h.character.death_handler().accepts_input());
}
