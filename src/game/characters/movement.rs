// Character movement state machine
//
// Grounded / Airborne / Dashing / WallSliding, with coyote time, jump
// buffering, double jump, dash timing and wall-jump lockout. All waits are
// countdowns advanced once per fixed tick.

use glam::Vec2;
use log::debug;

use super::config::{MovementConfig, WallJumpLockout};
use super::events::{CharacterEvent, JumpKind};
use crate::core::math::{ease_in_out_bell, lerp, sign_outside_dead_zone, smoothing_factor};
use crate::core::Countdown;

/// Input magnitude below this is ignored for facing, dash direction and
/// wall release
pub const INPUT_DEAD_ZONE: f32 = 0.1;

/// Upward speed above which ground contact does not count as landing
const LANDING_TOLERANCE: f32 = 0.01;

/// Slack when comparing elapsed dash time against its duration
const DURATION_TOLERANCE: f32 = 1e-5;

/// Exactly one of these is active at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MovementMode {
    #[default]
    Grounded,
    Airborne,
    Dashing,
    WallSliding,
}

impl MovementMode {
    pub fn is_grounded(&self) -> bool {
        matches!(self, Self::Grounded)
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self, Self::Airborne)
    }
}

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// +1 for right, -1 for left
    pub fn sign(self) -> f32 {
        match self {
            Self::Right => 1.0,
            Self::Left => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
        }
    }

    pub fn from_sign(value: f32) -> Self {
        if value < 0.0 {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Per-tick input as seen by the movement layer (already zeroed while stunned)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementInput {
    pub horizontal: f32,
    pub vertical: f32,
    pub jump_pressed: bool,
    pub jump_released: bool,
}

/// Results from the sensor collaborator for this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorReadings {
    pub grounded: bool,
    /// Contact on the side given by [`MovementState::wall_probe_facing`]
    pub wall_contact: bool,
    pub velocity: Vec2,
    pub position: Vec2,
}

impl SensorReadings {
    /// Contact that counts as standing on the ground (not while rising)
    pub fn touching_ground(&self) -> bool {
        self.grounded && self.velocity.y <= LANDING_TOLERANCE
    }
}

/// Wall-jump input lock
#[derive(Debug, Clone, Copy, PartialEq)]
struct Lockout {
    origin_x: f32,
    away: Facing,
    timer: Countdown,
}

/// Movement state of one character
#[derive(Debug, Clone)]
pub struct MovementState {
    mode: MovementMode,
    facing: Facing,
    intent: Vec2,

    coyote: Countdown,
    jump_buffer: Countdown,
    double_jump_available: bool,
    /// Jump button still held since the last jump (variable jump height)
    jump_held: bool,
    /// Jump button state as seen through press/release edges
    jump_button: bool,

    dash_cooldown: Countdown,
    dash_elapsed: f32,
    dash_direction: Vec2,
    dash_from_ground: bool,

    wall_recheck: Countdown,
    wall_release: Countdown,
    wall_release_armed: bool,
    wall_release_due: bool,

    lockout: Option<Lockout>,
    movement_locked: bool,
}

impl Default for MovementState {
    fn default() -> Self {
        Self::new(Facing::Right)
    }
}

impl MovementState {
    pub fn new(facing: Facing) -> Self {
        Self {
            mode: MovementMode::Grounded,
            facing,
            intent: Vec2::ZERO,
            coyote: Countdown::idle(),
            jump_buffer: Countdown::idle(),
            double_jump_available: true,
            jump_held: false,
            jump_button: false,
            dash_cooldown: Countdown::idle(),
            dash_elapsed: 0.0,
            dash_direction: Vec2::X,
            dash_from_ground: false,
            wall_recheck: Countdown::idle(),
            wall_release: Countdown::idle(),
            wall_release_armed: false,
            wall_release_due: false,
            lockout: None,
            movement_locked: false,
        }
    }

    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn intent(&self) -> Vec2 {
        self.intent
    }

    pub fn is_grounded(&self) -> bool {
        self.mode.is_grounded()
    }

    pub fn is_dashing(&self) -> bool {
        self.mode == MovementMode::Dashing
    }

    pub fn is_wall_sliding(&self) -> bool {
        self.mode == MovementMode::WallSliding
    }

    pub fn coyote_remaining(&self) -> f32 {
        self.coyote.remaining()
    }

    pub fn jump_buffer_remaining(&self) -> f32 {
        self.jump_buffer.remaining()
    }

    pub fn dash_cooldown_remaining(&self) -> f32 {
        self.dash_cooldown.remaining()
    }

    pub fn dash_elapsed(&self) -> f32 {
        self.dash_elapsed
    }

    pub fn dash_direction(&self) -> Vec2 {
        self.dash_direction
    }

    pub fn double_jump_available(&self) -> bool {
        self.double_jump_available
    }

    /// True while a wall jump is holding horizontal input off
    pub fn is_movement_locked(&self) -> bool {
        self.movement_locked
    }

    /// Side the wall sensor should probe: towards the wall while sliding,
    /// otherwise ahead of the character
    pub fn wall_probe_facing(&self) -> Facing {
        if self.is_wall_sliding() {
            self.facing.flipped()
        } else {
            self.facing
        }
    }

    /// Timer phase: coyote, jump buffer, dash cooldown/timer, wall delays and
    /// the wall-jump lockout check
    pub fn advance_timers(
        &mut self,
        config: &MovementConfig,
        sensors: &SensorReadings,
        jump_pressed: bool,
        velocity: &mut Vec2,
        dt: f32,
    ) {
        if sensors.touching_ground() {
            self.coyote.arm(config.coyote_time);
        } else {
            self.coyote.tick(dt);
        }

        if jump_pressed {
            self.jump_buffer.arm(config.jump_buffer_time);
        } else {
            self.jump_buffer.tick(dt);
        }

        self.dash_cooldown.tick(dt);
        if self.is_dashing() {
            self.dash_elapsed += dt;
        }

        self.wall_recheck.tick(dt);
        if self.wall_release.tick(dt) {
            self.wall_release_due = true;
        }

        self.check_lockout(config, sensors, velocity, dt);
    }

    /// Grounded <-> Airborne from the ground sensor
    pub fn apply_ground_contact(&mut self, sensors: &SensorReadings, events: &mut Vec<CharacterEvent>) {
        let touching = sensors.touching_ground();
        match self.mode {
            MovementMode::Grounded if !sensors.grounded => {
                self.set_mode(MovementMode::Airborne);
                events.push(CharacterEvent::TookOff);
            }
            MovementMode::Airborne if touching => self.land(events),
            MovementMode::WallSliding if touching => {
                self.end_wall_slide(events);
                self.land(events);
            }
            _ => {}
        }
    }

    /// Movement-side dash guard: cooldown elapsed, not dashing or wall
    /// sliding, and on the ground unless air dashing is allowed
    pub fn can_dash(&self, config: &MovementConfig) -> bool {
        if self.dash_cooldown.is_running() {
            return false;
        }
        match self.mode {
            MovementMode::Grounded => true,
            MovementMode::Airborne => config.air_dash,
            MovementMode::Dashing | MovementMode::WallSliding => false,
        }
    }

    /// Transition phase. Priority: dash, wall slide, jump, horizontal.
    ///
    /// `dash` must only be true when the caller already checked
    /// [`MovementState::can_dash`] and every other dash gate.
    pub fn resolve(
        &mut self,
        config: &MovementConfig,
        input: &MovementInput,
        sensors: &SensorReadings,
        dash: bool,
        velocity: &mut Vec2,
        dt: f32,
        events: &mut Vec<CharacterEvent>,
    ) {
        self.intent = Vec2::new(input.horizontal, input.vertical);

        // Press before release so a tap within one tick ends up released
        if input.jump_pressed {
            self.jump_button = true;
        }
        if input.jump_released {
            self.jump_button = false;
            if velocity.y > 0.0 {
                self.jump_held = false;
            }
        }

        if dash {
            self.start_dash(config, input.horizontal, velocity, events);
        }

        if self.is_dashing() && self.resolve_dash(config, sensors, velocity, events) {
            self.clamp_fall(config, velocity);
            return;
        }

        if self.mode == MovementMode::Airborne && sensors.wall_contact && velocity.y <= 0.0 {
            self.start_wall_slide(config, events);
        }

        if self.is_wall_sliding() && self.resolve_wall_slide(config, input, sensors, velocity, events) {
            self.clamp_fall(config, velocity);
            return;
        }

        self.resolve_horizontal(config, input, velocity, dt, events);

        if self.mode == MovementMode::Grounded {
            // resting contact
            velocity.y = velocity.y.max(0.0);
        } else if self.mode == MovementMode::Airborne {
            self.apply_gravity(config, velocity, dt);
        }

        self.resolve_jump(config, input, velocity, events);
        self.clamp_fall(config, velocity);
    }

    /// Knockback or death: drop out of dash / wall slide
    pub fn interrupt(&mut self, sensors: &SensorReadings, events: &mut Vec<CharacterEvent>) {
        match self.mode {
            MovementMode::Dashing => self.end_dash(sensors, events),
            MovementMode::WallSliding => {
                self.end_wall_slide(events);
                self.set_mode(MovementMode::Airborne);
            }
            _ => {}
        }
    }

    /// Back to the spawn state, keeping the current facing
    pub fn reset(&mut self) {
        *self = Self::new(self.facing);
    }

    fn set_mode(&mut self, mode: MovementMode) {
        if self.mode != mode {
            debug!("movement {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    fn set_facing(&mut self, facing: Facing, events: &mut Vec<CharacterEvent>) {
        if self.facing != facing {
            self.facing = facing;
            events.push(CharacterEvent::FacingChanged(facing));
        }
    }

    fn land(&mut self, events: &mut Vec<CharacterEvent>) {
        self.set_mode(MovementMode::Grounded);
        self.double_jump_available = true;
        self.jump_held = false;
        self.lockout = None;
        self.movement_locked = false;
        events.push(CharacterEvent::Landed);
    }

    fn start_dash(
        &mut self,
        config: &MovementConfig,
        horizontal: f32,
        velocity: &mut Vec2,
        events: &mut Vec<CharacterEvent>,
    ) {
        let mut direction = sign_outside_dead_zone(horizontal, INPUT_DEAD_ZONE);
        if direction == 0.0 {
            direction = self.facing.sign();
        }

        self.dash_direction = Vec2::new(direction, 0.0);
        self.dash_elapsed = 0.0;
        self.dash_cooldown.arm(config.dash_cooldown);
        self.dash_from_ground = self.mode == MovementMode::Grounded;
        if config.dash_resets_vertical {
            velocity.y = 0.0;
        }

        self.set_mode(MovementMode::Dashing);
        events.push(CharacterEvent::DashStarted);
    }

    /// Returns true while the dash still owns the velocity this tick
    fn resolve_dash(
        &mut self,
        config: &MovementConfig,
        sensors: &SensorReadings,
        velocity: &mut Vec2,
        events: &mut Vec<CharacterEvent>,
    ) -> bool {
        if self.dash_elapsed + DURATION_TOLERANCE >= config.dash_duration {
            self.end_dash(sensors, events);
            return false;
        }

        // Hitting a wall mid-air cancels the dash into a slide
        if sensors.wall_contact && !sensors.touching_ground() {
            self.end_dash(sensors, events);
            if self.mode == MovementMode::Airborne {
                self.start_wall_slide(config, events);
            }
            return false;
        }

        let t = self.dash_elapsed / config.dash_duration;
        velocity.x = self.dash_direction.x * config.dash_force * ease_in_out_bell(t);
        if config.dash_resets_vertical {
            velocity.y = 0.0;
        }
        true
    }

    fn end_dash(&mut self, sensors: &SensorReadings, events: &mut Vec<CharacterEvent>) {
        events.push(CharacterEvent::DashEnded);
        if sensors.touching_ground() {
            if self.dash_from_ground {
                self.set_mode(MovementMode::Grounded);
            } else {
                self.land(events);
            }
        } else {
            self.set_mode(MovementMode::Airborne);
            if self.dash_from_ground {
                events.push(CharacterEvent::TookOff);
            }
        }
    }

    fn start_wall_slide(&mut self, config: &MovementConfig, events: &mut Vec<CharacterEvent>) {
        self.set_mode(MovementMode::WallSliding);
        // Face away from the wall
        let away = self.facing.flipped();
        self.set_facing(away, events);
        self.wall_recheck.arm(config.wall_recheck_delay);
        self.wall_release.clear();
        self.wall_release_armed = false;
        self.wall_release_due = false;
        self.double_jump_available = true;
        events.push(CharacterEvent::WallSlideStarted);
    }

    fn end_wall_slide(&mut self, events: &mut Vec<CharacterEvent>) {
        self.wall_release.clear();
        self.wall_release_armed = false;
        self.wall_release_due = false;
        self.double_jump_available = true;
        self.set_mode(MovementMode::Airborne);
        events.push(CharacterEvent::WallSlideEnded);
    }

    /// Returns true while the slide still owns the velocity this tick
    fn resolve_wall_slide(
        &mut self,
        config: &MovementConfig,
        input: &MovementInput,
        sensors: &SensorReadings,
        velocity: &mut Vec2,
        events: &mut Vec<CharacterEvent>,
    ) -> bool {
        if self.jump_buffer.is_running() {
            self.wall_jump(config, sensors, velocity, events);
            return true;
        }

        let lost_contact = !sensors.wall_contact && self.wall_recheck.is_expired();
        if self.wall_release_due || lost_contact {
            self.end_wall_slide(events);
            return false;
        }

        if !self.wall_release_armed && input.horizontal * self.facing.sign() > INPUT_DEAD_ZONE {
            self.wall_release.arm(config.wall_release_delay);
            self.wall_release_armed = true;
        }

        // `facing` points away from the wall; stick towards it
        velocity.x = -self.facing.sign() * config.wall_stick_speed;
        velocity.y = -config.wall_slide_speed;
        true
    }

    fn wall_jump(
        &mut self,
        config: &MovementConfig,
        sensors: &SensorReadings,
        velocity: &mut Vec2,
        events: &mut Vec<CharacterEvent>,
    ) {
        let away = self.facing;
        let jump = config.jump_velocity();

        *velocity = Vec2::new(away.sign() * jump * config.wall_jump_push, jump);

        let mut timer = Countdown::idle();
        if let WallJumpLockout::Timer { duration } = config.wall_jump_lockout {
            timer.arm(duration);
        }
        self.lockout = Some(Lockout {
            origin_x: sensors.position.x,
            away,
            timer,
        });
        self.movement_locked = true;
        self.jump_buffer.clear();
        self.jump_held = self.jump_button;

        self.end_wall_slide(events);
        events.push(CharacterEvent::Jumped(JumpKind::Wall));
    }

    fn check_lockout(
        &mut self,
        config: &MovementConfig,
        sensors: &SensorReadings,
        velocity: &mut Vec2,
        dt: f32,
    ) {
        let Some(lockout) = self.lockout.as_mut() else {
            return;
        };

        match config.wall_jump_lockout {
            WallJumpLockout::Timer { .. } => {
                if lockout.timer.tick(dt) || lockout.timer.is_expired() {
                    self.release_lockout();
                }
            }
            WallJumpLockout::DistanceBands {
                unlock,
                kick,
                cancel,
                kick_speed,
                fall_cancel_speed,
            } => {
                if velocity.y < -fall_cancel_speed {
                    self.release_lockout();
                    return;
                }

                // Negative while moving away from the wall
                let distance = (lockout.origin_x - sensors.position.x) * lockout.away.sign();
                let away = lockout.away;

                if distance < -unlock && distance > -kick {
                    self.movement_locked = false;
                } else if distance <= -kick && distance >= -cancel {
                    self.movement_locked = false;
                    velocity.x = kick_speed * away.sign();
                } else if distance < -cancel || distance > 0.0 {
                    self.release_lockout();
                    velocity.x = 0.0;
                }
            }
        }
    }

    fn release_lockout(&mut self) {
        self.lockout = None;
        self.movement_locked = false;
    }

    fn resolve_horizontal(
        &mut self,
        config: &MovementConfig,
        input: &MovementInput,
        velocity: &mut Vec2,
        dt: f32,
        events: &mut Vec<CharacterEvent>,
    ) {
        if self.movement_locked {
            return;
        }

        let grounded = self.mode == MovementMode::Grounded;
        if !grounded && !config.air_control {
            return;
        }

        let speed = if grounded {
            config.move_speed
        } else {
            config.move_speed * config.air_control_factor
        };
        let target = input.horizontal * speed;
        velocity.x = lerp(
            velocity.x,
            target,
            smoothing_factor(config.movement_smoothing, dt),
        );

        let sign = sign_outside_dead_zone(input.horizontal, INPUT_DEAD_ZONE);
        if sign != 0.0 {
            self.set_facing(Facing::from_sign(sign), events);
        }
    }

    fn apply_gravity(&mut self, config: &MovementConfig, velocity: &mut Vec2, dt: f32) {
        let multiplier = if velocity.y < 0.0 {
            self.jump_held = false;
            config.fall_multiplier
        } else if velocity.y > 0.0 && !self.jump_held {
            config.low_jump_multiplier
        } else {
            1.0
        };
        velocity.y += config.gravity() * multiplier * dt;
    }

    fn resolve_jump(
        &mut self,
        config: &MovementConfig,
        input: &MovementInput,
        velocity: &mut Vec2,
        events: &mut Vec<CharacterEvent>,
    ) {
        if self.movement_locked || self.jump_buffer.is_expired() {
            return;
        }

        let grounded = self.mode == MovementMode::Grounded;
        if grounded || self.coyote.is_running() {
            velocity.y = config.jump_velocity();
            self.jump_buffer.clear();
            self.coyote.clear();
            self.double_jump_available = true;
            self.jump_held = self.jump_button;
            if grounded {
                self.set_mode(MovementMode::Airborne);
                events.push(CharacterEvent::TookOff);
            }
            events.push(CharacterEvent::Jumped(JumpKind::Ground));
        } else if config.double_jump
            && self.mode == MovementMode::Airborne
            && input.jump_pressed
            && self.double_jump_available
        {
            self.double_jump_available = false;
            velocity.y = config.double_jump_velocity();
            self.jump_buffer.clear();
            self.jump_held = self.jump_button;
            events.push(CharacterEvent::Jumped(JumpKind::Double));
        }
    }

    fn clamp_fall(&self, config: &MovementConfig, velocity: &mut Vec2) {
        velocity.y = velocity.y.max(-config.max_fall_speed);
    }
}
