// Combat state: stun, attack window, invulnerability and knockback

use glam::Vec2;
use log::{debug, warn};

use super::config::CombatConfig;
use super::events::CharacterEvent;
use crate::core::Countdown;
use crate::game::attributes::{AttributeEvent, AttributeSet, HEALTH};

/// What happened to a damage request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Health was reduced by `dealt`
    Applied { dealt: f32, lethal: bool },
    /// Target is dead or invulnerable
    Ignored,
    /// Target has no Health attribute; nothing was applied
    Skipped,
}

/// Per-character combat flags and their countdowns
#[derive(Debug, Clone, Default)]
pub struct CombatState {
    stunned: bool,
    stun: Countdown,
    stun_due: bool,

    attacking: bool,
    attack: Countdown,
    attack_due: bool,

    invulnerable: Countdown,
    pending_knockback: Option<Vec2>,
}

impl CombatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_stunned(&self) -> bool {
        self.stunned
    }

    pub fn stun_remaining(&self) -> f32 {
        self.stun.remaining()
    }

    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable.is_running()
    }

    pub fn pending_knockback(&self) -> Option<Vec2> {
        self.pending_knockback
    }

    // Capability gates

    pub fn can_move(&self, alive: bool) -> bool {
        alive && !self.stunned
    }

    pub fn can_jump(&self, alive: bool, grounded: bool) -> bool {
        self.can_move(alive) && grounded
    }

    pub fn can_dash(&self, alive: bool, dashing: bool) -> bool {
        alive && !dashing && !self.stunned
    }

    pub fn can_attack(&self, alive: bool) -> bool {
        alive && !self.attacking && !self.stunned
    }

    pub fn can_take_damage(&self, alive: bool) -> bool {
        alive && !self.is_invulnerable()
    }

    /// Deal damage from a source lying in `source_direction` relative to the
    /// target; knockback pushes the opposite way.
    ///
    /// Knockback is queued before health is reduced so a lethal hit still
    /// pushes the body.
    pub fn apply_damage(
        &mut self,
        attributes: &mut AttributeSet,
        amount: f32,
        source_direction: Vec2,
        config: &CombatConfig,
        now: f32,
        events: &mut Vec<CharacterEvent>,
        attribute_events: &mut Vec<AttributeEvent>,
    ) -> DamageOutcome {
        if !self.can_take_damage(attributes.is_alive()) {
            return DamageOutcome::Ignored;
        }
        if !attributes.contains(HEALTH) {
            warn!("Damage of {amount} skipped: no {HEALTH} attribute");
            return DamageOutcome::Skipped;
        }

        let knockback = -source_direction.normalize_or_zero() * config.knockback_force;
        self.pending_knockback = Some(knockback);

        let dealt = mitigate(amount.max(0.0), config.armor);
        attributes.apply_delta(HEALTH, -dealt, now, attribute_events);
        events.push(CharacterEvent::Damaged {
            amount: dealt,
            knockback,
        });

        self.apply_stun(config.hit_stun, events);
        if config.invulnerability > 0.0 {
            self.invulnerable.arm(config.invulnerability);
        }

        let lethal = !attributes.is_alive();
        debug!("took {dealt} damage (lethal: {lethal})");
        DamageOutcome::Applied { dealt, lethal }
    }

    /// Stun for `duration`; re-stunning restarts the countdown
    pub fn apply_stun(&mut self, duration: f32, events: &mut Vec<CharacterEvent>) {
        if duration <= 0.0 {
            return;
        }
        self.stun.arm(duration);
        self.stun_due = false;
        if !self.stunned {
            self.stunned = true;
            events.push(CharacterEvent::StunnedChanged(true));
        }
    }

    /// Open the attack window. Gates and resource cost are checked by the caller.
    pub fn start_attack(&mut self, config: &CombatConfig, events: &mut Vec<CharacterEvent>) {
        self.attacking = true;
        self.attack.arm(config.attack_window);
        self.attack_due = false;
        events.push(CharacterEvent::AttackingChanged(true));
    }

    /// Timer phase
    pub fn advance_timers(&mut self, dt: f32) {
        if self.stun.tick(dt) {
            self.stun_due = true;
        }
        if self.attack.tick(dt) {
            self.attack_due = true;
        }
        self.invulnerable.tick(dt);
    }

    /// Effect phase: clear flags whose countdown ran out
    pub fn resolve(&mut self, events: &mut Vec<CharacterEvent>) {
        if self.stun_due {
            self.stun_due = false;
            if self.stunned {
                self.stunned = false;
                events.push(CharacterEvent::StunnedChanged(false));
            }
        }
        if self.attack_due {
            self.attack_due = false;
            if self.attacking {
                self.attacking = false;
                events.push(CharacterEvent::AttackingChanged(false));
            }
        }
    }

    /// Knockback queued since the last tick
    pub fn take_knockback(&mut self) -> Option<Vec2> {
        self.pending_knockback.take()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Armor only ever reduces a hit down to 1
fn mitigate(amount: f32, armor: f32) -> f32 {
    if armor > 0.0 {
        (amount - armor).max(1.0)
    } else {
        amount
    }
}
