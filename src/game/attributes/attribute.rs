// A single depletable / regenerating resource

use serde::{Deserialize, Serialize};

use crate::core::math::EPSILON;

/// What an attribute represents. Only `Health` attributes can die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AttributeKind {
    #[default]
    Health,
    /// Mana, stamina, energy...
    Resource,
    /// Strength, defense...
    Stat,
}

/// Static description of an attribute, read from a character template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeTemplate {
    pub name: String,
    pub kind: AttributeKind,
    pub max_value: f32,
    /// Value at spawn; `None` starts full
    pub starting_value: Option<f32>,
    pub regeneration: bool,
    /// Units per second
    pub regen_rate: f32,
    /// Seconds after the last depleting change before regeneration resumes
    pub regen_delay: f32,
}

impl Default for AttributeTemplate {
    fn default() -> Self {
        Self {
            name: "Attribute".to_string(),
            kind: AttributeKind::Health,
            max_value: 100.0,
            starting_value: None,
            regeneration: false,
            regen_rate: 1.0,
            regen_delay: 2.0,
        }
    }
}

impl AttributeTemplate {
    pub fn new(name: &str, kind: AttributeKind, max_value: f32) -> Self {
        Self {
            name: name.to_string(),
            kind,
            max_value,
            ..Self::default()
        }
    }

    pub fn starting_at(mut self, value: f32) -> Self {
        self.starting_value = Some(value);
        self
    }

    pub fn regenerating(mut self, rate: f32, delay: f32) -> Self {
        self.regeneration = true;
        self.regen_rate = rate;
        self.regen_delay = delay;
        self
    }
}

/// Edge notifications produced by attributes.
///
/// `BecameEmpty`, `BecameFull` and `Died` fire only on the change that crosses
/// the boundary. `OwnerDied` is the set-level forward of a health attribute's
/// death.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeEvent {
    ValueChanged { name: String, current: f32, max: f32 },
    BecameEmpty { name: String },
    BecameFull { name: String },
    Died { name: String },
    OwnerDied,
}

/// Runtime attribute owned by a character
#[derive(Debug, Clone)]
pub struct Attribute {
    name: String,
    kind: AttributeKind,
    max_value: f32,
    current: f32,
    regeneration: bool,
    regen_rate: f32,
    regen_delay: f32,
    last_change_time: f32,
    last_depletion_time: f32,
}

impl Attribute {
    /// Build an attribute from its template. The value stays at zero until
    /// [`Attribute::initialize`] is called.
    pub fn from_template(template: &AttributeTemplate) -> Self {
        // Missing or non-positive maximum gives a degenerate, always-empty attribute
        let max_value = if template.max_value.is_finite() && template.max_value > 0.0 {
            template.max_value
        } else {
            0.0
        };

        Self {
            name: template.name.clone(),
            kind: template.kind,
            max_value,
            current: 0.0,
            regeneration: template.regeneration,
            regen_rate: template.regen_rate.max(0.0),
            regen_delay: template.regen_delay.max(0.0),
            last_change_time: 0.0,
            last_depletion_time: 0.0,
        }
    }

    /// Set the starting value (clamped) and announce it
    pub fn initialize(&mut self, starting_value: f32, now: f32, events: &mut Vec<AttributeEvent>) {
        self.current = starting_value.clamp(0.0, self.max_value);
        self.last_change_time = now;
        self.last_depletion_time = now;
        events.push(self.value_changed());
    }

    /// Change the value by `amount`.
    ///
    /// Returns false (and changes nothing) when the clamped result is within
    /// epsilon of the current value.
    pub fn apply_delta(&mut self, amount: f32, now: f32, events: &mut Vec<AttributeEvent>) -> bool {
        let new_value = (self.current + amount).clamp(0.0, self.max_value);
        if (new_value - self.current).abs() <= EPSILON {
            return false;
        }

        let was_empty = self.is_empty();
        let was_full = self.is_full();
        let was_alive = self.is_alive();
        let depleting = new_value < self.current;

        self.current = new_value;
        self.last_change_time = now;
        if depleting {
            self.last_depletion_time = now;
        }

        events.push(self.value_changed());
        if !was_empty && self.is_empty() {
            events.push(AttributeEvent::BecameEmpty {
                name: self.name.clone(),
            });
        }
        if !was_full && self.is_full() {
            events.push(AttributeEvent::BecameFull {
                name: self.name.clone(),
            });
        }
        if self.kind == AttributeKind::Health && was_alive && !self.is_alive() {
            events.push(AttributeEvent::Died {
                name: self.name.clone(),
            });
        }
        true
    }

    /// Regenerate if enabled, not full, and the post-depletion delay has passed
    pub fn tick_regeneration(&mut self, dt: f32, now: f32, events: &mut Vec<AttributeEvent>) -> bool {
        if !self.regeneration || self.current >= self.max_value {
            return false;
        }
        if now - self.last_depletion_time < self.regen_delay {
            return false;
        }
        self.apply_delta(self.regen_rate * dt, now, events)
    }

    /// Spend `cost` if affordable. Leaves the attribute untouched otherwise.
    pub fn try_consume(&mut self, cost: f32, now: f32, events: &mut Vec<AttributeEvent>) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.apply_delta(-cost, now, events);
        true
    }

    pub fn add(&mut self, amount: f32, now: f32, events: &mut Vec<AttributeEvent>) -> bool {
        self.apply_delta(amount, now, events)
    }

    pub fn remove(&mut self, amount: f32, now: f32, events: &mut Vec<AttributeEvent>) -> bool {
        self.apply_delta(-amount, now, events)
    }

    pub fn set_to_max(&mut self, now: f32, events: &mut Vec<AttributeEvent>) -> bool {
        self.apply_delta(self.max_value - self.current, now, events)
    }

    pub fn set_to_zero(&mut self, now: f32, events: &mut Vec<AttributeEvent>) -> bool {
        self.apply_delta(-self.current, now, events)
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.current >= cost
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max_value
    }

    /// Fraction of maximum in [0, 1]; 0 for a degenerate attribute
    pub fn percentage(&self) -> f32 {
        if self.max_value > 0.0 {
            self.current / self.max_value
        } else {
            0.0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    pub fn is_full(&self) -> bool {
        self.max_value > 0.0 && self.current >= self.max_value
    }

    /// Non-health attributes are always "alive"
    pub fn is_alive(&self) -> bool {
        self.kind != AttributeKind::Health || self.current > 0.0
    }

    pub fn last_change_time(&self) -> f32 {
        self.last_change_time
    }

    fn value_changed(&self) -> AttributeEvent {
        AttributeEvent::ValueChanged {
            name: self.name.clone(),
            current: self.current,
            max: self.max_value,
        }
    }
}
