// Per-character collection of attributes keyed by name

use std::collections::HashMap;

use log::warn;

use super::attribute::{Attribute, AttributeEvent, AttributeKind, AttributeTemplate};

pub const HEALTH: &str = "Health";
pub const MANA: &str = "Mana";
pub const STAMINA: &str = "Stamina";

/// Attributes owned by one character, looked up case-insensitively
#[derive(Debug, Clone, Default)]
pub struct AttributeSet {
    attributes: Vec<Attribute>,
    /// Lower-cased name -> index into `attributes`
    index: HashMap<String, usize>,
}

fn key(name: &str) -> String {
    name.to_lowercase()
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh set from templates
    pub fn from_templates(
        templates: &[AttributeTemplate],
        now: f32,
        events: &mut Vec<AttributeEvent>,
    ) -> Self {
        let mut set = Self::new();
        set.initialize_from(templates, now, events);
        set
    }

    /// Drop every attribute and rebuild from `templates`.
    ///
    /// Duplicate names (ignoring case) keep the first template.
    pub fn initialize_from(
        &mut self,
        templates: &[AttributeTemplate],
        now: f32,
        events: &mut Vec<AttributeEvent>,
    ) {
        self.attributes.clear();
        self.index.clear();

        for template in templates {
            let k = key(&template.name);
            if self.index.contains_key(&k) {
                warn!("Duplicate attribute template '{}' ignored", template.name);
                continue;
            }

            let mut attribute = Attribute::from_template(template);
            let starting = template.starting_value.unwrap_or(template.max_value);
            attribute.initialize(starting, now, events);

            self.index.insert(k, self.attributes.len());
            self.attributes.push(attribute);
        }
    }

    /// Look up an attribute by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.index.get(&key(name)).map(|&i| &self.attributes[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        match self.index.get(&key(name)) {
            Some(&i) => Some(&mut self.attributes[i]),
            None => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&key(name))
    }

    /// Run regeneration on every attribute
    pub fn tick(&mut self, dt: f32, now: f32, events: &mut Vec<AttributeEvent>) {
        let start = events.len();
        for attribute in &mut self.attributes {
            attribute.tick_regeneration(dt, now, events);
        }
        forward_deaths(events, start);
    }

    /// Apply a delta to a named attribute.
    ///
    /// `None` when the attribute does not exist, otherwise whether it changed.
    pub fn apply_delta(
        &mut self,
        name: &str,
        amount: f32,
        now: f32,
        events: &mut Vec<AttributeEvent>,
    ) -> Option<bool> {
        let start = events.len();
        let changed = self.get_mut(name)?.apply_delta(amount, now, events);
        forward_deaths(events, start);
        Some(changed)
    }

    /// Spend from a named resource; `None` when the attribute does not exist
    pub fn try_consume(
        &mut self,
        name: &str,
        cost: f32,
        now: f32,
        events: &mut Vec<AttributeEvent>,
    ) -> Option<bool> {
        let start = events.len();
        let paid = self.get_mut(name)?.try_consume(cost, now, events);
        forward_deaths(events, start);
        Some(paid)
    }

    /// Heal the Health attribute, if any
    pub fn heal(&mut self, amount: f32, now: f32, events: &mut Vec<AttributeEvent>) -> bool {
        self.apply_delta(HEALTH, amount.max(0.0), now, events)
            .unwrap_or(false)
    }

    /// A set without any health attribute is considered alive
    pub fn is_alive(&self) -> bool {
        self.attributes
            .iter()
            .filter(|a| a.kind() == AttributeKind::Health)
            .all(|a| a.is_alive())
    }

    pub fn health(&self) -> Option<&Attribute> {
        self.get(HEALTH)
    }

    pub fn mana(&self) -> Option<&Attribute> {
        self.get(MANA)
    }

    pub fn stamina(&self) -> Option<&Attribute> {
        self.get(STAMINA)
    }

    /// Attributes in template order (for HUD binding)
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Forward any health death among the newly pushed events to the owner
fn forward_deaths(events: &mut Vec<AttributeEvent>, start: usize) {
    if events[start..]
        .iter()
        .any(|e| matches!(e, AttributeEvent::Died { .. }))
    {
        events.push(AttributeEvent::OwnerDied);
    }
}
