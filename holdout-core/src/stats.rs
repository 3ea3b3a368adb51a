//! Survivor stats: bounded attributes with silent clamping.
//!
//! Every setter clamps to the attribute's legal range instead of failing, so a
//! `Survivor` can never hold an out-of-range value no matter what a caller
//! passes in.

use crate::error::ValidationError;

pub const MIN_LEVEL: i64 = 1;
pub const MAX_HEALTH: i64 = 30;
/// Upper bound shared by hunger, thirst and infection.
pub const MAX_NEED: i64 = 100;

const BASE_XP_NEEDED: i64 = 50;
const XP_NEEDED_PER_LEVEL: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Survivor {
    name: String,
    level: i64,
    xp: i64,
    health: i64,
    hunger: i64,
    thirst: i64,
    infection: i64,
}

impl Survivor {
    /// Fresh survivor at default stats.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validated_name(name)?,
            level: MIN_LEVEL,
            xp: 0,
            health: MAX_HEALTH,
            hunger: MAX_NEED,
            thirst: MAX_NEED,
            infection: 0,
        })
    }

    /// Rebuild a survivor from stored values, clamping anything out of range.
    pub fn restore(
        name: &str,
        level: i64,
        xp: i64,
        health: i64,
        hunger: i64,
        thirst: i64,
        infection: i64,
    ) -> Result<Self, ValidationError> {
        let mut s = Self::new(name)?;
        s.set_level(level);
        s.set_xp(xp);
        s.set_health(health);
        s.set_hunger(hunger);
        s.set_thirst(thirst);
        s.set_infection(infection);
        Ok(s)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> i64 {
        self.level
    }

    pub fn xp(&self) -> i64 {
        self.xp
    }

    pub fn health(&self) -> i64 {
        self.health
    }

    pub fn hunger(&self) -> i64 {
        self.hunger
    }

    pub fn thirst(&self) -> i64 {
        self.thirst
    }

    pub fn infection(&self) -> i64 {
        self.infection
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = validated_name(name)?;
        Ok(())
    }

    pub fn set_level(&mut self, value: i64) {
        self.level = value.max(MIN_LEVEL);
    }

    pub fn set_xp(&mut self, value: i64) {
        self.xp = value.max(0);
    }

    pub fn set_health(&mut self, value: i64) {
        self.health = value.clamp(0, MAX_HEALTH);
    }

    pub fn set_hunger(&mut self, value: i64) {
        self.hunger = value.clamp(0, MAX_NEED);
    }

    pub fn set_thirst(&mut self, value: i64) {
        self.thirst = value.clamp(0, MAX_NEED);
    }

    pub fn set_infection(&mut self, value: i64) {
        self.infection = value.clamp(0, MAX_NEED);
    }

    pub fn add_xp(&mut self, delta: i64) {
        self.set_xp(self.xp.saturating_add(delta));
    }

    pub fn add_health(&mut self, delta: i64) {
        self.set_health(self.health.saturating_add(delta));
    }

    pub fn add_hunger(&mut self, delta: i64) {
        self.set_hunger(self.hunger.saturating_add(delta));
    }

    pub fn add_thirst(&mut self, delta: i64) {
        self.set_thirst(self.thirst.saturating_add(delta));
    }

    pub fn add_infection(&mut self, delta: i64) {
        self.set_infection(self.infection.saturating_add(delta));
    }

    /// XP threshold for the current level: 50 at level 1, +10 per level.
    pub fn calculate_xp_needed(&self) -> i64 {
        BASE_XP_NEEDED.saturating_add((self.level - 1).saturating_mul(XP_NEEDED_PER_LEVEL))
    }

    /// Level up once if the threshold is met, restoring full health.
    ///
    /// XP is not consumed; any overflow stays banked.
    pub fn level_up(&mut self) -> bool {
        if self.xp < self.calculate_xp_needed() {
            return false;
        }
        self.level = self.level.saturating_add(1);
        self.health = MAX_HEALTH;
        true
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

pub(crate) fn validated_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}
