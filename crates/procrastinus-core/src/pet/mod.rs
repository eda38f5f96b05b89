//! Virtual pet state.
//!
//! The pet is fed with food bought from the shop and slowly gets hungry while
//! the user is away. Study sessions feed it experience; see
//! [`crate::services::StudyService`].

mod decay;

pub use decay::{compute_decay, DecayParams};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::shop::FoodItem;

/// Experience needed per level.
pub const XP_PER_LEVEL: u64 = 1000;

/// Upper bound of the hunger meter.
pub const MAX_HUNGER: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetState {
    #[serde(default = "default_name")]
    pub name: String,
    /// 0 (starving) ..= 100 (full).
    #[serde(default = "default_hunger", deserialize_with = "clamped_hunger")]
    pub hunger: u32,
    #[serde(default)]
    pub total_xp: u64,
    #[serde(
        rename = "lastUpdatedMs",
        default = "Utc::now",
        with = "chrono::serde::ts_milliseconds"
    )]
    pub last_updated: DateTime<Utc>,
    #[serde(default = "default_image")]
    pub image: String,
}

fn default_name() -> String {
    "Procrastipus".to_string()
}

fn default_hunger() -> u32 {
    MAX_HUNGER
}

fn default_image() -> String {
    "pet-default".to_string()
}

fn clamped_hunger<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, MAX_HUNGER as i64) as u32)
}

impl PetState {
    /// A freshly hatched pet, full and at level 0.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            name: default_name(),
            hunger: MAX_HUNGER,
            total_xp: 0,
            last_updated: now,
            image: default_image(),
        }
    }

    pub fn level(&self) -> u64 {
        self.total_xp / XP_PER_LEVEL
    }

    /// Experience within the current level.
    pub fn xp(&self) -> u64 {
        self.total_xp % XP_PER_LEVEL
    }

    pub fn xp_to_next(&self) -> u64 {
        XP_PER_LEVEL
    }

    pub fn add_xp(&mut self, amount: u64) {
        self.total_xp = self.total_xp.saturating_add(amount);
    }

    /// Apply one food item. Hunger is capped at [`MAX_HUNGER`].
    pub fn feed(&mut self, item: &FoodItem) {
        self.hunger = self.hunger.saturating_add(item.hunger_restore).min(MAX_HUNGER);
        if let Some(xp) = item.xp_gain {
            self.add_xp(xp);
        }
    }

    /// Rename the pet. Surrounding whitespace is dropped.
    pub fn rename(&mut self, name: &str, max_len: usize) -> Result<(), ValidationError> {
        let name = name.trim();
        let len = name.chars().count();
        if len == 0 || len > max_len {
            return Err(ValidationError::InvalidName { max: max_len });
        }
        self.name = name.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop::catalog_item;

    #[test]
    fn level_and_xp_derive_from_total() {
        let mut pet = PetState::new(Utc::now());
        pet.add_xp(2350);
        assert_eq!(pet.level(), 2);
        assert_eq!(pet.xp(), 350);
        assert_eq!(pet.xp_to_next(), 1000);
    }

    #[test]
    fn feeding_caps_hunger() {
        let mut pet = PetState::new(Utc::now());
        pet.hunger = 95;
        let item = catalog_item("rice").unwrap();
        pet.feed(item);
        assert_eq!(pet.hunger, MAX_HUNGER);
    }

    #[test]
    fn feeding_grants_item_xp() {
        let mut pet = PetState::new(Utc::now());
        pet.hunger = 10;
        let item = catalog_item("bubble_tea").unwrap();
        pet.feed(item);
        assert_eq!(pet.hunger, 10 + item.hunger_restore);
        assert_eq!(pet.total_xp, item.xp_gain.unwrap());
    }

    #[test]
    fn rename_rejects_empty_and_long_names() {
        let mut pet = PetState::new(Utc::now());
        assert_eq!(
            pet.rename("   ", 20),
            Err(ValidationError::InvalidName { max: 20 })
        );
        assert!(pet.rename("a-name-that-is-way-too-long", 20).is_err());
        assert_eq!(pet.name, "Procrastipus");

        pet.rename("  Mochi ", 20).unwrap();
        assert_eq!(pet.name, "Mochi");
    }

    #[test]
    fn deserialization_defaults_and_clamps() {
        let json = serde_json::json!({ "hunger": 250, "lastUpdatedMs": 0 });
        let pet: PetState = serde_json::from_value(json).unwrap();
        assert_eq!(pet.hunger, 100);
        assert_eq!(pet.total_xp, 0);
        assert_eq!(pet.name, "Procrastipus");

        let json = serde_json::json!({ "hunger": -4, "lastUpdatedMs": 0 });
        let pet: PetState = serde_json::from_value(json).unwrap();
        assert_eq!(pet.hunger, 0);
    }
}
