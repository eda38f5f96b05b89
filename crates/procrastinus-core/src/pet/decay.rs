//! Idle catch-up for the pet.
//!
//! Hunger drops and passive XP accrues per whole hour since the pet was last
//! updated. Partial hours are not consumed: the result carries `now` as its
//! new anchor only when at least one hour has elapsed, so calling this on every
//! screen refresh never double-decays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PetState;

const MS_PER_HOUR: i64 = 3_600_000;

/// Decay tuning. Mirrors the `[pet]` section of the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecayParams {
    /// Passive XP is only earned while hunger is strictly above this value.
    pub hunger_threshold: u32,
    pub xp_gain_per_hour: u64,
    pub hunger_drop_per_hour: u32,
}

impl Default for DecayParams {
    fn default() -> Self {
        Self {
            hunger_threshold: 50,
            xp_gain_per_hour: 5,
            hunger_drop_per_hour: 2,
        }
    }
}

/// Compute the pet state at `now`.
///
/// The XP gate reads the hunger value from before this window's decay: a pet
/// that was fed above the threshold earns XP for the whole window even if it
/// ends the window below it.
pub fn compute_decay(pet: &PetState, now: DateTime<Utc>, params: &DecayParams) -> PetState {
    let elapsed_ms = (now - pet.last_updated).num_milliseconds();
    let elapsed_hours = elapsed_ms.div_euclid(MS_PER_HOUR);
    if elapsed_hours <= 0 {
        tracing::debug!(elapsed_ms, "pet decay skipped, less than an hour elapsed");
        return pet.clone();
    }
    let hours = elapsed_hours as u64;

    let drop = hours.saturating_mul(params.hunger_drop_per_hour as u64);
    let hunger = (pet.hunger as u64).saturating_sub(drop).min(super::MAX_HUNGER as u64) as u32;

    let mut next = pet.clone();
    if pet.hunger > params.hunger_threshold {
        next.add_xp(hours.saturating_mul(params.xp_gain_per_hour));
    }
    next.hunger = hunger;
    next.last_updated = now;
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn pet_at(hunger: u32) -> PetState {
        let mut pet = PetState::new(Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap());
        pet.hunger = hunger;
        pet
    }

    #[test]
    fn sub_hour_calls_are_noops() {
        let pet = pet_at(80);
        let params = DecayParams::default();
        let later = pet.last_updated + Duration::minutes(59);
        let once = compute_decay(&pet, later, &params);
        assert_eq!(once, pet);
        let twice = compute_decay(&once, later + Duration::seconds(30), &params);
        assert_eq!(twice, pet);
    }

    #[test]
    fn clock_going_backwards_is_a_noop() {
        let pet = pet_at(80);
        let earlier = pet.last_updated - Duration::hours(5);
        assert_eq!(compute_decay(&pet, earlier, &DecayParams::default()), pet);
    }

    #[test]
    fn whole_hours_drop_hunger_and_award_xp() {
        let pet = pet_at(80);
        let params = DecayParams::default();
        let now = pet.last_updated + Duration::minutes(3 * 60 + 40);
        let next = compute_decay(&pet, now, &params);
        assert_eq!(next.hunger, 80 - 3 * 2);
        assert_eq!(next.total_xp, 3 * 5);
        assert_eq!(next.last_updated, now);
    }

    #[test]
    fn no_xp_at_or_below_threshold() {
        let params = DecayParams::default();
        let pet = pet_at(50);
        let next = compute_decay(&pet, pet.last_updated + Duration::hours(4), &params);
        assert_eq!(next.total_xp, 0);
        assert_eq!(next.hunger, 42);
    }

    #[test]
    fn xp_uses_hunger_before_the_window() {
        let params = DecayParams::default();
        // Crosses from 54 to 34 during the window and still earns XP.
        let pet = pet_at(54);
        let next = compute_decay(&pet, pet.last_updated + Duration::hours(10), &params);
        assert_eq!(next.hunger, 34);
        assert_eq!(next.total_xp, 50);
    }

    #[test]
    fn hunger_bottoms_out_at_zero() {
        let pet = pet_at(3);
        let later = pet.last_updated + Duration::days(30);
        let next = compute_decay(&pet, later, &DecayParams::default());
        assert_eq!(next.hunger, 0);
    }

    proptest! {
        #[test]
        fn hunger_stays_in_range(
            hunger in 0u32..=100,
            elapsed_ms in -10_000_000_000i64..10_000_000_000i64,
            drop in 0u32..1000,
            gain in 0u64..1000,
            threshold in 0u32..=100,
        ) {
            let pet = pet_at(hunger);
            let params = DecayParams {
                hunger_threshold: threshold,
                xp_gain_per_hour: gain,
                hunger_drop_per_hour: drop,
            };
            let now = pet.last_updated + Duration::milliseconds(elapsed_ms);
            let next = compute_decay(&pet, now, &params);
            prop_assert!(next.hunger <= 100);
            prop_assert!(next.total_xp >= pet.total_xp);
            if elapsed_ms < MS_PER_HOUR {
                prop_assert_eq!(next, pet);
            }
        }
    }
}
