use chrono::{DateTime, Utc};

use super::group_log::{record_best_effort, GroupLogSink, NoGroupLog};
use crate::error::CoreError;
use crate::pet::{compute_decay, PetState};
use crate::shop::InventoryState;
use crate::storage::{load_doc, load_optional, save_doc, Config, DocumentStore};

/// Pet lifecycle on top of the store.
pub struct PetService<'a, S> {
    store: &'a S,
    config: &'a Config,
    log: &'a dyn GroupLogSink,
}

impl<'a, S: DocumentStore> PetService<'a, S> {
    pub fn new(store: &'a S, config: &'a Config) -> Self {
        Self {
            store,
            config,
            log: &NoGroupLog,
        }
    }

    pub fn with_group_log(mut self, log: &'a dyn GroupLogSink) -> Self {
        self.log = log;
        self
    }

    /// Current pet with idle decay caught up to `now`.
    ///
    /// The first read creates the pet. Decay is written back so the next read
    /// starts from `now`.
    pub fn load(&self, user_key: &str, now: DateTime<Utc>) -> Result<PetState, CoreError> {
        let Some(pet) = load_optional::<PetState>(self.store, user_key)? else {
            let pet = PetState::new(now);
            save_doc(self.store, user_key, &pet)?;
            tracing::info!(user = user_key, "pet created");
            return Ok(pet);
        };

        let decayed = compute_decay(&pet, now, &self.config.decay_params());
        if decayed != pet {
            save_doc(self.store, user_key, &decayed)?;
        }
        Ok(decayed)
    }

    /// Feed one owned item to the pet.
    pub fn feed(
        &self,
        user_key: &str,
        item_id: &str,
        now: DateTime<Utc>,
    ) -> Result<PetState, CoreError> {
        let mut pet = self.load(user_key, now)?;
        let mut inventory: InventoryState = load_doc(self.store, user_key)?;
        let item = inventory.take(item_id)?;
        pet.feed(&item);

        save_doc(self.store, user_key, &inventory)?;
        save_doc(self.store, user_key, &pet)?;
        tracing::info!(user = user_key, item = item_id, hunger = pet.hunger, "pet fed");
        record_best_effort(self.log, user_key, "fed", &item.label, now);
        Ok(pet)
    }

    pub fn rename(
        &self,
        user_key: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<PetState, CoreError> {
        let mut pet = self.load(user_key, now)?;
        pet.rename(name, self.config.pet.max_name_len)?;
        save_doc(self.store, user_key, &pet)?;
        Ok(pet)
    }

    /// Credit study experience.
    pub fn add_xp(
        &self,
        user_key: &str,
        amount: u64,
        now: DateTime<Utc>,
    ) -> Result<PetState, CoreError> {
        let mut pet = self.load(user_key, now)?;
        pet.add_xp(amount);
        save_doc(self.store, user_key, &pet)?;
        Ok(pet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::shop::catalog_item;
    use crate::storage::MemoryStore;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_727_740_800, 0).unwrap()
    }

    #[test]
    fn first_load_creates_pet() {
        let store = MemoryStore::new();
        let config = Config::default();
        let pets = PetService::new(&store, &config);
        let pet = pets.load("alice", t0()).unwrap();
        assert_eq!(pet.hunger, 100);
        assert!(store.get("users/alice/pet/data").unwrap().is_some());
    }

    #[test]
    fn decay_is_persisted() {
        let store = MemoryStore::new();
        let config = Config::default();
        let pets = PetService::new(&store, &config);
        pets.load("alice", t0()).unwrap();
        let pet = pets.load("alice", t0() + Duration::hours(10)).unwrap();
        assert_eq!(pet.hunger, 80);
        assert_eq!(pet.total_xp, 50);

        let stored: PetState = load_optional(&store, "alice").unwrap().unwrap();
        assert_eq!(stored, pet);
    }

    #[test]
    fn feed_consumes_one_item() {
        let store = MemoryStore::new();
        let config = Config::default();
        let pets = PetService::new(&store, &config);
        pets.load("alice", t0()).unwrap();
        let pet = pets.load("alice", t0() + Duration::hours(30)).unwrap();
        assert_eq!(pet.hunger, 40);

        let rice = catalog_item("rice").unwrap().clone();
        save_doc(
            &store,
            "alice",
            &InventoryState {
                items: vec![rice.clone(), rice],
            },
        )
        .unwrap();

        let fed = pets.feed("alice", "rice", t0() + Duration::hours(30)).unwrap();
        assert_eq!(fed.hunger, 70);
        let inv: InventoryState = load_doc(&store, "alice").unwrap();
        assert_eq!(inv.count("rice"), 1);

        let err = pets.feed("alice", "durian", t0() + Duration::hours(30)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::ItemNotOwned(_))));
    }

    #[test]
    fn rename_validates_length() {
        let store = MemoryStore::new();
        let config = Config::default();
        let pets = PetService::new(&store, &config);
        assert_eq!(pets.rename("alice", "Mochi", t0()).unwrap().name, "Mochi");
        assert!(pets.rename("alice", &"x".repeat(21), t0()).is_err());
        assert_eq!(pets.load("alice", t0()).unwrap().name, "Mochi");
    }
}
