use chrono::{DateTime, Utc};

use super::group_log::{record_best_effort, GroupLogSink, NoGroupLog};
use crate::error::CoreError;
use crate::shop::{self, FoodItem, InventoryState, WalletState};
use crate::storage::{load_doc, save_doc, DocumentStore};

pub struct ShopService<'a, S> {
    store: &'a S,
    log: &'a dyn GroupLogSink,
}

impl<'a, S: DocumentStore> ShopService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store, log: &NoGroupLog }
    }

    pub fn with_group_log(mut self, log: &'a dyn GroupLogSink) -> Self {
        self.log = log;
        self
    }

    pub fn catalog(&self) -> &'static [FoodItem] {
        shop::catalog()
    }

    pub fn wallet(&self, user_key: &str) -> Result<WalletState, CoreError> {
        Ok(load_doc(self.store, user_key)?)
    }

    pub fn inventory(&self, user_key: &str) -> Result<InventoryState, CoreError> {
        Ok(load_doc(self.store, user_key)?)
    }

    /// Buy one item. Nothing is written when the user cannot afford it.
    pub fn purchase(
        &self,
        user_key: &str,
        item_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(FoodItem, WalletState), CoreError> {
        let mut wallet = self.wallet(user_key)?;
        let mut inventory = self.inventory(user_key)?;
        let item = shop::purchase(&mut wallet, &mut inventory, item_id)?;

        save_doc(self.store, user_key, &wallet)?;
        save_doc(self.store, user_key, &inventory)?;
        tracing::info!(user = user_key, item = item_id, coins = wallet.coins, "item purchased");
        record_best_effort(self.log, user_key, "bought", &item.label, now);
        Ok((item, wallet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::storage::MemoryStore;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_727_740_800, 0).unwrap()
    }

    #[test]
    fn purchase_persists_wallet_and_inventory() {
        let store = MemoryStore::new();
        save_doc(&store, "alice", &WalletState { coins: 100 }).unwrap();
        let shop = ShopService::new(&store);
        let (item, wallet) = shop.purchase("alice", "bubble_tea", now()).unwrap();
        assert_eq!(item.cost, 40);
        assert_eq!(wallet.coins, 60);
        assert_eq!(shop.wallet("alice").unwrap().coins, 60);
        assert_eq!(shop.inventory("alice").unwrap().count("bubble_tea"), 1);
    }

    #[test]
    fn unaffordable_purchase_writes_nothing() {
        let store = MemoryStore::new();
        save_doc(&store, "alice", &WalletState { coins: 10 }).unwrap();
        let shop = ShopService::new(&store);
        let err = shop.purchase("alice", "durian", now()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InsufficientCoins { needed: 120, available: 10 })
        ));
        assert_eq!(shop.wallet("alice").unwrap().coins, 10);
        assert!(store.get("users/alice/inventory/data").unwrap().is_none());
    }
}
