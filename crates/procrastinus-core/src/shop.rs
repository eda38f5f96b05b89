//! Coins, the food shop and the inventory.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A food item that can be bought and fed to the pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: String,
    pub label: String,
    pub cost: u64,
    pub hunger_restore: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp_gain: Option<u64>,
    pub icon: String,
}

/// Shop catalog, cheapest first.
pub fn catalog() -> &'static [FoodItem] {
    use std::sync::OnceLock;
    static CATALOG: OnceLock<Vec<FoodItem>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        vec![
            item("kaya_toast", "Kaya Toast", 10, 10, None, "toast"),
            item("rice", "Chicken Rice", 25, 30, None, "rice"),
            item("bubble_tea", "Bubble Tea", 40, 20, Some(100), "bubble-tea"),
            item("mala", "Mala Hotpot", 60, 60, None, "hotpot"),
            item("durian", "Durian", 120, 80, Some(300), "durian"),
        ]
    })
}

fn item(id: &str, label: &str, cost: u64, hunger: u32, xp: Option<u64>, icon: &str) -> FoodItem {
    FoodItem {
        id: id.to_string(),
        label: label.to_string(),
        cost,
        hunger_restore: hunger,
        xp_gain: xp,
        icon: icon.to_string(),
    }
}

/// Look up an item in the catalog by id.
pub fn catalog_item(id: &str) -> Option<&'static FoodItem> {
    catalog().iter().find(|i| i.id == id)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletState {
    #[serde(default)]
    pub coins: u64,
}

impl WalletState {
    pub fn credit(&mut self, coins: u64) {
        self.coins = self.coins.saturating_add(coins);
    }

    /// Debit only when the balance covers `amount`; the wallet is untouched otherwise.
    pub fn debit(&mut self, amount: u64) -> Result<(), ValidationError> {
        if amount > self.coins {
            return Err(ValidationError::InsufficientCoins {
                needed: amount,
                available: self.coins,
            });
        }
        self.coins -= amount;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryState {
    #[serde(default)]
    pub items: Vec<FoodItem>,
}

impl InventoryState {
    /// Remove the first instance of `id`.
    pub fn take(&mut self, id: &str) -> Result<FoodItem, ValidationError> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| ValidationError::ItemNotOwned(id.to_string()))?;
        Ok(self.items.remove(pos))
    }

    pub fn count(&self, id: &str) -> usize {
        self.items.iter().filter(|i| i.id == id).count()
    }
}

/// Buy one catalog item: checks affordability, debits, then appends.
pub fn purchase(
    wallet: &mut WalletState,
    inventory: &mut InventoryState,
    item_id: &str,
) -> Result<FoodItem, ValidationError> {
    let item =
        catalog_item(item_id).ok_or_else(|| ValidationError::UnknownItem(item_id.to_string()))?;
    wallet.debit(item.cost)?;
    inventory.items.push(item.clone());
    Ok(item.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_debits_and_appends() {
        let mut wallet = WalletState { coins: 50 };
        let mut inv = InventoryState::default();
        let bought = purchase(&mut wallet, &mut inv, "rice").unwrap();
        assert_eq!(bought.cost, 25);
        assert_eq!(wallet.coins, 25);
        assert_eq!(inv.count("rice"), 1);
    }

    #[test]
    fn unaffordable_purchase_leaves_state_untouched() {
        let mut wallet = WalletState { coins: 30 };
        let mut inv = InventoryState::default();
        let err = purchase(&mut wallet, &mut inv, "durian").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InsufficientCoins {
                needed: 120,
                available: 30
            }
        );
        assert_eq!(wallet.coins, 30);
        assert!(inv.items.is_empty());
    }

    #[test]
    fn unknown_item_is_rejected() {
        let mut wallet = WalletState { coins: 500 };
        let mut inv = InventoryState::default();
        assert!(matches!(
            purchase(&mut wallet, &mut inv, "caviar"),
            Err(ValidationError::UnknownItem(_))
        ));
    }

    #[test]
    fn take_removes_first_matching_instance_only() {
        let mut inv = InventoryState {
            items: vec![
                catalog_item("rice").unwrap().clone(),
                catalog_item("mala").unwrap().clone(),
                catalog_item("rice").unwrap().clone(),
            ],
        };
        inv.take("rice").unwrap();
        assert_eq!(inv.items.len(), 2);
        assert_eq!(inv.items[0].id, "mala");
        assert_eq!(inv.count("rice"), 1);
        assert!(inv.take("durian").is_err());
    }
}
