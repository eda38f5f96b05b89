use serde_json::Value;

use crate::shop::WalletState;
use crate::storage::{doc_path, Document, DocumentStore, Subscription};

/// Local view of a wallet kept current by store pushes.
///
/// Pushes are applied in arrival order and the most recent one wins; no
/// other ordering is assumed.
#[derive(Debug)]
pub struct WalletWatcher {
    subscription: Subscription,
    wallet: WalletState,
}

impl WalletWatcher {
    pub fn new(store: &impl DocumentStore, user_key: &str) -> Self {
        let subscription = store.subscribe(&doc_path(user_key, WalletState::COLLECTION));
        let mut watcher = Self {
            subscription,
            wallet: WalletState::default(),
        };
        watcher.refresh();
        watcher
    }

    pub fn coins(&self) -> u64 {
        self.wallet.coins
    }

    /// Apply every pending push. Returns whether anything changed.
    pub fn refresh(&mut self) -> bool {
        match self.subscription.latest() {
            Some(value) => self.apply(value),
            None => false,
        }
    }

    /// Wait for the next push and apply it. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<&WalletState> {
        let value = self.subscription.recv().await?;
        self.apply(value);
        self.refresh();
        Some(&self.wallet)
    }

    fn apply(&mut self, value: Value) -> bool {
        match serde_json::from_value::<WalletState>(value) {
            Ok(wallet) => {
                let changed = wallet != self.wallet;
                self.wallet = wallet;
                changed
            }
            Err(e) => {
                tracing::warn!(
                    path = self.subscription.path(),
                    error = %e,
                    "ignoring malformed wallet push"
                );
                false
            }
        }
    }
}
