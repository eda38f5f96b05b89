//! Orchestration over the document store.
//!
//! Each service loads the documents it needs, applies the pure domain rules
//! and writes the results back. Writes are independent: a failure part way
//! leaves earlier writes in place, matching the remote store's behaviour.

mod group_log;
mod leaderboard;
mod pet;
mod shop;
mod study;
mod wallet;

pub use group_log::{GroupLogSink, NoGroupLog, StoreGroupLog};
pub use leaderboard::{leaderboard, LeaderboardEntry};
pub use pet::PetService;
pub use shop::ShopService;
pub use study::{SessionOutcome, StudyService};
pub use wallet::WalletWatcher;
