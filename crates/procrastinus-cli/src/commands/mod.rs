pub mod calendar;
pub mod config;
pub mod pet;
pub mod shop;
pub mod stats;
pub mod task;
pub mod timer;

use chrono::{DateTime, NaiveDate, Utc};
use procrastinus_core::storage::user_key;
use procrastinus_core::{Config, SqliteStore};
use serde::Serialize;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Everything a user-scoped command needs.
pub struct Context {
    pub user: String,
    pub config: Config,
    pub store: SqliteStore,
    pub now: DateTime<Utc>,
}

impl Context {
    pub fn open(account: &str) -> CliResult<Self> {
        let user = user_key(account);
        tracing::debug!(%user, "opening store");
        Ok(Self {
            user,
            config: Config::load()?,
            store: SqliteStore::open()?,
            now: Utc::now(),
        })
    }

    /// Today in the campus timezone.
    pub fn today(&self) -> NaiveDate {
        self.now.with_timezone(&self.config.utc_offset()).date_naive()
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
