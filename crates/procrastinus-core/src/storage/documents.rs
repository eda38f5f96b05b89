//! Typed documents on top of the raw store.
//!
//! Per-user state lives at `users/{userKey}/{collection}/data`; group logs
//! live at `groups/{groupId}/logs/data`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::DocumentStore;
use crate::calendar::CalendarEvent;
use crate::error::StoreError;
use crate::pet::PetState;
use crate::reward::{BadgeSet, SessionLog, StatsState};
use crate::shop::{InventoryState, WalletState};
use crate::task::TaskList;
use crate::timer::FocusTimer;
use crate::timetable::CalendarView;

/// A per-user entity stored as one document.
pub trait Document: Serialize + DeserializeOwned {
    /// Collection segment of the document path.
    const COLLECTION: &'static str;
}

/// Store key for an account identifier. Characters that are not allowed in
/// path segments become `_`.
pub fn user_key(account: &str) -> String {
    account
        .chars()
        .map(|c| match c {
            '.' | '#' | '$' | '/' | '[' | ']' => '_',
            other => other,
        })
        .collect()
}

pub fn doc_path(user_key: &str, collection: &str) -> String {
    format!("users/{user_key}/{collection}/data")
}

fn decode<T: DeserializeOwned>(path: &str, value: serde_json::Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Malformed {
        path: path.to_string(),
        message: e.to_string(),
    })
}

fn encode<T: Serialize>(path: &str, doc: &T) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(doc).map_err(|e| StoreError::Malformed {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Load a document, `None` when absent.
///
/// # Errors
/// [`StoreError::Malformed`] when the stored value has the wrong shape.
pub fn load_optional<T: Document>(
    store: &impl DocumentStore,
    user_key: &str,
) -> Result<Option<T>, StoreError> {
    let path = doc_path(user_key, T::COLLECTION);
    store.get(&path)?.map(|value| decode(&path, value)).transpose()
}

/// Load a document, falling back to its default when absent.
pub fn load_doc<T: Document + Default>(
    store: &impl DocumentStore,
    user_key: &str,
) -> Result<T, StoreError> {
    Ok(load_optional(store, user_key)?.unwrap_or_default())
}

/// Replace the stored document with `doc`.
pub fn save_doc<T: Document>(
    store: &impl DocumentStore,
    user_key: &str,
    doc: &T,
) -> Result<(), StoreError> {
    let path = doc_path(user_key, T::COLLECTION);
    store.set(&path, encode(&path, doc)?, false)
}

impl Document for PetState {
    const COLLECTION: &'static str = "pet";
}

impl Document for WalletState {
    const COLLECTION: &'static str = "wallet";
}

impl Document for InventoryState {
    const COLLECTION: &'static str = "inventory";
}

impl Document for SessionLog {
    const COLLECTION: &'static str = "sessions";
}

impl Document for StatsState {
    const COLLECTION: &'static str = "stats";
}

impl Document for BadgeSet {
    const COLLECTION: &'static str = "badges";
}

impl Document for TaskList {
    const COLLECTION: &'static str = "tasks";
}

impl Document for FocusTimer {
    const COLLECTION: &'static str = "timer";
}

/// Groups the user belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMembership {
    #[serde(default)]
    pub group_ids: Vec<String>,
}

impl Document for GroupMembership {
    const COLLECTION: &'static str = "groups";
}

/// Imported timetable plus where the calendar was left.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarDoc {
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
    #[serde(default)]
    pub view: Option<CalendarView>,
}

impl Document for CalendarDoc {
    const COLLECTION: &'static str = "calendar";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLogEntry {
    pub user: String,
    pub action: String,
    pub target: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub at: DateTime<Utc>,
}

/// Activity feed shared by a study group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLog {
    #[serde(default)]
    pub entries: Vec<GroupLogEntry>,
}

impl GroupLog {
    pub fn path(group_id: &str) -> String {
        format!("groups/{group_id}/logs/data")
    }

    pub fn load(store: &impl DocumentStore, group_id: &str) -> Result<Self, StoreError> {
        let path = Self::path(group_id);
        Ok(store
            .get(&path)?
            .map(|value| decode(&path, value))
            .transpose()?
            .unwrap_or_default())
    }

    /// Append one entry and write the log back.
    pub fn append(
        store: &impl DocumentStore,
        group_id: &str,
        entry: GroupLogEntry,
    ) -> Result<(), StoreError> {
        let path = Self::path(group_id);
        let mut log = Self::load(store, group_id)?;
        log.entries.push(entry);
        store.set(&path, encode(&path, &log)?, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    #[test]
    fn user_key_sanitizes_forbidden_chars() {
        assert_eq!(user_key("e0123456@u.nus.edu"), "e0123456@u_nus_edu");
        assert_eq!(user_key("a#b$c/d[e]f"), "a_b_c_d_e_f");
    }

    #[test]
    fn absent_documents_default() {
        let store = MemoryStore::new();
        let wallet: WalletState = load_doc(&store, "alice").unwrap();
        assert_eq!(wallet.coins, 0);
        assert!(load_optional::<PetState>(&store, "alice").unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let store = MemoryStore::new();
        save_doc(&store, "alice", &WalletState { coins: 42 }).unwrap();
        assert_eq!(
            store.get("users/alice/wallet/data").unwrap(),
            Some(json!({ "coins": 42 }))
        );
        let wallet: WalletState = load_doc(&store, "alice").unwrap();
        assert_eq!(wallet.coins, 42);
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let store = MemoryStore::new();
        store
            .set("users/alice/wallet/data", json!({ "coins": "lots" }), false)
            .unwrap();
        assert!(matches!(
            load_doc::<WalletState>(&store, "alice"),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn group_log_appends() {
        let store = MemoryStore::new();
        let at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        for action in ["fed", "bought"] {
            GroupLog::append(
                &store,
                "g1",
                GroupLogEntry {
                    user: "alice".into(),
                    action: action.into(),
                    target: "rice".into(),
                    at,
                },
            )
            .unwrap();
        }
        let log = GroupLog::load(&store, "g1").unwrap();
        assert_eq!(log.entries.len(), 2);
        assert_eq!(log.entries[1].action, "bought");
    }
}
