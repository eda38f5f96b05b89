//! Document storage and configuration.
//!
//! State lives in a hierarchical document store addressed by paths like
//! `users/{userKey}/{collection}/data`. Two backends implement
//! [`DocumentStore`]: [`SqliteStore`] for persistent local state and
//! [`MemoryStore`] for tests and ephemeral use. Typed entities cross the
//! boundary through [`Document`], which validates shape and defaults absent
//! fields.

mod config;
mod documents;
mod memory;
mod sqlite;
mod subscription;

pub use config::{CalendarConfig, Config, PetConfig, RewardConfig, TimerConfig, TimetableConfig};
pub use documents::{
    doc_path, load_doc, load_optional, save_doc, user_key, CalendarDoc, Document, GroupLog,
    GroupLogEntry, GroupMembership,
};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use subscription::Subscription;

use std::path::PathBuf;

use serde_json::Value;

use crate::error::StoreError;

/// Hierarchical JSON document store.
///
/// Writes notify every live [`Subscription`] on the same path.
pub trait DocumentStore {
    /// Current document at `path`, if any.
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Write `data`. With `merge`, objects are merged into the existing
    /// document recursively instead of replacing it.
    fn set(&self, path: &str, data: Value, merge: bool) -> Result<(), StoreError>;

    /// Replace the given top-level fields of an existing document.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] when nothing is stored at `path`.
    fn update(&self, path: &str, partial: Value) -> Result<(), StoreError>;

    /// Watch `path`. The current document, if any, is delivered first.
    fn subscribe(&self, path: &str) -> Subscription;
}

/// Merge `patch` into `target`: objects recursively, everything else replaced.
pub(crate) fn merge_json(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(dst), Value::Object(src)) => {
            for (key, value) in src {
                match dst.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        dst.insert(key, value);
                    }
                }
            }
        }
        (dst, src) => *dst = src,
    }
}

/// Document after a `set`.
pub(crate) fn apply_set(existing: Option<Value>, data: Value, merge: bool) -> Value {
    match (existing, merge) {
        (Some(mut current), true) => {
            merge_json(&mut current, data);
            current
        }
        _ => data,
    }
}

/// Document after an `update`.
pub(crate) fn apply_update(
    path: &str,
    existing: Option<Value>,
    partial: Value,
) -> Result<Value, StoreError> {
    let mut current = existing.ok_or_else(|| StoreError::NotFound(path.to_string()))?;
    let malformed = || StoreError::Malformed {
        path: path.to_string(),
        message: "update expects an object on both sides".to_string(),
    };
    let Value::Object(src) = partial else {
        return Err(malformed());
    };
    let dst = current.as_object_mut().ok_or_else(malformed)?;
    for (key, value) in src {
        dst.insert(key, value);
    }
    Ok(current)
}

/// Returns `~/.config/procrastinus[-dev]/`.
///
/// `PROCRASTINUS_DATA_DIR` overrides the location entirely; otherwise
/// `PROCRASTINUS_ENV=dev` selects the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("PROCRASTINUS_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("PROCRASTINUS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("procrastinus-dev")
            } else {
                base_dir.join("procrastinus")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
