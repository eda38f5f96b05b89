use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::storage::{load_doc, DocumentStore, GroupLog, GroupLogEntry, GroupMembership};

/// Receives user activity worth showing to study groups.
pub trait GroupLogSink {
    fn record(
        &self,
        user_key: &str,
        action: &str,
        target: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGroupLog;

impl GroupLogSink for NoGroupLog {
    fn record(
        &self,
        _user_key: &str,
        _action: &str,
        _target: &str,
        _at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Appends entries to the log of every group the user is in.
pub struct StoreGroupLog<'a, S> {
    store: &'a S,
}

impl<'a, S: DocumentStore> StoreGroupLog<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }
}

impl<S: DocumentStore> GroupLogSink for StoreGroupLog<'_, S> {
    fn record(
        &self,
        user_key: &str,
        action: &str,
        target: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let membership: GroupMembership = load_doc(self.store, user_key)?;
        for group_id in &membership.group_ids {
            GroupLog::append(
                self.store,
                group_id,
                GroupLogEntry {
                    user: user_key.to_string(),
                    action: action.to_string(),
                    target: target.to_string(),
                    at,
                },
            )?;
        }
        Ok(())
    }
}

/// Forward to `sink`, logging instead of failing. Group feeds are best effort.
pub(crate) fn record_best_effort(
    sink: &dyn GroupLogSink,
    user_key: &str,
    action: &str,
    target: &str,
    at: DateTime<Utc>,
) {
    if let Err(e) = sink.record(user_key, action, target, at) {
        tracing::warn!(user = user_key, action, error = %e, "failed to write group log");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{save_doc, MemoryStore};

    #[test]
    fn writes_to_every_group() {
        let store = MemoryStore::new();
        save_doc(
            &store,
            "alice",
            &GroupMembership {
                group_ids: vec!["g1".into(), "g2".into()],
            },
        )
        .unwrap();
        let sink = StoreGroupLog::new(&store);
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        sink.record("alice", "studied", "30 minutes", at).unwrap();
        for g in ["g1", "g2"] {
            let log = GroupLog::load(&store, g).unwrap();
            assert_eq!(log.entries.len(), 1);
            assert_eq!(log.entries[0].target, "30 minutes");
        }
    }

    #[test]
    fn no_groups_no_writes() {
        let store = MemoryStore::new();
        let sink = StoreGroupLog::new(&store);
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        sink.record("bob", "studied", "30 minutes", at).unwrap();
        assert!(store.get("groups/g1/logs/data").unwrap().is_none());
    }
}
