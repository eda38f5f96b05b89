//! In-process document store.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use super::subscription::Subscribers;
use super::{apply_set, apply_update, DocumentStore, Subscription};
use crate::error::StoreError;

/// Document store kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<String, Value>>,
    subscribers: Subscribers,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self, path: &str, next: Value) {
        {
            let mut docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
            docs.insert(path.to_string(), next.clone());
        }
        self.subscribers.notify(path, &next);
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
        Ok(docs.get(path).cloned())
    }

    fn set(&self, path: &str, data: Value, merge: bool) -> Result<(), StoreError> {
        let next = apply_set(self.get(path)?, data, merge);
        self.write(path, next);
        Ok(())
    }

    fn update(&self, path: &str, partial: Value) -> Result<(), StoreError> {
        let next = apply_update(path, self.get(path)?, partial)?;
        self.write(path, next);
        Ok(())
    }

    fn subscribe(&self, path: &str) -> Subscription {
        let current = self.get(path).ok().flatten();
        self.subscribers.add(path, current)
    }
}
