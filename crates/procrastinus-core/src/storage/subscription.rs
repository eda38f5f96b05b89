//! Push updates for watched documents.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Live watch on one document path. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    path: String,
    rx: UnboundedReceiver<Value>,
}

impl Subscription {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Next pending update without waiting.
    pub fn try_next(&mut self) -> Option<Value> {
        self.rx.try_recv().ok()
    }

    /// Drain pending updates and keep only the most recent one.
    pub fn latest(&mut self) -> Option<Value> {
        let mut last = None;
        while let Ok(value) = self.rx.try_recv() {
            last = Some(value);
        }
        last
    }

    /// Wait for the next update. `None` once the store is gone.
    pub async fn recv(&mut self) -> Option<Value> {
        self.rx.recv().await
    }
}

/// Per-path subscriber lists shared by the store backends.
#[derive(Debug, Default)]
pub(crate) struct Subscribers {
    senders: Mutex<HashMap<String, Vec<UnboundedSender<Value>>>>,
}

impl Subscribers {
    pub(crate) fn add(&self, path: &str, current: Option<Value>) -> Subscription {
        let (tx, rx) = unbounded_channel();
        if let Some(value) = current {
            let _ = tx.send(value);
        }
        let mut senders = self.senders.lock().unwrap_or_else(|e| e.into_inner());
        senders.entry(path.to_string()).or_default().push(tx);
        Subscription {
            path: path.to_string(),
            rx,
        }
    }

    /// Deliver `value` to every live subscriber of `path`, pruning dropped ones.
    pub(crate) fn notify(&self, path: &str, value: &Value) {
        let mut senders = self.senders.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(list) = senders.get_mut(path) {
            list.retain(|tx| tx.send(value.clone()).is_ok());
            if list.is_empty() {
                senders.remove(path);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn count(&self, path: &str) -> usize {
        let senders = self.senders.lock().unwrap_or_else(|e| e.into_inner());
        senders.get(path).map(Vec::len).unwrap_or(0)
    }
}
