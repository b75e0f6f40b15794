//! InFlight - subscription registry.
//!
//! One registry per channel (promise: by notification key, stream: by task
//! id). `try_claim` is an atomic check-and-insert; the returned `Claim`
//! removes the entry when dropped, the way a `finally` block would.
//! `Finished` remembers completed keys so they are not subscribed again.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use indexmap::IndexSet;

pub struct InFlight<K> {
    entries: Arc<Mutex<HashSet<K>>>,
}

impl<K> Clone for InFlight<K> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K> Default for InFlight<K> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

impl<K: Eq + Hash + Clone> InFlight<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`, or `None` if it is already in flight.
    pub fn try_claim(&self, key: &K) -> Option<Claim<K>> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if !entries.insert(key.clone()) {
            return None;
        }
        Some(Claim {
            entries: Arc::clone(&self.entries),
            key: Some(key.clone()),
        })
    }

    pub fn contains(&self, key: &K) -> bool {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registration held by a live subscription.
pub struct Claim<K: Eq + Hash> {
    entries: Arc<Mutex<HashSet<K>>>,
    key: Option<K>,
}

impl<K: Eq + Hash> Claim<K> {
    /// Deregister now.
    pub fn release(self) {}

    /// Keep the entry registered for good. Used when a subscription gives up
    /// and must not be retried.
    pub fn retain(mut self) {
        self.key = None;
    }
}

impl<K: Eq + Hash> Drop for Claim<K> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries.remove(&key);
        }
    }
}

impl<K: Eq + Hash + fmt::Debug> fmt::Debug for Claim<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claim").field("key", &self.key).finish()
    }
}

/// Bounded set of completed keys; the oldest is forgotten first.
pub struct Finished<K> {
    entries: Arc<Mutex<IndexSet<K>>>,
    capacity: usize,
}

impl<K> Clone for Finished<K> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            capacity: self.capacity,
        }
    }
}

impl<K: Eq + Hash> Finished<K> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(IndexSet::new())),
            capacity,
        }
    }

    pub fn mark(&self, key: K) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key);
        while entries.len() > self.capacity {
            entries.shift_remove_index(0);
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.contains(key)
    }
}
