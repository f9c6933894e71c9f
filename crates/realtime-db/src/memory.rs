//! In-process store with the same semantics as the remote one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use async_trait::async_trait;
use serde_json::Value;

use crate::push_id::PushIdGenerator;
use crate::traits::{RealtimeStore, SnapshotCallback};
use crate::{path, tree, StoreError, StoreResult, Subscription};

type SharedCallback = Arc<dyn Fn(Value) + Send + Sync + 'static>;

struct Watcher {
    keys: Vec<String>,
    last: Value,
    callback: SharedCallback,
}

struct Inner {
    root: Value,
    reachable: bool,
    closed: bool,
    ids: PushIdGenerator,
    next_watcher: u64,
    watchers: HashMap<u64, Watcher>,
}

/// Keeps the whole tree in memory. Cheap to clone; clones share the tree.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                root: Value::Null,
                reachable: true,
                closed: false,
                ids: PushIdGenerator::new(),
                next_watcher: 0,
                watchers: HashMap::new(),
            })),
        }
    }

    /// Simulates losing (or regaining) the connection. While unreachable
    /// every operation fails and nothing is written.
    pub fn set_reachable(&self, reachable: bool) {
        self.lock().reachable = reachable;
    }

    /// Reads the current value at `path`.
    pub fn snapshot(&self, path: &str) -> StoreResult<Value> {
        let keys = path::segments(path)?;
        Ok(tree::get(&self.lock().root, &keys))
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }

    fn write(&self, keys: &[&str], value: Value) -> StoreResult<()> {
        let notifications = {
            let mut inner = self.lock();
            inner.check_available()?;
            tree::set(&mut inner.root, keys, value);
            inner.changed_watchers()
        };
        for (callback, snapshot) in notifications {
            callback(snapshot);
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    fn check_available(&self) -> StoreResult<()> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        if !self.reachable {
            return Err(StoreError::Unreachable("memory store marked unreachable".to_owned()));
        }
        Ok(())
    }

    /// Collects the watchers whose value changed since they were last called.
    fn changed_watchers(&mut self) -> Vec<(SharedCallback, Value)> {
        let root = &self.root;
        self.watchers
            .values_mut()
            .filter_map(|watcher| {
                let keys: Vec<&str> = watcher.keys.iter().map(String::as_str).collect();
                let current = tree::get(root, &keys);
                if current == watcher.last {
                    return None;
                }
                watcher.last = current.clone();
                Some((Arc::clone(&watcher.callback), current))
            })
            .collect()
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl RealtimeStore for MemoryStore {
    async fn set(&self, path: &str, value: Value) -> StoreResult<()> {
        let keys = path::segments(path)?;
        self.write(&keys, value)
    }

    async fn push(&self, path: &str, value: Value) -> StoreResult<String> {
        let mut keys = path::segments(path)?;
        let key = {
            let mut inner = self.lock();
            inner.check_available()?;
            inner.ids.next_id()
        };
        keys.push(&key);
        self.write(&keys, value)?;
        Ok(key)
    }

    async fn subscribe(&self, path: &str, callback: SnapshotCallback) -> StoreResult<Subscription> {
        let keys = path::segments(path)?;
        let callback: SharedCallback = Arc::from(callback);
        let (id, snapshot) = {
            let mut inner = self.lock();
            inner.check_available()?;
            let snapshot = tree::get(&inner.root, &keys);
            let id = inner.next_watcher;
            inner.next_watcher += 1;
            inner.watchers.insert(
                id,
                Watcher {
                    keys: keys.iter().map(|key| key.to_string()).collect(),
                    last: snapshot.clone(),
                    callback: Arc::clone(&callback),
                },
            );
            (id, snapshot)
        };
        callback(snapshot);

        let weak: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        Ok(Subscription::new(path, move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner).watchers.remove(&id);
            }
        }))
    }

    async fn shutdown(&self) {
        let mut inner = self.lock();
        inner.closed = true;
        inner.watchers.clear();
    }
}
