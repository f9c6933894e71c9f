//! Store trait definitions.

use async_trait::async_trait;
use serde_json::Value;

use crate::{StoreResult, Subscription};

/// Receives the full value under a subscribed path, `Value::Null` when empty.
pub type SnapshotCallback = Box<dyn Fn(Value) + Send + Sync + 'static>;

/// A hierarchical key-value store with live subscriptions.
///
/// Paths are `/`-separated keys. One handle is opened per process and shared
/// by everything that reads or writes the store.
#[async_trait]
pub trait RealtimeStore: Send + Sync {
    /// Writes `value` at `path`, replacing whatever was there.
    async fn set(&self, path: &str, value: Value) -> StoreResult<()>;

    /// Writes `value` under a freshly generated child key of `path` and
    /// returns that key. Generated keys never collide with existing ones.
    async fn push(&self, path: &str, value: Value) -> StoreResult<String>;

    /// Calls `callback` with the current value at `path` and again after
    /// every change, until the returned handle is released.
    async fn subscribe(&self, path: &str, callback: SnapshotCallback) -> StoreResult<Subscription>;

    /// Ends every live subscription. Writes after shutdown fail.
    async fn shutdown(&self);
}
