use std::sync::Arc;

use dictionary::Word;
use realtime_db::{path, RealtimeStore, StoreResult, Subscription};
use serde_json::Value;

const HISTORY_PATH: &str = "history";
const FAVORITES_PATH: &str = "favorites";

/// Search history and favorites, kept in the shared remote store.
pub struct Storage {
    db: Arc<dyn RealtimeStore>,
}

impl Storage {
    pub fn new(db: Arc<dyn RealtimeStore>) -> Self {
        Self { db }
    }
}

impl Storage {
    /// Appends a searched word to the history, returns the generated key
    pub async fn record_history(&self, word: &str) -> StoreResult<String> {
        self.db
            .push(HISTORY_PATH, Value::String(word.to_owned()))
            .await
    }

    /// Saves a word as a favorite, replacing an earlier favorite with the same id
    pub async fn add_favorite(&self, word: &Word) -> StoreResult<()> {
        let path = path::child(FAVORITES_PATH, word.id())?;
        let value = serde_json::to_value(word)?;
        self.db.set(&path, value).await
    }

    /// Calls `callback` with every searched word now and whenever the history changes
    pub async fn subscribe_history<F>(&self, callback: F) -> StoreResult<Subscription>
    where
        F: Fn(Vec<String>) + Send + Sync + 'static,
    {
        self.db
            .subscribe(
                HISTORY_PATH,
                Box::new(move |snapshot: Value| callback(history_entries(&snapshot))),
            )
            .await
    }
}

/// Generated keys sort by creation time, so key order is search order.
fn history_entries(snapshot: &Value) -> Vec<String> {
    match snapshot {
        Value::Object(entries) => entries
            .values()
            .filter_map(|entry| entry.as_str().map(str::to_owned))
            .collect(),
        _ => Vec::new(),
    }
}
