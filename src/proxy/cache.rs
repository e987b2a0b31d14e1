use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// Server-side cache of upstream bodies, keyed by upstream path.
#[derive(Default)]
pub struct ResponseCache {
    entries: RwLock<HashMap<String, (Instant, Value)>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The body stored for `path`, if it has not expired.
    pub async fn get(&self, path: &str) -> Option<Value> {
        let entries = self.entries.read().await;
        let (expires_at, value) = entries.get(path)?;
        (Instant::now() < *expires_at).then(|| value.clone())
    }

    /// Stores `value` for `ttl`. A zero `ttl` stores nothing.
    pub async fn insert(&self, path: &str, value: Value, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, (expires_at, _)| *expires_at > now);
        entries.insert(path.to_string(), (now + ttl, value));
        debug!(path, size = entries.len(), "Cached");
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
