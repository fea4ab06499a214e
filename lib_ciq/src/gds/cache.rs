//! Response-cache seam, keyed by the serialized request body. The client
//! consults the cache before POSTing and fills it afterwards; a hit skips the
//! network round trip and does not count against the daily request quota.
//! The backing store is the embedder's choice.

use std::collections::HashMap;
use std::sync::Mutex;

/// A cache of raw response bodies keyed by raw request bodies.
pub trait ResponseCache: Send + Sync {
    /// Returns the cached response body for `request_body`, if any.
    fn get(&self, request_body: &str) -> Option<String>;
    /// Stores `response_body` under `request_body`.
    fn put(&self, request_body: &str, response_body: &str);
}

/// An unbounded in-process cache. Suitable for short-lived batch jobs and
/// tests; anything long-running wants a real backend behind the trait.
#[derive(Debug, Default)]
pub struct MemoryResponseCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryResponseCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResponseCache for MemoryResponseCache {
    fn get(&self, request_body: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(request_body).cloned()
    }

    fn put(&self, request_body: &str, response_body: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(request_body.to_string(), response_body.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_returns_bodies() {
        let cache = MemoryResponseCache::new();
        assert!(cache.get("req").is_none());
        cache.put("req", "resp");
        assert_eq!(cache.get("req").as_deref(), Some("resp"));
    }
}
