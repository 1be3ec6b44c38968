use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sessionkit_core::SessionError;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::client::{BackingClient, Fetched};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// In-process stand-in for a Redis server.
///
/// Clones share the same map, so a test can hand one clone to a
/// [`RedisSessionStore`](crate::RedisSessionStore) and inspect keys and
/// expiries through another. Deadlines use [`tokio::time::Instant`] and follow
/// paused test time.
#[derive(Debug, Default, Clone)]
pub struct MemoryClient {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    decode_json: bool,
}

impl MemoryClient {
    /// A client that hands stored strings back to the store's serializer.
    pub fn new() -> Self {
        Self::default()
    }

    /// A client that decodes JSON on read and returns records directly,
    /// bypassing the store's serializer.
    pub fn decoding_json() -> Self {
        Self {
            decode_json: true,
            ..Self::default()
        }
    }

    /// Store a value with no expiry, like a plain `SET`.
    pub async fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.into(),
            Entry {
                value: value.into(),
                expires_at: None,
            },
        );
    }

    /// The stored string under `key`, if present and not expired.
    pub async fn get_raw(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    /// Remaining lifetime of `key`, like `PTTL`.
    ///
    /// Returns `None` both for a missing key and for a key without expiry;
    /// use [`contains_key`](Self::contains_key) to tell them apart.
    pub async fn pttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .and_then(|entry| entry.expires_at)
            .map(|at| at.saturating_duration_since(now))
    }

    pub async fn contains_key(&self, key: &str) -> bool {
        self.get_raw(key).await.is_some()
    }

    /// Number of live keys.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|entry| entry.is_live(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn decode(raw: String) -> Result<Option<Fetched>, SessionError> {
        if raw.is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(record)) => Ok(Some(Fetched::Structured(record))),
            Ok(Value::Null) => Ok(None),
            Ok(other) => Err(SessionError::backend(format!(
                "stored value is not a session record: {other}"
            ))),
            Err(e) => Err(SessionError::backend(e)),
        }
    }
}

#[async_trait]
impl BackingClient for MemoryClient {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Fetched>, SessionError> {
        let Some(raw) = self.get_raw(key).await else {
            return Ok(None);
        };
        if self.decode_json {
            Self::decode(raw)
        } else {
            Ok(Some(Fetched::Raw(raw)))
        }
    }

    async fn set_px(&self, key: &str, value: String, ttl_ms: u64) -> Result<(), SessionError> {
        if ttl_ms == 0 {
            return Err(SessionError::backend("invalid expire time in 'set' command"));
        }
        let expires_at = Instant::now()
            .checked_add(Duration::from_millis(ttl_ms))
            .ok_or_else(|| SessionError::backend("invalid expire time in 'set' command"))?;
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Some(expires_at),
            },
        );
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }

    async fn expire(&self, key: &str, ttl_secs: i64) -> Result<(), SessionError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let live = entries.get(key).is_some_and(|entry| entry.is_live(now));
        if !live {
            entries.remove(key);
            return Ok(());
        }
        // EXPIRE with a non-positive ttl deletes the key.
        if ttl_secs <= 0 {
            entries.remove(key);
            return Ok(());
        }
        let expires_at = now
            .checked_add(Duration::from_secs(ttl_secs.unsigned_abs()))
            .ok_or_else(|| SessionError::backend("invalid expire time in 'expire' command"))?;
        if let Some(entry) = entries.get_mut(key) {
            entry.expires_at = Some(expires_at);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn expired_entries_read_as_missing() {
        let client = MemoryClient::new();
        client.set_px("k", "v".into(), 100).await.unwrap();
        assert_eq!(client.get_raw("k").await.as_deref(), Some("v"));

        tokio::time::advance(Duration::from_millis(101)).await;
        assert!(client.get_raw("k").await.is_none());
        assert!(client.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn expire_on_missing_key_is_noop() {
        let client = MemoryClient::new();
        client.expire("ghost", 10).await.unwrap();
        assert!(!client.contains_key("ghost").await);
    }

    #[tokio::test]
    async fn expire_zero_deletes() {
        let client = MemoryClient::new();
        client.insert("k", "v").await;
        client.expire("k", 0).await.unwrap();
        assert!(!client.contains_key("k").await);
    }

    #[tokio::test]
    async fn set_px_rejects_zero() {
        let client = MemoryClient::new();
        let err = client.set_px("k", "v".into(), 0).await.unwrap_err();
        assert!(matches!(err, SessionError::Backend(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn unrepresentable_expire_keeps_deadline() {
        let client = MemoryClient::new();
        client.set_px("k", "v".into(), 10_000).await.unwrap();
        let err = client.expire("k", i64::MAX).await.unwrap_err();
        assert!(matches!(err, SessionError::Backend(_)));
        assert_eq!(client.pttl("k").await, Some(Duration::from_secs(10)));
    }

    #[tokio::test]
    async fn decoding_rejects_non_objects() {
        let client = MemoryClient::decoding_json();
        client.insert("num", "42").await;
        client.insert("null", "null").await;

        assert!(client.get("num").await.is_err());
        assert_eq!(client.get("null").await.unwrap(), None);
    }
}
