use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sessionkit_core::{
    Expiry, JsonSerializer, Serializer, SessionError, SessionRecord, SessionStore,
    DEFAULT_SESSION_TTL,
};

use crate::backend::RedisBackend;
use crate::client::{BackingClient, Fetched};

/// Configuration for [`RedisSessionStore`].
#[derive(Debug, Clone)]
pub struct RedisSessionStoreConfig {
    /// Prepended to every session ID to form the Redis key. Defaults to `""`.
    pub prefix: String,
    /// Lifetime used for sessions written with [`Expiry::Infinite`].
    /// Defaults to one day; a zero value falls back to the default.
    pub ttl: Duration,
}

impl Default for RedisSessionStoreConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            ttl: DEFAULT_SESSION_TTL,
        }
    }
}

impl RedisSessionStoreConfig {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Redis-backed implementation of [`SessionStore`].
///
/// Sessions live under `{prefix}{id}` as serialized strings and always carry
/// a millisecond expiry. Redis has no write shape here for "never expire", so
/// [`Expiry::Infinite`] is written with the configured default lifetime.
///
/// Cloning is cheap and clones share the backing connection.
#[derive(Clone)]
pub struct RedisSessionStore {
    client: Arc<dyn BackingClient>,
    serializer: Arc<dyn Serializer>,
    config: RedisSessionStoreConfig,
}

impl RedisSessionStore {
    /// Create a store on top of an already connected client.
    pub fn new(backend: impl Into<RedisBackend>, mut config: RedisSessionStoreConfig) -> Self {
        if config.ttl.is_zero() {
            config.ttl = DEFAULT_SESSION_TTL;
        }
        Self {
            client: backend.into().into_client(),
            serializer: Arc::new(JsonSerializer),
            config,
        }
    }

    /// Create a store from a Redis URL with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid. No connection is made here.
    pub fn from_url(url: &str) -> Result<Self, SessionError> {
        Self::from_url_with_config(url, RedisSessionStoreConfig::default())
    }

    /// Create a store from a Redis URL with custom configuration.
    pub fn from_url_with_config(
        url: &str,
        config: RedisSessionStoreConfig,
    ) -> Result<Self, SessionError> {
        let client = redis::Client::open(url)
            .map_err(|e| SessionError::Config(format!("invalid Redis URL {url:?}: {e}")))?;
        Ok(Self::new(client, config))
    }

    /// Replace the default [`JsonSerializer`].
    pub fn with_serializer(mut self, serializer: Arc<dyn Serializer>) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.config.prefix
    }

    /// Lifetime written for [`Expiry::Infinite`].
    pub fn default_ttl(&self) -> Duration {
        self.config.ttl
    }

    /// The Redis key a session ID is stored under.
    pub fn storage_key(&self, id: &str) -> String {
        format!("{}{id}", self.config.prefix)
    }
}

impl fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("backend", &self.client.kind())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Whole milliseconds for `PX`, rejecting lifetimes that round to zero or
/// exceed the signed 64-bit range Redis accepts.
fn expiry_millis(ttl: Duration) -> Result<u64, SessionError> {
    match i64::try_from(ttl.as_millis()) {
        Ok(0) => Err(SessionError::Validation(format!(
            "session ttl must be at least 1ms, got {ttl:?}"
        ))),
        Ok(ms) => Ok(ms.unsigned_abs()),
        Err(_) => Err(SessionError::Validation(format!(
            "session ttl {ttl:?} exceeds the largest expiry Redis accepts"
        ))),
    }
}

/// Whole seconds for `EXPIRE`, rounding a fractional second up.
fn expiry_secs(ttl: Duration) -> i64 {
    let secs = ttl.as_secs().saturating_add(u64::from(ttl.subsec_nanos() > 0));
    i64::try_from(secs).unwrap_or(i64::MAX)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, id: &str) -> Result<Option<SessionRecord>, SessionError> {
        let key = self.storage_key(id);
        let fetched = self.client.get(&key).await?;
        tracing::debug!(
            backend = self.client.kind(),
            key = %key,
            found = fetched.is_some(),
            "session get"
        );

        match fetched {
            Some(Fetched::Structured(record)) => Ok(Some(record)),
            Some(Fetched::Raw(raw)) if !raw.is_empty() => {
                self.serializer.parse(&raw).await.map(Some)
            }
            _ => Ok(None),
        }
    }

    async fn set(
        &self,
        id: &str,
        record: &SessionRecord,
        ttl: Expiry,
    ) -> Result<(), SessionError> {
        let key = self.storage_key(id);
        let serialized = self.serializer.stringify(record)?;
        let ttl_ms = expiry_millis(ttl.resolve(self.config.ttl))?;
        tracing::debug!(
            backend = self.client.kind(),
            key = %key,
            ttl_ms,
            default_ttl = ttl.is_infinite(),
            "session set"
        );

        self.client.set_px(&key, serialized, ttl_ms).await
    }

    async fn destroy(&self, id: &str) -> Result<(), SessionError> {
        let key = self.storage_key(id);
        tracing::debug!(backend = self.client.kind(), key = %key, "session destroy");
        self.client.del(&key).await
    }

    async fn touch(&self, id: &str, ttl: Duration) -> Result<(), SessionError> {
        let key = self.storage_key(id);
        let ttl_secs = expiry_secs(ttl);
        tracing::debug!(
            backend = self.client.kind(),
            key = %key,
            ttl_secs,
            "session touch"
        );
        self.client.expire(&key, ttl_secs).await
    }
}
