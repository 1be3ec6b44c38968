use async_trait::async_trait;
use redis::aio::{ConnectionManager, MultiplexedConnection};
use redis::cluster_async::ClusterConnection;
use redis::{AsyncCommands, SetExpiry, SetOptions};
use sessionkit_core::{SessionError, SessionRecord};

/// A value read back from the backing store.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Fetched {
    /// Serialized string, to be run through the store's serializer.
    Raw(String),
    /// Already-decoded record from a client that deserializes on its own.
    Structured(SessionRecord),
}

/// The resolved calling convention for one concrete client.
///
/// Implementations differ only in how they spell "set with millisecond
/// expiry"; every other command maps one-to-one onto Redis.
#[async_trait]
pub(crate) trait BackingClient: Send + Sync {
    /// Short name used in log fields.
    fn kind(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<Fetched>, SessionError>;

    async fn set_px(&self, key: &str, value: String, ttl_ms: u64) -> Result<(), SessionError>;

    async fn del(&self, key: &str) -> Result<(), SessionError>;

    async fn expire(&self, key: &str, ttl_secs: i64) -> Result<(), SessionError>;
}

fn raw(value: Option<String>) -> Option<Fetched> {
    value.map(Fetched::Raw)
}

// ---------------------------------------------------------------------------
// redis::Client — one multiplexed connection per call
// ---------------------------------------------------------------------------

pub(crate) struct UrlClient {
    client: redis::Client,
}

impl UrlClient {
    pub(crate) fn new(client: redis::Client) -> Self {
        Self { client }
    }

    async fn get_connection(&self) -> Result<MultiplexedConnection, SessionError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(SessionError::backend)
    }
}

#[async_trait]
impl BackingClient for UrlClient {
    fn kind(&self) -> &'static str {
        "client"
    }

    async fn get(&self, key: &str) -> Result<Option<Fetched>, SessionError> {
        let mut con = self.get_connection().await?;
        let value: Option<String> = con.get(key).await.map_err(SessionError::backend)?;
        Ok(raw(value))
    }

    async fn set_px(&self, key: &str, value: String, ttl_ms: u64) -> Result<(), SessionError> {
        let mut con = self.get_connection().await?;
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(ttl_ms)
            .query_async(&mut con)
            .await
            .map_err(SessionError::backend)?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), SessionError> {
        let mut con = self.get_connection().await?;
        con.del::<_, ()>(key).await.map_err(SessionError::backend)
    }

    async fn expire(&self, key: &str, ttl_secs: i64) -> Result<(), SessionError> {
        let mut con = self.get_connection().await?;
        con.expire::<_, ()>(key, ttl_secs)
            .await
            .map_err(SessionError::backend)
    }
}

// ---------------------------------------------------------------------------
// MultiplexedConnection — PSETEX through the typed command helper
// ---------------------------------------------------------------------------

pub(crate) struct MultiplexedClient {
    con: MultiplexedConnection,
}

impl MultiplexedClient {
    pub(crate) fn new(con: MultiplexedConnection) -> Self {
        Self { con }
    }
}

#[async_trait]
impl BackingClient for MultiplexedClient {
    fn kind(&self) -> &'static str {
        "multiplexed"
    }

    async fn get(&self, key: &str) -> Result<Option<Fetched>, SessionError> {
        let mut con = self.con.clone();
        let value: Option<String> = con.get(key).await.map_err(SessionError::backend)?;
        Ok(raw(value))
    }

    async fn set_px(&self, key: &str, value: String, ttl_ms: u64) -> Result<(), SessionError> {
        let mut con = self.con.clone();
        con.pset_ex::<_, _, ()>(key, value, ttl_ms)
            .await
            .map_err(SessionError::backend)
    }

    async fn del(&self, key: &str) -> Result<(), SessionError> {
        let mut con = self.con.clone();
        con.del::<_, ()>(key).await.map_err(SessionError::backend)
    }

    async fn expire(&self, key: &str, ttl_secs: i64) -> Result<(), SessionError> {
        let mut con = self.con.clone();
        con.expire::<_, ()>(key, ttl_secs)
            .await
            .map_err(SessionError::backend)
    }
}

// ---------------------------------------------------------------------------
// ConnectionManager — SET with an options struct
// ---------------------------------------------------------------------------

pub(crate) struct ManagedClient {
    manager: ConnectionManager,
}

impl ManagedClient {
    pub(crate) fn new(manager: ConnectionManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl BackingClient for ManagedClient {
    fn kind(&self) -> &'static str {
        "manager"
    }

    async fn get(&self, key: &str) -> Result<Option<Fetched>, SessionError> {
        let mut con = self.manager.clone();
        let value: Option<String> = con.get(key).await.map_err(SessionError::backend)?;
        Ok(raw(value))
    }

    async fn set_px(&self, key: &str, value: String, ttl_ms: u64) -> Result<(), SessionError> {
        let mut con = self.manager.clone();
        let options = SetOptions::default().with_expiration(SetExpiry::PX(ttl_ms));
        con.set_options::<_, _, ()>(key, value, options)
            .await
            .map_err(SessionError::backend)
    }

    async fn del(&self, key: &str) -> Result<(), SessionError> {
        let mut con = self.manager.clone();
        con.del::<_, ()>(key).await.map_err(SessionError::backend)
    }

    async fn expire(&self, key: &str, ttl_secs: i64) -> Result<(), SessionError> {
        let mut con = self.manager.clone();
        con.expire::<_, ()>(key, ttl_secs)
            .await
            .map_err(SessionError::backend)
    }
}

// ---------------------------------------------------------------------------
// ClusterConnection — positional PSETEX key ms value
// ---------------------------------------------------------------------------

pub(crate) struct ClusterClient {
    con: ClusterConnection,
}

impl ClusterClient {
    pub(crate) fn new(con: ClusterConnection) -> Self {
        Self { con }
    }
}

#[async_trait]
impl BackingClient for ClusterClient {
    fn kind(&self) -> &'static str {
        "cluster"
    }

    async fn get(&self, key: &str) -> Result<Option<Fetched>, SessionError> {
        let mut con = self.con.clone();
        let value: Option<String> = con.get(key).await.map_err(SessionError::backend)?;
        Ok(raw(value))
    }

    async fn set_px(&self, key: &str, value: String, ttl_ms: u64) -> Result<(), SessionError> {
        let mut con = self.con.clone();
        let _: () = redis::cmd("PSETEX")
            .arg(key)
            .arg(ttl_ms)
            .arg(value)
            .query_async(&mut con)
            .await
            .map_err(SessionError::backend)?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), SessionError> {
        let mut con = self.con.clone();
        con.del::<_, ()>(key).await.map_err(SessionError::backend)
    }

    async fn expire(&self, key: &str, ttl_secs: i64) -> Result<(), SessionError> {
        let mut con = self.con.clone();
        con.expire::<_, ()>(key, ttl_secs)
            .await
            .map_err(SessionError::backend)
    }
}
