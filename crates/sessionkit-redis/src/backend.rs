use std::fmt;
use std::sync::Arc;

use redis::aio::{ConnectionManager, MultiplexedConnection};
use redis::cluster_async::ClusterConnection;

use crate::client::{BackingClient, ClusterClient, ManagedClient, MultiplexedClient, UrlClient};
use crate::memory::MemoryClient;

/// The clients a [`RedisSessionStore`](crate::RedisSessionStore) can sit on.
///
/// The set is closed: each variant knows how its client expresses a write with
/// millisecond expiry, and the store picks that convention once when it is
/// built. Every handle is a cheap clone of a shared connection owned by the
/// caller.
#[derive(Clone)]
pub enum RedisBackend {
    /// A client opening a multiplexed connection for every call.
    Client(redis::Client),
    /// A long-lived multiplexed connection.
    Multiplexed(MultiplexedConnection),
    /// A reconnecting connection manager.
    Manager(ConnectionManager),
    /// A Redis Cluster connection.
    Cluster(ClusterConnection),
    /// The in-process [`MemoryClient`].
    Memory(MemoryClient),
}

impl RedisBackend {
    pub fn kind(&self) -> &'static str {
        match self {
            RedisBackend::Client(_) => "client",
            RedisBackend::Multiplexed(_) => "multiplexed",
            RedisBackend::Manager(_) => "manager",
            RedisBackend::Cluster(_) => "cluster",
            RedisBackend::Memory(_) => "memory",
        }
    }

    pub(crate) fn into_client(self) -> Arc<dyn BackingClient> {
        match self {
            RedisBackend::Client(client) => Arc::new(UrlClient::new(client)),
            RedisBackend::Multiplexed(con) => Arc::new(MultiplexedClient::new(con)),
            RedisBackend::Manager(manager) => Arc::new(ManagedClient::new(manager)),
            RedisBackend::Cluster(con) => Arc::new(ClusterClient::new(con)),
            RedisBackend::Memory(client) => Arc::new(client),
        }
    }
}

impl fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RedisBackend").field(&self.kind()).finish()
    }
}

impl From<redis::Client> for RedisBackend {
    fn from(client: redis::Client) -> Self {
        RedisBackend::Client(client)
    }
}

impl From<MultiplexedConnection> for RedisBackend {
    fn from(con: MultiplexedConnection) -> Self {
        RedisBackend::Multiplexed(con)
    }
}

impl From<ConnectionManager> for RedisBackend {
    fn from(manager: ConnectionManager) -> Self {
        RedisBackend::Manager(manager)
    }
}

impl From<ClusterConnection> for RedisBackend {
    fn from(con: ClusterConnection) -> Self {
        RedisBackend::Cluster(con)
    }
}

impl From<MemoryClient> for RedisBackend {
    fn from(client: MemoryClient) -> Self {
        RedisBackend::Memory(client)
    }
}
