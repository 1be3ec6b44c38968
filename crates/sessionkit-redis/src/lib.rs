//! Redis integration for sessionkit.
//!
//! [`RedisSessionStore`] implements [`SessionStore`](sessionkit_core::SessionStore)
//! on top of one of the `redis` crate's async clients, chosen through
//! [`RedisBackend`]:
//!
//! | variant | handle | millisecond expiry written as |
//! |---------|--------|-------------------------------|
//! | `Client` | [`redis::Client`] | `SET key value PX ms` on a fresh connection |
//! | `Multiplexed` | [`redis::aio::MultiplexedConnection`] | `PSETEX` via `pset_ex` |
//! | `Manager` | [`redis::aio::ConnectionManager`] | `SET` with `SetExpiry::PX` options |
//! | `Cluster` | [`redis::cluster_async::ClusterConnection`] | `PSETEX key ms value` |
//! | `Memory` | [`MemoryClient`] | in-process map |
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use sessionkit_redis::{Expiry, RedisSessionStore, RedisSessionStoreConfig, SessionStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RedisSessionStoreConfig::default().with_prefix("sess:");
//! let store = RedisSessionStore::from_url_with_config("redis://127.0.0.1/", config)?;
//!
//! let mut record = serde_json::Map::new();
//! record.insert("userId".into(), 7.into());
//! store.set("abc", &record, Expiry::After(Duration::from_secs(60))).await?;
//! assert_eq!(store.get("abc").await?, Some(record));
//! # Ok(())
//! # }
//! ```

mod backend;
mod client;
mod memory;
mod store;

pub use backend::RedisBackend;
pub use memory::MemoryClient;
pub use store::{RedisSessionStore, RedisSessionStoreConfig};

// Re-export core types for convenience.
pub use sessionkit_core::{
    Expiry, JsonSerializer, Serializer, SessionError, SessionRecord, SessionStore,
};
