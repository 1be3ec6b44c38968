//! sessionkit — session persistence for web session middleware.
//!
//! This crate re-exports the sessionkit sub-crates for single-import usage.
//! Enable features to control which stores are available.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `default` | `redis` |
//! | `redis` | `RedisSessionStore` over the `redis` crate's async clients |
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sessionkit::core::{Expiry, SessionStore};
//! use sessionkit::redis::{RedisSessionStore, RedisSessionStoreConfig};
//! ```

/// Core traits and types: SessionStore, Serializer, Expiry, SessionError.
/// Always available.
pub use sessionkit_core as core;

/// Redis-backed SessionStore and the in-process MemoryClient.
#[cfg(feature = "redis")]
pub use sessionkit_redis as redis;
