//! Core traits and types shared by every sessionkit store.
//!
//! A session middleware talks to a [`SessionStore`]; stores persist a
//! [`SessionRecord`] under a session ID and turn it into bytes with a
//! [`Serializer`]. Everything fallible returns [`SessionError`].

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Session data
// ---------------------------------------------------------------------------

/// The payload of one user session: string keys mapped to arbitrary JSON values.
///
/// Stores treat it as opaque. A missing session is represented as `None`, never as
/// an empty record.
pub type SessionRecord = Map<String, Value>;

/// One day, the default lifetime of a session written with [`Expiry::Infinite`].
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_millis(86_400_000);

/// Requested lifetime of a session written with [`SessionStore::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Expire after the given duration (millisecond precision).
    After(Duration),
    /// No expiry requested. Stores without a no-expiry write substitute their
    /// configured default lifetime.
    Infinite,
}

impl Expiry {
    /// Convert a millisecond count as handed over by numeric callers.
    ///
    /// `f64::INFINITY` maps to [`Expiry::Infinite`]; any other value must be
    /// finite and positive.
    pub fn from_millis(millis: f64) -> Result<Self, SessionError> {
        if millis == f64::INFINITY {
            return Ok(Expiry::Infinite);
        }
        if !(millis.is_finite() && millis > 0.0) {
            return Err(SessionError::Validation(format!(
                "session ttl must be positive, got {millis}ms"
            )));
        }
        Duration::try_from_secs_f64(millis / 1000.0)
            .map(Expiry::After)
            .map_err(|e| SessionError::Validation(format!("session ttl {millis}ms: {e}")))
    }

    /// The concrete lifetime to write, using `default` for [`Expiry::Infinite`].
    pub fn resolve(self, default: Duration) -> Duration {
        match self {
            Expiry::After(ttl) => ttl,
            Expiry::Infinite => default,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Expiry::Infinite)
    }
}

impl From<Duration> for Expiry {
    fn from(ttl: Duration) -> Self {
        Expiry::After(ttl)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Boxed source error carried by [`SessionError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Error type for every session store operation.
///
/// Backend and serializer failures keep the original error as their source so
/// callers can downcast to the client's own error type.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("backend error: {0}")]
    Backend(#[source] BoxError),
    #[error("serialization error: {0}")]
    Serialization(#[source] BoxError),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("config error: {0}")]
    Config(String),
}

impl SessionError {
    pub fn backend(err: impl Into<BoxError>) -> Self {
        SessionError::Backend(err.into())
    }

    pub fn serialization(err: impl Into<BoxError>) -> Self {
        SessionError::Serialization(err.into())
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(Box::new(err))
    }
}

// ---------------------------------------------------------------------------
// Serializer
// ---------------------------------------------------------------------------

/// Converts session records to and from the string form kept in a store.
#[async_trait]
pub trait Serializer: Send + Sync {
    fn stringify(&self, record: &SessionRecord) -> Result<String, SessionError>;

    async fn parse(&self, raw: &str) -> Result<SessionRecord, SessionError>;
}

/// Default [`Serializer`]: compact JSON via `serde_json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl JsonSerializer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Serializer for JsonSerializer {
    fn stringify(&self, record: &SessionRecord) -> Result<String, SessionError> {
        Ok(serde_json::to_string(record)?)
    }

    async fn parse(&self, raw: &str) -> Result<SessionRecord, SessionError> {
        Ok(serde_json::from_str(raw)?)
    }
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// The capability a session middleware needs from a persistence backend.
///
/// Each call is a single independent round-trip. Stores do not arbitrate
/// concurrent writers of the same ID.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session, returning `None` when it does not exist or has expired.
    async fn get(&self, id: &str) -> Result<Option<SessionRecord>, SessionError>;

    /// Write a session with the given lifetime.
    async fn set(&self, id: &str, record: &SessionRecord, ttl: Expiry)
        -> Result<(), SessionError>;

    /// Remove a session. Removing a missing session succeeds.
    async fn destroy(&self, id: &str) -> Result<(), SessionError>;

    /// Reset the lifetime of an existing session without touching its content.
    ///
    /// Stores with second-granularity expiry round a fractional second up.
    async fn touch(&self, id: &str, ttl: Duration) -> Result<(), SessionError>;
}
