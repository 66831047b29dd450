//! Document Storage
//!
//! Schemaless-by-convention persistence for aggregates that own their
//! embedded children (reviews, comments, applicants). Each aggregate is one
//! JSON document; the document is the unit of mutation.
//!
//! Two backends share the same operations:
//! - [`MemoryCollection`] - single-writer under an async lock (tests, no-DB mode)
//! - [`PgCollection`] - PostgreSQL `jsonb` with a per-row version and an
//!   optimistic retry loop
//!
//! Both provide unique-key insert, read-by-id, filtered newest-first listing
//! with offset/limit, and atomic read-modify-write of a single document.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryCollection;
pub use postgres::PgCollection;

// ============================================================================
// Document trait
// ============================================================================

/// A persisted aggregate
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection (table) name, used in logs and errors
    const COLLECTION: &'static str;

    /// Primary key
    fn key(&self) -> Uuid;

    /// Creation time; listings are ordered newest first by this value
    fn created_at(&self) -> DateTime<Utc>;

    /// Collection-wide unique key, if the aggregate has one (e.g. canonical email)
    fn unique_key(&self) -> Option<String> {
        None
    }
}

// ============================================================================
// Store trait
// ============================================================================

/// Operations every document backend provides
#[trait_variant::make(DocumentStore: Send)]
pub trait LocalDocumentStore<D: Document> {
    /// Insert a new document; `Duplicate` when its unique key is taken
    async fn insert(&self, doc: &D) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<D>, StoreError>;

    /// Look up by [`Document::unique_key`]
    async fn find_unique(&self, key: &str) -> Result<Option<D>, StoreError>;

    /// Documents containing `filter` (see [`json_contains`]), newest first
    async fn list(&self, filter: &Value, slice: Slice) -> Result<Vec<D>, StoreError>;

    /// Documents whose serialized body contains any of `terms`
    /// (case-insensitive), newest first. No terms means every document.
    async fn scan(&self, terms: &[String]) -> Result<Vec<D>, StoreError>;

    /// Atomic read-modify-write of one document
    ///
    /// The change is committed only when `f` returns `Ok`; `Ok(None)` means
    /// the document does not exist.
    async fn modify<T, E, F>(&self, id: Uuid, f: F) -> Result<Option<T>, E>
    where
        T: Send,
        E: From<StoreError> + Send,
        F: FnMut(&mut D) -> Result<T, E> + Send;

    /// `false` when nothing was deleted
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Storage-level failure
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique key already taken
    #[error("Duplicate key in {collection}: {key}")]
    Duplicate {
        collection: &'static str,
        key: String,
    },

    /// Optimistic update lost the race too many times
    #[error("Write contention on {collection}/{id} after {attempts} attempts")]
    Contention {
        collection: &'static str,
        id: Uuid,
        attempts: u32,
    },

    /// Storage unreachable (connection refused, pool exhausted, I/O)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Stored body does not decode into the aggregate
    #[error("Corrupt document: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl StoreError {
    /// True when the caller should report the store as unavailable
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StoreError::Unavailable(_) | StoreError::Contention { .. }
        )
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate {
                collection: "unknown",
                key: db.constraint().unwrap_or("unique_key").to_string(),
            },
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

// ============================================================================
// Slice (offset / limit)
// ============================================================================

/// Window over a newest-first listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub offset: u64,
    /// `None` = no limit
    pub limit: Option<u64>,
}

impl Slice {
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }

    /// Everything
    pub const fn all() -> Self {
        Self {
            offset: 0,
            limit: None,
        }
    }

    /// Cut `items` (already in listing order) down to this window
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let iter = items.into_iter().skip(offset);
        match self.limit {
            Some(limit) => iter
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .collect(),
            None => iter.collect(),
        }
    }
}

impl Default for Slice {
    fn default() -> Self {
        Self::all()
    }
}

// ============================================================================
// JSON containment
// ============================================================================

/// `doc @> pattern` with PostgreSQL `jsonb` containment semantics
///
/// - objects: every key of `pattern` exists in `doc` with a contained value
/// - arrays: every element of `pattern` is contained in some element of `doc`
/// - scalars: equal (numbers compared by value)
pub fn json_contains(doc: &Value, pattern: &Value) -> bool {
    match (doc, pattern) {
        (Value::Object(d), Value::Object(p)) => p
            .iter()
            .all(|(k, pv)| d.get(k).is_some_and(|dv| json_contains(dv, pv))),
        (Value::Array(d), Value::Array(p)) => {
            p.iter().all(|pv| d.iter().any(|dv| json_contains(dv, pv)))
        }
        (Value::Number(d), Value::Number(p)) => d.as_f64() == p.as_f64(),
        (d, p) => d == p,
    }
}

/// Lowercased, case-insensitive substring terms for a text scan
pub(crate) fn scan_terms(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
