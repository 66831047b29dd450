//! PostgreSQL document collection
//!
//! Table layout (one table per collection):
//!
//! ```sql
//! id          UUID PRIMARY KEY
//! unique_key  TEXT UNIQUE NULL
//! version     BIGINT NOT NULL
//! body        JSONB NOT NULL
//! created_at  TIMESTAMPTZ NOT NULL
//! updated_at  TIMESTAMPTZ NOT NULL
//! ```
//!
//! Single-document updates use optimistic concurrency: read `(version, body)`,
//! apply the change, write back guarded by `WHERE version = $old`, retry on a
//! lost race up to `max_retries` times.

use std::marker::PhantomData;

use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Document, DocumentStore, Slice, StoreError, scan_terms};

/// Default bound for the optimistic retry loop
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Document collection stored in a `jsonb` table
pub struct PgCollection<D: Document> {
    pool: PgPool,
    table: &'static str,
    max_retries: u32,
    _doc: PhantomData<fn() -> D>,
}

impl<D: Document> Clone for PgCollection<D> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            table: self.table,
            max_retries: self.max_retries,
            _doc: PhantomData,
        }
    }
}

impl<D: Document> PgCollection<D> {
    /// Table name is `D::COLLECTION`
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table: D::COLLECTION,
            max_retries: DEFAULT_MAX_RETRIES,
            _doc: PhantomData,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    fn classify(err: sqlx::Error) -> StoreError {
        match StoreError::from(err) {
            StoreError::Duplicate { key, .. } => StoreError::Duplicate {
                collection: D::COLLECTION,
                key,
            },
            other => {
                if other.is_unavailable() {
                    tracing::error!(collection = D::COLLECTION, error = %other, "Document store unreachable");
                }
                other
            }
        }
    }

    fn decode(body: Value) -> Result<D, StoreError> {
        serde_json::from_value(body).map_err(StoreError::Corrupt)
    }

}

impl<D: Document> DocumentStore<D> for PgCollection<D> {
    async fn insert(&self, doc: &D) -> Result<(), StoreError> {
        let body = serde_json::to_value(doc)?;
        let sql = format!(
            "INSERT INTO {} (id, unique_key, version, body, created_at, updated_at) \
             VALUES ($1, $2, 0, $3, $4, $4)",
            self.table
        );

        sqlx::query(&sql)
            .bind(doc.key())
            .bind(doc.unique_key())
            .bind(body)
            .bind(doc.created_at())
            .execute(&self.pool)
            .await
            .map_err(Self::classify)?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<D>, StoreError> {
        let sql = format!("SELECT body FROM {} WHERE id = $1", self.table);
        let row: Option<(Value,)> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::classify)?;

        row.map(|(body,)| Self::decode(body)).transpose()
    }

    async fn find_unique(&self, key: &str) -> Result<Option<D>, StoreError> {
        let sql = format!("SELECT body FROM {} WHERE unique_key = $1", self.table);
        let row: Option<(Value,)> = sqlx::query_as(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::classify)?;

        row.map(|(body,)| Self::decode(body)).transpose()
    }

    /// `body @> filter`, newest first
    async fn list(&self, filter: &Value, slice: Slice) -> Result<Vec<D>, StoreError> {
        let sql = format!(
            "SELECT body FROM {} WHERE body @> $1 \
             ORDER BY created_at DESC, id DESC OFFSET $2 LIMIT $3",
            self.table
        );
        let rows: Vec<(Value,)> = sqlx::query_as(&sql)
            .bind(filter)
            .bind(i64::try_from(slice.offset).unwrap_or(i64::MAX))
            .bind(slice.limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX)))
            .fetch_all(&self.pool)
            .await
            .map_err(Self::classify)?;

        rows.into_iter().map(|(body,)| Self::decode(body)).collect()
    }

    /// Case-insensitive substring match of any term against the whole body
    async fn scan(&self, terms: &[String]) -> Result<Vec<D>, StoreError> {
        let patterns: Vec<String> = scan_terms(terms)
            .iter()
            .map(|t| format!("%{}%", escape_like(t)))
            .collect();

        let rows: Vec<(Value,)> = if patterns.is_empty() {
            let sql = format!(
                "SELECT body FROM {} ORDER BY created_at DESC, id DESC",
                self.table
            );
            sqlx::query_as::<_, (Value,)>(&sql)
                .fetch_all(&self.pool)
                .await
        } else {
            let sql = format!(
                "SELECT body FROM {} WHERE body::text ILIKE ANY($1) \
                 ORDER BY created_at DESC, id DESC",
                self.table
            );
            sqlx::query_as::<_, (Value,)>(&sql)
                .bind(&patterns)
                .fetch_all(&self.pool)
                .await
        }
        .map_err(Self::classify)?;

        rows.into_iter().map(|(body,)| Self::decode(body)).collect()
    }

    /// Atomic read-modify-write with optimistic versioning
    ///
    /// `f` may run more than once (once per attempt) and always sees the
    /// latest committed body. An `Err` from `f` aborts without writing.
    async fn modify<T, E, F>(&self, id: Uuid, mut f: F) -> Result<Option<T>, E>
    where
        T: Send,
        E: From<StoreError> + Send,
        F: FnMut(&mut D) -> Result<T, E> + Send,
    {
        let select = format!("SELECT version, body FROM {} WHERE id = $1", self.table);
        let update = format!(
            "UPDATE {} SET body = $1, unique_key = $2, version = version + 1, updated_at = $3 \
             WHERE id = $4 AND version = $5",
            self.table
        );

        for attempt in 1..=self.max_retries {
            let row: Option<(i64, Value)> = sqlx::query_as(&select)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(Self::classify)?;

            let Some((version, body)) = row else {
                return Ok(None);
            };

            let mut doc = Self::decode(body)?;
            let out = f(&mut doc)?;
            let body = serde_json::to_value(&doc).map_err(StoreError::from)?;

            let written = sqlx::query(&update)
                .bind(body)
                .bind(doc.unique_key())
                .bind(Utc::now())
                .bind(id)
                .bind(version)
                .execute(&self.pool)
                .await
                .map_err(Self::classify)?
                .rows_affected();

            if written == 1 {
                return Ok(Some(out));
            }

            tracing::debug!(
                collection = D::COLLECTION,
                %id,
                attempt,
                "Optimistic update lost a race, retrying"
            );
        }

        tracing::warn!(
            collection = D::COLLECTION,
            %id,
            attempts = self.max_retries,
            "Optimistic update gave up"
        );
        Err(StoreError::Contention {
            collection: D::COLLECTION,
            id,
            attempts: self.max_retries,
        }
        .into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        let deleted = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Self::classify)?
            .rows_affected();

        Ok(deleted > 0)
    }
}

/// Escape `LIKE` wildcards so user input matches literally
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("organic"), "organic");
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\x"), "c:\\\\x");
    }
}
