//! In-memory document collection
//!
//! All writes take the collection's write lock, so every read-modify-write
//! is serialized (single-writer discipline). Cloning the collection shares
//! the same underlying storage.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Document, DocumentStore, Slice, StoreError, json_contains, scan_terms};

struct Inner<D> {
    docs: HashMap<Uuid, D>,
    unique: HashMap<String, Uuid>,
}

/// Document collection kept in process memory
pub struct MemoryCollection<D: Document> {
    inner: Arc<RwLock<Inner<D>>>,
    available: Arc<AtomicBool>,
}

impl<D: Document> Clone for MemoryCollection<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            available: Arc::clone(&self.available),
        }
    }
}

impl<D: Document> Default for MemoryCollection<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Document> MemoryCollection<D> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                docs: HashMap::new(),
                unique: HashMap::new(),
            })),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Simulate the store going away (every operation fails with `Unavailable`)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!(
                "{} collection is offline",
                D::COLLECTION
            )))
        }
    }
}

impl<D: Document> DocumentStore<D> for MemoryCollection<D> {
    /// Fails with `Duplicate` if the unique key is taken
    async fn insert(&self, doc: &D) -> Result<(), StoreError> {
        self.ensure_available()?;
        let mut inner = self.inner.write().await;

        if let Some(key) = doc.unique_key() {
            if inner.unique.contains_key(&key) {
                return Err(StoreError::Duplicate {
                    collection: D::COLLECTION,
                    key,
                });
            }
            inner.unique.insert(key, doc.key());
        }
        inner.docs.insert(doc.key(), doc.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<D>, StoreError> {
        self.ensure_available()?;
        Ok(self.inner.read().await.docs.get(&id).cloned())
    }

    async fn find_unique(&self, key: &str) -> Result<Option<D>, StoreError> {
        self.ensure_available()?;
        let inner = self.inner.read().await;
        Ok(inner
            .unique
            .get(key)
            .and_then(|id| inner.docs.get(id))
            .cloned())
    }

    async fn list(&self, filter: &Value, slice: Slice) -> Result<Vec<D>, StoreError> {
        self.ensure_available()?;
        let inner = self.inner.read().await;

        let mut matched = Vec::new();
        for doc in inner.docs.values() {
            let value = serde_json::to_value(doc)?;
            if json_contains(&value, filter) {
                matched.push(doc.clone());
            }
        }
        sort_newest_first(&mut matched);
        Ok(slice.apply(matched))
    }

    async fn scan(&self, terms: &[String]) -> Result<Vec<D>, StoreError> {
        self.ensure_available()?;
        let terms = scan_terms(terms);
        let inner = self.inner.read().await;

        let mut matched = Vec::new();
        for doc in inner.docs.values() {
            if terms.is_empty() {
                matched.push(doc.clone());
                continue;
            }
            let text = serde_json::to_string(doc)?.to_lowercase();
            if terms.iter().any(|t| text.contains(t.as_str())) {
                matched.push(doc.clone());
            }
        }
        sort_newest_first(&mut matched);
        Ok(matched)
    }

    /// `f` runs on a copy under the write lock; the copy replaces the stored
    /// document only when `f` returns `Ok`.
    async fn modify<T, E, F>(&self, id: Uuid, mut f: F) -> Result<Option<T>, E>
    where
        T: Send,
        E: From<StoreError> + Send,
        F: FnMut(&mut D) -> Result<T, E> + Send,
    {
        self.ensure_available()?;
        let mut inner = self.inner.write().await;

        let Some(current) = inner.docs.get(&id) else {
            return Ok(None);
        };
        let old_key = current.unique_key();
        let mut draft = current.clone();
        let out = f(&mut draft)?;

        let new_key = draft.unique_key();
        if new_key != old_key {
            if let Some(key) = &new_key
                && inner.unique.get(key).is_some_and(|owner| *owner != id)
            {
                return Err(StoreError::Duplicate {
                    collection: D::COLLECTION,
                    key: key.clone(),
                }
                .into());
            }
            if let Some(key) = old_key {
                inner.unique.remove(&key);
            }
            if let Some(key) = new_key {
                inner.unique.insert(key, id);
            }
        }
        inner.docs.insert(id, draft);
        Ok(Some(out))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.ensure_available()?;
        let mut inner = self.inner.write().await;
        match inner.docs.remove(&id) {
            Some(doc) => {
                if let Some(key) = doc.unique_key() {
                    inner.unique.remove(&key);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn sort_newest_first<D: Document>(docs: &mut [D]) {
    docs.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.key().cmp(&a.key()))
    });
}
