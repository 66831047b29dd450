//! Listing Repository Implementation
//!
//! One store holding the product, post and job collections, generic over
//! the document backend: PostgreSQL in production, in-memory when no
//! database is configured and in tests.

use kernel::id::{JobId, PostId, ProductId};
use platform::document::{DocumentStore, MemoryCollection, PgCollection, Slice};
use serde_json::Value;
use sqlx::PgPool;

use crate::domain::entity::{Job, Post, Product};
use crate::domain::repository::ListingRepository;
use crate::error::MarketResult;

/// Document-backed listing repository
pub struct MarketStore<P, Q, J> {
    products: P,
    posts: Q,
    jobs: J,
}

impl<P: Clone, Q: Clone, J: Clone> Clone for MarketStore<P, Q, J> {
    fn clone(&self) -> Self {
        Self {
            products: self.products.clone(),
            posts: self.posts.clone(),
            jobs: self.jobs.clone(),
        }
    }
}

/// In-memory repository
pub type MemoryMarketRepository =
    MarketStore<MemoryCollection<Product>, MemoryCollection<Post>, MemoryCollection<Job>>;

/// PostgreSQL-backed repository
pub type PgMarketRepository = MarketStore<PgCollection<Product>, PgCollection<Post>, PgCollection<Job>>;

impl MemoryMarketRepository {
    pub fn memory() -> Self {
        Self {
            products: MemoryCollection::new(),
            posts: MemoryCollection::new(),
            jobs: MemoryCollection::new(),
        }
    }

    /// Toggle simulated storage outage on every collection
    pub fn set_available(&self, available: bool) {
        self.products.set_available(available);
        self.posts.set_available(available);
        self.jobs.set_available(available);
    }
}

impl PgMarketRepository {
    pub fn postgres(pool: PgPool, max_retries: u32) -> Self {
        Self {
            products: PgCollection::new(pool.clone()).with_max_retries(max_retries),
            posts: PgCollection::new(pool.clone()).with_max_retries(max_retries),
            jobs: PgCollection::new(pool).with_max_retries(max_retries),
        }
    }
}

// ============================================================================
// Listing Repository Implementations
// ============================================================================

macro_rules! listing_repository {
    ($listing:ty, $id:ty, $field:ident, $store:ident) => {
        impl<P, Q, J> ListingRepository<$listing> for MarketStore<P, Q, J>
        where
            P: Send + Sync,
            Q: Send + Sync,
            J: Send + Sync,
            $store: DocumentStore<$listing> + Sync,
        {
            async fn create(&self, listing: &$listing) -> MarketResult<()> {
                self.$field.insert(listing).await?;
                Ok(())
            }

            async fn find_by_id(&self, id: $id) -> MarketResult<Option<$listing>> {
                Ok(self.$field.get(id.into_uuid()).await?)
            }

            async fn list(&self, filter: &Value, slice: Slice) -> MarketResult<Vec<$listing>> {
                Ok(self.$field.list(filter, slice).await?)
            }

            async fn scan(&self, terms: &[String]) -> MarketResult<Vec<$listing>> {
                Ok(self.$field.scan(terms).await?)
            }

            async fn modify<T, F>(&self, id: $id, f: F) -> MarketResult<Option<T>>
            where
                T: Send,
                F: FnMut(&mut $listing) -> MarketResult<T> + Send,
            {
                self.$field.modify(id.into_uuid(), f).await
            }

            async fn delete(&self, id: $id) -> MarketResult<bool> {
                Ok(self.$field.delete(id.into_uuid()).await?)
            }
        }
    };
}

listing_repository!(Product, ProductId, products, P);
listing_repository!(Post, PostId, posts, Q);
listing_repository!(Job, JobId, jobs, J);
