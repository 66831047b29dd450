//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use platform::document::Slice;
use serde_json::Value;

use crate::domain::entity::{Job, Listing, Post, Product};
use crate::error::MarketResult;

/// Listing repository trait, one implementation per listing type
#[trait_variant::make(ListingRepository: Send)]
pub trait LocalListingRepository<L: Listing> {
    /// Store a new listing
    async fn create(&self, listing: &L) -> MarketResult<()>;

    /// Find listing by ID
    async fn find_by_id(&self, id: L::Id) -> MarketResult<Option<L>>;

    /// Listings containing the `filter` pattern, newest first
    async fn list(&self, filter: &Value, slice: Slice) -> MarketResult<Vec<L>>;

    /// Candidate listings for a text search (any term in the stored body)
    async fn scan(&self, terms: &[String]) -> MarketResult<Vec<L>>;

    /// Atomically update one listing
    ///
    /// The change is stored only if `f` returns `Ok`; `Ok(None)` when the
    /// listing does not exist. `f` may be called more than once.
    async fn modify<T, F>(&self, id: L::Id, f: F) -> MarketResult<Option<T>>
    where
        T: Send,
        F: FnMut(&mut L) -> MarketResult<T> + Send;

    /// Remove a listing with everything embedded in it
    async fn delete(&self, id: L::Id) -> MarketResult<bool>;
}

/// Every listing collection behind one handle, as the HTTP layer needs it
pub trait MarketRepository:
    ListingRepository<Product> + ListingRepository<Post> + ListingRepository<Job> + Send + Sync + 'static
{
}

impl<R> MarketRepository for R where
    R: ListingRepository<Product> + ListingRepository<Post> + ListingRepository<Job> + Send + Sync + 'static
{
}
