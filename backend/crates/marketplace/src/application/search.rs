//! Cross-listing Search
//!
//! Each listing type is searched on its own field set and ranked on its
//! own; results are never ranked across types.

use std::sync::Arc;

use platform::document::Slice;
use serde_json::json;

use crate::application::listing;
use crate::domain::entity::{Job, Post, Product};
use crate::domain::repository::ListingRepository;
use crate::domain::search::SearchQuery;
use crate::error::MarketResult;

/// Per-type search results
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub products: Vec<Product>,
    pub posts: Vec<Post>,
    pub jobs: Vec<Job>,
}

/// Search projection use case
pub struct SearchService<P, Q, J>
where
    P: ListingRepository<Product>,
    Q: ListingRepository<Post>,
    J: ListingRepository<Job>,
{
    products: Arc<P>,
    posts: Arc<Q>,
    jobs: Arc<J>,
}

impl<P, Q, J> SearchService<P, Q, J>
where
    P: ListingRepository<Product> + Sync,
    Q: ListingRepository<Post> + Sync,
    J: ListingRepository<Job> + Sync,
{
    pub fn new(products: Arc<P>, posts: Arc<Q>, jobs: Arc<J>) -> Self {
        Self { products, posts, jobs }
    }

    /// Search every listing type for `q`; a blank query returns everything,
    /// newest first
    pub async fn search_across(&self, q: Option<&str>) -> MarketResult<SearchResults> {
        let everything = json!({});

        let products = listing::browse(
            self.products.as_ref(),
            &everything,
            &SearchQuery::parse::<Product>(q, None)?,
            Slice::all(),
        )
        .await?;
        let posts = listing::browse(
            self.posts.as_ref(),
            &everything,
            &SearchQuery::parse::<Post>(q, None)?,
            Slice::all(),
        )
        .await?;
        let jobs = listing::browse(
            self.jobs.as_ref(),
            &everything,
            &SearchQuery::parse::<Job>(q, None)?,
            Slice::all(),
        )
        .await?;

        tracing::debug!(
            products = products.len(),
            posts = posts.len(),
            jobs = jobs.len(),
            "Cross-listing search"
        );

        Ok(SearchResults { products, posts, jobs })
    }
}
