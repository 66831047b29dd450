//! Review Aggregator
//!
//! Appending or removing a review recomputes the product's average inside
//! the same document update. The seller's rating over all of their
//! products is refreshed afterwards.

use std::sync::Arc;

use accounts::UserRepository;
use kernel::id::{ProductId, UserId};
use platform::document::Slice;
use serde_json::json;

use crate::domain::entity::{Product, Review};
use crate::domain::repository::ListingRepository;
use crate::domain::validator::{ReviewInput, validate_review};
use crate::error::{MarketError, MarketResult};

/// Outcome of a review mutation
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub product: Product,
    pub review: Review,
}

/// Review aggregator use case
pub struct ReviewService<P, U>
where
    P: ListingRepository<Product>,
    U: UserRepository,
{
    products: Arc<P>,
    users: Arc<U>,
}

impl<P, U> ReviewService<P, U>
where
    P: ListingRepository<Product> + Sync,
    U: UserRepository + Sync,
{
    pub fn new(products: Arc<P>, users: Arc<U>) -> Self {
        Self { products, users }
    }

    /// Append a review by `user` and return the product with its new average
    pub async fn add(&self, product_id: ProductId, user: UserId, input: ReviewInput) -> MarketResult<ReviewOutcome> {
        let (rating, text) = validate_review(input)?;

        let outcome = self
            .products
            .modify(product_id, |product| {
                product.add_review(user, rating, text.clone());
                let review = product.reviews().last().cloned().ok_or_else(|| {
                    MarketError::Internal("review missing after append".to_string())
                })?;
                Ok(ReviewOutcome {
                    product: product.clone(),
                    review,
                })
            })
            .await?
            .ok_or(MarketError::NotFound("Product"))?;

        tracing::info!(
            product_id = %product_id,
            rating = %rating,
            average = outcome.product.average_rating(),
            "Review added"
        );

        self.refresh_seller_rating(outcome.product.seller).await;

        Ok(outcome)
    }

    /// Remove the review at `index`; the reviewer or the seller may do so
    ///
    /// The review is pinned by its key before the update, so a retried
    /// update never removes whichever review slid into `index`.
    pub async fn remove(&self, product_id: ProductId, index: usize, requester: UserId) -> MarketResult<ReviewOutcome> {
        let key = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or(MarketError::NotFound("Product"))?
            .review_key(index)?;

        let outcome = self
            .products
            .modify(product_id, |product| {
                let review = product.remove_review(index, key, requester)?;
                Ok(ReviewOutcome {
                    product: product.clone(),
                    review,
                })
            })
            .await?
            .ok_or(MarketError::NotFound("Product"))?;

        tracing::info!(product_id = %product_id, index, "Review removed");

        self.refresh_seller_rating(outcome.product.seller).await;

        Ok(outcome)
    }

    /// Recompute the seller's rating and review count from all their products
    ///
    /// The review itself is already stored; a failure here is logged and
    /// repaired by the next review mutation for the same seller.
    async fn refresh_seller_rating(&self, seller: UserId) {
        if let Err(err) = self.try_refresh_seller_rating(seller).await {
            tracing::warn!(seller = %seller, error = %err, "Seller rating refresh failed");
        }
    }

    async fn try_refresh_seller_rating(&self, seller: UserId) -> MarketResult<()> {
        let products = self
            .products
            .list(&json!({ "seller": seller }), Slice::all())
            .await?;

        let (sum, count) = products
            .iter()
            .map(Product::review_totals)
            .fold((0u32, 0u32), |(s, c), (ps, pc)| (s + ps, c + pc));
        let average = if count == 0 {
            0.0
        } else {
            f64::from(sum) / f64::from(count)
        };

        let updated = self
            .users
            .modify(seller, |user| {
                user.record_seller_rating(average, count);
                Ok(())
            })
            .await?;

        if updated.is_none() {
            tracing::debug!(seller = %seller, "Seller has no account; rating not stored");
        }
        Ok(())
    }
}
