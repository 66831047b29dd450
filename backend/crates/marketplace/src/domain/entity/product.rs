//! Product Entity
//!
//! A marketplace listing with its embedded reviews. `average_rating` is
//! derived: it is recomputed in full whenever the review list changes, in
//! the same mutation, so a stored product never disagrees with itself.

use accounts::domain::value_object::MobileNumber;
use chrono::{DateTime, Utc};
use kernel::id::{ProductId, UserId};
use platform::document::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Listing;
use crate::domain::validator::ProductDraft;
use crate::domain::value_objects::{ProductCategory, ProductStatus, Rating, Unit};
use crate::error::{MarketError, MarketResult};

/// One buyer's review, owned by the product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub user: UserId,
    pub rating: Rating,
    #[serde(default)]
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Stable identity of a review; positions shift as reviews are removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewKey {
    pub user: UserId,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn key(&self) -> ReviewKey {
        ReviewKey {
            user: self.user,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub seller: UserId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: ProductCategory,
    pub location: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub quantity: f64,
    pub unit: Unit,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    reviews: Vec<Review>,
    #[serde(default)]
    average_rating: f64,
    #[serde(default)]
    pub is_negotiable: bool,
    #[serde(default)]
    pub contact_phone: Option<MobileNumber>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(seller: UserId, draft: ProductDraft) -> Self {
        let now = Utc::now();
        Self {
            id: ProductId::new(),
            seller,
            title: draft.title,
            description: draft.description,
            price: draft.price,
            category: draft.category,
            location: draft.location,
            images: draft.images,
            quantity: draft.quantity,
            unit: draft.unit,
            status: draft.status,
            reviews: Vec::new(),
            average_rating: 0.0,
            is_negotiable: draft.is_negotiable,
            contact_phone: draft.contact_phone,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields with a validated draft
    ///
    /// Seller, reviews and rating are not part of a draft and stay as they are.
    pub fn apply(&mut self, draft: ProductDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.price = draft.price;
        self.category = draft.category;
        self.location = draft.location;
        self.images = draft.images;
        self.quantity = draft.quantity;
        self.unit = draft.unit;
        self.status = draft.status;
        self.is_negotiable = draft.is_negotiable;
        self.contact_phone = draft.contact_phone;
        self.touch();
    }

    // ========================================================================
    // Reviews
    // ========================================================================

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn average_rating(&self) -> f64 {
        self.average_rating
    }

    /// Append a review and return the new average
    pub fn add_review(&mut self, user: UserId, rating: Rating, text: Option<String>) -> f64 {
        self.reviews.push(Review {
            user,
            rating,
            text,
            created_at: Utc::now(),
        });
        self.recompute_average();
        self.touch();
        self.average_rating
    }

    /// Key of the review currently at `index`
    pub fn review_key(&self, index: usize) -> MarketResult<ReviewKey> {
        self.reviews
            .get(index)
            .map(Review::key)
            .ok_or(MarketError::NotFound("Review"))
    }

    /// Remove the review matching `key`; its author or the seller may do so
    ///
    /// `index` is only a hint. If the review there no longer carries `key`
    /// the list is searched, and a key that is gone is `NotFound`.
    pub fn remove_review(&mut self, index: usize, key: ReviewKey, requester: UserId) -> MarketResult<Review> {
        let index = match self.reviews.get(index) {
            Some(review) if review.key() == key => index,
            _ => self
                .reviews
                .iter()
                .position(|review| review.key() == key)
                .ok_or(MarketError::NotFound("Review"))?,
        };

        let review = &self.reviews[index];
        if review.user != requester && self.seller != requester {
            return Err(MarketError::Forbidden(
                "Only the reviewer or the seller may remove a review".to_string(),
            ));
        }

        let removed = self.reviews.remove(index);
        self.recompute_average();
        self.touch();
        Ok(removed)
    }

    /// Full recomputation; never incremental
    fn recompute_average(&mut self) {
        let (sum, count) = self.review_totals();
        self.average_rating = if count == 0 {
            0.0
        } else {
            f64::from(sum) / f64::from(count)
        };
    }

    /// Sum of stars and number of reviews, for the seller aggregate
    pub fn review_totals(&self) -> (u32, u32) {
        let sum = self.reviews.iter().map(|r| u32::from(r.rating.stars())).sum();
        (sum, self.reviews.len() as u32)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Document for Product {
    const COLLECTION: &'static str = "products";

    fn key(&self) -> Uuid {
        self.id.into_uuid()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Listing for Product {
    type Id = ProductId;
    const NAME: &'static str = "Product";

    fn id(&self) -> ProductId {
        self.id
    }

    fn owner(&self) -> UserId {
        self.seller
    }
}
