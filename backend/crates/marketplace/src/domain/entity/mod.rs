//! Entity Module
//!
//! Listing aggregates. Each one owns its embedded children (reviews,
//! comments, applicants) and is persisted as a single document.

pub mod job;
pub mod post;
pub mod product;

pub use job::{Applicant, ApplicantContact, Job};
pub use post::{Comment, Post};
pub use product::{Product, Review, ReviewKey};

use std::fmt;

use kernel::id::UserId;
use platform::document::Document;
use uuid::Uuid;

use crate::error::{MarketError, MarketResult};

/// Something a user posts and alone may edit
pub trait Listing: Document {
    type Id: Copy + Send + Sync + fmt::Display + Into<Uuid> + 'static;

    /// Singular name for messages ("Product", "Post", "Job")
    const NAME: &'static str;

    fn id(&self) -> Self::Id;

    /// Seller, author or employer
    fn owner(&self) -> UserId;

    /// `Forbidden` unless `requester` owns this listing
    fn ensure_owner(&self, requester: UserId) -> MarketResult<()> {
        if self.owner() == requester {
            Ok(())
        } else {
            Err(MarketError::Forbidden(format!(
                "Only the owner may modify this {}",
                Self::NAME.to_lowercase()
            )))
        }
    }
}
