//! User Entity
//!
//! Account aggregate: profile, credential hash, bookmarks and the seller
//! rating derived from reviews on the user's products.
//!
//! The password field can only be written through [`User::new`] and
//! [`User::set_password`], both of which hash immediately; no other update
//! path touches it.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::document::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::saved_item::{SavedItem, SavedItemType};
use crate::domain::validator::{ProfilePatch, Registration};
use crate::domain::value_object::{Email, MobileNumber, RawPassword, UserPassword, UserType};
use crate::error::AccountResult;

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Canonical (trimmed, lowercased) and unique
    pub email: Email,
    password: UserPassword,
    #[serde(default)]
    pub mobile: Option<MobileNumber>,
    pub location: String,
    #[serde(default)]
    pub user_type: UserType,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    saved_items: Vec<SavedItem>,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    review_count: u32,
    #[serde(default)]
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user from a validated registration, hashing the password
    pub fn new(registration: Registration, pepper: Option<&[u8]>) -> AccountResult<Self> {
        let now = Utc::now();
        let password = UserPassword::from_raw(&registration.password, pepper)?;

        Ok(Self {
            id: UserId::new(),
            name: registration.name,
            email: registration.email,
            password,
            mobile: registration.mobile,
            location: registration.location,
            user_type: registration.user_type,
            profile_picture: None,
            bio: None,
            saved_items: Vec::new(),
            rating: 0.0,
            review_count: 0,
            is_verified: false,
            created_at: now,
            updated_at: now,
        })
    }

    // ========================================================================
    // Credentials
    // ========================================================================

    /// Replace the password (hashed before it is stored)
    pub fn set_password(&mut self, raw: &RawPassword, pepper: Option<&[u8]>) -> AccountResult<()> {
        self.password = UserPassword::from_raw(raw, pepper)?;
        self.touch();
        Ok(())
    }

    pub fn verify_password(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.password.verify(raw, pepper)
    }

    pub fn password_hash(&self) -> &str {
        self.password.as_phc_string()
    }

    // ========================================================================
    // Profile
    // ========================================================================

    /// Apply a validated profile patch (never touches credentials)
    pub fn apply_profile(&mut self, patch: ProfilePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(mobile) = patch.mobile {
            self.mobile = mobile;
        }
        if let Some(bio) = patch.bio {
            self.bio = bio;
        }
        if let Some(picture) = patch.profile_picture {
            self.profile_picture = picture;
        }
        if let Some(user_type) = patch.user_type {
            self.user_type = user_type;
        }
        self.touch();
    }

    // ========================================================================
    // Saved items
    // ========================================================================

    pub fn saved_items(&self) -> &[SavedItem] {
        &self.saved_items
    }

    pub fn saved_items_of(&self, item_type: SavedItemType) -> impl Iterator<Item = &SavedItem> {
        self.saved_items
            .iter()
            .filter(move |item| item.item_type() == item_type)
    }

    /// Append a bookmark; `false` if it was already saved
    pub fn save_item(&mut self, item: SavedItem) -> bool {
        if self.saved_items.contains(&item) {
            return false;
        }
        self.saved_items.push(item);
        self.touch();
        true
    }

    /// Remove a bookmark; `false` if it was not saved
    pub fn remove_item(&mut self, item: &SavedItem) -> bool {
        let before = self.saved_items.len();
        self.saved_items.retain(|saved| saved != item);
        let removed = self.saved_items.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    // ========================================================================
    // Seller rating
    // ========================================================================

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn review_count(&self) -> u32 {
        self.review_count
    }

    /// Record the aggregate over all reviews of this seller's products
    pub fn record_seller_rating(&mut self, average: f64, count: u32) {
        self.rating = if count == 0 { 0.0 } else { average };
        self.review_count = count;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn key(&self) -> Uuid {
        self.id.into_uuid()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.as_str().to_string())
    }
}
