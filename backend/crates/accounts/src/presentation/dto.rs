//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::saved_item::SavedItem;
use crate::domain::entity::user::User;
use crate::domain::validator::{ProfilePatchInput, RegistrationInput};

// ============================================================================
// Register
// ============================================================================

/// Register request
///
/// Every field is optional at the wire level so the validator can report
/// all missing fields at once.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub mobile: Option<String>,
    pub location: Option<String>,
    pub user_type: Option<String>,
}

impl From<RegisterRequest> for RegistrationInput {
    fn from(req: RegisterRequest) -> Self {
        RegistrationInput {
            name: req.name,
            email: req.email,
            password: req.password,
            mobile: req.mobile,
            location: req.location,
            user_type: req.user_type,
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Profile
// ============================================================================

/// Profile update request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub location: Option<String>,
    pub user_type: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

impl From<UpdateProfileRequest> for ProfilePatchInput {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfilePatchInput {
            name: req.name,
            mobile: req.mobile,
            location: req.location,
            user_type: req.user_type,
            bio: req.bio,
            profile_picture: req.profile_picture,
        }
    }
}

/// Change password request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Public profile (never includes the password hash)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub location: String,
    pub user_type: String,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub saved_items: Vec<SavedItem>,
    pub rating: f64,
    pub review_count: u32,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.to_string(),
            mobile: user.mobile.as_ref().map(|m| m.to_string()),
            location: user.location.clone(),
            user_type: user.user_type.code().to_string(),
            profile_picture: user.profile_picture.clone(),
            bio: user.bio.clone(),
            saved_items: user.saved_items().to_vec(),
            rating: user.rating(),
            review_count: user.review_count(),
            is_verified: user.is_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
