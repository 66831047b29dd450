//! Update Profile Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::validator::{ProfilePatchInput, validate_profile_patch};
use crate::error::{AccountError, AccountResult};

/// Update profile use case
pub struct UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: UserId, input: ProfilePatchInput) -> AccountResult<User> {
        let patch = validate_profile_patch(input)?;

        let user = self
            .user_repo
            .modify(user_id, |user| {
                user.apply_profile(patch.clone());
                Ok(user.clone())
            })
            .await?
            .ok_or(AccountError::UserNotFound)?;

        tracing::info!(user_id = %user_id, "Profile updated");

        Ok(user)
    }
}
