//! Change Password Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AccountsConfig;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::RawPassword;
use crate::error::{AccountError, AccountResult};

/// Change password input
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

/// Change password use case
pub struct ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AccountsConfig>,
}

impl<U> ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AccountsConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, user_id: UserId, input: ChangePasswordInput) -> AccountResult<()> {
        let new_password = RawPassword::new(input.new_password)
            .map_err(|message| AccountError::invalid("newPassword", &message))?;
        let current = RawPassword::for_verification(input.current_password);
        let pepper = self.config.pepper();

        self.user_repo
            .modify(user_id, |user| {
                if !user.verify_password(&current, pepper) {
                    return Err(AccountError::InvalidCredentials);
                }
                user.set_password(&new_password, pepper)
            })
            .await?
            .ok_or(AccountError::UserNotFound)?;

        tracing::info!(user_id = %user_id, "Password changed");

        Ok(())
    }
}
