//! Register Use Case
//!
//! Creates a new user account.

use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::validator::{RegistrationInput, validate_registration};
use crate::error::{AccountError, AccountResult};

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AccountsConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AccountsConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: RegistrationInput) -> AccountResult<User> {
        let registration = validate_registration(input)?;

        // Fast path; the unique key on insert is what actually guarantees it
        if self
            .user_repo
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(AccountError::EmailTaken);
        }

        let user = User::new(registration, self.config.pepper())?;
        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.id,
            user_type = %user.user_type,
            "User registered"
        );

        Ok(user)
    }
}
