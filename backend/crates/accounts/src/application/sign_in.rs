//! Sign In Use Case
//!
//! Verifies credentials and returns the account. Session issuance belongs to
//! the upstream session layer.

use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, RawPassword};
use crate::error::{AccountError, AccountResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AccountsConfig>,
}

impl<U> SignInUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AccountsConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: SignInInput) -> AccountResult<User> {
        let email = Email::parse(&input.email).ok_or(AccountError::InvalidCredentials)?;
        let password = RawPassword::for_verification(input.password);

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !user.verify_password(&password, self.config.pepper()) {
            return Err(AccountError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User signed in");

        Ok(user)
    }
}
