//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::value_object::Email;
use crate::error::AccountResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user; `EmailTaken` if the canonical email exists
    async fn create(&self, user: &User) -> AccountResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> AccountResult<Option<User>>;

    /// Find user by canonical email
    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<User>>;

    /// Atomically update one user
    ///
    /// The change is stored only if `f` returns `Ok`; `Ok(None)` when the
    /// user does not exist. `f` may be called more than once.
    async fn modify<T, F>(&self, id: UserId, f: F) -> AccountResult<Option<T>>
    where
        T: Send,
        F: FnMut(&mut User) -> AccountResult<T> + Send;
}
