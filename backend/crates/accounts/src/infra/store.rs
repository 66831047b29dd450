//! User Repository Implementation
//!
//! One implementation, generic over the document backend: PostgreSQL in
//! production, in-memory when no database is configured and in tests.

use kernel::id::UserId;
use platform::document::{DocumentStore, MemoryCollection, PgCollection};
use sqlx::PgPool;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::Email;
use crate::error::AccountResult;

/// Document-backed user repository
pub struct AccountStore<S> {
    users: S,
}

impl<S: Clone> Clone for AccountStore<S> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
        }
    }
}

/// In-memory repository
pub type MemoryAccountRepository = AccountStore<MemoryCollection<User>>;

/// PostgreSQL-backed repository
pub type PgAccountRepository = AccountStore<PgCollection<User>>;

impl AccountStore<MemoryCollection<User>> {
    pub fn memory() -> Self {
        Self {
            users: MemoryCollection::new(),
        }
    }

    /// Toggle simulated storage outage
    pub fn set_available(&self, available: bool) {
        self.users.set_available(available);
    }
}

impl AccountStore<PgCollection<User>> {
    pub fn postgres(pool: PgPool, max_retries: u32) -> Self {
        Self {
            users: PgCollection::new(pool).with_max_retries(max_retries),
        }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl<S> UserRepository for AccountStore<S>
where
    S: DocumentStore<User> + Sync,
{
    async fn create(&self, user: &User) -> AccountResult<()> {
        self.users.insert(user).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> AccountResult<Option<User>> {
        Ok(self.users.get(id.into_uuid()).await?)
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<User>> {
        Ok(self.users.find_unique(email.as_str()).await?)
    }

    async fn modify<T, F>(&self, id: UserId, f: F) -> AccountResult<Option<T>>
    where
        T: Send,
        F: FnMut(&mut User) -> AccountResult<T> + Send,
    {
        self.users.modify(id.into_uuid(), f).await
    }
}
