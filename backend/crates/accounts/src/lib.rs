//! Accounts Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User aggregate, value objects, validator, repository trait
//! - `application/` - Use cases
//! - `infra/` - Document-store repository (PostgreSQL or in-memory)
//! - `presentation/` - HTTP handlers, DTOs, router, requester extractor
//!
//! ## Features
//! - Registration with email (unique, case-insensitive) and password
//! - Sign in, change password, profile edits
//! - Saved-item bookmarks and seller rating storage on the user document
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, random salt per password
//! - The hash is written only through `User::new` / `User::set_password`
//! - Unknown email and wrong password are indistinguishable to callers

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AccountsConfig;
pub use domain::repository::UserRepository;
pub use error::{AccountError, AccountResult};
pub use infra::store::{AccountStore, MemoryAccountRepository, PgAccountRepository};
pub use presentation::current_user::CurrentUser;
pub use presentation::router::accounts_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
