//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and the requester extractor.

pub mod current_user;
pub mod dto;
pub mod handlers;
pub mod router;

pub use current_user::CurrentUser;
pub use handlers::AccountsAppState;
pub use router::accounts_router;
