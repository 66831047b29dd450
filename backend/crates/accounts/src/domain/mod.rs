//! Domain Layer
//!
//! Contains entities, value objects, the user validator and the repository trait.

pub mod entity;
pub mod repository;
pub mod validator;
pub mod value_object;

// Re-exports
pub use entity::{SavedItem, SavedItemType, User};
pub use repository::UserRepository;
