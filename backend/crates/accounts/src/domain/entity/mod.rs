//! Entity Module

pub mod saved_item;
pub mod user;

pub use saved_item::{SavedItem, SavedItemType};
pub use user::User;
