//! Domain Layer
//!
//! This layer contains:
//! - Listing aggregates (Product, Post, Job) and their embedded children
//! - Value objects (categories, units, statuses, rating, salary)
//! - Entity validators
//! - Filters and the search projection
//! - Repository traits (interfaces)

pub mod entity;
pub mod filter;
pub mod repository;
pub mod search;
pub mod validator;
pub mod value_objects;

// Re-exports
pub use entity::{Job, Listing, Post, Product};
pub use repository::{ListingRepository, MarketRepository};
