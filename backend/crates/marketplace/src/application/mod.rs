//! Application Layer
//!
//! Use cases and application services.

pub mod applications;
pub mod config;
pub mod job;
mod listing;
pub mod post;
pub mod product;
pub mod review;
pub mod saved_item;
pub mod search;

// Re-exports
pub use applications::ApplicationService;
pub use config::MarketConfig;
pub use job::JobService;
pub use post::PostService;
pub use product::ProductService;
pub use review::{ReviewOutcome, ReviewService};
pub use saved_item::{SavedEntry, SavedItemService};
pub use search::{SearchResults, SearchService};
