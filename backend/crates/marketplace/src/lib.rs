//! Marketplace Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Product, Post and Job aggregates, validators, filters,
//!   search projection, repository traits
//! - `application/` - Listing services, review aggregator, application
//!   subsystem, saved items, cross-listing search
//! - `infra/` - Document-store repository (PostgreSQL or in-memory)
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Consistency
//! - Reviews, comments and applicants are embedded in their listing; each
//!   listing document is the unit of mutation
//! - Every change to a listing is one atomic read-modify-write, so the
//!   product average always agrees with its reviews and a user holds at
//!   most one application per job
//! - Only the owner (seller, author, employer) may edit or delete a listing

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::MarketConfig;
pub use domain::repository::{ListingRepository, MarketRepository};
pub use error::{MarketError, MarketResult};
pub use infra::store::{MarketStore, MemoryMarketRepository, PgMarketRepository};
pub use presentation::router::marketplace_router;
