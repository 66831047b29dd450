//! Infrastructure Layer
//!
//! Document-store implementation of the listing repositories.

pub mod store;

pub use store::{MarketStore, MemoryMarketRepository, PgMarketRepository};
