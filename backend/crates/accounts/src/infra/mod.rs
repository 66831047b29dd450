//! Infrastructure Layer
//!
//! Repository implementations over `platform::document` stores.

pub mod store;

pub use store::{AccountStore, MemoryAccountRepository, PgAccountRepository};
