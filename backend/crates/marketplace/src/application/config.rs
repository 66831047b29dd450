//! Application Configuration
//!
//! Configuration for the Marketplace application layer.

use platform::document::Slice;

use crate::domain::filter::Page;

/// Marketplace application configuration
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Page size when the request names none
    pub default_page_size: u64,
    /// Upper bound on a requested page size
    pub max_page_size: u64,
    /// Optimistic-update attempts before a write reports contention
    pub max_update_retries: u32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            max_update_retries: 5,
        }
    }
}

impl MarketConfig {
    /// Create config for development (small pages)
    pub fn development() -> Self {
        Self {
            default_page_size: 10,
            ..Default::default()
        }
    }

    /// Resolve a page request against the configured sizes
    pub fn slice(&self, page: Page) -> Slice {
        page.to_slice(self.default_page_size, self.max_page_size)
    }
}
