//! Application Configuration
//!
//! Configuration for the Accounts application layer.

/// Accounts application configuration
#[derive(Debug, Clone, Default)]
pub struct AccountsConfig {
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl AccountsConfig {
    /// Config with a pepper
    pub fn with_pepper(pepper: Vec<u8>) -> Self {
        Self {
            password_pepper: Some(pepper),
        }
    }

    /// Create config for development (no pepper)
    pub fn development() -> Self {
        Self::default()
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
