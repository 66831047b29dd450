//! User Type Value Object

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Kind of account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    #[display("farmer")]
    Farmer,
    #[display("buyer")]
    Buyer,
    #[display("expert")]
    Expert,
}

impl UserType {
    /// Get string code for serialization/API
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Farmer => "farmer",
            Self::Buyer => "buyer",
            Self::Expert => "expert",
        }
    }

    /// Create from string code (exact, case-sensitive)
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "farmer" => Some(Self::Farmer),
            "buyer" => Some(Self::Buyer),
            "expert" => Some(Self::Expert),
            _ => None,
        }
    }
}
