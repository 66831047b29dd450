//! User Password Value Object
//!
//! Domain wrapper over `platform::password`.
//!
//! - [`RawPassword`] - clear text from a form, zeroized on drop
//! - [`UserPassword`] - the stored one-way hash; the only form ever persisted
//!
//! ```rust
//! use accounts::domain::value_object::user_password::{RawPassword, UserPassword};
//!
//! let raw = RawPassword::new("secret1".to_string()).unwrap();
//! let hashed = UserPassword::from_raw(&raw, None).unwrap();
//! assert!(hashed.verify(&RawPassword::for_verification("secret1".to_string()), None));
//! ```

use platform::password::{
    ClearTextPassword, HashedPassword, MIN_PASSWORD_LENGTH, PasswordPolicyError,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{AccountError, AccountResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Apply the password policy; the message is suitable for a form field
    pub fn new(raw: String) -> Result<Self, String> {
        ClearTextPassword::new(raw).map(Self).map_err(|e| match e {
            PasswordPolicyError::EmptyOrWhitespace => "Password is required".to_string(),
            PasswordPolicyError::TooShort { .. } => format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            ),
            PasswordPolicyError::TooLong { max, .. } => {
                format!("Password must be at most {} characters", max)
            }
            PasswordPolicyError::InvalidCharacter => {
                "Password contains invalid characters".to_string()
            }
        })
    }

    /// Candidate for comparison only (no policy)
    pub fn for_verification(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

// ============================================================================
// User Password (Stored hash)
// ============================================================================

/// Hashed password (PHC string)
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password with a fresh salt
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AccountResult<Self> {
        raw.0
            .hash(pepper)
            .map(Self)
            .map_err(|e| AccountError::Internal(e.to_string()))
    }

    /// Constant-time verification; a corrupt stored hash never verifies
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(&raw.0, pepper)
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPassword([HASH])")
    }
}

impl Serialize for UserPassword {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.as_phc_string())
    }
}

impl<'de> Deserialize<'de> for UserPassword {
    /// Lenient: a damaged hash still loads (and then fails verification)
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|s| Self(HashedPassword::from_stored(s)))
    }
}
