//! Value Object Module

pub mod email;
pub mod mobile_number;
pub mod user_password;
pub mod user_type;

pub use email::Email;
pub use mobile_number::MobileNumber;
pub use user_password::{RawPassword, UserPassword};
pub use user_type::UserType;
