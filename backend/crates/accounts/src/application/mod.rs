//! Application Layer
//!
//! Use cases and application services.

pub mod change_password;
pub mod config;
pub mod get_profile;
pub mod register;
pub mod sign_in;
pub mod update_profile;

// Re-exports
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use config::AccountsConfig;
pub use get_profile::GetProfileUseCase;
pub use register::RegisterUseCase;
pub use sign_in::{SignInInput, SignInUseCase};
pub use update_profile::UpdateProfileUseCase;
