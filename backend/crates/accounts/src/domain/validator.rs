//! User Validator
//!
//! Pure functions from a raw field set to either a validated value or a
//! field → message map. Missing and blank strings are treated alike.

use kernel::validation::{FieldErrors, non_blank, optional_text, parse_code, require_text};

use crate::domain::value_object::{Email, MobileNumber, RawPassword, UserType};

const MOBILE_MESSAGE: &str = "Please enter a valid 10-digit mobile number";
const USER_TYPE_MESSAGE: &str = "User type must be one of: farmer, buyer, expert";

// ============================================================================
// Registration
// ============================================================================

/// Registration form as received
#[derive(Debug, Default, Clone)]
pub struct RegistrationInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub mobile: Option<String>,
    pub location: Option<String>,
    pub user_type: Option<String>,
}

/// Validated registration
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: Email,
    pub password: RawPassword,
    pub mobile: Option<MobileNumber>,
    pub location: String,
    pub user_type: UserType,
}

pub fn validate_registration(input: RegistrationInput) -> Result<Registration, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = require_text(&mut errors, "name", input.name.as_deref(), "Name is required");
    let location = require_text(
        &mut errors,
        "location",
        input.location.as_deref(),
        "Location is required",
    );

    let email = match non_blank(input.email.as_deref()) {
        None => {
            errors.add("email", "Email is required");
            None
        }
        Some(raw) => {
            let parsed = Email::parse(raw);
            if parsed.is_none() {
                errors.add("email", "Please enter a valid email address");
            }
            parsed
        }
    };

    let password = match input.password {
        Some(raw) => match RawPassword::new(raw) {
            Ok(p) => Some(p),
            Err(message) => {
                errors.add("password", message);
                None
            }
        },
        None => {
            errors.add("password", "Password is required");
            None
        }
    };

    let mobile = parse_mobile(&mut errors, input.mobile.as_deref());

    let user_type = parse_code(
        &mut errors,
        "userType",
        input.user_type.as_deref(),
        Some(UserType::default()),
        UserType::from_code,
        USER_TYPE_MESSAGE,
    );

    match (name, email, password, location, user_type) {
        (Some(name), Some(email), Some(password), Some(location), Some(user_type))
            if errors.is_empty() =>
        {
            Ok(Registration {
                name,
                email,
                password,
                mobile: mobile.flatten(),
                location,
                user_type,
            })
        }
        _ => Err(errors),
    }
}

// ============================================================================
// Profile patch
// ============================================================================

/// Profile edit as received; absent fields are left unchanged
#[derive(Debug, Default, Clone)]
pub struct ProfilePatchInput {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub location: Option<String>,
    pub user_type: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

/// Validated profile edit
///
/// `Some(None)` clears an optional field.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub mobile: Option<Option<MobileNumber>>,
    pub location: Option<String>,
    pub user_type: Option<UserType>,
    pub bio: Option<Option<String>>,
    pub profile_picture: Option<Option<String>>,
}

pub fn validate_profile_patch(input: ProfilePatchInput) -> Result<ProfilePatch, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut patch = ProfilePatch::default();

    if input.name.is_some() {
        patch.name = require_text(&mut errors, "name", input.name.as_deref(), "Name is required");
    }
    if input.location.is_some() {
        patch.location = require_text(
            &mut errors,
            "location",
            input.location.as_deref(),
            "Location is required",
        );
    }
    if input.mobile.is_some() {
        patch.mobile = parse_mobile(&mut errors, input.mobile.as_deref());
    }
    if input.user_type.is_some() {
        patch.user_type = parse_code(
            &mut errors,
            "userType",
            input.user_type.as_deref(),
            None,
            UserType::from_code,
            USER_TYPE_MESSAGE,
        );
    }
    if input.bio.is_some() {
        patch.bio = Some(optional_text(input.bio.as_deref()));
    }
    if input.profile_picture.is_some() {
        patch.profile_picture = Some(optional_text(input.profile_picture.as_deref()));
    }

    errors.into_result(patch)
}

/// Optional mobile: blank clears (`Some(None)`), anything else must be valid
fn parse_mobile(errors: &mut FieldErrors, raw: Option<&str>) -> Option<Option<MobileNumber>> {
    match non_blank(raw) {
        None => Some(None),
        Some(value) => match MobileNumber::parse(value) {
            Some(m) => Some(Some(m)),
            None => {
                errors.add("mobile", MOBILE_MESSAGE);
                None
            }
        },
    }
}
