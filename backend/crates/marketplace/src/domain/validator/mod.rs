//! Entity Validators
//!
//! Pure functions from a raw field set to either a typed draft or a
//! field → message map. Expected invalid input is a normal return value.
//!
//! Updates are validated the same way as creation: the stored listing is
//! turned back into an input, the patch is laid over it, and the merged
//! whole is checked. Only the creation-form extras (images, contact phone)
//! differ by [`Mode`].

pub mod application;
pub mod job;
pub mod post;
pub mod product;

pub use application::{ApplicantContactInput, ApplicationForm, ApplyInput, validate_application};
pub use job::{JobDraft, JobInput, SalaryInput, validate_job};
pub use post::{CommentInput, PostDraft, PostInput, validate_comment, validate_post};
pub use product::{ProductDraft, ProductInput, ReviewInput, validate_product, validate_review};

use kernel::validation::{FieldErrors, NumberInput};

/// Which flow the input comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

/// Outcome of reading a numeric form field
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum NumberField {
    Missing,
    Invalid,
    Value(f64),
}

pub(crate) fn read_number(value: Option<&NumberInput>) -> NumberField {
    match value {
        None => NumberField::Missing,
        Some(NumberInput::Text(s)) if s.trim().is_empty() => NumberField::Missing,
        Some(n) => match n.parse() {
            Some(v) => NumberField::Value(v),
            None => NumberField::Invalid,
        },
    }
}

/// Trim every entry and drop the blank ones
pub(crate) fn clean_list(values: Option<Vec<String>>) -> Vec<String> {
    values
        .unwrap_or_default()
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Patch overlay: the patch's value wins when present
#[inline]
pub(crate) fn overlay<T>(base: Option<T>, patch: Option<T>) -> Option<T> {
    patch.or(base)
}

/// The built draft when nothing was recorded; `build` only runs then
pub(crate) fn finish<T>(
    errors: FieldErrors,
    build: impl FnOnce() -> Option<T>,
) -> Result<T, FieldErrors> {
    if !errors.is_empty() {
        return Err(errors);
    }
    build().ok_or(errors)
}
