//! Product Validator

use accounts::domain::value_object::MobileNumber;
use kernel::validation::{FieldErrors, NumberInput, non_blank, optional_text, parse_code, require_text};
use serde::Deserialize;

use super::{Mode, NumberField, clean_list, finish, overlay, read_number};
use crate::domain::entity::Product;
use crate::domain::value_objects::{ProductCategory, ProductStatus, Rating, Unit};

// ============================================================================
// Listing form
// ============================================================================

/// Product fields as submitted; every field optional so all problems are
/// reported at once
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<NumberInput>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub images: Option<Vec<String>>,
    pub quantity: Option<NumberInput>,
    pub unit: Option<String>,
    pub status: Option<String>,
    pub is_negotiable: Option<bool>,
    pub contact_phone: Option<String>,
}

impl ProductInput {
    /// Lay `patch` over `self`
    pub fn merge(self, patch: ProductInput) -> ProductInput {
        ProductInput {
            title: overlay(self.title, patch.title),
            description: overlay(self.description, patch.description),
            price: overlay(self.price, patch.price),
            category: overlay(self.category, patch.category),
            location: overlay(self.location, patch.location),
            images: overlay(self.images, patch.images),
            quantity: overlay(self.quantity, patch.quantity),
            unit: overlay(self.unit, patch.unit),
            status: overlay(self.status, patch.status),
            is_negotiable: overlay(self.is_negotiable, patch.is_negotiable),
            contact_phone: overlay(self.contact_phone, patch.contact_phone),
        }
    }
}

impl From<&Product> for ProductInput {
    fn from(p: &Product) -> Self {
        ProductInput {
            title: Some(p.title.clone()),
            description: Some(p.description.clone()),
            price: Some(NumberInput::Number(p.price)),
            category: Some(p.category.code().to_string()),
            location: Some(p.location.clone()),
            images: Some(p.images.clone()),
            quantity: Some(NumberInput::Number(p.quantity)),
            unit: Some(p.unit.code().to_string()),
            status: Some(p.status.code().to_string()),
            is_negotiable: Some(p.is_negotiable),
            contact_phone: p.contact_phone.as_ref().map(|m| m.to_string()),
        }
    }
}

/// Validated product fields
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: ProductCategory,
    pub location: String,
    pub images: Vec<String>,
    pub quantity: f64,
    pub unit: Unit,
    pub status: ProductStatus,
    pub is_negotiable: bool,
    pub contact_phone: Option<MobileNumber>,
}

pub fn validate_product(input: ProductInput, mode: Mode) -> Result<ProductDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = require_text(&mut errors, "title", input.title.as_deref(), "Product name is required");
    let description = require_text(
        &mut errors,
        "description",
        input.description.as_deref(),
        "Description is required",
    );
    let location = require_text(
        &mut errors,
        "location",
        input.location.as_deref(),
        "Location is required",
    );

    let price = match read_number(input.price.as_ref()) {
        NumberField::Value(v) if v > 0.0 => Some(v),
        NumberField::Value(_) => {
            errors.add("price", "Price must be greater than 0");
            None
        }
        NumberField::Missing | NumberField::Invalid => {
            errors.add("price", "Please enter a valid price");
            None
        }
    };

    let quantity = match read_number(input.quantity.as_ref()) {
        NumberField::Missing => Some(1.0),
        NumberField::Value(v) if v >= 0.0 => Some(v),
        NumberField::Value(_) | NumberField::Invalid => {
            errors.add("quantity", "Please enter a valid quantity");
            None
        }
    };

    let category = parse_code(
        &mut errors,
        "category",
        input.category.as_deref(),
        None,
        ProductCategory::from_code,
        &format!("Please select a category ({})", ProductCategory::codes()),
    );
    let unit = parse_code(
        &mut errors,
        "unit",
        input.unit.as_deref(),
        None,
        Unit::from_code,
        &format!("Please select a unit ({})", Unit::codes()),
    );
    let status = parse_code(
        &mut errors,
        "status",
        input.status.as_deref(),
        Some(ProductStatus::default()),
        ProductStatus::from_code,
        &format!("Status must be one of: {}", ProductStatus::codes()),
    );

    let images = clean_list(input.images);
    if mode == Mode::Create && images.is_empty() {
        errors.add("images", "Please upload at least one image");
    }

    let contact_phone = match non_blank(input.contact_phone.as_deref()) {
        None => {
            if mode == Mode::Create {
                errors.add("contactPhone", "Contact number is required");
            }
            None
        }
        Some(raw) => {
            let parsed = MobileNumber::parse(raw);
            if parsed.is_none() {
                errors.add("contactPhone", "Please enter a valid Indian mobile number");
            }
            parsed
        }
    };

    finish(errors, || {
        Some(ProductDraft {
            title: title?,
            description: description?,
            price: price?,
            category: category?,
            location: location?,
            images,
            quantity: quantity?,
            unit: unit?,
            status: status?,
            is_negotiable: input.is_negotiable.unwrap_or(false),
            contact_phone,
        })
    })
}

// ============================================================================
// Review form
// ============================================================================

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub rating: Option<NumberInput>,
    pub text: Option<String>,
}

pub fn validate_review(input: ReviewInput) -> Result<(Rating, Option<String>), FieldErrors> {
    let rating = match read_number(input.rating.as_ref()) {
        NumberField::Missing => return Err(FieldErrors::single("rating", "Rating is required")),
        NumberField::Invalid => None,
        NumberField::Value(v) => Rating::from_f64(v),
    };

    match rating {
        Some(rating) => Ok((rating, optional_text(input.text.as_deref()))),
        None => Err(FieldErrors::single(
            "rating",
            "Rating must be a whole number from 1 to 5",
        )),
    }
}
