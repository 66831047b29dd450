//! Listing Filters
//!
//! Query-string filters become JSON containment patterns matched against
//! the stored documents, so both storage backends apply them the same way.

use kernel::id::UserId;
use kernel::validation::{FieldErrors, non_blank};
use platform::document::Slice;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::domain::value_objects::{JobStatus, JobType, PostCategory, ProductCategory, ProductStatus};

// ============================================================================
// Pagination
// ============================================================================

/// 1-based page request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Page {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl Page {
    /// Resolve against the configured default and maximum page size
    pub fn to_slice(self, default_limit: u64, max_limit: u64) -> Slice {
        let limit = self.limit.unwrap_or(default_limit).clamp(1, max_limit.max(1));
        let page = self.page.unwrap_or(1).max(1);
        Slice::new((page - 1).saturating_mul(limit), limit)
    }
}

// ============================================================================
// Filters
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub status: Option<String>,
    pub seller: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFilter {
    pub category: Option<String>,
    pub author: Option<String>,
    pub tag: Option<String>,
    pub is_resolved: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    pub job_type: Option<String>,
    pub status: Option<String>,
    pub employer: Option<String>,
}

/// Builds a containment pattern field by field, collecting errors
struct Pattern {
    fields: Map<String, Value>,
    errors: FieldErrors,
}

impl Pattern {
    fn new() -> Self {
        Self {
            fields: Map::new(),
            errors: FieldErrors::new(),
        }
    }

    fn code<E>(&mut self, field: &str, raw: Option<&str>, from_code: fn(&str) -> Option<E>, codes: String) {
        let Some(value) = non_blank(raw) else {
            return;
        };
        if from_code(value).is_some() {
            self.fields.insert(field.to_string(), json!(value));
        } else {
            self.errors.add(field, format!("{} must be one of: {}", field, codes));
        }
    }

    fn user(&mut self, field: &str, raw: Option<&str>) {
        let Some(value) = non_blank(raw) else {
            return;
        };
        match value.parse::<UserId>() {
            Ok(id) => {
                self.fields.insert(field.to_string(), json!(id));
            }
            Err(_) => self.errors.add(field, format!("{} is not a valid user id", field)),
        }
    }

    fn finish(self) -> Result<Value, FieldErrors> {
        self.errors.into_result(Value::Object(self.fields))
    }
}

impl ProductFilter {
    pub fn pattern(&self) -> Result<Value, FieldErrors> {
        let mut p = Pattern::new();
        p.code("category", self.category.as_deref(), ProductCategory::from_code, ProductCategory::codes());
        p.code("status", self.status.as_deref(), ProductStatus::from_code, ProductStatus::codes());
        p.user("seller", self.seller.as_deref());
        p.finish()
    }
}

impl PostFilter {
    pub fn pattern(&self) -> Result<Value, FieldErrors> {
        let mut p = Pattern::new();
        p.code("category", self.category.as_deref(), PostCategory::from_code, PostCategory::codes());
        p.user("author", self.author.as_deref());
        if let Some(tag) = non_blank(self.tag.as_deref()) {
            p.fields.insert("tags".to_string(), json!([tag]));
        }
        if let Some(resolved) = self.is_resolved {
            p.fields.insert("isResolved".to_string(), json!(resolved));
        }
        p.finish()
    }
}

impl JobFilter {
    pub fn pattern(&self) -> Result<Value, FieldErrors> {
        let mut p = Pattern::new();
        p.code("jobType", self.job_type.as_deref(), JobType::from_code, JobType::codes());
        p.code("status", self.status.as_deref(), JobStatus::from_code, JobStatus::codes());
        p.user("employer", self.employer.as_deref());
        p.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_to_slice() {
        assert_eq!(Page::default().to_slice(20, 100), Slice::new(0, 20));
        assert_eq!(
            Page { page: Some(3), limit: Some(10) }.to_slice(20, 100),
            Slice::new(20, 10)
        );
        assert_eq!(
            Page { page: Some(0), limit: Some(1000) }.to_slice(20, 100),
            Slice::new(0, 100)
        );
        assert_eq!(Page { page: None, limit: Some(0) }.to_slice(20, 100), Slice::new(0, 1));
    }

    #[test]
    fn test_product_pattern() {
        let seller = UserId::new();
        let pattern = ProductFilter {
            category: Some("seeds".into()),
            status: None,
            seller: Some(seller.to_string()),
        }
        .pattern()
        .unwrap();
        assert_eq!(pattern, json!({ "category": "seeds", "seller": seller.to_string() }));

        let errors = ProductFilter {
            category: Some("Vegetables".into()),
            status: Some("sold".into()),
            seller: Some("nobody".into()),
        }
        .pattern()
        .unwrap_err();
        assert!(errors.contains("category"));
        assert!(errors.contains("seller"));
        assert!(!errors.contains("status"));
    }

    #[test]
    fn test_post_pattern() {
        let pattern = PostFilter {
            tag: Some(" wheat ".into()),
            is_resolved: Some(false),
            ..Default::default()
        }
        .pattern()
        .unwrap();
        assert_eq!(pattern, json!({ "tags": ["wheat"], "isResolved": false }));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert_eq!(JobFilter::default().pattern().unwrap(), json!({}));
    }
}
