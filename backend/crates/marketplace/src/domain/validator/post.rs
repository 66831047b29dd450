//! Post Validator

use kernel::validation::{FieldErrors, parse_code, require_text};
use serde::Deserialize;

use super::{clean_list, finish, overlay};
use crate::domain::entity::Post;
use crate::domain::value_objects::PostCategory;

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub is_resolved: Option<bool>,
}

impl PostInput {
    pub fn merge(self, patch: PostInput) -> PostInput {
        PostInput {
            title: overlay(self.title, patch.title),
            content: overlay(self.content, patch.content),
            tags: overlay(self.tags, patch.tags),
            images: overlay(self.images, patch.images),
            category: overlay(self.category, patch.category),
            is_resolved: overlay(self.is_resolved, patch.is_resolved),
        }
    }
}

impl From<&Post> for PostInput {
    fn from(p: &Post) -> Self {
        PostInput {
            title: Some(p.title.clone()),
            content: Some(p.content.clone()),
            tags: Some(p.tags.clone()),
            images: Some(p.images.clone()),
            category: Some(p.category.code().to_string()),
            is_resolved: Some(p.is_resolved),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub category: PostCategory,
    pub is_resolved: bool,
}

pub fn validate_post(input: PostInput) -> Result<PostDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = require_text(&mut errors, "title", input.title.as_deref(), "Title is required");
    let content = require_text(
        &mut errors,
        "content",
        input.content.as_deref(),
        "Content is required",
    );
    let category = parse_code(
        &mut errors,
        "category",
        input.category.as_deref(),
        Some(PostCategory::default()),
        PostCategory::from_code,
        &format!("Category must be one of: {}", PostCategory::codes()),
    );

    let mut tags = clean_list(input.tags);
    // Same tag twice adds nothing to search or filtering
    let mut seen = std::collections::HashSet::new();
    tags.retain(|t| seen.insert(t.clone()));

    finish(errors, || {
        Some(PostDraft {
            title: title?,
            content: content?,
            tags,
            images: clean_list(input.images),
            category: category?,
            is_resolved: input.is_resolved.unwrap_or(false),
        })
    })
}

// ============================================================================
// Comment
// ============================================================================

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CommentInput {
    pub text: Option<String>,
}

pub fn validate_comment(input: CommentInput) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();
    let text = require_text(&mut errors, "text", input.text.as_deref(), "Comment text is required");
    finish(errors, || text)
}
