//! Post Entity
//!
//! Community post with embedded comments and likes. A user likes a post at
//! most once.

use chrono::{DateTime, Utc};
use kernel::id::{PostId, UserId};
use platform::document::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Listing;
use crate::domain::validator::PostDraft;
use crate::domain::value_objects::PostCategory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub user: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub author: UserId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    likes: Vec<UserId>,
    #[serde(default)]
    comments: Vec<Comment>,
    #[serde(default)]
    pub category: PostCategory,
    #[serde(default)]
    pub is_resolved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author: UserId, draft: PostDraft) -> Self {
        let now = Utc::now();
        Self {
            id: PostId::new(),
            author,
            title: draft.title,
            content: draft.content,
            tags: draft.tags,
            images: draft.images,
            likes: Vec::new(),
            comments: Vec::new(),
            category: draft.category,
            is_resolved: draft.is_resolved,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, draft: PostDraft) {
        self.title = draft.title;
        self.content = draft.content;
        self.tags = draft.tags;
        self.images = draft.images;
        self.category = draft.category;
        self.is_resolved = draft.is_resolved;
        self.touch();
    }

    pub fn likes(&self) -> &[UserId] {
        &self.likes
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// `false` when `user` already likes the post
    pub fn like(&mut self, user: UserId) -> bool {
        if self.likes.contains(&user) {
            return false;
        }
        self.likes.push(user);
        true
    }

    /// `false` when `user` did not like the post
    pub fn unlike(&mut self, user: UserId) -> bool {
        let before = self.likes.len();
        self.likes.retain(|u| *u != user);
        self.likes.len() != before
    }

    pub fn add_comment(&mut self, user: UserId, text: String) -> Comment {
        let comment = Comment {
            user,
            text,
            created_at: Utc::now(),
        };
        self.comments.push(comment.clone());
        self.touch();
        comment
    }

    pub fn set_resolved(&mut self, resolved: bool) {
        self.is_resolved = resolved;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Document for Post {
    const COLLECTION: &'static str = "posts";

    fn key(&self) -> Uuid {
        self.id.into_uuid()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Listing for Post {
    type Id = PostId;
    const NAME: &'static str = "Post";

    fn id(&self) -> PostId {
        self.id
    }

    fn owner(&self) -> UserId {
        self.author
    }
}
