//! Saved Item Reference
//!
//! A user's bookmark: a typed reference to a Product, Post, Job or Tutorial.
//! Stored as `{ "itemType": "Product", "itemId": "<uuid>" }`.

use kernel::id::{JobId, PostId, ProductId, TutorialId};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Typed reference to a bookmarked entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "itemType", content = "itemId")]
pub enum SavedItem {
    Product(ProductId),
    Post(PostId),
    Job(JobId),
    /// Tutorials live outside this system; stored opaquely
    Tutorial(TutorialId),
}

/// Discriminant of [`SavedItem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SavedItemType {
    Product,
    Post,
    Job,
    Tutorial,
}

impl SavedItemType {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Post => "Post",
            Self::Job => "Job",
            Self::Tutorial => "Tutorial",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Product" => Some(Self::Product),
            "Post" => Some(Self::Post),
            "Job" => Some(Self::Job),
            "Tutorial" => Some(Self::Tutorial),
            _ => None,
        }
    }
}

impl fmt::Display for SavedItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl SavedItem {
    /// Build from a type tag and a raw id
    pub fn new(item_type: SavedItemType, id: Uuid) -> Self {
        match item_type {
            SavedItemType::Product => SavedItem::Product(ProductId::from_uuid(id)),
            SavedItemType::Post => SavedItem::Post(PostId::from_uuid(id)),
            SavedItemType::Job => SavedItem::Job(JobId::from_uuid(id)),
            SavedItemType::Tutorial => SavedItem::Tutorial(TutorialId::from_uuid(id)),
        }
    }

    pub fn item_type(&self) -> SavedItemType {
        match self {
            SavedItem::Product(_) => SavedItemType::Product,
            SavedItem::Post(_) => SavedItemType::Post,
            SavedItem::Job(_) => SavedItemType::Job,
            SavedItem::Tutorial(_) => SavedItemType::Tutorial,
        }
    }

    pub fn item_id(&self) -> Uuid {
        match self {
            SavedItem::Product(id) => id.into_uuid(),
            SavedItem::Post(id) => id.into_uuid(),
            SavedItem::Job(id) => id.into_uuid(),
            SavedItem::Tutorial(id) => id.into_uuid(),
        }
    }
}
