//! API DTOs (Data Transfer Objects)
//!
//! Listing bodies deserialize straight into the validator inputs
//! (`ProductInput`, `PostInput`, ...). Products and posts serialize as they
//! are stored; jobs go out as [`JobResponse`], which carries an applicant
//! count instead of the applicants' contact details. This module also holds
//! the query strings and the small request shapes that have no domain
//! counterpart.

use accounts::domain::{SavedItem, SavedItemType};
use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{JobId, TutorialId, UserId};
use kernel::validation::{FieldErrors, non_blank};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{SavedEntry, SearchResults};
use crate::domain::entity::{Job, Post, Product};
use crate::domain::filter::{JobFilter, Page, PostFilter, ProductFilter};
use crate::domain::value_objects::{ApplicationStatus, JobStatus, JobType, Salary};

// ============================================================================
// List queries
// ============================================================================

/// `GET /api/products?category=&status=&seller=&page=&limit=&q=&fields=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub seller: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub q: Option<String>,
    pub fields: Option<String>,
}

impl ProductListQuery {
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            category: self.category.clone(),
            status: self.status.clone(),
            seller: self.seller.clone(),
        }
    }

    pub fn page(&self) -> Page {
        Page {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// `GET /api/posts?category=&author=&tag=&isResolved=&page=&limit=&q=&fields=`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListQuery {
    pub category: Option<String>,
    pub author: Option<String>,
    pub tag: Option<String>,
    pub is_resolved: Option<bool>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub q: Option<String>,
    pub fields: Option<String>,
}

impl PostListQuery {
    pub fn filter(&self) -> PostFilter {
        PostFilter {
            category: self.category.clone(),
            author: self.author.clone(),
            tag: self.tag.clone(),
            is_resolved: self.is_resolved,
        }
    }

    pub fn page(&self) -> Page {
        Page {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// `GET /api/jobs?jobType=&status=&employer=&page=&limit=&q=&fields=`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListQuery {
    pub job_type: Option<String>,
    pub status: Option<String>,
    pub employer: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub q: Option<String>,
    pub fields: Option<String>,
}

impl JobListQuery {
    pub fn filter(&self) -> JobFilter {
        JobFilter {
            job_type: self.job_type.clone(),
            status: self.status.clone(),
            employer: self.employer.clone(),
        }
    }

    pub fn page(&self) -> Page {
        Page {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// `GET /api/search?q=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

// ============================================================================
// Posts / Applications
// ============================================================================

/// `PUT /api/posts/{id}/resolved`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRequest {
    pub is_resolved: bool,
}

/// `PUT /api/jobs/{id}/applicants/{userId}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationStatusRequest {
    pub status: Option<String>,
}

impl ApplicationStatusRequest {
    pub fn parse(&self) -> Result<ApplicationStatus, FieldErrors> {
        let raw = non_blank(self.status.as_deref())
            .ok_or_else(|| FieldErrors::single("status", "Status is required"))?;
        ApplicationStatus::from_code(raw).ok_or_else(|| {
            FieldErrors::single(
                "status",
                format!("Status must be one of: {}", ApplicationStatus::codes()),
            )
        })
    }
}

// ============================================================================
// Saved items
// ============================================================================

/// `POST /api/saved-items`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItemRequest {
    pub item_type: Option<String>,
    pub item_id: Option<String>,
}

impl SavedItemRequest {
    pub fn parse(&self) -> Result<SavedItem, FieldErrors> {
        let mut errors = FieldErrors::new();

        let item_type = match non_blank(self.item_type.as_deref()) {
            None => {
                errors.add("itemType", "Item type is required");
                None
            }
            Some(raw) => {
                let parsed = SavedItemType::from_code(raw);
                if parsed.is_none() {
                    errors.add("itemType", "Item type must be one of: Product, Post, Job, Tutorial");
                }
                parsed
            }
        };
        let item_id = parse_uuid(&mut errors, "itemId", self.item_id.as_deref());

        match (item_type, item_id) {
            (Some(t), Some(id)) if errors.is_empty() => Ok(SavedItem::new(t, id)),
            _ => Err(errors),
        }
    }
}

/// `POST /api/saved-jobs`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJobRequest {
    pub job_id: Option<String>,
}

impl SavedJobRequest {
    pub fn parse(&self) -> Result<SavedItem, FieldErrors> {
        let mut errors = FieldErrors::new();
        match parse_uuid(&mut errors, "jobId", self.job_id.as_deref()) {
            Some(id) => Ok(SavedItem::new(SavedItemType::Job, id)),
            None => Err(errors),
        }
    }
}

/// `GET /api/saved-items?type=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavedItemsQuery {
    #[serde(rename = "type")]
    pub item_type: Option<String>,
}

impl SavedItemsQuery {
    pub fn parse(&self) -> Result<Option<SavedItemType>, FieldErrors> {
        match non_blank(self.item_type.as_deref()) {
            None => Ok(None),
            Some(raw) => SavedItemType::from_code(raw).map(Some).ok_or_else(|| {
                FieldErrors::single("type", "Item type must be one of: Product, Post, Job, Tutorial")
            }),
        }
    }
}

/// Saved references after a save or remove
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItemsResponse {
    pub saved_items: Vec<SavedItem>,
}

// ============================================================================
// Responses
// ============================================================================

/// Public view of a job
///
/// Applicant contact details stay with the employer (`GET /api/jobs/{id}/applicants`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: JobId,
    pub employer: UserId,
    pub title: String,
    pub description: String,
    pub job_type: JobType,
    pub location: String,
    pub salary: Salary,
    pub duration: Option<String>,
    pub experience_required: Option<String>,
    pub skills: Vec<String>,
    pub applicant_count: usize,
    pub status: JobStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            applicant_count: job.applicants().len(),
            id: job.id,
            employer: job.employer,
            title: job.title,
            description: job.description,
            job_type: job.job_type,
            location: job.location,
            salary: job.salary,
            duration: job.duration,
            experience_required: job.experience_required,
            skills: job.skills,
            status: job.status,
            start_date: job.start_date,
            end_date: job.end_date,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

pub fn job_responses(jobs: Vec<Job>) -> Vec<JobResponse> {
    jobs.into_iter().map(JobResponse::from).collect()
}

/// `GET /api/search`
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub products: Vec<Product>,
    pub posts: Vec<Post>,
    pub jobs: Vec<JobResponse>,
}

impl From<SearchResults> for SearchResponse {
    fn from(results: SearchResults) -> Self {
        Self {
            products: results.products,
            posts: results.posts,
            jobs: job_responses(results.jobs),
        }
    }
}

/// One resolved bookmark in `GET /api/saved-items`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "itemType", content = "item")]
pub enum SavedEntryResponse {
    Product(Product),
    Post(Post),
    Job(JobResponse),
    Tutorial(TutorialId),
}

impl From<SavedEntry> for SavedEntryResponse {
    fn from(entry: SavedEntry) -> Self {
        match entry {
            SavedEntry::Product(product) => Self::Product(product),
            SavedEntry::Post(post) => Self::Post(post),
            SavedEntry::Job(job) => Self::Job(job.into()),
            SavedEntry::Tutorial(id) => Self::Tutorial(id),
        }
    }
}

fn parse_uuid(errors: &mut FieldErrors, field: &str, raw: Option<&str>) -> Option<Uuid> {
    let Some(raw) = non_blank(raw) else {
        errors.add(field, "Item id is required");
        return None;
    };
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, "Item id is not valid");
            None
        }
    }
}
