//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use std::str::FromStr;
use std::sync::Arc;

use accounts::{CurrentUser, UserRepository};
use kernel::id::{Id, JobId, PostId, ProductId, UserId};

use crate::application::{
    ApplicationService, JobService, MarketConfig, PostService, ProductService, ReviewService,
    SavedEntry, SavedItemService, SearchService,
};
use crate::domain::entity::{Applicant, Comment, Post, Product};
use crate::domain::repository::MarketRepository;
use crate::domain::validator::{ApplyInput, CommentInput, JobInput, PostInput, ProductInput, ReviewInput};
use crate::error::{MarketError, MarketResult};
use crate::presentation::dto::{
    ApplicationStatusRequest, JobListQuery, JobResponse, PostListQuery, ProductListQuery,
    ResolvedRequest, SavedEntryResponse, SavedItemRequest, SavedItemsQuery, SavedItemsResponse,
    SavedJobRequest, SearchParams, SearchResponse, job_responses,
};

/// Shared state for marketplace handlers
pub struct MarketAppState<U, R>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    pub users: Arc<U>,
    pub repo: Arc<R>,
    pub config: Arc<MarketConfig>,
}

impl<U, R> Clone for MarketAppState<U, R>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

impl<U, R> MarketAppState<U, R>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    fn products(&self) -> ProductService<R> {
        ProductService::new(self.repo.clone(), self.config.clone())
    }

    fn posts(&self) -> PostService<R> {
        PostService::new(self.repo.clone(), self.config.clone())
    }

    fn jobs(&self) -> JobService<R> {
        JobService::new(self.repo.clone(), self.config.clone())
    }

    fn saved_items(&self) -> SavedItemService<U, R, R, R> {
        SavedItemService::new(
            self.users.clone(),
            self.repo.clone(),
            self.repo.clone(),
            self.repo.clone(),
        )
    }
}

/// Path segment to a typed id; an id that cannot exist is simply not found
fn parse_id<T>(raw: &str, name: &'static str) -> MarketResult<Id<T>> {
    Id::from_str(raw).map_err(|_| MarketError::NotFound(name))
}

// ============================================================================
// Products
// ============================================================================

/// GET /api/products
pub async fn list_products<U, R>(
    State(state): State<MarketAppState<U, R>>,
    Query(query): Query<ProductListQuery>,
) -> MarketResult<Json<Vec<Product>>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let products = state
        .products()
        .list(&query.filter(), query.page(), query.q.as_deref(), query.fields.as_deref())
        .await?;

    Ok(Json(products))
}

/// POST /api/products
pub async fn create_product<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Json(input): Json<ProductInput>,
) -> MarketResult<(StatusCode, Json<Product>)>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let product = state.products().create(current.id(), input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/products/{id}
pub async fn get_product<U, R>(
    State(state): State<MarketAppState<U, R>>,
    Path(id): Path<String>,
) -> MarketResult<Json<Product>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: ProductId = parse_id(&id, "Product")?;
    Ok(Json(state.products().get(id).await?))
}

/// PUT /api/products/{id}
pub async fn update_product<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(patch): Json<ProductInput>,
) -> MarketResult<Json<Product>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: ProductId = parse_id(&id, "Product")?;
    Ok(Json(state.products().update(id, current.id(), patch).await?))
}

/// DELETE /api/products/{id}
pub async fn delete_product<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> MarketResult<StatusCode>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: ProductId = parse_id(&id, "Product")?;
    state.products().delete(id, current.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/products/{id}/reviews
pub async fn add_review<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(input): Json<ReviewInput>,
) -> MarketResult<(StatusCode, Json<Product>)>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: ProductId = parse_id(&id, "Product")?;
    let outcome = ReviewService::new(state.repo.clone(), state.users.clone())
        .add(id, current.id(), input)
        .await?;

    Ok((StatusCode::CREATED, Json(outcome.product)))
}

/// DELETE /api/products/{id}/reviews/{index}
pub async fn remove_review<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Path((id, index)): Path<(String, usize)>,
) -> MarketResult<Json<Product>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: ProductId = parse_id(&id, "Product")?;
    let outcome = ReviewService::new(state.repo.clone(), state.users.clone())
        .remove(id, index, current.id())
        .await?;

    Ok(Json(outcome.product))
}

// ============================================================================
// Posts
// ============================================================================

/// GET /api/posts
pub async fn list_posts<U, R>(
    State(state): State<MarketAppState<U, R>>,
    Query(query): Query<PostListQuery>,
) -> MarketResult<Json<Vec<Post>>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let posts = state
        .posts()
        .list(&query.filter(), query.page(), query.q.as_deref(), query.fields.as_deref())
        .await?;

    Ok(Json(posts))
}

/// POST /api/posts
pub async fn create_post<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Json(input): Json<PostInput>,
) -> MarketResult<(StatusCode, Json<Post>)>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let post = state.posts().create(current.id(), input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/posts/{id}
pub async fn get_post<U, R>(
    State(state): State<MarketAppState<U, R>>,
    Path(id): Path<String>,
) -> MarketResult<Json<Post>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: PostId = parse_id(&id, "Post")?;
    Ok(Json(state.posts().get(id).await?))
}

/// PUT | PATCH /api/posts/{id}
pub async fn update_post<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(patch): Json<PostInput>,
) -> MarketResult<Json<Post>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: PostId = parse_id(&id, "Post")?;
    Ok(Json(state.posts().update(id, current.id(), patch).await?))
}

/// DELETE /api/posts/{id}
pub async fn delete_post<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> MarketResult<StatusCode>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: PostId = parse_id(&id, "Post")?;
    state.posts().delete(id, current.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/posts/{id}/like
pub async fn like_post<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> MarketResult<Json<Post>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: PostId = parse_id(&id, "Post")?;
    Ok(Json(state.posts().like(id, current.id()).await?))
}

/// DELETE /api/posts/{id}/like
pub async fn unlike_post<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> MarketResult<Json<Post>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: PostId = parse_id(&id, "Post")?;
    Ok(Json(state.posts().unlike(id, current.id()).await?))
}

/// POST /api/posts/{id}/comments
pub async fn comment_on_post<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(input): Json<CommentInput>,
) -> MarketResult<(StatusCode, Json<Comment>)>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: PostId = parse_id(&id, "Post")?;
    let comment = state.posts().comment(id, current.id(), input).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// PUT /api/posts/{id}/resolved
pub async fn set_post_resolved<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<ResolvedRequest>,
) -> MarketResult<Json<Post>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: PostId = parse_id(&id, "Post")?;
    Ok(Json(state.posts().set_resolved(id, current.id(), req.is_resolved).await?))
}

// ============================================================================
// Jobs
// ============================================================================

/// GET /api/jobs
pub async fn list_jobs<U, R>(
    State(state): State<MarketAppState<U, R>>,
    Query(query): Query<JobListQuery>,
) -> MarketResult<Json<Vec<JobResponse>>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let jobs = state
        .jobs()
        .list(&query.filter(), query.page(), query.q.as_deref(), query.fields.as_deref())
        .await?;

    Ok(Json(job_responses(jobs)))
}

/// POST /api/jobs
pub async fn create_job<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Json(input): Json<JobInput>,
) -> MarketResult<(StatusCode, Json<JobResponse>)>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let job = state.jobs().create(current.id(), input).await?;
    Ok((StatusCode::CREATED, Json(job.into())))
}

/// GET /api/jobs/{id}
pub async fn get_job<U, R>(
    State(state): State<MarketAppState<U, R>>,
    Path(id): Path<String>,
) -> MarketResult<Json<JobResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: JobId = parse_id(&id, "Job")?;
    Ok(Json(state.jobs().get(id).await?.into()))
}

/// PUT /api/jobs/{id}
pub async fn update_job<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(patch): Json<JobInput>,
) -> MarketResult<Json<JobResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: JobId = parse_id(&id, "Job")?;
    Ok(Json(state.jobs().update(id, current.id(), patch).await?.into()))
}

/// DELETE /api/jobs/{id}
pub async fn delete_job<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> MarketResult<StatusCode>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: JobId = parse_id(&id, "Job")?;
    state.jobs().delete(id, current.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Applications
// ============================================================================

/// POST /api/applications
pub async fn apply_to_job<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Json(input): Json<ApplyInput>,
) -> MarketResult<(StatusCode, Json<Applicant>)>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let record = ApplicationService::new(state.repo.clone())
        .apply(current.id(), input)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/jobs/{id}/applicants
pub async fn list_applicants<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> MarketResult<Json<Vec<Applicant>>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: JobId = parse_id(&id, "Job")?;
    let applicants = ApplicationService::new(state.repo.clone())
        .list_applicants(id, current.id())
        .await?;

    Ok(Json(applicants))
}

/// PUT /api/jobs/{id}/applicants/{user_id}
pub async fn set_application_status<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Path((id, applicant)): Path<(String, String)>,
    Json(req): Json<ApplicationStatusRequest>,
) -> MarketResult<Json<Applicant>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: JobId = parse_id(&id, "Job")?;
    let applicant: UserId = parse_id(&applicant, "Application")?;
    let next = req.parse()?;

    let record = ApplicationService::new(state.repo.clone())
        .set_status(id, applicant, next, current.id())
        .await?;

    Ok(Json(record))
}

/// GET /api/jobs/{id}/application
pub async fn my_application<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> MarketResult<Json<Applicant>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let id: JobId = parse_id(&id, "Job")?;
    let record = ApplicationService::new(state.repo.clone())
        .my_application(id, current.id())
        .await?;

    Ok(Json(record))
}

// ============================================================================
// Saved items
// ============================================================================

/// GET /api/saved-items?type=
pub async fn list_saved_items<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Query(query): Query<SavedItemsQuery>,
) -> MarketResult<Json<Vec<SavedEntryResponse>>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let item_type = query.parse()?;
    let entries = state.saved_items().list(current.id(), item_type).await?;
    Ok(Json(entries.into_iter().map(SavedEntryResponse::from).collect()))
}

/// POST /api/saved-items
pub async fn save_item<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Json(req): Json<SavedItemRequest>,
) -> MarketResult<Json<SavedItemsResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let item = req.parse()?;
    let saved_items = state.saved_items().save(current.id(), item).await?;
    Ok(Json(SavedItemsResponse { saved_items }))
}

/// DELETE /api/saved-items/{type}/{id}
pub async fn remove_saved_item<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Path((item_type, item_id)): Path<(String, String)>,
) -> MarketResult<Json<SavedItemsResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let item = SavedItemRequest {
        item_type: Some(item_type),
        item_id: Some(item_id),
    }
    .parse()?;
    let saved_items = state.saved_items().remove(current.id(), item).await?;
    Ok(Json(SavedItemsResponse { saved_items }))
}

/// GET /api/saved-jobs
pub async fn list_saved_jobs<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
) -> MarketResult<Json<Vec<JobResponse>>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let entries = state
        .saved_items()
        .list(current.id(), Some(accounts::domain::SavedItemType::Job))
        .await?;

    let jobs = entries
        .into_iter()
        .filter_map(|entry| match entry {
            SavedEntry::Job(job) => Some(JobResponse::from(job)),
            _ => None,
        })
        .collect();

    Ok(Json(jobs))
}

/// POST /api/saved-jobs
pub async fn save_job<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Json(req): Json<SavedJobRequest>,
) -> MarketResult<Json<SavedItemsResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let item = req.parse()?;
    let saved_items = state.saved_items().save(current.id(), item).await?;
    Ok(Json(SavedItemsResponse { saved_items }))
}

/// DELETE /api/saved-jobs/{id}
pub async fn remove_saved_job<U, R>(
    State(state): State<MarketAppState<U, R>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> MarketResult<Json<SavedItemsResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let item = SavedJobRequest { job_id: Some(id) }.parse()?;
    let saved_items = state.saved_items().remove(current.id(), item).await?;
    Ok(Json(SavedItemsResponse { saved_items }))
}

// ============================================================================
// Search
// ============================================================================

/// GET /api/search?q=
pub async fn search<U, R>(
    State(state): State<MarketAppState<U, R>>,
    Query(params): Query<SearchParams>,
) -> MarketResult<Json<SearchResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let results = SearchService::new(state.repo.clone(), state.repo.clone(), state.repo.clone())
        .search_across(params.q.as_deref())
        .await?;

    Ok(Json(results.into()))
}
