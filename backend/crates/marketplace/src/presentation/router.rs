//! Marketplace Router

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

use accounts::UserRepository;

use crate::application::config::MarketConfig;
use crate::domain::repository::MarketRepository;
use crate::presentation::handlers::{self, MarketAppState};

/// Create the marketplace router for any repository implementation
///
/// Mounted under `/api`. `users` backs saved items and the seller rating.
pub fn marketplace_router<U, R>(users: Arc<U>, repo: Arc<R>, config: MarketConfig) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let state = MarketAppState {
        users,
        repo,
        config: Arc::new(config),
    };

    Router::new()
        // Products
        .route(
            "/products",
            get(handlers::list_products::<U, R>).post(handlers::create_product::<U, R>),
        )
        .route(
            "/products/{id}",
            get(handlers::get_product::<U, R>)
                .put(handlers::update_product::<U, R>)
                .delete(handlers::delete_product::<U, R>),
        )
        .route("/products/{id}/reviews", post(handlers::add_review::<U, R>))
        .route(
            "/products/{id}/reviews/{index}",
            delete(handlers::remove_review::<U, R>),
        )
        // Posts
        .route(
            "/posts",
            get(handlers::list_posts::<U, R>).post(handlers::create_post::<U, R>),
        )
        .route(
            "/posts/{id}",
            get(handlers::get_post::<U, R>)
                .put(handlers::update_post::<U, R>)
                .patch(handlers::update_post::<U, R>)
                .delete(handlers::delete_post::<U, R>),
        )
        .route(
            "/posts/{id}/like",
            post(handlers::like_post::<U, R>).delete(handlers::unlike_post::<U, R>),
        )
        .route("/posts/{id}/comments", post(handlers::comment_on_post::<U, R>))
        .route("/posts/{id}/resolved", put(handlers::set_post_resolved::<U, R>))
        // Jobs
        .route(
            "/jobs",
            get(handlers::list_jobs::<U, R>).post(handlers::create_job::<U, R>),
        )
        .route(
            "/jobs/{id}",
            get(handlers::get_job::<U, R>)
                .put(handlers::update_job::<U, R>)
                .delete(handlers::delete_job::<U, R>),
        )
        .route("/jobs/{id}/applicants", get(handlers::list_applicants::<U, R>))
        .route(
            "/jobs/{id}/applicants/{user_id}",
            put(handlers::set_application_status::<U, R>),
        )
        .route("/jobs/{id}/application", get(handlers::my_application::<U, R>))
        .route("/applications", post(handlers::apply_to_job::<U, R>))
        // Saved items
        .route(
            "/saved-items",
            get(handlers::list_saved_items::<U, R>).post(handlers::save_item::<U, R>),
        )
        .route(
            "/saved-items/{item_type}/{id}",
            delete(handlers::remove_saved_item::<U, R>),
        )
        .route(
            "/saved-jobs",
            get(handlers::list_saved_jobs::<U, R>).post(handlers::save_job::<U, R>),
        )
        .route("/saved-jobs/{id}", delete(handlers::remove_saved_job::<U, R>))
        // Search
        .route("/search", get(handlers::search::<U, R>))
        .with_state(state)
}
