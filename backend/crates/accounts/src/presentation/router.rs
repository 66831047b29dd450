//! Accounts Router

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, AccountsAppState};

/// Create the accounts router for any repository implementation
///
/// Mounted under `/api`: `/auth/register`, `/auth/login`, `/users/me`,
/// `/users/me/password`, `/users/{id}`.
pub fn accounts_router<U>(repo: Arc<U>, config: AccountsConfig) -> Router
where
    U: UserRepository + Send + Sync + 'static,
{
    let state = AccountsAppState {
        repo,
        config: Arc::new(config),
    };

    Router::new()
        .route("/auth/register", post(handlers::register::<U>))
        .route("/auth/login", post(handlers::login::<U>))
        .route(
            "/users/me",
            get(handlers::me::<U>).put(handlers::update_me::<U>),
        )
        .route("/users/me/password", put(handlers::change_password::<U>))
        .route("/users/{id}", get(handlers::get_user::<U>))
        .with_state(state)
}
