//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use std::sync::Arc;

use kernel::id::UserId;

use crate::application::{
    AccountsConfig, ChangePasswordInput, ChangePasswordUseCase, GetProfileUseCase,
    RegisterUseCase, SignInInput, SignInUseCase, UpdateProfileUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::{AccountError, AccountResult};
use crate::presentation::current_user::CurrentUser;
use crate::presentation::dto::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
    UserProfileResponse,
};

/// Shared state for account handlers
pub struct AccountsAppState<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub repo: Arc<U>,
    pub config: Arc<AccountsConfig>,
}

impl<U> Clone for AccountsAppState<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Register / Login
// ============================================================================

/// POST /api/auth/register
pub async fn register<U>(
    State(state): State<AccountsAppState<U>>,
    Json(req): Json<RegisterRequest>,
) -> AccountResult<(StatusCode, Json<UserProfileResponse>)>
where
    U: UserRepository + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());
    let user = use_case.execute(req.into()).await?;

    Ok((StatusCode::CREATED, Json(UserProfileResponse::from(&user))))
}

/// POST /api/auth/login
pub async fn login<U>(
    State(state): State<AccountsAppState<U>>,
    Json(req): Json<LoginRequest>,
) -> AccountResult<Json<UserProfileResponse>>
where
    U: UserRepository + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());
    let user = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(UserProfileResponse::from(&user)))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /api/users/me
pub async fn me<U>(
    State(state): State<AccountsAppState<U>>,
    current: CurrentUser,
) -> AccountResult<Json<UserProfileResponse>>
where
    U: UserRepository + Send + Sync + 'static,
{
    let user = GetProfileUseCase::new(state.repo.clone())
        .execute(current.id())
        .await?;

    Ok(Json(UserProfileResponse::from(&user)))
}

/// PUT /api/users/me
pub async fn update_me<U>(
    State(state): State<AccountsAppState<U>>,
    current: CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> AccountResult<Json<UserProfileResponse>>
where
    U: UserRepository + Send + Sync + 'static,
{
    let user = UpdateProfileUseCase::new(state.repo.clone())
        .execute(current.id(), req.into())
        .await?;

    Ok(Json(UserProfileResponse::from(&user)))
}

/// PUT /api/users/me/password
pub async fn change_password<U>(
    State(state): State<AccountsAppState<U>>,
    current: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> AccountResult<StatusCode>
where
    U: UserRepository + Send + Sync + 'static,
{
    ChangePasswordUseCase::new(state.repo.clone(), state.config.clone())
        .execute(
            current.id(),
            ChangePasswordInput {
                current_password: req.current_password,
                new_password: req.new_password,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/{id}
pub async fn get_user<U>(
    State(state): State<AccountsAppState<U>>,
    Path(id): Path<String>,
) -> AccountResult<Json<UserProfileResponse>>
where
    U: UserRepository + Send + Sync + 'static,
{
    // An id that cannot exist is simply not found
    let user_id: UserId = id.parse().map_err(|_| AccountError::UserNotFound)?;
    let user = GetProfileUseCase::new(state.repo.clone())
        .execute(user_id)
        .await?;

    Ok(Json(UserProfileResponse::from(&user)))
}
