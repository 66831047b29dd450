//! Requester Identity Extractor
//!
//! The upstream session layer resolves the session and forwards the user id
//! in the `X-User-Id` header. Handlers that mutate take [`CurrentUser`];
//! a missing or malformed header is rejected with 401.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use kernel::id::UserId;

use crate::error::AccountError;

/// Header carrying the already-resolved requester id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated requester
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl CurrentUser {
    pub fn id(&self) -> UserId {
        self.0
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AccountError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(AccountError::Unauthenticated)?;

        let id = value
            .to_str()
            .ok()
            .and_then(|s| s.parse::<UserId>().ok())
            .ok_or(AccountError::Unauthenticated)?;

        Ok(CurrentUser(id))
    }
}
