//! Service health routes (`GET /`, `GET /health`)

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub database: &'static str,
}

pub fn health_router(pool: Option<PgPool>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .with_state(pool)
}

async fn health(State(pool): State<Option<PgPool>>) -> Json<HealthResponse> {
    let database = match pool {
        None => "not connected",
        Some(pool) => match sqlx::query("SELECT 1").execute(&pool).await {
            Ok(_) => "connected",
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                "unreachable"
            }
        },
    };

    Json(HealthResponse {
        status: "ok",
        service: "agri-marketplace",
        database,
    })
}
