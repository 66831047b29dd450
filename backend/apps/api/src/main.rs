//! API Server Entry Point
//!
//! Reads configuration, picks the storage backend, mounts the accounts and
//! marketplace routers under `/api`. Startup errors use `anyhow`; request
//! errors are rendered by each crate's error type.

mod config;
mod health;

use std::net::SocketAddr;
use std::sync::Arc;

use accounts::{AccountsConfig, MemoryAccountRepository, PgAccountRepository, UserRepository, accounts_router};
use axum::{
    Router, http,
    http::{HeaderName, Method, header},
};
use marketplace::{
    MarketConfig, MarketRepository, MemoryMarketRepository, PgMarketRepository, marketplace_router,
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::health::health_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,accounts=info,marketplace=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server = ServerConfig::from_env()?;

    let accounts_config = match &server.password_pepper {
        Some(pepper) => AccountsConfig::with_pepper(pepper.clone()),
        None => {
            tracing::warn!("PASSWORD_PEPPER not set; hashing without a pepper");
            AccountsConfig::development()
        }
    };
    let market_config = if cfg!(debug_assertions) {
        MarketConfig::development()
    } else {
        MarketConfig::default()
    };

    let app = match &server.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(server.db_max_connections)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            let retries = market_config.max_update_retries;
            compose(
                Arc::new(PgAccountRepository::postgres(pool.clone(), retries)),
                Arc::new(PgMarketRepository::postgres(pool.clone(), retries)),
                accounts_config,
                market_config,
            )
            .merge(health_router(Some(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; running on in-memory stores");
            compose(
                Arc::new(MemoryAccountRepository::memory()),
                Arc::new(MemoryMarketRepository::memory()),
                accounts_config,
                market_config,
            )
            .merge(health_router(None))
        }
    };

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(cors(&server.frontend_origins));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], server.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Mount both feature routers under `/api` over one shared user store
fn compose<U, R>(users: Arc<U>, repo: Arc<R>, accounts: AccountsConfig, market: MarketConfig) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    R: MarketRepository,
{
    let api = Router::new()
        .merge(accounts_router(users.clone(), accounts))
        .merge(marketplace_router(users, repo, market));

    Router::new().nest("/api", api)
}

fn cors(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<http::HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(accounts::presentation::current_user::USER_ID_HEADER),
        ]))
        .allow_credentials(true)
}
