//! Server configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).

use std::env;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// `None` runs the server on in-memory stores
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub frontend_origins: Vec<String>,
    pub password_pepper: Option<Vec<u8>>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.parse().with_context(|| format!("PORT is not a valid port: {raw}"))?,
            None => DEFAULT_PORT,
        };

        let db_max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS is not a number: {raw}"))?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let password_pepper = var("PASSWORD_PEPPER")
            .map(|b64| {
                general_purpose::STANDARD
                    .decode(b64.as_bytes())
                    .context("PASSWORD_PEPPER must be base64")
            })
            .transpose()?;

        Ok(Self {
            port,
            database_url: var("DATABASE_URL"),
            db_max_connections,
            frontend_origins,
            password_pepper,
        })
    }
}
