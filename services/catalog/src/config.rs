use anyhow::Context as _;
use axum::http::HeaderValue;
use chrono::Duration;

use cinelog_auth_types::token::DEFAULT_TOKEN_TTL_SECS;
use cinelog_core::config::{parse_or, required};

use crate::domain::types::DEFAULT_OTP_TTL_SECS;

/// Catalog service configuration loaded from environment variables.
#[derive(Debug)]
pub struct CatalogConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HS256 signing secret for access tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// TCP port for the HTTP server (default 3000). Env var: `CATALOG_PORT`.
    pub catalog_port: u16,
    /// Access token lifetime in seconds (default 3600). Env var: `TOKEN_TTL_SECS`.
    pub token_ttl_secs: i64,
    /// Login code lifetime in seconds (default 300). Env var: `OTP_TTL_SECS`.
    pub otp_ttl_secs: i64,
    /// Browser origin allowed to call the API. Env var: `CORS_ORIGIN`.
    pub cors_origin: HeaderValue,
}

pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

impl CatalogConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            catalog_port: parse_or("CATALOG_PORT", 3000),
            token_ttl_secs: parse_or("TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS),
            otp_ttl_secs: parse_or("OTP_TTL_SECS", DEFAULT_OTP_TTL_SECS),
            cors_origin: cors_origin(std::env::var("CORS_ORIGIN").ok())?,
        })
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::seconds(self.token_ttl_secs)
    }

    pub fn otp_ttl(&self) -> Duration {
        Duration::seconds(self.otp_ttl_secs)
    }
}

fn cors_origin(raw: Option<String>) -> anyhow::Result<HeaderValue> {
    let raw = raw.unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_owned());
    let origin = raw.trim().trim_end_matches('/');
    HeaderValue::from_str(origin).with_context(|| format!("invalid CORS_ORIGIN {raw:?}"))
}
