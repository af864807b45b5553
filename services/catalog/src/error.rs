use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use cinelog_auth_types::password::PasswordError;
use cinelog_auth_types::policy::PolicyDenied;
use cinelog_core::error::{ErrorEnvelope, FieldError};

/// Catalog service error variants.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid request")]
    Validation(Vec<FieldError>),
    #[error("user not found")]
    UserNotFound,
    #[error("film not found")]
    FilmNotFound,
    #[error("review not found")]
    ReviewNotFound,
    #[error("watchlist not found")]
    WatchlistNotFound,
    #[error("email already registered")]
    EmailTaken,
    #[error("you have already reviewed this film")]
    ReviewExists,
    #[error("you already have a watchlist with this name")]
    WatchlistNameTaken,
    #[error("film is already in this watchlist")]
    FilmAlreadyInWatchlist,
    #[error("authentication required")]
    Unauthenticated,
    #[error("email and password do not match")]
    InvalidCredentials,
    #[error("no pending login code, log in again to generate a new one")]
    OtpNotFound,
    #[error("login code expired, log in again to generate a new one")]
    OtpExpired,
    #[error("invalid login code")]
    InvalidOtp,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::FilmNotFound => "FILM_NOT_FOUND",
            Self::ReviewNotFound => "REVIEW_NOT_FOUND",
            Self::WatchlistNotFound => "WATCHLIST_NOT_FOUND",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::ReviewExists => "REVIEW_EXISTS",
            Self::WatchlistNameTaken => "WATCHLIST_NAME_TAKEN",
            Self::FilmAlreadyInWatchlist => "FILM_ALREADY_IN_WATCHLIST",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::OtpNotFound => "OTP_NOT_FOUND",
            Self::OtpExpired => "OTP_EXPIRED",
            Self::InvalidOtp => "INVALID_OTP",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UserNotFound
            | Self::FilmNotFound
            | Self::ReviewNotFound
            | Self::WatchlistNotFound => StatusCode::NOT_FOUND,
            Self::EmailTaken
            | Self::ReviewExists
            | Self::WatchlistNameTaken
            | Self::FilmAlreadyInWatchlist => StatusCode::CONFLICT,
            Self::Unauthenticated
            | Self::InvalidCredentials
            | Self::OtpNotFound
            | Self::OtpExpired
            | Self::InvalidOtp => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid(field: &str, message: &str) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<PolicyDenied> for CatalogError {
    fn from(denied: PolicyDenied) -> Self {
        match denied {
            PolicyDenied::Unauthenticated => Self::Unauthenticated,
            PolicyDenied::Forbidden => Self::Forbidden,
        }
    }
}

impl From<PasswordError> for CatalogError {
    fn from(e: PasswordError) -> Self {
        Self::Internal(e.into())
    }
}

impl From<JsonRejection> for CatalogError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid("body", &rejection.body_text())
    }
}

impl From<PathRejection> for CatalogError {
    fn from(rejection: PathRejection) -> Self {
        Self::invalid("id", &rejection.body_text())
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx are expected client errors; TraceLayer already records them.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let envelope = ErrorEnvelope::new(self.kind(), self.to_string());
        match self {
            Self::Validation(details) => envelope.with_details(details),
            _ => envelope,
        }
        .into_response(status)
    }
}
