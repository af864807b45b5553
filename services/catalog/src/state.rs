use axum::http::HeaderValue;
use chrono::Duration;
use sea_orm::DatabaseConnection;

use cinelog_auth_types::gate::Gate;
use cinelog_auth_types::policy::Rule;
use cinelog_auth_types::token::TokenCodec;

use crate::infra::db::{
    DbFilmRepository, DbOtpRepository, DbReviewRepository, DbUserRepository,
    DbWatchlistRepository, OutboxMailer,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub tokens: TokenCodec,
    pub otp_ttl: Duration,
    pub cors_origin: HeaderValue,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_repo(&self) -> DbOtpRepository {
        DbOtpRepository {
            db: self.db.clone(),
        }
    }

    pub fn mailer(&self) -> OutboxMailer {
        OutboxMailer {
            db: self.db.clone(),
        }
    }

    pub fn film_repo(&self) -> DbFilmRepository {
        DbFilmRepository {
            db: self.db.clone(),
        }
    }

    pub fn review_repo(&self) -> DbReviewRepository {
        DbReviewRepository {
            db: self.db.clone(),
        }
    }

    pub fn watchlist_repo(&self) -> DbWatchlistRepository {
        DbWatchlistRepository {
            db: self.db.clone(),
        }
    }

    /// Authorization gate for one route.
    pub fn gate(&self, rule: Rule) -> Gate {
        Gate::new(self.tokens.clone(), rule)
    }
}
