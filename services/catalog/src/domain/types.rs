use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use cinelog_core::error::FieldError;
use cinelog_domain::film::{MIN_GENRE_LEN, is_valid_rating};
use cinelog_domain::pagination::{PageRequest, SortSpec};
use cinelog_domain::review::MAX_REVIEW_LEN;
use cinelog_domain::user::UserRole;

use crate::error::CatalogError;

/// Number of digits in a login code.
pub const OTP_LEN: usize = 6;
/// Default login code lifetime: 5 minutes.
pub const DEFAULT_OTP_TTL_SECS: i64 = 300;
/// Wrong guesses a login code survives; the last one deletes it.
pub const MAX_OTP_ATTEMPTS: u32 = 5;
pub const MIN_PASSWORD_LEN: usize = 6;

// ── Records ──────────────────────────────────────────────────────────────────

/// Account record. `password_hash` never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The pending login code of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneTimeCode {
    pub user_id: Uuid,
    pub code: String,
    /// Wrong guesses so far.
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl OneTimeCode {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Film {
    pub id: Uuid,
    pub title: String,
    pub genre: String,
    pub release_date: NaiveDate,
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: Uuid,
    pub film_id: Uuid,
    pub user_id: Uuid,
    pub rating: f64,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A review together with its author's display name.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewEntry {
    pub review: Review,
    pub author_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watchlist {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A watchlist with its owner's name and its films in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistDetail {
    pub watchlist: Watchlist,
    pub owner_name: String,
    pub films: Vec<Film>,
}

/// Outbound message persisted for the mail relay.
#[derive(Debug, Clone)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

// ── Listing ──────────────────────────────────────────────────────────────────

/// Filter, sort and window of one list request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<F, S> {
    pub filter: F,
    pub sort: SortSpec<S>,
    pub page: PageRequest,
}

/// Case-insensitive substring on title or genre.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilmFilter {
    pub search: Option<String>,
}

/// Exact match on film and/or author.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    pub film_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

/// Case-insensitive substring on name or email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub search: Option<String>,
}

/// Which watchlists a listing may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchlistScope {
    /// Every public watchlist.
    Public,
    /// The public watchlists of one user.
    PublicOf(Uuid),
    /// All watchlists of one user, private included.
    AllOf(Uuid),
}

impl WatchlistScope {
    /// Resolve the scope of a listing requested by `viewer` for `owner`.
    pub fn resolve(owner: Option<Uuid>, viewer: Option<Uuid>) -> Self {
        match owner {
            None => Self::Public,
            Some(owner) if viewer == Some(owner) => Self::AllOf(owner),
            Some(owner) => Self::PublicOf(owner),
        }
    }
}

/// Trim `term`; blank terms mean "no filter".
pub fn normalize_search(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

// ── Validation ───────────────────────────────────────────────────────────────

/// Collects field errors; `finish` fails with all of them at once.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldError>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.0.push(FieldError::new(field, message));
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), CatalogError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Validation(std::mem::take(&mut self.0)))
        }
    }
}

/// Lower-case and trim an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `local@domain.tld` with no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

pub fn validate_password(v: &mut Violations, password: &str) {
    v.check(
        password.chars().count() >= MIN_PASSWORD_LEN,
        "password",
        "must be at least 6 characters",
    );
}

pub fn validate_title(v: &mut Violations, title: &str) {
    v.check(!title.trim().is_empty(), "title", "must not be empty");
}

pub fn validate_genre(v: &mut Violations, genre: &str) {
    v.check(
        genre.chars().count() >= MIN_GENRE_LEN,
        "genre",
        "must be at least 6 characters",
    );
}

pub fn validate_rating(v: &mut Violations, rating: f64) {
    v.check(is_valid_rating(rating), "rating", "must be between 0.1 and 10");
}

pub fn validate_review_body(v: &mut Violations, body: &str) {
    let len = body.trim().chars().count();
    v.check(
        len > 0 && body.chars().count() <= MAX_REVIEW_LEN,
        "review",
        "must be between 1 and 500 characters",
    );
}

/// Parse a `YYYY-MM-DD` date, recording a violation on failure.
pub fn parse_release_date(v: &mut Violations, raw: &str) -> Option<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok();
    v.check(parsed.is_some(), "release_date", "must be a YYYY-MM-DD date");
    parsed
}
