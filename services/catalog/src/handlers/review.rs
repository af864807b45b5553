use axum::extract::{Path, RawQuery, State};
use axum::{Json, http::StatusCode};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinelog_auth_types::identity::Identity;
use cinelog_domain::pagination::Page;
use cinelog_domain::review::ReviewSortField;

use crate::domain::types::{ListQuery, Review, ReviewEntry, ReviewFilter};
use crate::error::CatalogError;
use crate::handlers::{IdPath, JsonBody, ListParams, id_filter};
use crate::state::AppState;
use crate::usecase::listing::ListUseCase;
use crate::usecase::review::{
    CreateReviewInput, CreateReviewUseCase, DeleteReviewUseCase, GetReviewUseCase,
    UpdateReviewInput, UpdateReviewUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub film_id: Uuid,
    pub user_id: Uuid,
    pub rating: f64,
    pub review: String,
    #[serde(serialize_with = "cinelog_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "cinelog_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            film_id: review.film_id,
            user_id: review.user_id,
            rating: review.rating,
            review: review.body,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
}

/// A review with its author's display name.
#[derive(Serialize)]
pub struct ReviewEntryResponse {
    #[serde(flatten)]
    pub review: ReviewResponse,
    pub user: AuthorSummary,
}

impl From<ReviewEntry> for ReviewEntryResponse {
    fn from(entry: ReviewEntry) -> Self {
        Self {
            user: AuthorSummary {
                id: entry.review.user_id,
                name: entry.author_name,
            },
            review: entry.review.into(),
        }
    }
}

// ── GET /reviews ─────────────────────────────────────────────────────────────

pub async fn list_reviews(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Page<ReviewEntryResponse>>, CatalogError> {
    let params = ListParams::parse(raw_query.as_deref())?;
    let filter = ReviewFilter {
        film_id: id_filter("film_id", params.film_id.as_deref())?,
        user_id: id_filter("user_id", params.user_id.as_deref())?,
    };
    let query: ListQuery<ReviewFilter, ReviewSortField> = params.into_query(filter);
    let usecase = ListUseCase {
        repo: state.review_repo(),
    };
    let page = usecase.execute(query).await?;
    Ok(Json(page.map(ReviewEntryResponse::from)))
}

// ── GET /reviews/{id} ────────────────────────────────────────────────────────

pub async fn get_review(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> Result<Json<ReviewEntryResponse>, CatalogError> {
    let usecase = GetReviewUseCase {
        repo: state.review_repo(),
    };
    let entry = usecase.execute(id).await?;
    Ok(Json(entry.into()))
}

// ── POST /reviews ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateReviewRequest {
    #[serde(alias = "film", alias = "filmId")]
    pub film_id: Uuid,
    pub rating: f64,
    pub review: String,
}

pub async fn create_review(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Json(body), _): JsonBody<CreateReviewRequest>,
) -> Result<Json<ReviewResponse>, CatalogError> {
    let usecase = CreateReviewUseCase {
        films: state.film_repo(),
        reviews: state.review_repo(),
    };
    let review = usecase
        .execute(
            &identity,
            CreateReviewInput {
                film_id: body.film_id,
                rating: body.rating,
                body: body.review,
            },
        )
        .await?;
    Ok(Json(review.into()))
}

// ── PUT /reviews/{id} ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: Option<f64>,
    pub review: Option<String>,
}

pub async fn update_review(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(body), _): JsonBody<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>, CatalogError> {
    let usecase = UpdateReviewUseCase {
        repo: state.review_repo(),
    };
    let review = usecase
        .execute(
            &identity,
            id,
            UpdateReviewInput {
                rating: body.rating,
                body: body.review,
            },
        )
        .await?;
    Ok(Json(review.into()))
}

// ── DELETE /reviews/{id} ─────────────────────────────────────────────────────

pub async fn delete_review(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> Result<StatusCode, CatalogError> {
    let usecase = DeleteReviewUseCase {
        repo: state.review_repo(),
    };
    usecase.execute(&identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
