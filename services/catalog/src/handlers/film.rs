use axum::extract::{Path, RawQuery, State};
use axum::{Json, http::StatusCode};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinelog_domain::film::FilmSortField;
use cinelog_domain::pagination::Page;

use crate::domain::types::{Film, FilmFilter, ListQuery, normalize_search};
use crate::error::CatalogError;
use crate::handlers::{IdPath, JsonBody, ListParams};
use crate::state::AppState;
use crate::usecase::film::{
    CreateFilmInput, CreateFilmUseCase, DeleteFilmUseCase, GetFilmUseCase, UpdateFilmInput,
    UpdateFilmUseCase,
};
use crate::usecase::listing::ListUseCase;

#[derive(Serialize)]
pub struct FilmResponse {
    pub id: Uuid,
    pub title: String,
    pub genre: String,
    pub release_date: NaiveDate,
    pub rating: Option<f64>,
    #[serde(serialize_with = "cinelog_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Film> for FilmResponse {
    fn from(film: Film) -> Self {
        Self {
            id: film.id,
            title: film.title,
            genre: film.genre,
            release_date: film.release_date,
            rating: film.rating,
            created_at: film.created_at,
        }
    }
}

// ── GET /films ───────────────────────────────────────────────────────────────

pub async fn list_films(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Page<FilmResponse>>, CatalogError> {
    let params = ListParams::parse(raw_query.as_deref())?;
    let query: ListQuery<FilmFilter, FilmSortField> = params.into_query(FilmFilter {
        search: normalize_search(params.search.as_deref()),
    });
    let usecase = ListUseCase {
        repo: state.film_repo(),
    };
    let page = usecase.execute(query).await?;
    Ok(Json(page.map(FilmResponse::from)))
}

// ── GET /films/{id} ──────────────────────────────────────────────────────────

pub async fn get_film(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> Result<Json<FilmResponse>, CatalogError> {
    let usecase = GetFilmUseCase {
        repo: state.film_repo(),
    };
    let film = usecase.execute(id).await?;
    Ok(Json(film.into()))
}

// ── POST /films ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateFilmRequest {
    pub title: String,
    pub genre: String,
    pub release_date: String,
    pub rating: Option<f64>,
}

pub async fn create_film(
    State(state): State<AppState>,
    WithRejection(Json(body), _): JsonBody<CreateFilmRequest>,
) -> Result<Json<FilmResponse>, CatalogError> {
    let usecase = CreateFilmUseCase {
        repo: state.film_repo(),
    };
    let film = usecase
        .execute(CreateFilmInput {
            title: body.title,
            genre: body.genre,
            release_date: body.release_date,
            rating: body.rating,
        })
        .await?;
    Ok(Json(film.into()))
}

// ── PUT /films/{id} ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateFilmRequest {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub release_date: Option<String>,
    /// `null` clears the rating.
    #[serde(default, deserialize_with = "cinelog_core::serde::double_option")]
    pub rating: Option<Option<f64>>,
}

pub async fn update_film(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(body), _): JsonBody<UpdateFilmRequest>,
) -> Result<Json<FilmResponse>, CatalogError> {
    let usecase = UpdateFilmUseCase {
        repo: state.film_repo(),
    };
    let film = usecase
        .execute(
            id,
            UpdateFilmInput {
                title: body.title,
                genre: body.genre,
                release_date: body.release_date,
                rating: body.rating,
            },
        )
        .await?;
    Ok(Json(film.into()))
}

// ── DELETE /films/{id} ───────────────────────────────────────────────────────

pub async fn delete_film(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> Result<StatusCode, CatalogError> {
    let usecase = DeleteFilmUseCase {
        repo: state.film_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
