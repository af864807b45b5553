use axum::extract::{Path, RawQuery, State};
use axum::{Json, http::StatusCode};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinelog_auth_types::identity::{Identity, MaybeIdentity};
use cinelog_domain::pagination::Page;
use cinelog_domain::watchlist::WatchlistSortField;

use crate::domain::types::{Film, ListQuery, WatchlistDetail, WatchlistScope};
use crate::error::CatalogError;
use crate::handlers::{IdPath, JsonBody, ListParams, id_filter};
use crate::state::AppState;
use crate::usecase::listing::ListUseCase;
use crate::usecase::watchlist::{
    AddFilmUseCase, CreateWatchlistInput, CreateWatchlistUseCase, DeleteWatchlistUseCase,
    GetWatchlistUseCase, RemoveFilmUseCase, UpdateWatchlistInput, UpdateWatchlistUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Serialize)]
pub struct FilmSummary {
    pub id: Uuid,
    pub title: String,
    pub genre: String,
    pub release_date: NaiveDate,
    pub rating: Option<f64>,
}

impl From<Film> for FilmSummary {
    fn from(film: Film) -> Self {
        Self {
            id: film.id,
            title: film.title,
            genre: film.genre,
            release_date: film.release_date,
            rating: film.rating,
        }
    }
}

#[derive(Serialize)]
pub struct WatchlistResponse {
    pub id: Uuid,
    pub name: String,
    pub is_public: bool,
    pub user: OwnerSummary,
    pub films: Vec<FilmSummary>,
    #[serde(serialize_with = "cinelog_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "cinelog_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<WatchlistDetail> for WatchlistResponse {
    fn from(detail: WatchlistDetail) -> Self {
        let WatchlistDetail {
            watchlist,
            owner_name,
            films,
        } = detail;
        Self {
            id: watchlist.id,
            name: watchlist.name,
            is_public: watchlist.is_public,
            user: OwnerSummary {
                id: watchlist.user_id,
                name: owner_name,
            },
            films: films.into_iter().map(FilmSummary::from).collect(),
            created_at: watchlist.created_at,
            updated_at: watchlist.updated_at,
        }
    }
}

// ── GET /watchlists ──────────────────────────────────────────────────────────

pub async fn list_watchlists(
    MaybeIdentity(viewer): MaybeIdentity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Page<WatchlistResponse>>, CatalogError> {
    let params = ListParams::parse(raw_query.as_deref())?;
    let owner = id_filter("user_id", params.user_id.as_deref())?;
    let scope = WatchlistScope::resolve(owner, viewer.map(|v| v.user_id));
    let query: ListQuery<WatchlistScope, WatchlistSortField> = params.into_query(scope);
    let usecase = ListUseCase {
        repo: state.watchlist_repo(),
    };
    let page = usecase.execute(query).await?;
    Ok(Json(page.map(WatchlistResponse::from)))
}

// ── GET /watchlists/{id} ─────────────────────────────────────────────────────

pub async fn get_watchlist(
    MaybeIdentity(viewer): MaybeIdentity,
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> Result<Json<WatchlistResponse>, CatalogError> {
    let usecase = GetWatchlistUseCase {
        repo: state.watchlist_repo(),
    };
    let detail = usecase.execute(viewer.as_ref(), id).await?;
    Ok(Json(detail.into()))
}

// ── POST /watchlists ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateWatchlistRequest {
    pub name: String,
    #[serde(alias = "isPublic")]
    pub is_public: Option<bool>,
    #[serde(default, alias = "film_ids")]
    pub films: Vec<Uuid>,
}

pub async fn create_watchlist(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Json(body), _): JsonBody<CreateWatchlistRequest>,
) -> Result<(StatusCode, Json<WatchlistResponse>), CatalogError> {
    let usecase = CreateWatchlistUseCase {
        watchlists: state.watchlist_repo(),
        films: state.film_repo(),
    };
    let detail = usecase
        .execute(
            &identity,
            CreateWatchlistInput {
                name: body.name,
                is_public: body.is_public,
                film_ids: body.films,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}

// ── PUT /watchlists/{id} ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateWatchlistRequest {
    pub name: Option<String>,
    #[serde(alias = "isPublic")]
    pub is_public: Option<bool>,
}

pub async fn update_watchlist(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(body), _): JsonBody<UpdateWatchlistRequest>,
) -> Result<Json<WatchlistResponse>, CatalogError> {
    let usecase = UpdateWatchlistUseCase {
        repo: state.watchlist_repo(),
    };
    let detail = usecase
        .execute(
            &identity,
            id,
            UpdateWatchlistInput {
                name: body.name,
                is_public: body.is_public,
            },
        )
        .await?;
    Ok(Json(detail.into()))
}

// ── DELETE /watchlists/{id} ──────────────────────────────────────────────────

pub async fn delete_watchlist(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> Result<StatusCode, CatalogError> {
    let usecase = DeleteWatchlistUseCase {
        repo: state.watchlist_repo(),
    };
    usecase.execute(&identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PUT /watchlists/{id}/films/{add,remove} ──────────────────────────────────

#[derive(Deserialize)]
pub struct MembershipRequest {
    #[serde(alias = "filmId")]
    pub film_id: Uuid,
}

pub async fn add_film(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(body), _): JsonBody<MembershipRequest>,
) -> Result<Json<WatchlistResponse>, CatalogError> {
    let usecase = AddFilmUseCase {
        watchlists: state.watchlist_repo(),
        films: state.film_repo(),
    };
    let detail = usecase.execute(&identity, id, body.film_id).await?;
    Ok(Json(detail.into()))
}

pub async fn remove_film(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(body), _): JsonBody<MembershipRequest>,
) -> Result<Json<WatchlistResponse>, CatalogError> {
    let usecase = RemoveFilmUseCase {
        repo: state.watchlist_repo(),
    };
    let detail = usecase.execute(&identity, id, body.film_id).await?;
    Ok(Json(detail.into()))
}
