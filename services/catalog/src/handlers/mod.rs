pub mod film;
pub mod review;
pub mod user;
pub mod watchlist;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use cinelog_domain::pagination::{PageRequest, SortField, SortSpec};

use crate::domain::types::ListQuery;
use crate::error::CatalogError;
use crate::state::AppState;

/// JSON body whose rejection renders as a `VALIDATION` error.
pub type JsonBody<T> = WithRejection<Json<T>, CatalogError>;

/// Resource id from the path; malformed ids render as a `VALIDATION` error.
pub type IdPath<T = Uuid> = WithRejection<Path<T>, CatalogError>;

/// Handler for `GET /readyz`: ready once the database answers.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    cinelog_core::health::database_ready(&state.db).await
}

/// Raw list query. Every value stays a string so unparsable numbers fall back
/// to their defaults instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub page: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub search: Option<String>,
    #[serde(alias = "filmId")]
    pub film_id: Option<String>,
    #[serde(alias = "userId")]
    pub user_id: Option<String>,
}

impl ListParams {
    pub fn parse(raw: Option<&str>) -> Result<Self, CatalogError> {
        parse_query(raw)
    }

    /// Combine `filter` with this request's sort and page window.
    pub fn into_query<F, S: SortField>(&self, filter: F) -> ListQuery<F, S> {
        ListQuery {
            filter,
            sort: SortSpec::from_params(self.sort_by.as_deref(), self.sort_order.as_deref()),
            page: PageRequest::from_params(self.limit.as_deref(), self.page.as_deref()),
        }
    }
}

fn parse_query<T: DeserializeOwned + Default>(raw: Option<&str>) -> Result<T, CatalogError> {
    raw.map(serde_qs::from_str)
        .transpose()
        .map_err(|e| CatalogError::invalid("query", &e.to_string()))
        .map(Option::unwrap_or_default)
}

/// Parse an optional id filter; blank means "no filter".
pub fn id_filter(field: &str, raw: Option<&str>) -> Result<Option<Uuid>, CatalogError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => Uuid::parse_str(s)
            .map(Some)
            .map_err(|_| CatalogError::invalid(field, "must be a UUID")),
    }
}
