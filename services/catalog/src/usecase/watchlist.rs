use anyhow::anyhow;
use chrono::Utc;
use uuid::Uuid;

use cinelog_auth_types::identity::Identity;
use cinelog_domain::watchlist::normalize_name;

use crate::domain::repository::{FilmRepository, WatchlistRepository};
use crate::domain::types::{Watchlist, WatchlistDetail};
use crate::error::CatalogError;

fn valid_name(name: &str) -> Result<String, CatalogError> {
    normalize_name(name)
        .ok_or_else(|| CatalogError::invalid("name", "must be between 1 and 100 characters"))
}

/// Drop repeated ids, keeping the first occurrence.
fn dedup_preserving_order(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut out: Vec<Uuid> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

async fn reload<W: WatchlistRepository>(
    watchlists: &W,
    id: Uuid,
) -> Result<WatchlistDetail, CatalogError> {
    watchlists
        .find_detail(id)
        .await?
        .ok_or_else(|| anyhow!("watchlist {id} vanished after write").into())
}

async fn owned<W: WatchlistRepository>(
    watchlists: &W,
    actor: &Identity,
    id: Uuid,
) -> Result<Watchlist, CatalogError> {
    watchlists
        .find_owned(id, actor.user_id)
        .await?
        .ok_or(CatalogError::WatchlistNotFound)
}

// ── CreateWatchlist ──────────────────────────────────────────────────────────

pub struct CreateWatchlistInput {
    pub name: String,
    pub is_public: Option<bool>,
    pub film_ids: Vec<Uuid>,
}

pub struct CreateWatchlistUseCase<W, F>
where
    W: WatchlistRepository,
    F: FilmRepository,
{
    pub watchlists: W,
    pub films: F,
}

impl<W, F> CreateWatchlistUseCase<W, F>
where
    W: WatchlistRepository,
    F: FilmRepository,
{
    pub async fn execute(
        &self,
        actor: &Identity,
        input: CreateWatchlistInput,
    ) -> Result<WatchlistDetail, CatalogError> {
        let name = valid_name(&input.name)?;
        let film_ids = dedup_preserving_order(input.film_ids);

        if !film_ids.is_empty() {
            let existing = self.films.existing_ids(&film_ids).await?;
            if film_ids.iter().any(|id| !existing.contains(id)) {
                return Err(CatalogError::FilmNotFound);
            }
        }
        if self.watchlists.name_taken(actor.user_id, &name, None).await? {
            return Err(CatalogError::WatchlistNameTaken);
        }

        let now = Utc::now();
        let watchlist = Watchlist {
            id: Uuid::now_v7(),
            user_id: actor.user_id,
            name,
            is_public: input.is_public.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.watchlists.create(&watchlist, &film_ids).await?;
        reload(&self.watchlists, watchlist.id).await
    }
}

// ── GetWatchlist ─────────────────────────────────────────────────────────────

pub struct GetWatchlistUseCase<W: WatchlistRepository> {
    pub repo: W,
}

impl<W: WatchlistRepository> GetWatchlistUseCase<W> {
    /// Private watchlists: anonymous callers get `Unauthenticated`, other users
    /// get `WatchlistNotFound`.
    pub async fn execute(
        &self,
        viewer: Option<&Identity>,
        id: Uuid,
    ) -> Result<WatchlistDetail, CatalogError> {
        let detail = self
            .repo
            .find_detail(id)
            .await?
            .ok_or(CatalogError::WatchlistNotFound)?;
        if detail.watchlist.is_public {
            return Ok(detail);
        }
        match viewer {
            None => Err(CatalogError::Unauthenticated),
            Some(viewer) if viewer.user_id == detail.watchlist.user_id => Ok(detail),
            Some(_) => Err(CatalogError::WatchlistNotFound),
        }
    }
}

// ── UpdateWatchlist ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateWatchlistInput {
    pub name: Option<String>,
    pub is_public: Option<bool>,
}

pub struct UpdateWatchlistUseCase<W: WatchlistRepository> {
    pub repo: W,
}

impl<W: WatchlistRepository> UpdateWatchlistUseCase<W> {
    pub async fn execute(
        &self,
        actor: &Identity,
        id: Uuid,
        input: UpdateWatchlistInput,
    ) -> Result<WatchlistDetail, CatalogError> {
        if input.name.is_none() && input.is_public.is_none() {
            return Err(CatalogError::invalid("body", "at least one field is required"));
        }
        let name = input.name.as_deref().map(valid_name).transpose()?;

        let mut watchlist = owned(&self.repo, actor, id).await?;
        if let Some(name) = name {
            if name != watchlist.name {
                if self.repo.name_taken(actor.user_id, &name, Some(id)).await? {
                    return Err(CatalogError::WatchlistNameTaken);
                }
                watchlist.name = name;
            }
        }
        if let Some(is_public) = input.is_public {
            watchlist.is_public = is_public;
        }
        watchlist.updated_at = Utc::now();
        self.repo.update(&watchlist).await?;
        reload(&self.repo, id).await
    }
}

// ── DeleteWatchlist ──────────────────────────────────────────────────────────

pub struct DeleteWatchlistUseCase<W: WatchlistRepository> {
    pub repo: W,
}

impl<W: WatchlistRepository> DeleteWatchlistUseCase<W> {
    pub async fn execute(&self, actor: &Identity, id: Uuid) -> Result<(), CatalogError> {
        if !self.repo.delete_owned(id, actor.user_id).await? {
            return Err(CatalogError::WatchlistNotFound);
        }
        Ok(())
    }
}

// ── AddFilm / RemoveFilm ─────────────────────────────────────────────────────

pub struct AddFilmUseCase<W, F>
where
    W: WatchlistRepository,
    F: FilmRepository,
{
    pub watchlists: W,
    pub films: F,
}

impl<W, F> AddFilmUseCase<W, F>
where
    W: WatchlistRepository,
    F: FilmRepository,
{
    pub async fn execute(
        &self,
        actor: &Identity,
        id: Uuid,
        film_id: Uuid,
    ) -> Result<WatchlistDetail, CatalogError> {
        owned(&self.watchlists, actor, id).await?;
        if self.films.find_by_id(film_id).await?.is_none() {
            return Err(CatalogError::FilmNotFound);
        }
        if self.watchlists.contains_film(id, film_id).await? {
            return Err(CatalogError::FilmAlreadyInWatchlist);
        }
        self.watchlists.add_film(id, film_id).await?;
        reload(&self.watchlists, id).await
    }
}

pub struct RemoveFilmUseCase<W: WatchlistRepository> {
    pub repo: W,
}

impl<W: WatchlistRepository> RemoveFilmUseCase<W> {
    /// Removing a film that is not a member leaves the watchlist unchanged.
    pub async fn execute(
        &self,
        actor: &Identity,
        id: Uuid,
        film_id: Uuid,
    ) -> Result<WatchlistDetail, CatalogError> {
        owned(&self.repo, actor, id).await?;
        self.repo.remove_film(id, film_id).await?;
        reload(&self.repo, id).await
    }
}
