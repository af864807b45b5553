use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::FilmRepository;
use crate::domain::types::{
    Film, Violations, parse_release_date, validate_genre, validate_rating, validate_title,
};
use crate::error::CatalogError;

// ── CreateFilm ───────────────────────────────────────────────────────────────

pub struct CreateFilmInput {
    pub title: String,
    pub genre: String,
    pub release_date: String,
    pub rating: Option<f64>,
}

pub struct CreateFilmUseCase<R: FilmRepository> {
    pub repo: R,
}

impl<R: FilmRepository> CreateFilmUseCase<R> {
    /// Title is trimmed; genre is stored verbatim.
    pub async fn execute(&self, input: CreateFilmInput) -> Result<Film, CatalogError> {
        let mut v = Violations::new();
        validate_title(&mut v, &input.title);
        validate_genre(&mut v, &input.genre);
        let release_date = parse_release_date(&mut v, &input.release_date);
        if let Some(rating) = input.rating {
            validate_rating(&mut v, rating);
        }
        v.finish()?;
        let Some(release_date) = release_date else {
            return Err(CatalogError::invalid("release_date", "must be a YYYY-MM-DD date"));
        };

        let film = Film {
            id: Uuid::now_v7(),
            title: input.title.trim().to_owned(),
            genre: input.genre,
            release_date,
            rating: input.rating,
            created_at: Utc::now(),
        };
        self.repo.create(&film).await?;
        Ok(film)
    }
}

// ── GetFilm ──────────────────────────────────────────────────────────────────

pub struct GetFilmUseCase<R: FilmRepository> {
    pub repo: R,
}

impl<R: FilmRepository> GetFilmUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Film, CatalogError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::FilmNotFound)
    }
}

// ── UpdateFilm ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateFilmInput {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub release_date: Option<String>,
    /// `Some(None)` clears the rating.
    pub rating: Option<Option<f64>>,
}

pub struct UpdateFilmUseCase<R: FilmRepository> {
    pub repo: R,
}

impl<R: FilmRepository> UpdateFilmUseCase<R> {
    pub async fn execute(&self, id: Uuid, input: UpdateFilmInput) -> Result<Film, CatalogError> {
        let mut v = Violations::new();
        v.check(
            input.title.is_some()
                || input.genre.is_some()
                || input.release_date.is_some()
                || input.rating.is_some(),
            "body",
            "at least one field is required",
        );
        if let Some(title) = &input.title {
            validate_title(&mut v, title);
        }
        if let Some(genre) = &input.genre {
            validate_genre(&mut v, genre);
        }
        let release_date = input
            .release_date
            .as_deref()
            .and_then(|raw| parse_release_date(&mut v, raw));
        if let Some(Some(rating)) = input.rating {
            validate_rating(&mut v, rating);
        }
        v.finish()?;

        let mut film = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::FilmNotFound)?;
        if let Some(title) = input.title {
            film.title = title.trim().to_owned();
        }
        if let Some(genre) = input.genre {
            film.genre = genre;
        }
        if let Some(release_date) = release_date {
            film.release_date = release_date;
        }
        if let Some(rating) = input.rating {
            film.rating = rating;
        }
        self.repo.update(&film).await?;
        Ok(film)
    }
}

// ── DeleteFilm ───────────────────────────────────────────────────────────────

pub struct DeleteFilmUseCase<R: FilmRepository> {
    pub repo: R,
}

impl<R: FilmRepository> DeleteFilmUseCase<R> {
    /// Reviews and watchlist memberships of the film cascade.
    pub async fn execute(&self, id: Uuid) -> Result<(), CatalogError> {
        if !self.repo.delete(id).await? {
            return Err(CatalogError::FilmNotFound);
        }
        Ok(())
    }
}
