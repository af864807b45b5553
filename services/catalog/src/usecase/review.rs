use chrono::Utc;
use uuid::Uuid;

use cinelog_auth_types::identity::Identity;

use crate::domain::repository::{FilmRepository, ReviewRepository};
use crate::domain::types::{Review, ReviewEntry, Violations, validate_rating, validate_review_body};
use crate::error::CatalogError;

// ── CreateReview ─────────────────────────────────────────────────────────────

pub struct CreateReviewInput {
    pub film_id: Uuid,
    pub rating: f64,
    pub body: String,
}

pub struct CreateReviewUseCase<F, R>
where
    F: FilmRepository,
    R: ReviewRepository,
{
    pub films: F,
    pub reviews: R,
}

impl<F, R> CreateReviewUseCase<F, R>
where
    F: FilmRepository,
    R: ReviewRepository,
{
    pub async fn execute(
        &self,
        actor: &Identity,
        input: CreateReviewInput,
    ) -> Result<Review, CatalogError> {
        let mut v = Violations::new();
        validate_rating(&mut v, input.rating);
        validate_review_body(&mut v, &input.body);
        v.finish()?;

        if self.films.find_by_id(input.film_id).await?.is_none() {
            return Err(CatalogError::FilmNotFound);
        }
        if self.reviews.exists_for(actor.user_id, input.film_id).await? {
            return Err(CatalogError::ReviewExists);
        }

        let now = Utc::now();
        let review = Review {
            id: Uuid::now_v7(),
            film_id: input.film_id,
            user_id: actor.user_id,
            rating: input.rating,
            body: input.body,
            created_at: now,
            updated_at: now,
        };
        self.reviews.create(&review).await?;
        Ok(review)
    }
}

// ── GetReview ────────────────────────────────────────────────────────────────

pub struct GetReviewUseCase<R: ReviewRepository> {
    pub repo: R,
}

impl<R: ReviewRepository> GetReviewUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<ReviewEntry, CatalogError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::ReviewNotFound)
    }
}

// ── UpdateReview ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateReviewInput {
    pub rating: Option<f64>,
    pub body: Option<String>,
}

pub struct UpdateReviewUseCase<R: ReviewRepository> {
    pub repo: R,
}

impl<R: ReviewRepository> UpdateReviewUseCase<R> {
    /// Only the author may update; anyone else sees `ReviewNotFound`.
    pub async fn execute(
        &self,
        actor: &Identity,
        id: Uuid,
        input: UpdateReviewInput,
    ) -> Result<Review, CatalogError> {
        let mut v = Violations::new();
        v.check(
            input.rating.is_some() || input.body.is_some(),
            "body",
            "at least one field is required",
        );
        if let Some(rating) = input.rating {
            validate_rating(&mut v, rating);
        }
        if let Some(body) = &input.body {
            validate_review_body(&mut v, body);
        }
        v.finish()?;

        let mut review = self
            .repo
            .find_owned(id, actor.user_id)
            .await?
            .ok_or(CatalogError::ReviewNotFound)?;
        if let Some(rating) = input.rating {
            review.rating = rating;
        }
        if let Some(body) = input.body {
            review.body = body;
        }
        review.updated_at = Utc::now();
        self.repo.update(&review).await?;
        Ok(review)
    }
}

// ── DeleteReview ─────────────────────────────────────────────────────────────

pub struct DeleteReviewUseCase<R: ReviewRepository> {
    pub repo: R,
}

impl<R: ReviewRepository> DeleteReviewUseCase<R> {
    pub async fn execute(&self, actor: &Identity, id: Uuid) -> Result<(), CatalogError> {
        if !self.repo.delete_owned(id, actor.user_id).await? {
            return Err(CatalogError::ReviewNotFound);
        }
        Ok(())
    }
}
