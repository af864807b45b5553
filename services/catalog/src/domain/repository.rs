#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{
    Film, ListQuery, OneTimeCode, OutboxEvent, Review, ReviewEntry, User, Watchlist,
    WatchlistDetail,
};
use crate::error::CatalogError;

/// A collection that can be counted and paged under filter `F` and sort field `S`.
pub trait ListSource<F, S>: Send + Sync {
    type Item;

    /// Number of records matching `filter`, ignoring pagination.
    async fn count(&self, filter: &F) -> Result<u64, CatalogError>;

    /// One sorted page of matching records.
    async fn fetch(&self, query: &ListQuery<F, S>) -> Result<Vec<Self::Item>, CatalogError>;
}

/// Repository for accounts.
///
/// `create` and `update` answer `EmailTaken` when the email unique index is
/// violated.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, CatalogError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CatalogError>;
    async fn create(&self, user: &User) -> Result<(), CatalogError>;
    async fn update(&self, user: &User) -> Result<(), CatalogError>;
    /// Returns `false` when no row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError>;
}

/// Single-slot login code store.
pub trait OtpRepository: Send + Sync {
    /// Insert or overwrite the code of `code.user_id`.
    async fn upsert(&self, code: &OneTimeCode) -> Result<(), CatalogError>;
    async fn find(&self, user_id: Uuid) -> Result<Option<OneTimeCode>, CatalogError>;
    /// Count one wrong guess and return the new total.
    async fn record_miss(&self, user_id: Uuid) -> Result<u32, CatalogError>;
    async fn delete(&self, user_id: Uuid) -> Result<(), CatalogError>;
}

/// Outbound mail port.
pub trait Mailer: Send + Sync {
    async fn send(&self, event: &OutboxEvent) -> Result<(), CatalogError>;
}

pub trait FilmRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Film>, CatalogError>;
    /// The subset of `ids` that exist.
    async fn existing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, CatalogError>;
    async fn create(&self, film: &Film) -> Result<(), CatalogError>;
    async fn update(&self, film: &Film) -> Result<(), CatalogError>;
    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError>;
}

/// Repository for reviews.
///
/// Owner-scoped lookups return `None` both when the review does not exist and
/// when it belongs to someone else. `create` answers `ReviewExists` when the
/// `(user_id, film_id)` unique index is violated.
pub trait ReviewRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReviewEntry>, CatalogError>;
    async fn find_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<Review>, CatalogError>;
    async fn exists_for(&self, user_id: Uuid, film_id: Uuid) -> Result<bool, CatalogError>;
    async fn create(&self, review: &Review) -> Result<(), CatalogError>;
    async fn update(&self, review: &Review) -> Result<(), CatalogError>;
    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, CatalogError>;
}

/// Repository for watchlists and their film memberships.
///
/// Name collisions on the `(user_id, name)` unique index answer
/// `WatchlistNameTaken`; membership collisions answer `FilmAlreadyInWatchlist`.
pub trait WatchlistRepository: Send + Sync {
    async fn find_detail(&self, id: Uuid) -> Result<Option<WatchlistDetail>, CatalogError>;
    async fn find_owned(&self, id: Uuid, user_id: Uuid)
    -> Result<Option<Watchlist>, CatalogError>;
    /// Whether `user_id` owns a watchlist named `name`, other than `except`.
    async fn name_taken(
        &self,
        user_id: Uuid,
        name: &str,
        except: Option<Uuid>,
    ) -> Result<bool, CatalogError>;
    /// Insert the watchlist and its initial films in order.
    async fn create(&self, watchlist: &Watchlist, film_ids: &[Uuid]) -> Result<(), CatalogError>;
    async fn update(&self, watchlist: &Watchlist) -> Result<(), CatalogError>;
    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, CatalogError>;
    async fn contains_film(&self, id: Uuid, film_id: Uuid) -> Result<bool, CatalogError>;
    async fn add_film(&self, id: Uuid, film_id: Uuid) -> Result<(), CatalogError>;
    /// Remove a film; absent films are a no-op.
    async fn remove_film(&self, id: Uuid, film_id: Uuid) -> Result<(), CatalogError>;
}
