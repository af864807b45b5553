use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select, SelectTwo, SqlErr, TransactionError, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use cinelog_catalog_schema::constraints::{
    FK_ONE_TIME_CODES_USER, FK_REVIEWS_USER, FK_WATCHLIST_FILMS_WATCHLIST, FK_WATCHLISTS_USER,
};
use cinelog_catalog_schema::{
    films, one_time_codes, outbox_events, reviews, users, watchlist_films, watchlists,
};
use cinelog_core::sea_ext::{SelectListExt as _, contains_ci};
use cinelog_domain::film::FilmSortField;
use cinelog_domain::review::ReviewSortField;
use cinelog_domain::user::{UserRole, UserSortField};
use cinelog_domain::watchlist::WatchlistSortField;

use crate::domain::repository::{
    FilmRepository, ListSource, Mailer, OtpRepository, ReviewRepository, UserRepository,
    WatchlistRepository,
};
use crate::domain::types::{
    Film, FilmFilter, ListQuery, MAX_OTP_ATTEMPTS, OneTimeCode, OutboxEvent, Review, ReviewEntry,
    ReviewFilter, User, UserFilter, Watchlist, WatchlistDetail, WatchlistScope,
};
use crate::error::CatalogError;

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Domain error for an insert whose parent row is gone, keyed on the
/// violated constraint's name.
fn missing_parent(e: &DbErr) -> Option<CatalogError> {
    let Some(SqlErr::ForeignKeyConstraintViolation(message)) = e.sql_err() else {
        return None;
    };
    Some(missing_parent_for(&message))
}

fn missing_parent_for(message: &str) -> CatalogError {
    if [FK_REVIEWS_USER, FK_WATCHLISTS_USER, FK_ONE_TIME_CODES_USER]
        .iter()
        .any(|name| message.contains(name))
    {
        // The token outlived its account.
        CatalogError::Unauthenticated
    } else if message.contains(FK_WATCHLIST_FILMS_WATCHLIST) {
        CatalogError::WatchlistNotFound
    } else {
        CatalogError::FilmNotFound
    }
}

fn flatten(e: TransactionError<DbErr>) -> DbErr {
    match e {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => e,
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, CatalogError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CatalogError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), CatalogError> {
        match user_to_active(user).insert(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(CatalogError::EmailTaken),
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn update(&self, user: &User) -> Result<(), CatalogError> {
        match user_to_active(user).update(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(CatalogError::EmailTaken),
            Err(DbErr::RecordNotUpdated) => Err(CatalogError::UserNotFound),
            Err(e) => Err(anyhow::Error::new(e).context("update user").into()),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
        let res = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(res.rows_affected > 0)
    }
}

fn user_condition(filter: &UserFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(term) = &filter.search {
        cond = cond.add(
            Condition::any()
                .add(contains_ci(users::Column::Name, term))
                .add(contains_ci(users::Column::Email, term)),
        );
    }
    cond
}

fn user_page(query: &ListQuery<UserFilter, UserSortField>) -> Select<users::Entity> {
    let col = match query.sort.field {
        UserSortField::CreatedAt => users::Column::CreatedAt,
        UserSortField::Name => users::Column::Name,
        UserSortField::Email => users::Column::Email,
    };
    users::Entity::find()
        .filter(user_condition(&query.filter))
        .sorted_by(col, query.sort.order, users::Column::Id)
        .paged(query.page)
}

impl ListSource<UserFilter, UserSortField> for DbUserRepository {
    type Item = User;

    async fn count(&self, filter: &UserFilter) -> Result<u64, CatalogError> {
        let count = users::Entity::find()
            .filter(user_condition(filter))
            .count(&self.db)
            .await
            .context("count users")?;
        Ok(count)
    }

    async fn fetch(
        &self,
        query: &ListQuery<UserFilter, UserSortField>,
    ) -> Result<Vec<User>, CatalogError> {
        let models = user_page(query).all(&self.db).await.context("list users")?;
        models.into_iter().map(user_from_model).collect()
    }
}

fn user_to_active(user: &User) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(user.id),
        email: Set(user.email.clone()),
        name: Set(user.name.clone()),
        password_hash: Set(user.password_hash.clone()),
        phone: Set(user.phone.clone()),
        address: Set(user.address.clone()),
        role: Set(user.role.as_str().to_owned()),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
    }
}

fn user_from_model(model: users::Model) -> Result<User, CatalogError> {
    let role = model.role.parse::<UserRole>().context("decode user role")?;
    Ok(User {
        id: model.id,
        email: model.email,
        name: model.name,
        password_hash: model.password_hash,
        phone: model.phone,
        address: model.address,
        role,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── One-time code repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn upsert(&self, code: &OneTimeCode) -> Result<(), CatalogError> {
        let model = one_time_codes::ActiveModel {
            user_id: Set(code.user_id),
            code: Set(code.code.clone()),
            attempts: Set(0),
            created_at: Set(code.created_at),
            expires_at: Set(code.expires_at),
        };
        one_time_codes::Entity::insert(model)
            .on_conflict(
                OnConflict::column(one_time_codes::Column::UserId)
                    .update_columns([
                        one_time_codes::Column::Code,
                        one_time_codes::Column::Attempts,
                        one_time_codes::Column::CreatedAt,
                        one_time_codes::Column::ExpiresAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| {
                missing_parent(&e).unwrap_or_else(|| {
                    anyhow::Error::new(e)
                        .context("upsert one-time code")
                        .into()
                })
            })?;
        Ok(())
    }

    async fn find(&self, user_id: Uuid) -> Result<Option<OneTimeCode>, CatalogError> {
        let model = one_time_codes::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("find one-time code")?;
        Ok(model.map(|m| OneTimeCode {
            user_id: m.user_id,
            code: m.code,
            attempts: u32::try_from(m.attempts).unwrap_or(0),
            created_at: m.created_at,
            expires_at: m.expires_at,
        }))
    }

    async fn record_miss(&self, user_id: Uuid) -> Result<u32, CatalogError> {
        let rows = one_time_codes::Entity::update_many()
            .col_expr(
                one_time_codes::Column::Attempts,
                Expr::col(one_time_codes::Column::Attempts).add(1),
            )
            .filter(one_time_codes::Column::UserId.eq(user_id))
            .exec_with_returning(&self.db)
            .await
            .context("record login code miss")?;
        // A vanished row counts as exhausted.
        Ok(rows.first().map_or(MAX_OTP_ATTEMPTS, |m| {
            u32::try_from(m.attempts).unwrap_or(MAX_OTP_ATTEMPTS)
        }))
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), CatalogError> {
        one_time_codes::Entity::delete_by_id(user_id)
            .exec(&self.db)
            .await
            .context("delete one-time code")?;
        Ok(())
    }
}

// ── Outbox mailer ────────────────────────────────────────────────────────────

/// Writes mail requests to `outbox_events`; an external relay delivers them.
#[derive(Clone)]
pub struct OutboxMailer {
    pub db: DatabaseConnection,
}

impl Mailer for OutboxMailer {
    async fn send(&self, event: &OutboxEvent) -> Result<(), CatalogError> {
        insert_outbox_event(&self.db, event)
            .await
            .context("insert outbox event")?;
        Ok(())
    }
}

async fn insert_outbox_event<C: ConnectionTrait>(
    conn: &C,
    event: &OutboxEvent,
) -> Result<(), DbErr> {
    outbox_to_active(event, Utc::now()).insert(conn).await?;
    Ok(())
}

fn outbox_to_active(
    event: &OutboxEvent,
    created_at: DateTime<Utc>,
) -> outbox_events::ActiveModel {
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        created_at: Set(created_at),
    }
}

// ── Film repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFilmRepository {
    pub db: DatabaseConnection,
}

impl FilmRepository for DbFilmRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Film>, CatalogError> {
        let model = films::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find film by id")?;
        Ok(model.map(film_from_model))
    }

    async fn existing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, CatalogError> {
        let found = films::Entity::find()
            .select_only()
            .column(films::Column::Id)
            .filter(films::Column::Id.is_in(ids.iter().copied()))
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .context("find existing film ids")?;
        Ok(found)
    }

    async fn create(&self, film: &Film) -> Result<(), CatalogError> {
        film_to_active(film)
            .insert(&self.db)
            .await
            .context("create film")?;
        Ok(())
    }

    async fn update(&self, film: &Film) -> Result<(), CatalogError> {
        match film_to_active(film).update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(CatalogError::FilmNotFound),
            Err(e) => Err(anyhow::Error::new(e).context("update film").into()),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
        let res = films::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete film")?;
        Ok(res.rows_affected > 0)
    }
}

fn film_condition(filter: &FilmFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(term) = &filter.search {
        cond = cond.add(
            Condition::any()
                .add(contains_ci(films::Column::Title, term))
                .add(contains_ci(films::Column::Genre, term)),
        );
    }
    cond
}

fn film_page(query: &ListQuery<FilmFilter, FilmSortField>) -> Select<films::Entity> {
    let col = match query.sort.field {
        FilmSortField::CreatedAt => films::Column::CreatedAt,
        FilmSortField::Title => films::Column::Title,
        FilmSortField::Genre => films::Column::Genre,
        FilmSortField::ReleaseDate => films::Column::ReleaseDate,
        FilmSortField::Rating => films::Column::Rating,
    };
    films::Entity::find()
        .filter(film_condition(&query.filter))
        .sorted_by(col, query.sort.order, films::Column::Id)
        .paged(query.page)
}

impl ListSource<FilmFilter, FilmSortField> for DbFilmRepository {
    type Item = Film;

    async fn count(&self, filter: &FilmFilter) -> Result<u64, CatalogError> {
        let count = films::Entity::find()
            .filter(film_condition(filter))
            .count(&self.db)
            .await
            .context("count films")?;
        Ok(count)
    }

    async fn fetch(
        &self,
        query: &ListQuery<FilmFilter, FilmSortField>,
    ) -> Result<Vec<Film>, CatalogError> {
        let models = film_page(query).all(&self.db).await.context("list films")?;
        Ok(models.into_iter().map(film_from_model).collect())
    }
}

fn film_to_active(film: &Film) -> films::ActiveModel {
    films::ActiveModel {
        id: Set(film.id),
        title: Set(film.title.clone()),
        genre: Set(film.genre.clone()),
        release_date: Set(film.release_date),
        rating: Set(film.rating),
        created_at: Set(film.created_at),
    }
}

fn film_from_model(model: films::Model) -> Film {
    Film {
        id: model.id,
        title: model.title,
        genre: model.genre,
        release_date: model.release_date,
        rating: model.rating,
        created_at: model.created_at,
    }
}

// ── Review repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

impl ReviewRepository for DbReviewRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReviewEntry>, CatalogError> {
        let row = reviews::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find review by id")?;
        Ok(row.map(review_entry_from_row))
    }

    async fn find_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<Review>, CatalogError> {
        let model = reviews::Entity::find()
            .filter(reviews::Column::Id.eq(id))
            .filter(reviews::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find owned review")?;
        Ok(model.map(review_from_model))
    }

    async fn exists_for(&self, user_id: Uuid, film_id: Uuid) -> Result<bool, CatalogError> {
        let count = reviews::Entity::find()
            .filter(reviews::Column::UserId.eq(user_id))
            .filter(reviews::Column::FilmId.eq(film_id))
            .count(&self.db)
            .await
            .context("check existing review")?;
        Ok(count > 0)
    }

    async fn create(&self, review: &Review) -> Result<(), CatalogError> {
        let model = reviews::ActiveModel {
            id: Set(review.id),
            film_id: Set(review.film_id),
            user_id: Set(review.user_id),
            rating: Set(review.rating),
            body: Set(review.body.clone()),
            created_at: Set(review.created_at),
            updated_at: Set(review.updated_at),
        };
        match model.insert(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(CatalogError::ReviewExists),
            Err(e) => Err(missing_parent(&e)
                .unwrap_or_else(|| anyhow::Error::new(e).context("create review").into())),
        }
    }

    async fn update(&self, review: &Review) -> Result<(), CatalogError> {
        let model = reviews::ActiveModel {
            id: Set(review.id),
            rating: Set(review.rating),
            body: Set(review.body.clone()),
            updated_at: Set(review.updated_at),
            ..Default::default()
        };
        match model.update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(CatalogError::ReviewNotFound),
            Err(e) => Err(anyhow::Error::new(e).context("update review").into()),
        }
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, CatalogError> {
        let res = reviews::Entity::delete_many()
            .filter(reviews::Column::Id.eq(id))
            .filter(reviews::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete owned review")?;
        Ok(res.rows_affected > 0)
    }
}

fn review_condition(filter: &ReviewFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(film_id) = filter.film_id {
        cond = cond.add(reviews::Column::FilmId.eq(film_id));
    }
    if let Some(user_id) = filter.user_id {
        cond = cond.add(reviews::Column::UserId.eq(user_id));
    }
    cond
}

/// Reviews joined with their author.
fn review_page(
    query: &ListQuery<ReviewFilter, ReviewSortField>,
) -> SelectTwo<reviews::Entity, users::Entity> {
    let col = match query.sort.field {
        ReviewSortField::CreatedAt => reviews::Column::CreatedAt,
        ReviewSortField::Rating => reviews::Column::Rating,
    };
    reviews::Entity::find()
        .filter(review_condition(&query.filter))
        .find_also_related(users::Entity)
        .sorted_by(col, query.sort.order, reviews::Column::Id)
        .paged(query.page)
}

impl ListSource<ReviewFilter, ReviewSortField> for DbReviewRepository {
    type Item = ReviewEntry;

    async fn count(&self, filter: &ReviewFilter) -> Result<u64, CatalogError> {
        let count = reviews::Entity::find()
            .filter(review_condition(filter))
            .count(&self.db)
            .await
            .context("count reviews")?;
        Ok(count)
    }

    async fn fetch(
        &self,
        query: &ListQuery<ReviewFilter, ReviewSortField>,
    ) -> Result<Vec<ReviewEntry>, CatalogError> {
        let rows = review_page(query).all(&self.db).await.context("list reviews")?;
        Ok(rows.into_iter().map(review_entry_from_row).collect())
    }
}

fn review_from_model(model: reviews::Model) -> Review {
    Review {
        id: model.id,
        film_id: model.film_id,
        user_id: model.user_id,
        rating: model.rating,
        body: model.body,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn review_entry_from_row((review, author): (reviews::Model, Option<users::Model>)) -> ReviewEntry {
    ReviewEntry {
        review: review_from_model(review),
        author_name: author.map(|u| u.name).unwrap_or_default(),
    }
}

// ── Watchlist repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbWatchlistRepository {
    pub db: DatabaseConnection,
}

impl DbWatchlistRepository {
    /// Films of each watchlist in `ids`, in insertion order.
    async fn films_of(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Film>>, CatalogError> {
        let rows = watchlist_films::Entity::find()
            .filter(watchlist_films::Column::WatchlistId.is_in(ids.iter().copied()))
            .find_also_related(films::Entity)
            .order_by_asc(watchlist_films::Column::AddedAt)
            .order_by_asc(watchlist_films::Column::FilmId)
            .all(&self.db)
            .await
            .context("load watchlist films")?;

        let mut by_watchlist: HashMap<Uuid, Vec<Film>> = HashMap::new();
        for (membership, film) in rows {
            if let Some(film) = film {
                by_watchlist
                    .entry(membership.watchlist_id)
                    .or_default()
                    .push(film_from_model(film));
            }
        }
        Ok(by_watchlist)
    }

    async fn touch(&self, id: Uuid) -> Result<(), CatalogError> {
        watchlists::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("touch watchlist")?;
        Ok(())
    }
}

impl WatchlistRepository for DbWatchlistRepository {
    async fn find_detail(&self, id: Uuid) -> Result<Option<WatchlistDetail>, CatalogError> {
        let row = watchlists::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find watchlist by id")?;
        let Some((watchlist, owner)) = row else {
            return Ok(None);
        };
        let mut films = self.films_of(&[watchlist.id]).await?;
        Ok(Some(WatchlistDetail {
            films: films.remove(&watchlist.id).unwrap_or_default(),
            owner_name: owner.map(|u| u.name).unwrap_or_default(),
            watchlist: watchlist_from_model(watchlist),
        }))
    }

    async fn find_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Watchlist>, CatalogError> {
        let model = watchlists::Entity::find()
            .filter(watchlists::Column::Id.eq(id))
            .filter(watchlists::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find owned watchlist")?;
        Ok(model.map(watchlist_from_model))
    }

    async fn name_taken(
        &self,
        user_id: Uuid,
        name: &str,
        except: Option<Uuid>,
    ) -> Result<bool, CatalogError> {
        let mut query = watchlists::Entity::find()
            .filter(watchlists::Column::UserId.eq(user_id))
            .filter(watchlists::Column::Name.eq(name));
        if let Some(except) = except {
            query = query.filter(watchlists::Column::Id.ne(except));
        }
        let count = query
            .count(&self.db)
            .await
            .context("check watchlist name")?;
        Ok(count > 0)
    }

    async fn create(&self, watchlist: &Watchlist, film_ids: &[Uuid]) -> Result<(), CatalogError> {
        let watchlist = watchlist.clone();
        let film_ids = film_ids.to_vec();
        let result = self
            .db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    watchlist_to_active(&watchlist).insert(txn).await?;
                    // Offsets keep insertion order under one timestamp.
                    for (i, film_id) in film_ids.into_iter().enumerate() {
                        watchlist_films::ActiveModel {
                            watchlist_id: Set(watchlist.id),
                            film_id: Set(film_id),
                            added_at: Set(watchlist.created_at + Duration::microseconds(i as i64)),
                        }
                        .insert(txn)
                        .await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(flatten);
        match result {
            Ok(()) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(CatalogError::WatchlistNameTaken),
            Err(e) => Err(missing_parent(&e)
                .unwrap_or_else(|| anyhow::Error::new(e).context("create watchlist").into())),
        }
    }

    async fn update(&self, watchlist: &Watchlist) -> Result<(), CatalogError> {
        let model = watchlists::ActiveModel {
            id: Set(watchlist.id),
            name: Set(watchlist.name.clone()),
            is_public: Set(watchlist.is_public),
            updated_at: Set(watchlist.updated_at),
            ..Default::default()
        };
        match model.update(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(CatalogError::WatchlistNameTaken),
            Err(DbErr::RecordNotUpdated) => Err(CatalogError::WatchlistNotFound),
            Err(e) => Err(anyhow::Error::new(e).context("update watchlist").into()),
        }
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, CatalogError> {
        let res = watchlists::Entity::delete_many()
            .filter(watchlists::Column::Id.eq(id))
            .filter(watchlists::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete owned watchlist")?;
        Ok(res.rows_affected > 0)
    }

    async fn contains_film(&self, id: Uuid, film_id: Uuid) -> Result<bool, CatalogError> {
        let model = watchlist_films::Entity::find_by_id((id, film_id))
            .one(&self.db)
            .await
            .context("check watchlist membership")?;
        Ok(model.is_some())
    }

    async fn add_film(&self, id: Uuid, film_id: Uuid) -> Result<(), CatalogError> {
        let membership = watchlist_films::ActiveModel {
            watchlist_id: Set(id),
            film_id: Set(film_id),
            added_at: Set(Utc::now()),
        };
        match membership.insert(&self.db).await {
            Ok(_) => self.touch(id).await,
            Err(e) if is_unique_violation(&e) => Err(CatalogError::FilmAlreadyInWatchlist),
            Err(e) => Err(missing_parent(&e).unwrap_or_else(|| {
                anyhow::Error::new(e)
                    .context("add film to watchlist")
                    .into()
            })),
        }
    }

    async fn remove_film(&self, id: Uuid, film_id: Uuid) -> Result<(), CatalogError> {
        let res = watchlist_films::Entity::delete_by_id((id, film_id))
            .exec(&self.db)
            .await
            .context("remove film from watchlist")?;
        if res.rows_affected > 0 {
            self.touch(id).await?;
        }
        Ok(())
    }
}

fn watchlist_condition(scope: &WatchlistScope) -> Condition {
    match *scope {
        WatchlistScope::Public => Condition::all().add(watchlists::Column::IsPublic.eq(true)),
        WatchlistScope::PublicOf(owner) => Condition::all()
            .add(watchlists::Column::UserId.eq(owner))
            .add(watchlists::Column::IsPublic.eq(true)),
        WatchlistScope::AllOf(owner) => Condition::all().add(watchlists::Column::UserId.eq(owner)),
    }
}

/// Watchlists joined with their owner. Films are loaded separately.
fn watchlist_page(
    query: &ListQuery<WatchlistScope, WatchlistSortField>,
) -> SelectTwo<watchlists::Entity, users::Entity> {
    let col = match query.sort.field {
        WatchlistSortField::CreatedAt => watchlists::Column::CreatedAt,
        WatchlistSortField::UpdatedAt => watchlists::Column::UpdatedAt,
        WatchlistSortField::Name => watchlists::Column::Name,
    };
    watchlists::Entity::find()
        .filter(watchlist_condition(&query.filter))
        .find_also_related(users::Entity)
        .sorted_by(col, query.sort.order, watchlists::Column::Id)
        .paged(query.page)
}

impl ListSource<WatchlistScope, WatchlistSortField> for DbWatchlistRepository {
    type Item = WatchlistDetail;

    async fn count(&self, scope: &WatchlistScope) -> Result<u64, CatalogError> {
        let count = watchlists::Entity::find()
            .filter(watchlist_condition(scope))
            .count(&self.db)
            .await
            .context("count watchlists")?;
        Ok(count)
    }

    async fn fetch(
        &self,
        query: &ListQuery<WatchlistScope, WatchlistSortField>,
    ) -> Result<Vec<WatchlistDetail>, CatalogError> {
        let rows = watchlist_page(query).all(&self.db).await.context("list watchlists")?;

        let ids: Vec<Uuid> = rows.iter().map(|(w, _)| w.id).collect();
        let mut films = self.films_of(&ids).await?;
        Ok(rows
            .into_iter()
            .map(|(watchlist, owner)| WatchlistDetail {
                films: films.remove(&watchlist.id).unwrap_or_default(),
                owner_name: owner.map(|u| u.name).unwrap_or_default(),
                watchlist: watchlist_from_model(watchlist),
            })
            .collect())
    }
}

fn watchlist_to_active(watchlist: &Watchlist) -> watchlists::ActiveModel {
    watchlists::ActiveModel {
        id: Set(watchlist.id),
        user_id: Set(watchlist.user_id),
        name: Set(watchlist.name.clone()),
        is_public: Set(watchlist.is_public),
        created_at: Set(watchlist.created_at),
        updated_at: Set(watchlist.updated_at),
    }
}

fn watchlist_from_model(model: watchlists::Model) -> Watchlist {
    Watchlist {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
        is_public: model.is_public,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
