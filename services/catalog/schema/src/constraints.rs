//! Constraint names shared by the migrations and the repositories that map
//! violations back to domain errors.

pub const FK_ONE_TIME_CODES_USER: &str = "fk_one_time_codes_user_id";
pub const FK_REVIEWS_FILM: &str = "fk_reviews_film_id";
pub const FK_REVIEWS_USER: &str = "fk_reviews_user_id";
pub const FK_WATCHLISTS_USER: &str = "fk_watchlists_user_id";
pub const FK_WATCHLIST_FILMS_WATCHLIST: &str = "fk_watchlist_films_watchlist_id";
pub const FK_WATCHLIST_FILMS_FILM: &str = "fk_watchlist_films_film_id";
