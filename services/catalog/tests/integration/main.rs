
mod auth_test;
mod film_test;
mod review_test;
mod router_test;
mod user_test;
mod watchlist_test;
