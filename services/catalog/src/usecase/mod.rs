pub mod auth;
pub mod film;
pub mod listing;
pub mod review;
pub mod user;
pub mod watchlist;
