//! sea-orm entities for the catalog service.

pub mod constraints;
pub mod films;
pub mod one_time_codes;
pub mod outbox_events;
pub mod reviews;
pub mod users;
pub mod watchlist_films;
pub mod watchlists;
