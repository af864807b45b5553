//! Domain types shared across all Cinelog crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod film;
pub mod pagination;
pub mod review;
pub mod user;
pub mod watchlist;
