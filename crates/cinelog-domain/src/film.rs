//! Film domain types.

use crate::pagination::SortField;

/// Lowest accepted rating, for films and reviews alike.
pub const MIN_RATING: f64 = 0.1;
/// Highest accepted rating.
pub const MAX_RATING: f64 = 10.0;
/// Genres shorter than this are rejected.
pub const MIN_GENRE_LEN: usize = 6;

/// `true` when `rating` is a finite number in `[0.1, 10.0]`.
pub fn is_valid_rating(rating: f64) -> bool {
    rating.is_finite() && (MIN_RATING..=MAX_RATING).contains(&rating)
}

/// Sortable columns of the film listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilmSortField {
    #[default]
    CreatedAt,
    Title,
    Genre,
    ReleaseDate,
    Rating,
}

impl SortField for FilmSortField {
    fn from_param(value: &str) -> Option<Self> {
        match value {
            "created_at" | "createdAt" => Some(Self::CreatedAt),
            "title" => Some(Self::Title),
            "genre" => Some(Self::Genre),
            "release_date" | "releaseDate" => Some(Self::ReleaseDate),
            "rating" => Some(Self::Rating),
            _ => None,
        }
    }
}
