//! Review domain types.

use crate::pagination::SortField;

/// Maximum review body length, in characters.
pub const MAX_REVIEW_LEN: usize = 500;

/// Sortable columns of the review listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewSortField {
    #[default]
    CreatedAt,
    Rating,
}

impl SortField for ReviewSortField {
    fn from_param(value: &str) -> Option<Self> {
        match value {
            "created_at" | "createdAt" => Some(Self::CreatedAt),
            "rating" => Some(Self::Rating),
            _ => None,
        }
    }
}
