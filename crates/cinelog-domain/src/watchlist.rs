//! Watchlist domain types.

use crate::pagination::SortField;

/// Maximum watchlist name length, in characters (after trimming).
pub const MAX_WATCHLIST_NAME_LEN: usize = 100;

/// Trim a watchlist name and check its length. Returns `None` when the trimmed
/// name is empty or longer than [`MAX_WATCHLIST_NAME_LEN`].
pub fn normalize_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len == 0 || len > MAX_WATCHLIST_NAME_LEN {
        return None;
    }
    Some(trimmed.to_owned())
}

/// Sortable columns of the watchlist listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchlistSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
}

impl SortField for WatchlistSortField {
    fn from_param(value: &str) -> Option<Self> {
        match value {
            "created_at" | "createdAt" => Some(Self::CreatedAt),
            "updated_at" | "updatedAt" => Some(Self::UpdatedAt),
            "name" => Some(Self::Name),
            _ => None,
        }
    }
}
