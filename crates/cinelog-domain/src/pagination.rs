//! Pagination, sorting and page envelope types used by every list endpoint.

use serde::{Deserialize, Serialize};

/// Generic sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sort {
    #[default]
    Desc,
    Asc,
}

impl Sort {
    /// `"asc"` sorts ascending; any other value, or none, sorts descending.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }
}

/// A whitelisted column a listing may be sorted by.
///
/// `Default` is the creation timestamp for every resource.
pub trait SortField: Copy + Default {
    /// Parse a `sort_by` query value. Returns `None` for unknown fields.
    fn from_param(value: &str) -> Option<Self>;
}

/// Sort field plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec<F> {
    pub field: F,
    pub order: Sort,
}

impl<F: SortField> SortSpec<F> {
    /// Unknown `sort_by` values fall back to the resource's default field.
    pub fn from_params(sort_by: Option<&str>, sort_order: Option<&str>) -> Self {
        Self {
            field: sort_by.and_then(F::from_param).unwrap_or_default(),
            order: Sort::from_param(sort_order),
        }
    }
}

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;
pub const DEFAULT_PAGE: u32 = 1;

/// Pagination parameters shared across all list endpoints.
///
/// - `limit`: 1–100, default 10
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub limit: u32,
    pub page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page: DEFAULT_PAGE,
        }
    }
}

impl PageRequest {
    /// Build from raw query values. Missing, non-numeric and zero values use
    /// the defaults; the result is clamped.
    pub fn from_params(limit: Option<&str>, page: Option<&str>) -> Self {
        Self {
            limit: parse_positive(limit).unwrap_or(DEFAULT_LIMIT),
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
        }
        .clamped()
    }

    /// Clamp `limit` to the valid range 1–100 and `page` to ≥ 1.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, MAX_LIMIT),
            page: self.page.max(1),
        }
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

fn parse_positive(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
}

/// One page of a listing. `count` is the total number of matches, ignoring
/// pagination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub page: u32,
    pub limit: u32,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty(request: PageRequest) -> Self {
        Self {
            count: 0,
            page: request.page,
            limit: request.limit,
            data: Vec::new(),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            page: self.page,
            limit: self.limit,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}
