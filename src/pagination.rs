//! Paging and ordering options shared by list queries.

/// Page size used when the caller does not supply a positive limit.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;
/// Row cap applied when paging is switched off.
pub const UNPAGED_ITEMS_LIMIT: usize = 100;
/// Largest page size a caller may request.
pub const MAX_ITEMS_PER_PAGE: usize = UNPAGED_ITEMS_LIMIT;

/// One-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Resolves raw paging inputs: non-positive values fall back to page 1 and
    /// [`DEFAULT_ITEMS_PER_PAGE`], larger limits are capped at
    /// [`MAX_ITEMS_PER_PAGE`]; `enabled == false` returns the first
    /// [`UNPAGED_ITEMS_LIMIT`] rows.
    pub fn resolve(page: Option<i64>, limit: Option<i64>, enabled: bool) -> Self {
        if !enabled {
            return Self {
                page: 1,
                per_page: UNPAGED_ITEMS_LIMIT,
            };
        }
        let page = page
            .filter(|p| *p > 0)
            .map_or(1, |p| usize::try_from(p).unwrap_or(usize::MAX));
        let per_page = limit
            .filter(|l| *l > 0)
            .map_or(DEFAULT_ITEMS_PER_PAGE, |l| {
                usize::try_from(l).map_or(MAX_ITEMS_PER_PAGE, |l| l.min(MAX_ITEMS_PER_PAGE))
            });
        Self { page, per_page }
    }

    /// Rows skipped before this page; saturates instead of overflowing.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.per_page)
    }
}

/// Column a list query is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    Name,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Parses the public `sortBy` value; unknown fields yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "name" | "categoryName" | "subCategoryName" | "courseName" => Some(Self::Name),
            "createdAt" | "created_at" => Some(Self::CreatedAt),
            "updatedAt" | "updated_at" => Some(Self::UpdatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Anything other than `asc` (case-insensitive) sorts descending.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

/// Ordering applied to a list query, newest first by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}
