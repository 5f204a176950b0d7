use std::collections::HashMap;
use std::hash::Hash;

use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, CategoryUpdate, NewCategory};
use crate::domain::course::{Course, CourseUpdate, NewCourse};
use crate::domain::sub_category::{NewSubCategory, SubCategory, SubCategoryUpdate};
use crate::domain::types::{
    CategoryId, CategoryName, CourseId, CourseName, Lifecycle, SubCategoryId, SubCategoryName,
    dedup_ids,
};
use crate::pagination::{Pagination, Sort};

pub mod category;
pub mod course;
pub mod errors;
pub mod sub_category;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Orders a boxed select by the requested [`Sort`], breaking ties by id.
macro_rules! order_by_sort {
    ($items:expr, $table:ident, $sort:expr) => {{
        use crate::pagination::{SortField, SortOrder};
        match ($sort.field, $sort.order) {
            (SortField::Name, SortOrder::Asc) => {
                $items.order(($table::name.asc(), $table::id.asc()))
            }
            (SortField::Name, SortOrder::Desc) => {
                $items.order(($table::name.desc(), $table::id.desc()))
            }
            (SortField::CreatedAt, SortOrder::Asc) => {
                $items.order(($table::created_at.asc(), $table::id.asc()))
            }
            (SortField::CreatedAt, SortOrder::Desc) => {
                $items.order(($table::created_at.desc(), $table::id.desc()))
            }
            (SortField::UpdatedAt, SortOrder::Asc) => {
                $items.order(($table::updated_at.asc(), $table::id.asc()))
            }
            (SortField::UpdatedAt, SortOrder::Desc) => {
                $items.order(($table::updated_at.desc(), $table::id.desc()))
            }
        }
    }};
}
pub(crate) use order_by_sort;

/// Escape character used with [`contains_pattern`] in `LIKE` filters.
pub(crate) const LIKE_ESCAPE: char = '\\';

/// Builds a `LIKE` pattern matching `search` as a literal substring.
///
/// SQLite folds case for ASCII letters only, so non-ASCII searches are
/// case-sensitive.
pub(crate) fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Lookup "by id set and active state": resolves only records whose identifier
/// is in the set and whose lifecycle is [`Lifecycle::Active`].
///
/// Identifiers are deduplicated on construction, keeping first-seen order, so
/// `len()` is the number of distinct records the caller expects back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveIdFilter<I> {
    ids: Vec<I>,
}

impl<I> ActiveIdFilter<I>
where
    I: Copy + Eq + Hash,
{
    pub fn new(ids: &[I]) -> Self {
        Self {
            ids: dedup_ids(ids),
        }
    }

    pub fn ids(&self) -> &[I] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifiers from the filter that are absent from `found`.
    pub fn missing(&self, found: &[I]) -> Vec<I> {
        self.ids
            .iter()
            .copied()
            .filter(|id| !found.contains(id))
            .collect()
    }
}

/// Lookup "by name and scope overlap" for courses.
///
/// Matches non-deleted courses named exactly `name` whose category references
/// intersect `category_ids` (when non-empty) and whose sub-category references
/// intersect `sub_category_ids` (when non-empty), optionally excluding one
/// course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseNameScope {
    pub name: CourseName,
    pub category_ids: Vec<CategoryId>,
    pub sub_category_ids: Vec<SubCategoryId>,
    pub exclude: Option<CourseId>,
}

impl CourseNameScope {
    pub fn new(
        name: CourseName,
        category_ids: &[CategoryId],
        sub_category_ids: &[SubCategoryId],
    ) -> Self {
        Self {
            name,
            category_ids: dedup_ids(category_ids),
            sub_category_ids: dedup_ids(sub_category_ids),
            exclude: None,
        }
    }

    pub fn excluding(mut self, course_id: CourseId) -> Self {
        self.exclude = Some(course_id);
        self
    }

    /// Whether `course` falls inside this scope.
    pub fn matches(&self, course: &Course) -> bool {
        if course.status.is_deleted() || course.name != self.name {
            return false;
        }
        if self.exclude == Some(course.id) {
            return false;
        }
        let overlaps_categories = self.category_ids.is_empty()
            || course
                .category_ids
                .iter()
                .any(|id| self.category_ids.contains(id));
        let overlaps_sub_categories = self.sub_category_ids.is_empty()
            || course
                .sub_category_ids
                .iter()
                .any(|id| self.sub_category_ids.contains(id));
        overlaps_categories && overlaps_sub_categories
    }
}

/// Query parameters for listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryListQuery {
    /// Case-insensitive substring match on the name.
    pub search: Option<String>,
    /// Restrict to one lifecycle state; `None` lists every non-deleted record.
    pub status: Option<Lifecycle>,
    pub pagination: Option<Pagination>,
    pub sort: Sort,
}

impl CategoryListQuery {
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn status(mut self, status: Lifecycle) -> Self {
        self.status = Some(status);
        self
    }
    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }
}

/// Query parameters for listing sub-categories.
#[derive(Debug, Clone, Default)]
pub struct SubCategoryListQuery {
    pub search: Option<String>,
    pub status: Option<Lifecycle>,
    /// Restrict to sub-categories owned by this category.
    pub category_id: Option<CategoryId>,
    pub pagination: Option<Pagination>,
    pub sort: Sort,
}

impl SubCategoryListQuery {
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn status(mut self, status: Lifecycle) -> Self {
        self.status = Some(status);
        self
    }
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }
}

/// Query parameters for listing courses.
#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub search: Option<String>,
    pub status: Option<Lifecycle>,
    /// Restrict to courses referencing this category.
    pub category_id: Option<CategoryId>,
    /// Restrict to courses referencing this sub-category.
    pub sub_category_id: Option<SubCategoryId>,
    pub pagination: Option<Pagination>,
    pub sort: Sort,
}

impl CourseListQuery {
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn status(mut self, status: Lifecycle) -> Self {
        self.status = Some(status);
        self
    }
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn sub_category(mut self, sub_category_id: SubCategoryId) -> Self {
        self.sub_category_id = Some(sub_category_id);
        self
    }
    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List non-deleted categories using the supplied query options.
    fn list_categories(&self, query: CategoryListQuery)
    -> RepositoryResult<(usize, Vec<Category>)>;
    /// Retrieve a category by its identifier regardless of lifecycle state.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    /// Resolve the active categories matching the filter.
    fn find_categories(
        &self,
        filter: &ActiveIdFilter<CategoryId>,
    ) -> RepositoryResult<Vec<Category>>;
    /// Whether a non-deleted category other than `exclude` already uses `name`.
    fn category_name_taken(
        &self,
        name: &CategoryName,
        exclude: Option<CategoryId>,
    ) -> RepositoryResult<bool>;
    /// Number of active sub-categories per category; categories without any are omitted.
    fn count_active_sub_categories(
        &self,
        category_ids: &[CategoryId],
    ) -> RepositoryResult<HashMap<CategoryId, usize>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new active category.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Apply a partial update to a non-deleted category.
    fn update_category(&self, id: CategoryId, update: &CategoryUpdate) -> RepositoryResult<usize>;
    /// Soft-delete a non-deleted category.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for sub-category entities.
pub trait SubCategoryReader {
    fn list_sub_categories(
        &self,
        query: SubCategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<SubCategory>)>;
    fn get_sub_category_by_id(&self, id: SubCategoryId) -> RepositoryResult<Option<SubCategory>>;
    /// Resolve the active sub-categories matching the filter.
    fn find_sub_categories(
        &self,
        filter: &ActiveIdFilter<SubCategoryId>,
    ) -> RepositoryResult<Vec<SubCategory>>;
    /// Whether a non-deleted sub-category of `category_id` other than `exclude` uses `name`.
    fn sub_category_name_taken(
        &self,
        category_id: CategoryId,
        name: &SubCategoryName,
        exclude: Option<SubCategoryId>,
    ) -> RepositoryResult<bool>;
}

/// Write operations for sub-category entities.
pub trait SubCategoryWriter {
    fn create_sub_category(&self, sub_category: &NewSubCategory) -> RepositoryResult<SubCategory>;
    fn update_sub_category(
        &self,
        id: SubCategoryId,
        update: &SubCategoryUpdate,
    ) -> RepositoryResult<usize>;
    fn delete_sub_category(&self, id: SubCategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for course entities.
pub trait CourseReader {
    fn list_courses(&self, query: CourseListQuery) -> RepositoryResult<(usize, Vec<Course>)>;
    /// Retrieve a course and its reference sequences regardless of lifecycle state.
    fn get_course_by_id(&self, id: CourseId) -> RepositoryResult<Option<Course>>;
    /// Whether any course falls inside the name scope.
    fn course_exists(&self, scope: &CourseNameScope) -> RepositoryResult<bool>;
}

/// Write operations for course entities.
pub trait CourseWriter {
    /// Persist a new active course with its reference sequences.
    fn create_course(&self, course: &NewCourse) -> RepositoryResult<Course>;
    /// Apply the delta to a non-deleted course; `None` when no such course exists.
    fn update_course(&self, id: CourseId, update: &CourseUpdate)
    -> RepositoryResult<Option<Course>>;
    /// Soft-delete a non-deleted course.
    fn delete_course(&self, id: CourseId) -> RepositoryResult<usize>;
}
