use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{CategoryId, Lifecycle, SubCategoryId, TypeConstraintError};
use crate::pagination::{Pagination, Sort, SortField, SortOrder};

/// Paging and ordering query string shared by every list endpoint.
///
/// Capitalised spellings are accepted for compatibility with older clients.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(alias = "PageNumber")]
    pub page_number: Option<i64>,
    #[serde(alias = "Limit")]
    pub limit: Option<i64>,
    #[serde(alias = "Pagination")]
    pub pagination: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl PageQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::resolve(
            self.page_number,
            self.limit,
            self.pagination.unwrap_or(true),
        )
    }

    pub fn sort(&self) -> Sort {
        Sort {
            field: self
                .sort_by
                .as_deref()
                .and_then(SortField::parse)
                .unwrap_or_default(),
            order: self
                .sort_order
                .as_deref()
                .map(SortOrder::parse)
                .unwrap_or_default(),
        }
    }
}

/// Filter query string for list endpoints. Each endpoint reads only the
/// fields that apply to its entity.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListFilterForm {
    #[validate(length(max = 255))]
    pub search: Option<String>,
    pub is_active: Option<bool>,
    #[validate(range(min = 1))]
    pub category_id: Option<i32>,
    #[validate(range(min = 1))]
    pub sub_category_id: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilterPayload {
    /// Trimmed search term; blank input is dropped.
    pub search: Option<String>,
    pub status: Option<Lifecycle>,
    pub category_id: Option<CategoryId>,
    pub sub_category_id: Option<SubCategoryId>,
}

impl ListFilterPayload {
    /// Lifecycle filter, falling back to `default` when `isActive` was omitted.
    pub fn status_or(&self, default: Option<Lifecycle>) -> Option<Lifecycle> {
        self.status.or(default)
    }
}

#[derive(Debug, Error)]
pub enum ListFilterFormError {
    #[error("List filter validation failed: {0}")]
    Validation(String),
    #[error("List filter contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ListFilterFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ListFilterFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ListFilterForm> for ListFilterPayload {
    type Error = ListFilterFormError;

    fn try_from(value: ListFilterForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let search = value
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(Self {
            search,
            status: value.is_active.map(Lifecycle::from_active_flag),
            category_id: value.category_id.map(CategoryId::new).transpose()?,
            sub_category_id: value.sub_category_id.map(SubCategoryId::new).transpose()?,
        })
    }
}
