use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, Description, Lifecycle, SubCategoryId, SubCategoryName};

/// Second-level grouping owned by exactly one [`Category`](super::category::Category).
///
/// The owning category is a lookup reference only: deleting the category does
/// not cascade, and the reference is re-checked whenever the sub-category is
/// itself referenced by a course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubCategory {
    pub id: SubCategoryId,
    pub category_id: CategoryId,
    pub name: SubCategoryName,
    pub description: Description,
    pub status: Lifecycle,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`SubCategory`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSubCategory {
    pub category_id: CategoryId,
    pub name: SubCategoryName,
    pub description: Description,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update applied to an existing [`SubCategory`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubCategoryUpdate {
    pub name: Option<SubCategoryName>,
    pub category_id: Option<CategoryId>,
    pub description: Option<Description>,
    pub status: Option<Lifecycle>,
}

impl SubCategoryUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category_id.is_none()
            && self.description.is_none()
            && self.status.is_none()
    }
}
