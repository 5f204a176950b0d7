use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CourseId, CourseName, Description, Lifecycle, SubCategoryId};

/// Course record together with the ordered reference sequences it owns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub id: CourseId,
    pub name: CourseName,
    pub description: Description,
    pub category_ids: Vec<CategoryId>,
    pub sub_category_ids: Vec<SubCategoryId>,
    pub status: Lifecycle,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Course`]. Reference sequences are stored in
/// the order given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCourse {
    pub name: CourseName,
    pub description: Description,
    pub category_ids: Vec<CategoryId>,
    pub sub_category_ids: Vec<SubCategoryId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Minimal field delta for a course update. Only supplied fields are written;
/// a supplied reference sequence replaces the stored one wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseUpdate {
    pub name: Option<CourseName>,
    pub description: Option<Description>,
    pub category_ids: Option<Vec<CategoryId>>,
    pub sub_category_ids: Option<Vec<SubCategoryId>>,
    pub status: Option<Lifecycle>,
}

impl CourseUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category_ids.is_none()
            && self.sub_category_ids.is_none()
            && self.status.is_none()
    }

    /// Whether the update touches the name or either reference sequence, which
    /// puts the course's uniqueness scope back in question.
    pub fn touches_name_scope(&self) -> bool {
        self.name.is_some() || self.category_ids.is_some() || self.sub_category_ids.is_some()
    }
}
