use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::course::{Course as DomainCourse, CourseUpdate, NewCourse as DomainNewCourse};
use crate::domain::types::{
    CourseName, Description, Lifecycle, TypeConstraintError, parse_ids,
};

/// Diesel model representing the `courses` table.
///
/// Reference sequences live in `course_categories` / `course_sub_categories`
/// and are attached with [`Course::into_domain`].
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::courses)]
pub struct Course {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::courses)]
pub struct NewCourse {
    pub name: String,
    pub description: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::courses)]
pub struct CourseChangeset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// Row of `course_categories`.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::course_categories)]
pub struct CourseCategory {
    pub course_id: i32,
    pub category_id: i32,
    pub position: i32,
}

/// Row of `course_sub_categories`.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::course_sub_categories)]
pub struct CourseSubCategory {
    pub course_id: i32,
    pub sub_category_id: i32,
    pub position: i32,
}

impl Course {
    /// Builds the domain record from the row and its ordered reference ids.
    pub fn into_domain(
        self,
        category_ids: &[i32],
        sub_category_ids: &[i32],
    ) -> Result<DomainCourse, TypeConstraintError> {
        Ok(DomainCourse {
            id: self.id.try_into()?,
            name: CourseName::new(self.name)?,
            description: Description::new(self.description)?,
            category_ids: parse_ids(category_ids)?,
            sub_category_ids: parse_ids(sub_category_ids)?,
            status: Lifecycle::try_from(self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<&DomainNewCourse> for NewCourse {
    fn from(course: &DomainNewCourse) -> Self {
        Self {
            name: course.name.as_str().to_string(),
            description: course.description.as_str().to_string(),
            status: Lifecycle::Active.into(),
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

impl CourseChangeset {
    pub fn new(update: &CourseUpdate, updated_at: NaiveDateTime) -> Self {
        Self {
            name: update.name.as_ref().map(|n| n.as_str().to_string()),
            description: update.description.as_ref().map(|d| d.as_str().to_string()),
            status: update.status.map(String::from),
            updated_at,
        }
    }
}

/// Numbers reference ids by their position in the owning sequence.
pub fn course_category_rows(course_id: i32, category_ids: &[i32]) -> Vec<CourseCategory> {
    category_ids
        .iter()
        .zip(0..)
        .map(|(&category_id, position)| CourseCategory {
            course_id,
            category_id,
            position,
        })
        .collect()
}

pub fn course_sub_category_rows(
    course_id: i32,
    sub_category_ids: &[i32],
) -> Vec<CourseSubCategory> {
    sub_category_ids
        .iter()
        .zip(0..)
        .map(|(&sub_category_id, position)| CourseSubCategory {
            course_id,
            sub_category_id,
            position,
        })
        .collect()
}
