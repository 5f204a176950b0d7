use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::course::Course;
use crate::domain::sub_category::SubCategory;
use crate::domain::types::{CategoryId, SubCategoryId};
use crate::dto::NamedRefDto;

/// Display names of the active records a set of courses refers to.
#[derive(Debug, Clone, Default)]
pub struct ReferenceNames {
    categories: HashMap<CategoryId, String>,
    sub_categories: HashMap<SubCategoryId, String>,
}

impl ReferenceNames {
    pub fn new(categories: &[Category], sub_categories: &[SubCategory]) -> Self {
        Self {
            categories: categories
                .iter()
                .map(|c| (c.id, c.name.as_str().to_string()))
                .collect(),
            sub_categories: sub_categories
                .iter()
                .map(|s| (s.id, s.name.as_str().to_string()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    pub id: i32,
    pub course_name: String,
    pub description: String,
    /// Referenced categories that are still active, in stored order.
    pub categories: Vec<NamedRefDto>,
    /// Referenced sub-categories that are still active, in stored order.
    pub sub_categories: Vec<NamedRefDto>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CourseDto {
    pub fn new(course: Course, names: &ReferenceNames) -> Self {
        let categories = course
            .category_ids
            .iter()
            .filter_map(|id| {
                names.categories.get(id).map(|name| NamedRefDto {
                    id: id.get(),
                    name: name.clone(),
                })
            })
            .collect();
        let sub_categories = course
            .sub_category_ids
            .iter()
            .filter_map(|id| {
                names.sub_categories.get(id).map(|name| NamedRefDto {
                    id: id.get(),
                    name: name.clone(),
                })
            })
            .collect();

        Self {
            id: course.id.get(),
            course_name: course.name.into_inner(),
            description: course.description.into_inner(),
            categories,
            sub_categories,
            is_active: course.status.is_active(),
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoursePageDto {
    pub total: usize,
    pub courses: Vec<CourseDto>,
}
