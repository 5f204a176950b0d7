use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::category::Category;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: i32,
    pub category_name: String,
    pub description: String,
    pub is_active: bool,
    pub sub_category_count: usize,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CategoryDto {
    pub fn new(category: Category, sub_category_count: usize) -> Self {
        Self {
            id: category.id.get(),
            category_name: category.name.into_inner(),
            description: category.description.into_inner(),
            is_active: category.status.is_active(),
            sub_category_count,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPageDto {
    pub total: usize,
    pub categories: Vec<CategoryDto>,
}
