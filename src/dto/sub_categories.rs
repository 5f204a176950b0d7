use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::sub_category::SubCategory;
use crate::dto::NamedRefDto;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryDto {
    pub id: i32,
    pub sub_category_name: String,
    pub category_id: i32,
    /// Owning category, present only while it is active.
    pub category: Option<NamedRefDto>,
    pub description: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SubCategoryDto {
    /// `owner` is expected to be the active owning category, if any.
    pub fn new(sub_category: SubCategory, owner: Option<&Category>) -> Self {
        Self {
            id: sub_category.id.get(),
            sub_category_name: sub_category.name.into_inner(),
            category_id: sub_category.category_id.get(),
            category: owner
                .filter(|c| c.id == sub_category.category_id)
                .map(|c| NamedRefDto {
                    id: c.id.get(),
                    name: c.name.as_str().to_string(),
                }),
            description: sub_category.description.into_inner(),
            is_active: sub_category.status.is_active(),
            created_at: sub_category.created_at,
            updated_at: sub_category.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryPageDto {
    pub total: usize,
    pub sub_categories: Vec<SubCategoryDto>,
}
