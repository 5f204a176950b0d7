use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::sub_category::{
    NewSubCategory as DomainNewSubCategory, SubCategory as DomainSubCategory, SubCategoryUpdate,
};
use crate::domain::types::{Description, Lifecycle, SubCategoryName, TypeConstraintError};

/// Diesel model representing the `sub_categories` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::sub_categories)]
pub struct SubCategory {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub description: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`SubCategory`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::sub_categories)]
pub struct NewSubCategory {
    pub category_id: i32,
    pub name: String,
    pub description: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::sub_categories)]
pub struct SubCategoryChangeset {
    pub category_id: Option<i32>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<SubCategory> for DomainSubCategory {
    type Error = TypeConstraintError;

    fn try_from(sub_category: SubCategory) -> Result<Self, Self::Error> {
        Ok(Self {
            id: sub_category.id.try_into()?,
            category_id: sub_category.category_id.try_into()?,
            name: SubCategoryName::new(sub_category.name)?,
            description: Description::new(sub_category.description)?,
            status: Lifecycle::try_from(sub_category.status)?,
            created_at: sub_category.created_at,
            updated_at: sub_category.updated_at,
        })
    }
}

impl From<DomainNewSubCategory> for NewSubCategory {
    fn from(sub_category: DomainNewSubCategory) -> Self {
        Self {
            category_id: sub_category.category_id.get(),
            name: sub_category.name.into_inner(),
            description: sub_category.description.into_inner(),
            status: Lifecycle::Active.into(),
            created_at: sub_category.created_at,
            updated_at: sub_category.updated_at,
        }
    }
}

impl SubCategoryChangeset {
    pub fn new(update: &SubCategoryUpdate, updated_at: NaiveDateTime) -> Self {
        Self {
            category_id: update.category_id.map(|id| id.get()),
            name: update.name.as_ref().map(|n| n.as_str().to_string()),
            description: update.description.as_ref().map(|d| d.as_str().to_string()),
            status: update.status.map(String::from),
            updated_at,
        }
    }
}
