use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{
    Category as DomainCategory, CategoryUpdate, NewCategory as DomainNewCategory,
};
use crate::domain::types::{CategoryName, Description, Lifecycle, TypeConstraintError};

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Category`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Patch applied by `update_category`; `None` columns are left untouched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::categories)]
pub struct CategoryChangeset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: category.id.try_into()?,
            name: CategoryName::new(category.name)?,
            description: Description::new(category.description)?,
            status: Lifecycle::try_from(category.status)?,
            created_at: category.created_at,
            updated_at: category.updated_at,
        })
    }
}

impl From<DomainNewCategory> for NewCategory {
    fn from(category: DomainNewCategory) -> Self {
        Self {
            name: category.name.into_inner(),
            description: category.description.into_inner(),
            status: Lifecycle::Active.into(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl CategoryChangeset {
    pub fn new(update: &CategoryUpdate, updated_at: NaiveDateTime) -> Self {
        Self {
            name: update.name.as_ref().map(|n| n.as_str().to_string()),
            description: update.description.as_ref().map(|d| d.as_str().to_string()),
            status: update.status.map(String::from),
            updated_at,
        }
    }
}
