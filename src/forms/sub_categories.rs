use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::sub_category::{NewSubCategory, SubCategoryUpdate};
use crate::domain::types::{
    CategoryId, Description, Lifecycle, SubCategoryName, TypeConstraintError,
};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddSubCategoryForm {
    #[validate(length(min = 1, max = 255))]
    pub sub_category_name: String,
    #[validate(range(min = 1))]
    pub category_id: i32,
    #[validate(length(min = 1))]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddSubCategoryFormPayload {
    pub name: SubCategoryName,
    pub category_id: CategoryId,
    pub description: Description,
}

impl AddSubCategoryFormPayload {
    pub fn into_new_sub_category(self) -> NewSubCategory {
        let now = Utc::now().naive_utc();
        NewSubCategory {
            category_id: self.category_id,
            name: self.name,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum AddSubCategoryFormError {
    #[error("Add sub-category form validation failed: {0}")]
    Validation(String),
    #[error("Add sub-category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AddSubCategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddSubCategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AddSubCategoryForm> for AddSubCategoryFormPayload {
    type Error = AddSubCategoryFormError;

    fn try_from(value: AddSubCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: SubCategoryName::new(value.sub_category_name)?,
            category_id: CategoryId::new(value.category_id)?,
            description: Description::new(value.description)?,
        })
    }
}

#[derive(Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubCategoryForm {
    #[validate(length(min = 1, max = 255))]
    pub sub_category_name: Option<String>,
    #[validate(range(min = 1))]
    pub category_id: Option<i32>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSubCategoryFormPayload {
    pub update: SubCategoryUpdate,
}

#[derive(Debug, Error)]
pub enum UpdateSubCategoryFormError {
    #[error("Update sub-category form validation failed: {0}")]
    Validation(String),
    #[error("Update sub-category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for UpdateSubCategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for UpdateSubCategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<UpdateSubCategoryForm> for UpdateSubCategoryFormPayload {
    type Error = UpdateSubCategoryFormError;

    fn try_from(value: UpdateSubCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            update: SubCategoryUpdate {
                name: value.sub_category_name.map(SubCategoryName::new).transpose()?,
                category_id: value.category_id.map(CategoryId::new).transpose()?,
                description: value.description.map(Description::new).transpose()?,
                status: value.is_active.map(Lifecycle::from_active_flag),
            },
        })
    }
}
