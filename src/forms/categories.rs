use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::{CategoryUpdate, NewCategory};
use crate::domain::types::{CategoryName, Description, Lifecycle, TypeConstraintError};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCategoryForm {
    #[validate(length(min = 1, max = 255))]
    pub category_name: String,
    #[validate(length(min = 1))]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddCategoryFormPayload {
    pub name: CategoryName,
    pub description: Description,
}

impl AddCategoryFormPayload {
    pub fn into_new_category(self) -> NewCategory {
        let now = Utc::now().naive_utc();
        NewCategory {
            name: self.name,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum AddCategoryFormError {
    #[error("Add category form validation failed: {0}")]
    Validation(String),
    #[error("Add category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AddCategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddCategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AddCategoryForm> for AddCategoryFormPayload {
    type Error = AddCategoryFormError;

    fn try_from(value: AddCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: CategoryName::new(value.category_name)?,
            description: Description::new(value.description)?,
        })
    }
}

/// Partial category update. Absent fields are left untouched.
#[derive(Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryForm {
    #[validate(length(min = 1, max = 255))]
    pub category_name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCategoryFormPayload {
    pub update: CategoryUpdate,
}

#[derive(Debug, Error)]
pub enum UpdateCategoryFormError {
    #[error("Update category form validation failed: {0}")]
    Validation(String),
    #[error("Update category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for UpdateCategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for UpdateCategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<UpdateCategoryForm> for UpdateCategoryFormPayload {
    type Error = UpdateCategoryFormError;

    fn try_from(value: UpdateCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            update: CategoryUpdate {
                name: value.category_name.map(CategoryName::new).transpose()?,
                description: value.description.map(Description::new).transpose()?,
                status: value.is_active.map(Lifecycle::from_active_flag),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_category_trims_name() {
        let form = AddCategoryForm {
            category_name: "  Programming ".to_string(),
            description: "Software courses".to_string(),
        };

        let payload: AddCategoryFormPayload = form.try_into().unwrap();
        assert_eq!(payload.name.as_str(), "Programming");
    }

    #[test]
    fn add_category_rejects_blank_name() {
        let form = AddCategoryForm {
            category_name: "   ".to_string(),
            description: "Software courses".to_string(),
        };

        let payload: Result<AddCategoryFormPayload, _> = form.try_into();
        assert!(matches!(
            payload,
            Err(AddCategoryFormError::TypeConstraint(_))
        ));
    }

    #[test]
    fn add_category_rejects_empty_description() {
        let form = AddCategoryForm {
            category_name: "Programming".to_string(),
            description: String::new(),
        };

        let payload: Result<AddCategoryFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(AddCategoryFormError::Validation(_))));
    }

    #[test]
    fn update_category_maps_active_flag() {
        let form = UpdateCategoryForm {
            is_active: Some(false),
            ..Default::default()
        };

        let payload: UpdateCategoryFormPayload = form.try_into().unwrap();
        assert_eq!(payload.update.status, Some(Lifecycle::Inactive));
        assert!(payload.update.name.is_none());
    }

    #[test]
    fn empty_update_form_yields_empty_update() {
        let payload: UpdateCategoryFormPayload =
            UpdateCategoryForm::default().try_into().unwrap();
        assert!(payload.update.is_empty());
    }
}
