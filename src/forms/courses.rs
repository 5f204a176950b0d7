use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::course::{CourseUpdate, NewCourse};
use crate::domain::types::{
    CategoryId, CourseName, Description, Lifecycle, SubCategoryId, TypeConstraintError, parse_ids,
};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCourseForm {
    #[validate(length(min = 1, max = 255))]
    pub course_name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub category_ids: Vec<i32>,
    #[serde(default)]
    pub sub_category_ids: Vec<i32>,
}

/// Validated course creation request. Reference ids are kept in the order the
/// client sent them, duplicates included; the store deduplicates on write.
#[derive(Debug, Clone, PartialEq)]
pub struct AddCourseFormPayload {
    pub name: CourseName,
    pub description: Description,
    pub category_ids: Vec<CategoryId>,
    pub sub_category_ids: Vec<SubCategoryId>,
}

impl AddCourseFormPayload {
    pub fn into_new_course(self) -> NewCourse {
        let now = Utc::now().naive_utc();
        NewCourse {
            name: self.name,
            description: self.description,
            category_ids: self.category_ids,
            sub_category_ids: self.sub_category_ids,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum AddCourseFormError {
    #[error("Add course form validation failed: {0}")]
    Validation(String),
    #[error("Add course form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AddCourseFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddCourseFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AddCourseForm> for AddCourseFormPayload {
    type Error = AddCourseFormError;

    fn try_from(value: AddCourseForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: CourseName::new(value.course_name)?,
            description: Description::new(value.description)?,
            category_ids: parse_ids(&value.category_ids)?,
            sub_category_ids: parse_ids(&value.sub_category_ids)?,
        })
    }
}

/// Partial course update.
///
/// `title` is accepted as an alias of `courseName` for older clients.
#[derive(Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseForm {
    #[serde(alias = "title")]
    #[validate(length(min = 1, max = 255))]
    pub course_name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub category_ids: Option<Vec<i32>>,
    pub sub_category_ids: Option<Vec<i32>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCourseFormPayload {
    pub update: CourseUpdate,
}

#[derive(Debug, Error)]
pub enum UpdateCourseFormError {
    #[error("Update course form validation failed: {0}")]
    Validation(String),
    #[error("Update course form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for UpdateCourseFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for UpdateCourseFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<UpdateCourseForm> for UpdateCourseFormPayload {
    type Error = UpdateCourseFormError;

    fn try_from(value: UpdateCourseForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            update: CourseUpdate {
                name: value.course_name.map(CourseName::new).transpose()?,
                description: value.description.map(Description::new).transpose()?,
                category_ids: value
                    .category_ids
                    .as_deref()
                    .map(parse_ids)
                    .transpose()?,
                sub_category_ids: value
                    .sub_category_ids
                    .as_deref()
                    .map(parse_ids)
                    .transpose()?,
                status: value.is_active.map(Lifecycle::from_active_flag),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_form(category_ids: Vec<i32>) -> AddCourseForm {
        AddCourseForm {
            course_name: " Java ".to_string(),
            description: "Intro to Java".to_string(),
            category_ids,
            sub_category_ids: vec![],
        }
    }

    #[test]
    fn add_course_trims_name_and_parses_ids() {
        let payload: AddCourseFormPayload = add_form(vec![1, 2, 1]).try_into().unwrap();
        assert_eq!(payload.name.as_str(), "Java");
        assert_eq!(payload.category_ids.len(), 3);
        assert!(payload.sub_category_ids.is_empty());
    }

    #[test]
    fn add_course_requires_a_category() {
        let payload: Result<AddCourseFormPayload, _> = add_form(vec![]).try_into();
        assert!(matches!(payload, Err(AddCourseFormError::Validation(_))));
    }

    #[test]
    fn add_course_rejects_non_positive_ids() {
        let payload: Result<AddCourseFormPayload, _> = add_form(vec![1, -4]).try_into();
        assert!(matches!(payload, Err(AddCourseFormError::TypeConstraint(_))));
    }

    #[test]
    fn update_course_accepts_title_alias() {
        let form: UpdateCourseForm =
            serde_json::from_str(r#"{"title": "Kotlin", "isActive": true}"#).unwrap();
        let payload: UpdateCourseFormPayload = form.try_into().unwrap();
        assert_eq!(payload.update.name.unwrap().as_str(), "Kotlin");
        assert_eq!(payload.update.status, Some(Lifecycle::Active));
    }

    #[test]
    fn update_course_with_description_only_leaves_references_untouched() {
        let form = UpdateCourseForm {
            description: Some("new".to_string()),
            ..Default::default()
        };
        let payload: UpdateCourseFormPayload = form.try_into().unwrap();
        assert!(payload.update.category_ids.is_none());
        assert!(payload.update.sub_category_ids.is_none());
        assert!(!payload.update.touches_name_scope());
    }

    #[test]
    fn update_course_rejects_empty_category_list() {
        let form = UpdateCourseForm {
            category_ids: Some(vec![]),
            ..Default::default()
        };
        let payload: Result<UpdateCourseFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(UpdateCourseFormError::Validation(_))));
    }
}
