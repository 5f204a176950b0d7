//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service/repository error types, so the
//! `From` impls connecting them live here.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

#[cfg(feature = "server")]
use crate::forms::{
    categories::{AddCategoryFormError, UpdateCategoryFormError},
    courses::{AddCourseFormError, UpdateCourseFormError},
    listing::ListFilterFormError,
    sub_categories::{AddSubCategoryFormError, UpdateSubCategoryFormError},
};
#[cfg(feature = "server")]
use crate::services::errors::ServiceError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

#[cfg(feature = "server")]
macro_rules! form_error_into_service_error {
    ($($form_error:ty),+ $(,)?) => {
        $(
            impl From<$form_error> for ServiceError {
                fn from(val: $form_error) -> Self {
                    ServiceError::Form(val.to_string())
                }
            }
        )+
    };
}

#[cfg(feature = "server")]
form_error_into_service_error!(
    AddCategoryFormError,
    UpdateCategoryFormError,
    AddSubCategoryFormError,
    UpdateSubCategoryFormError,
    AddCourseFormError,
    UpdateCourseFormError,
    ListFilterFormError,
);
