use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Entity kind named by an [`ServiceError::InvalidReference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Category,
    SubCategory,
}

impl Display for ReferenceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Category => write!(f, "categories"),
            Self::SubCategory => write!(f, "sub-categories"),
        }
    }
}

fn join_ids(ids: &[i32]) -> String {
    ids.iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Supplied identifiers do not resolve to active, non-deleted records.
    #[error("One or more {kind} are invalid or inactive: {}", join_ids(.ids))]
    InvalidReference { kind: ReferenceKind, ids: Vec<i32> },
    /// A sub-category is owned by a category outside the allowed set.
    #[error(
        "All selected sub-categories must belong to the selected categories: sub-category {sub_category_id} belongs to category {category_id}"
    )]
    OwnershipViolation {
        sub_category_id: i32,
        category_id: i32,
    },
    /// A conflicting non-deleted record already occupies the name.
    #[error("{0}")]
    DuplicateName(String),
    /// An update carried no recognised mutable field.
    #[error("No valid fields provided for update")]
    EmptyUpdate,
    /// Requested resource does not exist or is no longer visible.
    #[error("{0}")]
    NotFound(String),
    /// Request payload failed validation.
    #[error("{0}")]
    Form(String),
    /// A value violated a domain type constraint.
    #[error("{0}")]
    TypeConstraint(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
