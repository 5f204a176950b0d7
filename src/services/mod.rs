pub mod categories;
pub mod courses;
pub mod errors;
pub mod sub_categories;
pub mod validation;

pub use errors::{ServiceError, ServiceResult};
