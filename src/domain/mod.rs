//! Domain records and value objects, free of persistence and HTTP concerns.

pub mod category;
pub mod course;
pub mod sub_category;
pub mod types;
