//! Diesel row types and their conversions to domain records.

pub mod category;
#[cfg(feature = "server")]
pub mod config;
pub mod course;
pub mod sub_category;
