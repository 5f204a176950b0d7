//! Request payloads and their validation.
//!
//! Every form is deserialized from the request, checked with `validator` and
//! then converted into a payload made of domain value objects.

pub mod categories;
pub mod courses;
pub mod listing;
pub mod sub_categories;
