//! Response shapes returned by the JSON API.

use serde::Serialize;

pub mod categories;
pub mod courses;
pub mod sub_categories;

/// Envelope shared by every successful response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Response carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

/// Identifier and display name of a referenced record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedRefDto {
    pub id: i32,
    pub name: String,
}

/// Body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDto {
    pub status_code: u16,
    pub message: String,
    pub error: String,
}
