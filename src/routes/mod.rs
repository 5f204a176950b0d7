use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, get, web};

use crate::dto::{ApiResponse, ErrorDto};
use crate::services::ServiceError;

pub mod categories;
pub mod courses;
pub mod sub_categories;

/// Registers every catalog endpoint.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(categories::create_category)
        .service(categories::list_categories)
        .service(categories::get_category)
        .service(categories::update_category)
        .service(categories::delete_category)
        .service(sub_categories::create_sub_category)
        .service(sub_categories::list_sub_categories)
        .service(sub_categories::get_sub_category)
        .service(sub_categories::update_sub_category)
        .service(sub_categories::delete_sub_category)
        .service(courses::create_course)
        .service(courses::list_courses)
        .service(courses::get_course)
        .service(courses::update_course)
        .service(courses::delete_course);
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::message("Service is healthy"))
}

fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::InvalidReference { .. }
        | ServiceError::OwnershipViolation { .. }
        | ServiceError::EmptyUpdate
        | ServiceError::Form(_)
        | ServiceError::TypeConstraint(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::DuplicateName(_) => StatusCode::CONFLICT,
        ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON error body with the given status.
pub fn error_body(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorDto {
        status_code: status.as_u16(),
        message: message.into(),
        error: status.canonical_reason().unwrap_or("Error").to_string(),
    })
}

/// Renders a service failure as a JSON error response.
pub fn error_response(err: ServiceError) -> HttpResponse {
    let status = status_for(&err);
    if status.is_client_error() {
        log::debug!("Rejected request: {err}");
    }
    let message = match err {
        ServiceError::Internal => "Internal server error".to_string(),
        other => other.to_string(),
    };
    error_body(status, message)
}

/// Answers malformed JSON bodies with a 400 in the shared error shape.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = error_body(StatusCode::BAD_REQUEST, err.to_string());
    InternalError::from_response(err, response).into()
}

/// Answers malformed query strings with a 400 in the shared error shape.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = error_body(StatusCode::BAD_REQUEST, err.to_string());
    InternalError::from_response(err, response).into()
}

/// Answers non-numeric path identifiers with a 400 in the shared error shape.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    let response = error_body(StatusCode::BAD_REQUEST, err.to_string());
    InternalError::from_response(err, response).into()
}
