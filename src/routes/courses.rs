use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::types::CourseId;
use crate::forms::courses::{
    AddCourseForm, AddCourseFormPayload, UpdateCourseForm, UpdateCourseFormPayload,
};
use crate::forms::listing::{ListFilterForm, ListFilterPayload, PageQuery};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::courses::{
    create_course as create_course_service, delete_course as delete_course_service,
    get_course as get_course_service, list_courses as list_courses_service,
    update_course as update_course_service,
};

#[post("/course")]
pub async fn create_course(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddCourseForm>,
) -> impl Responder {
    let payload: AddCourseFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match create_course_service(payload, repo.get_ref()) {
        Ok(response) => HttpResponse::Created().json(response),
        Err(err) => error_response(err),
    }
}

#[get("/courses")]
pub async fn list_courses(
    repo: web::Data<DieselRepository>,
    web::Query(page): web::Query<PageQuery>,
    web::Query(filter): web::Query<ListFilterForm>,
) -> impl Responder {
    let filter: ListFilterPayload = match filter.try_into() {
        Ok(filter) => filter,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match list_courses_service(filter, page.pagination(), page.sort(), repo.get_ref()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}

#[get("/course/{id}")]
pub async fn get_course(
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> impl Responder {
    let id = match CourseId::new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(e.into()),
    };

    match get_course_service(id, repo.get_ref()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}

#[put("/course/{id}")]
pub async fn update_course(
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    web::Json(form): web::Json<UpdateCourseForm>,
) -> impl Responder {
    let id = match CourseId::new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(e.into()),
    };
    let payload: UpdateCourseFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match update_course_service(id, payload, repo.get_ref()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}

#[delete("/course/{id}")]
pub async fn delete_course(
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> impl Responder {
    let id = match CourseId::new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(e.into()),
    };

    match delete_course_service(id, repo.get_ref()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}
