use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::types::CategoryId;
use crate::forms::categories::{
    AddCategoryForm, AddCategoryFormPayload, UpdateCategoryForm, UpdateCategoryFormPayload,
};
use crate::forms::listing::{ListFilterForm, ListFilterPayload, PageQuery};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::categories::{
    create_category as create_category_service, delete_category as delete_category_service,
    get_category as get_category_service, list_categories as list_categories_service,
    update_category as update_category_service,
};

#[post("/category")]
pub async fn create_category(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddCategoryForm>,
) -> impl Responder {
    let payload: AddCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match create_category_service(payload, repo.get_ref()) {
        Ok(response) => HttpResponse::Created().json(response),
        Err(err) => error_response(err),
    }
}

#[get("/categories")]
pub async fn list_categories(
    repo: web::Data<DieselRepository>,
    web::Query(page): web::Query<PageQuery>,
    web::Query(filter): web::Query<ListFilterForm>,
) -> impl Responder {
    let filter: ListFilterPayload = match filter.try_into() {
        Ok(filter) => filter,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match list_categories_service(filter, page.pagination(), page.sort(), repo.get_ref()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}

#[get("/category/{id}")]
pub async fn get_category(
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> impl Responder {
    let id = match CategoryId::new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(e.into()),
    };

    match get_category_service(id, repo.get_ref()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}

#[put("/category/{id}")]
pub async fn update_category(
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    web::Json(form): web::Json<UpdateCategoryForm>,
) -> impl Responder {
    let id = match CategoryId::new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(e.into()),
    };
    let payload: UpdateCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match update_category_service(id, payload, repo.get_ref()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}

#[delete("/category/{id}")]
pub async fn delete_category(
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> impl Responder {
    let id = match CategoryId::new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(e.into()),
    };

    match delete_category_service(id, repo.get_ref()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}
