use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::types::SubCategoryId;
use crate::forms::listing::{ListFilterForm, ListFilterPayload, PageQuery};
use crate::forms::sub_categories::{
    AddSubCategoryForm, AddSubCategoryFormPayload, UpdateSubCategoryForm,
    UpdateSubCategoryFormPayload,
};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::sub_categories::{
    create_sub_category as create_sub_category_service,
    delete_sub_category as delete_sub_category_service,
    get_sub_category as get_sub_category_service,
    list_sub_categories as list_sub_categories_service,
    update_sub_category as update_sub_category_service,
};

#[post("/sub-category")]
pub async fn create_sub_category(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddSubCategoryForm>,
) -> impl Responder {
    let payload: AddSubCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match create_sub_category_service(payload, repo.get_ref()) {
        Ok(response) => HttpResponse::Created().json(response),
        Err(err) => error_response(err),
    }
}

#[get("/sub-categories")]
pub async fn list_sub_categories(
    repo: web::Data<DieselRepository>,
    web::Query(page): web::Query<PageQuery>,
    web::Query(filter): web::Query<ListFilterForm>,
) -> impl Responder {
    let filter: ListFilterPayload = match filter.try_into() {
        Ok(filter) => filter,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match list_sub_categories_service(filter, page.pagination(), page.sort(), repo.get_ref()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}

#[get("/sub-category/{id}")]
pub async fn get_sub_category(
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> impl Responder {
    let id = match SubCategoryId::new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(e.into()),
    };

    match get_sub_category_service(id, repo.get_ref()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}

#[put("/sub-category/{id}")]
pub async fn update_sub_category(
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    web::Json(form): web::Json<UpdateSubCategoryForm>,
) -> impl Responder {
    let id = match SubCategoryId::new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(e.into()),
    };
    let payload: UpdateSubCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match update_sub_category_service(id, payload, repo.get_ref()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}

#[delete("/sub-category/{id}")]
pub async fn delete_sub_category(
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> impl Responder {
    let id = match SubCategoryId::new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(e.into()),
    };

    match delete_sub_category_service(id, repo.get_ref()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}
