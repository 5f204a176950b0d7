use std::collections::HashMap;

use crate::domain::category::Category;
use crate::domain::sub_category::SubCategory;
use crate::domain::types::{CategoryId, SubCategoryId, SubCategoryName};
use crate::dto::ApiResponse;
use crate::dto::sub_categories::{SubCategoryDto, SubCategoryPageDto};
use crate::forms::listing::ListFilterPayload;
use crate::forms::sub_categories::{AddSubCategoryFormPayload, UpdateSubCategoryFormPayload};
use crate::pagination::{Pagination, Sort};
use crate::repository::{
    ActiveIdFilter, CategoryReader, RepositoryError, SubCategoryListQuery, SubCategoryReader,
    SubCategoryWriter,
};
use crate::services::validation::validate_categories;

use super::{ServiceError, ServiceResult};

fn duplicate_name(name: &SubCategoryName) -> ServiceError {
    ServiceError::DuplicateName(format!(
        "Sub-category name '{name}' already exists in this category"
    ))
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("Sub-category not found".to_string())
}

fn ensure_name_available<R>(
    repo: &R,
    category_id: CategoryId,
    name: &SubCategoryName,
    exclude: Option<SubCategoryId>,
) -> ServiceResult<()>
where
    R: SubCategoryReader,
{
    match repo.sub_category_name_taken(category_id, name, exclude) {
        Ok(false) => Ok(()),
        Ok(true) => {
            log::warn!("Rejected duplicate sub-category name {name} in category {category_id}");
            Err(duplicate_name(name))
        }
        Err(e) => {
            log::error!("Failed to check sub-category name: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn load_live_sub_category<R>(repo: &R, id: SubCategoryId) -> ServiceResult<SubCategory>
where
    R: SubCategoryReader,
{
    match repo.get_sub_category_by_id(id) {
        Ok(Some(sub_category)) if !sub_category.status.is_deleted() => Ok(sub_category),
        Ok(_) => Err(not_found()),
        Err(e) => {
            log::error!("Failed to get sub-category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Active owning categories of `sub_categories`, keyed by id.
fn active_owners<R>(
    repo: &R,
    sub_categories: &[SubCategory],
) -> ServiceResult<HashMap<CategoryId, Category>>
where
    R: CategoryReader,
{
    let ids: Vec<CategoryId> = sub_categories.iter().map(|s| s.category_id).collect();
    match repo.find_categories(&ActiveIdFilter::new(&ids)) {
        Ok(categories) => Ok(categories.into_iter().map(|c| (c.id, c)).collect()),
        Err(e) => {
            log::error!("Failed to load owning categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn create_sub_category<R>(
    payload: AddSubCategoryFormPayload,
    repo: &R,
) -> ServiceResult<ApiResponse<SubCategoryDto>>
where
    R: CategoryReader + SubCategoryReader + SubCategoryWriter,
{
    let owner = match repo.get_category_by_id(payload.category_id) {
        Ok(Some(category)) if category.status.is_active() => category,
        Ok(_) => {
            return Err(ServiceError::NotFound(
                "Category does not exist or is inactive".to_string(),
            ));
        }
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    };

    ensure_name_available(repo, payload.category_id, &payload.name, None)?;

    let name = payload.name.clone();
    match repo.create_sub_category(&payload.into_new_sub_category()) {
        Ok(sub_category) => {
            log::info!("Created sub-category {}", sub_category.id);
            Ok(ApiResponse::new(
                "Sub-category created successfully",
                SubCategoryDto::new(sub_category, Some(&owner)),
            ))
        }
        Err(RepositoryError::Conflict(_)) => Err(duplicate_name(&name)),
        Err(e) => {
            log::error!("Failed to create sub-category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Lists non-deleted sub-categories. Without `isActive` both active and
/// inactive records are returned.
pub fn list_sub_categories<R>(
    filter: ListFilterPayload,
    pagination: Pagination,
    sort: Sort,
    repo: &R,
) -> ServiceResult<ApiResponse<SubCategoryPageDto>>
where
    R: CategoryReader + SubCategoryReader,
{
    let mut query = SubCategoryListQuery::default()
        .paginate(pagination)
        .sort(sort);
    if let Some(status) = filter.status {
        query = query.status(status);
    }
    if let Some(category_id) = filter.category_id {
        query = query.category(category_id);
    }
    if let Some(search) = filter.search {
        query = query.search(search);
    }

    let (total, sub_categories) = match repo.list_sub_categories(query) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Failed to list sub-categories: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let owners = active_owners(repo, &sub_categories)?;
    let sub_categories = sub_categories
        .into_iter()
        .map(|s| {
            let owner = owners.get(&s.category_id);
            SubCategoryDto::new(s, owner)
        })
        .collect();

    let message = if total == 0 {
        "No sub-categories found"
    } else {
        "Sub-categories retrieved successfully"
    };
    Ok(ApiResponse::new(
        message,
        SubCategoryPageDto {
            total,
            sub_categories,
        },
    ))
}

pub fn get_sub_category<R>(
    id: SubCategoryId,
    repo: &R,
) -> ServiceResult<ApiResponse<SubCategoryDto>>
where
    R: CategoryReader + SubCategoryReader,
{
    let sub_category = load_live_sub_category(repo, id)?;
    if !sub_category.status.is_active() {
        return Err(not_found());
    }

    let owners = active_owners(repo, std::slice::from_ref(&sub_category))?;
    let owner = owners.get(&sub_category.category_id);
    Ok(ApiResponse::new(
        "Sub-category retrieved successfully",
        SubCategoryDto::new(sub_category, owner),
    ))
}

/// Applies a partial update. A new owning category must be active, and the
/// final name must be free within the final owning category.
pub fn update_sub_category<R>(
    id: SubCategoryId,
    payload: UpdateSubCategoryFormPayload,
    repo: &R,
) -> ServiceResult<ApiResponse<()>>
where
    R: CategoryReader + SubCategoryReader + SubCategoryWriter,
{
    let existing = load_live_sub_category(repo, id)?;

    let update = payload.update;
    if update.is_empty() {
        return Err(ServiceError::EmptyUpdate);
    }

    if let Some(category_id) = update.category_id {
        validate_categories(repo, &[category_id])?;
    }

    if update.name.is_some() || update.category_id.is_some() {
        let final_name = update.name.as_ref().unwrap_or(&existing.name);
        let final_category = update.category_id.unwrap_or(existing.category_id);
        ensure_name_available(repo, final_category, final_name, Some(id))?;
    }

    match repo.update_sub_category(id, &update) {
        Ok(0) => Err(not_found()),
        Ok(_) => Ok(ApiResponse::message("Sub-category updated successfully")),
        Err(RepositoryError::Conflict(_)) => Err(duplicate_name(
            update.name.as_ref().unwrap_or(&existing.name),
        )),
        Err(e) => {
            log::error!("Failed to update sub-category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn delete_sub_category<R>(id: SubCategoryId, repo: &R) -> ServiceResult<ApiResponse<()>>
where
    R: SubCategoryWriter,
{
    match repo.delete_sub_category(id) {
        Ok(0) => Err(ServiceError::NotFound(
            "Sub-category not found or already deleted".to_string(),
        )),
        Ok(_) => Ok(ApiResponse::message("Sub-category deleted successfully")),
        Err(e) => {
            log::error!("Failed to delete sub-category: {e}");
            Err(ServiceError::Internal)
        }
    }
}
