use crate::domain::category::Category;
use crate::domain::types::{CategoryId, CategoryName, Lifecycle};
use crate::dto::ApiResponse;
use crate::dto::categories::{CategoryDto, CategoryPageDto};
use crate::forms::categories::{AddCategoryFormPayload, UpdateCategoryFormPayload};
use crate::forms::listing::ListFilterPayload;
use crate::pagination::{Pagination, Sort};
use crate::repository::{CategoryListQuery, CategoryReader, CategoryWriter, RepositoryError};

use super::{ServiceError, ServiceResult};

fn duplicate_name(name: &CategoryName) -> ServiceError {
    ServiceError::DuplicateName(format!("Category name '{name}' already exists"))
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("Category not found".to_string())
}

fn ensure_name_available<R>(
    repo: &R,
    name: &CategoryName,
    exclude: Option<CategoryId>,
) -> ServiceResult<()>
where
    R: CategoryReader,
{
    match repo.category_name_taken(name, exclude) {
        Ok(false) => Ok(()),
        Ok(true) => {
            log::warn!("Rejected duplicate category name: {name}");
            Err(duplicate_name(name))
        }
        Err(e) => {
            log::error!("Failed to check category name: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Loads a category that has not been soft-deleted.
fn load_live_category<R>(repo: &R, id: CategoryId) -> ServiceResult<Category>
where
    R: CategoryReader,
{
    match repo.get_category_by_id(id) {
        Ok(Some(category)) if !category.status.is_deleted() => Ok(category),
        Ok(_) => Err(not_found()),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn sub_category_count<R>(repo: &R, id: CategoryId) -> ServiceResult<usize>
where
    R: CategoryReader,
{
    match repo.count_active_sub_categories(&[id]) {
        Ok(counts) => Ok(counts.get(&id).copied().unwrap_or(0)),
        Err(e) => {
            log::error!("Failed to count sub-categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn create_category<R>(
    payload: AddCategoryFormPayload,
    repo: &R,
) -> ServiceResult<ApiResponse<CategoryDto>>
where
    R: CategoryReader + CategoryWriter,
{
    ensure_name_available(repo, &payload.name, None)?;

    let name = payload.name.clone();
    match repo.create_category(&payload.into_new_category()) {
        Ok(category) => {
            log::info!("Created category {}", category.id);
            Ok(ApiResponse::new(
                "Category created successfully",
                CategoryDto::new(category, 0),
            ))
        }
        Err(RepositoryError::Conflict(_)) => Err(duplicate_name(&name)),
        Err(e) => {
            log::error!("Failed to create category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Lists non-deleted categories. Without an explicit `isActive` filter only
/// active categories are returned.
pub fn list_categories<R>(
    filter: ListFilterPayload,
    pagination: Pagination,
    sort: Sort,
    repo: &R,
) -> ServiceResult<ApiResponse<CategoryPageDto>>
where
    R: CategoryReader,
{
    let mut query = CategoryListQuery::default().paginate(pagination).sort(sort);
    if let Some(status) = filter.status_or(Some(Lifecycle::Active)) {
        query = query.status(status);
    }
    if let Some(search) = filter.search {
        query = query.search(search);
    }

    let (total, categories) = match repo.list_categories(query) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let ids: Vec<CategoryId> = categories.iter().map(|c| c.id).collect();
    let counts = match repo.count_active_sub_categories(&ids) {
        Ok(counts) => counts,
        Err(e) => {
            log::error!("Failed to count sub-categories: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let categories = categories
        .into_iter()
        .map(|category| {
            let count = counts.get(&category.id).copied().unwrap_or(0);
            CategoryDto::new(category, count)
        })
        .collect();

    let message = if total == 0 {
        "No categories found"
    } else {
        "Categories retrieved successfully"
    };
    Ok(ApiResponse::new(message, CategoryPageDto { total, categories }))
}

pub fn get_category<R>(id: CategoryId, repo: &R) -> ServiceResult<ApiResponse<CategoryDto>>
where
    R: CategoryReader,
{
    let category = load_live_category(repo, id)?;
    if !category.status.is_active() {
        return Err(not_found());
    }
    let count = sub_category_count(repo, id)?;
    Ok(ApiResponse::new(
        "Category retrieved successfully",
        CategoryDto::new(category, count),
    ))
}

pub fn update_category<R>(
    id: CategoryId,
    payload: UpdateCategoryFormPayload,
    repo: &R,
) -> ServiceResult<ApiResponse<()>>
where
    R: CategoryReader + CategoryWriter,
{
    load_live_category(repo, id)?;

    let update = payload.update;
    if update.is_empty() {
        return Err(ServiceError::EmptyUpdate);
    }

    if let Some(name) = &update.name {
        ensure_name_available(repo, name, Some(id))?;
    }

    match repo.update_category(id, &update) {
        Ok(0) => Err(not_found()),
        Ok(_) => Ok(ApiResponse::message("Category updated successfully")),
        Err(RepositoryError::Conflict(_)) => match &update.name {
            Some(name) => Err(duplicate_name(name)),
            None => Err(ServiceError::Internal),
        },
        Err(e) => {
            log::error!("Failed to update category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Soft-deletes a category. Sub-categories and courses referencing it are
/// left untouched.
pub fn delete_category<R>(id: CategoryId, repo: &R) -> ServiceResult<ApiResponse<()>>
where
    R: CategoryWriter,
{
    match repo.delete_category(id) {
        Ok(0) => Err(ServiceError::NotFound(
            "Category not found or already deleted".to_string(),
        )),
        Ok(_) => Ok(ApiResponse::message("Category deleted successfully")),
        Err(e) => {
            log::error!("Failed to delete category: {e}");
            Err(ServiceError::Internal)
        }
    }
}
