//! Course operations.
//!
//! Creates and updates pass through a [`ValidationPipeline`] and write only
//! after every queued check has succeeded.

use crate::domain::course::Course;
use crate::domain::types::{CategoryId, CourseId, Lifecycle, SubCategoryId};
use crate::dto::ApiResponse;
use crate::dto::courses::{CourseDto, CoursePageDto, ReferenceNames};
use crate::forms::courses::{AddCourseFormPayload, UpdateCourseFormPayload};
use crate::forms::listing::ListFilterPayload;
use crate::pagination::{Pagination, Sort};
use crate::repository::{
    ActiveIdFilter, CategoryReader, CourseListQuery, CourseNameScope, CourseReader, CourseWriter,
    SubCategoryReader,
};
use crate::services::validation::ValidationPipeline;

use super::{ServiceError, ServiceResult};

fn not_found() -> ServiceError {
    ServiceError::NotFound("Course not found".to_string())
}

/// Names of the active categories and sub-categories referenced by `courses`.
fn reference_names<R>(repo: &R, courses: &[Course]) -> ServiceResult<ReferenceNames>
where
    R: CategoryReader + SubCategoryReader,
{
    let category_ids: Vec<CategoryId> = courses
        .iter()
        .flat_map(|c| c.category_ids.iter().copied())
        .collect();
    let sub_category_ids: Vec<SubCategoryId> = courses
        .iter()
        .flat_map(|c| c.sub_category_ids.iter().copied())
        .collect();

    let categories = repo
        .find_categories(&ActiveIdFilter::new(&category_ids))
        .map_err(|e| {
            log::error!("Failed to load course categories: {e}");
            ServiceError::Internal
        })?;
    let sub_categories = repo
        .find_sub_categories(&ActiveIdFilter::new(&sub_category_ids))
        .map_err(|e| {
            log::error!("Failed to load course sub-categories: {e}");
            ServiceError::Internal
        })?;

    Ok(ReferenceNames::new(&categories, &sub_categories))
}

/// Creates a course after its categories, sub-categories and name scope have
/// been validated.
pub fn create_course<R>(
    payload: AddCourseFormPayload,
    repo: &R,
) -> ServiceResult<ApiResponse<CourseDto>>
where
    R: CategoryReader + SubCategoryReader + CourseReader + CourseWriter,
{
    let scope = CourseNameScope::new(
        payload.name.clone(),
        &payload.category_ids,
        &payload.sub_category_ids,
    );
    let resolved = ValidationPipeline::new()
        .categories(&payload.category_ids)
        .sub_categories(&payload.sub_category_ids, &payload.category_ids)
        .name_uniqueness(&scope)
        .run(repo)?;

    match repo.create_course(&payload.into_new_course()) {
        Ok(course) => {
            log::info!("Created course {}", course.id);
            let names = ReferenceNames::new(&resolved.categories, &resolved.sub_categories);
            Ok(ApiResponse::new(
                "Course created successfully",
                CourseDto::new(course, &names),
            ))
        }
        Err(e) => {
            log::error!("Failed to create course: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Applies a partial update to a course.
///
/// Only supplied fields are validated and written. Supplied categories are
/// checked for existence, supplied sub-categories against the final category
/// set, and the name scope is re-checked with the final name and references
/// whenever any of them changes.
pub fn update_course<R>(
    id: CourseId,
    payload: UpdateCourseFormPayload,
    repo: &R,
) -> ServiceResult<ApiResponse<()>>
where
    R: CategoryReader + SubCategoryReader + CourseReader + CourseWriter,
{
    let course = match repo.get_course_by_id(id) {
        Ok(Some(course)) if !course.status.is_deleted() => course,
        Ok(_) => return Err(not_found()),
        Err(e) => {
            log::error!("Failed to get course: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let update = payload.update;
    if update.is_empty() {
        return Err(ServiceError::EmptyUpdate);
    }

    let final_category_ids = update
        .category_ids
        .as_deref()
        .unwrap_or(&course.category_ids);
    let final_sub_category_ids = update
        .sub_category_ids
        .as_deref()
        .unwrap_or(&course.sub_category_ids);
    let final_name = update.name.clone().unwrap_or_else(|| course.name.clone());
    let scope = CourseNameScope::new(final_name, final_category_ids, final_sub_category_ids)
        .excluding(course.id);

    let mut pipeline = ValidationPipeline::new();
    if let Some(category_ids) = &update.category_ids {
        pipeline = pipeline.categories(category_ids);
    }
    if let Some(sub_category_ids) = &update.sub_category_ids {
        pipeline = pipeline.sub_categories(sub_category_ids, final_category_ids);
    }
    if update.touches_name_scope() {
        pipeline = pipeline.name_uniqueness(&scope);
    }
    pipeline.run(repo)?;

    match repo.update_course(course.id, &update) {
        Ok(Some(_)) => Ok(ApiResponse::message("Course updated successfully")),
        Ok(None) => Err(not_found()),
        Err(e) => {
            log::error!("Failed to update course: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn list_courses<R>(
    filter: ListFilterPayload,
    pagination: Pagination,
    sort: Sort,
    repo: &R,
) -> ServiceResult<ApiResponse<CoursePageDto>>
where
    R: CategoryReader + SubCategoryReader + CourseReader,
{
    let mut query = CourseListQuery::default().paginate(pagination).sort(sort);
    if let Some(status) = filter.status_or(Some(Lifecycle::Active)) {
        query = query.status(status);
    }
    if let Some(category_id) = filter.category_id {
        query = query.category(category_id);
    }
    if let Some(sub_category_id) = filter.sub_category_id {
        query = query.sub_category(sub_category_id);
    }
    if let Some(search) = filter.search {
        query = query.search(search);
    }

    let (total, courses) = match repo.list_courses(query) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Failed to list courses: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let names = reference_names(repo, &courses)?;
    let courses = courses
        .into_iter()
        .map(|course| CourseDto::new(course, &names))
        .collect();

    let message = if total == 0 {
        "No courses found"
    } else {
        "Courses retrieved successfully"
    };
    Ok(ApiResponse::new(message, CoursePageDto { total, courses }))
}

pub fn get_course<R>(id: CourseId, repo: &R) -> ServiceResult<ApiResponse<CourseDto>>
where
    R: CategoryReader + SubCategoryReader + CourseReader,
{
    let course = match repo.get_course_by_id(id) {
        Ok(Some(course)) if course.status.is_active() => course,
        Ok(_) => return Err(not_found()),
        Err(e) => {
            log::error!("Failed to get course: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let names = reference_names(repo, std::slice::from_ref(&course))?;
    Ok(ApiResponse::new(
        "Course retrieved successfully",
        CourseDto::new(course, &names),
    ))
}

pub fn delete_course<R>(id: CourseId, repo: &R) -> ServiceResult<ApiResponse<()>>
where
    R: CourseWriter,
{
    match repo.delete_course(id) {
        Ok(0) => Err(ServiceError::NotFound(
            "Course not found or already deleted".to_string(),
        )),
        Ok(_) => Ok(ApiResponse::message("Course deleted successfully")),
        Err(e) => {
            log::error!("Failed to delete course: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::domain::category::Category;
    use crate::domain::course::CourseUpdate;
    use crate::domain::sub_category::SubCategory;
    use crate::domain::types::{
        CategoryName, CourseName, Description, SubCategoryName,
    };
    use crate::repository::test::TestRepository;
    use crate::services::errors::ReferenceKind;
    use crate::services::validation::DUPLICATE_COURSE_NAME;

    fn ts() -> chrono::NaiveDateTime {
        DateTime::from_timestamp(0, 0).unwrap().naive_utc()
    }

    fn cat(id: i32) -> CategoryId {
        CategoryId::new(id).unwrap()
    }

    fn sub(id: i32) -> SubCategoryId {
        SubCategoryId::new(id).unwrap()
    }

    fn sample_category(id: i32, status: Lifecycle) -> Category {
        Category {
            id: cat(id),
            name: CategoryName::new(format!("C{id}")).unwrap(),
            description: Description::new("desc").unwrap(),
            status,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn sample_sub_category(id: i32, owner: i32) -> SubCategory {
        SubCategory {
            id: sub(id),
            category_id: cat(owner),
            name: SubCategoryName::new(format!("S{id}")).unwrap(),
            description: Description::new("desc").unwrap(),
            status: Lifecycle::Active,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn sample_course(id: i32, name: &str, categories: &[i32], status: Lifecycle) -> Course {
        Course {
            id: CourseId::new(id).unwrap(),
            name: CourseName::new(name).unwrap(),
            description: Description::new("old").unwrap(),
            category_ids: categories.iter().map(|c| cat(*c)).collect(),
            sub_category_ids: vec![],
            status,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn repo_with(courses: Vec<Course>) -> TestRepository {
        TestRepository::new(
            vec![
                sample_category(1, Lifecycle::Active),
                sample_category(2, Lifecycle::Active),
                sample_category(3, Lifecycle::Inactive),
            ],
            vec![sample_sub_category(1, 1), sample_sub_category(2, 2)],
            courses,
        )
    }

    fn add_payload(name: &str, categories: &[i32], sub_categories: &[i32]) -> AddCourseFormPayload {
        AddCourseFormPayload {
            name: CourseName::new(name).unwrap(),
            description: Description::new("desc").unwrap(),
            category_ids: categories.iter().map(|c| cat(*c)).collect(),
            sub_category_ids: sub_categories.iter().map(|s| sub(*s)).collect(),
        }
    }

    fn update_payload(update: CourseUpdate) -> UpdateCourseFormPayload {
        UpdateCourseFormPayload { update }
    }

    #[test]
    fn create_with_active_category_and_no_sub_categories() {
        let repo = repo_with(vec![]);
        let response = create_course(add_payload("X", &[1], &[]), &repo).unwrap();
        assert_eq!(response.message, "Course created successfully");
        let dto = response.data.unwrap();
        assert!(dto.sub_categories.is_empty());
        assert_eq!(dto.categories[0].name, "C1");
    }

    #[test]
    fn create_with_inactive_category_fails() {
        let repo = repo_with(vec![]);
        let result = create_course(add_payload("X", &[3], &[]), &repo);
        assert_eq!(
            result,
            Err(ServiceError::InvalidReference {
                kind: ReferenceKind::Category,
                ids: vec![3],
            })
        );
        assert_eq!(repo.writes(), 0);
    }

    #[test]
    fn create_with_foreign_sub_category_fails() {
        let repo = repo_with(vec![]);
        let result = create_course(add_payload("X", &[1], &[2]), &repo);
        assert_eq!(
            result,
            Err(ServiceError::OwnershipViolation {
                sub_category_id: 2,
                category_id: 2,
            })
        );
        assert_eq!(repo.writes(), 0);
    }

    #[test]
    fn duplicate_name_is_scoped_by_category_overlap() {
        let repo = repo_with(vec![sample_course(1, "Java", &[1], Lifecycle::Active)]);
        assert_eq!(
            create_course(add_payload("Java", &[1], &[]), &repo),
            Err(ServiceError::DuplicateName(DUPLICATE_COURSE_NAME.to_string()))
        );
        assert!(create_course(add_payload("Java", &[2], &[]), &repo).is_ok());
    }

    #[test]
    fn disjoint_sub_categories_narrow_name_scope() {
        let mut java = sample_course(1, "Java", &[1], Lifecycle::Active);
        java.sub_category_ids = vec![sub(1)];
        let repo = TestRepository::new(
            vec![sample_category(1, Lifecycle::Active)],
            vec![sample_sub_category(1, 1), sample_sub_category(3, 1)],
            vec![java],
        );

        let created = create_course(add_payload("Java", &[1], &[3]), &repo).unwrap();
        let dto = created.data.unwrap();
        assert_eq!(dto.sub_categories[0].name, "S3");

        assert_eq!(
            create_course(add_payload("Java", &[1], &[1]), &repo),
            Err(ServiceError::DuplicateName(DUPLICATE_COURSE_NAME.to_string()))
        );
    }

    #[test]
    fn second_identical_create_fails_once_first_committed() {
        let repo = repo_with(vec![]);
        assert!(create_course(add_payload("Rust", &[1, 2], &[]), &repo).is_ok());
        assert!(matches!(
            create_course(add_payload("Rust", &[2], &[]), &repo),
            Err(ServiceError::DuplicateName(_))
        ));
    }

    #[test]
    fn deleted_course_does_not_block_name() {
        let repo = repo_with(vec![sample_course(1, "Java", &[1], Lifecycle::Deleted)]);
        assert!(create_course(add_payload("Java", &[1], &[]), &repo).is_ok());
    }

    #[test]
    fn description_only_update_skips_reference_checks() {
        // The stored course references an inactive category; a description-only
        // update must not re-validate it.
        let repo = repo_with(vec![sample_course(1, "Java", &[3], Lifecycle::Active)]);
        let update = CourseUpdate {
            description: Some(Description::new("new").unwrap()),
            ..Default::default()
        };
        let response =
            update_course(CourseId::new(1).unwrap(), update_payload(update), &repo).unwrap();
        assert_eq!(response.message, "Course updated successfully");

        let stored = repo.course(CourseId::new(1).unwrap()).unwrap();
        assert_eq!(stored.description.as_str(), "new");
        assert_eq!(stored.name.as_str(), "Java");
        assert_eq!(stored.category_ids, vec![cat(3)]);
        assert!(stored.sub_category_ids.is_empty());
    }

    #[test]
    fn update_checks_sub_categories_against_final_categories() {
        let repo = repo_with(vec![sample_course(1, "Java", &[1], Lifecycle::Active)]);
        let update = CourseUpdate {
            sub_category_ids: Some(vec![sub(2)]),
            ..Default::default()
        };
        let result = update_course(CourseId::new(1).unwrap(), update_payload(update), &repo);
        assert!(matches!(
            result,
            Err(ServiceError::OwnershipViolation { .. })
        ));

        let update = CourseUpdate {
            category_ids: Some(vec![cat(2)]),
            sub_category_ids: Some(vec![sub(2)]),
            ..Default::default()
        };
        assert!(update_course(CourseId::new(1).unwrap(), update_payload(update), &repo).is_ok());
        assert_eq!(repo.writes(), 1);
    }

    #[test]
    fn update_does_not_collide_with_itself() {
        let repo = repo_with(vec![sample_course(1, "Java", &[1], Lifecycle::Active)]);
        let update = CourseUpdate {
            name: Some(CourseName::new("Java").unwrap()),
            ..Default::default()
        };
        assert!(update_course(CourseId::new(1).unwrap(), update_payload(update), &repo).is_ok());
    }

    #[test]
    fn update_uses_final_references_for_name_scope() {
        let repo = repo_with(vec![
            sample_course(1, "Java", &[1], Lifecycle::Active),
            sample_course(2, "Java", &[2], Lifecycle::Active),
        ]);
        let update = CourseUpdate {
            category_ids: Some(vec![cat(1)]),
            ..Default::default()
        };
        let result = update_course(CourseId::new(2).unwrap(), update_payload(update), &repo);
        assert!(matches!(result, Err(ServiceError::DuplicateName(_))));
        assert_eq!(
            repo.course(CourseId::new(2).unwrap()).unwrap().category_ids,
            vec![cat(2)]
        );
    }

    #[test]
    fn empty_update_is_rejected() {
        let repo = repo_with(vec![sample_course(1, "Java", &[1], Lifecycle::Active)]);
        let result = update_course(
            CourseId::new(1).unwrap(),
            update_payload(CourseUpdate::default()),
            &repo,
        );
        assert_eq!(result, Err(ServiceError::EmptyUpdate));
    }

    #[test]
    fn update_of_deleted_course_is_not_found() {
        let repo = repo_with(vec![sample_course(1, "Java", &[1], Lifecycle::Deleted)]);
        let update = CourseUpdate {
            description: Some(Description::new("new").unwrap()),
            ..Default::default()
        };
        let result = update_course(CourseId::new(1).unwrap(), update_payload(update), &repo);
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn list_populates_only_active_references() {
        let repo = repo_with(vec![sample_course(1, "Java", &[1, 3], Lifecycle::Active)]);
        let response = list_courses(
            ListFilterPayload::default(),
            Pagination::resolve(None, None, true),
            Sort::default(),
            &repo,
        )
        .unwrap();
        let page = response.data.unwrap();
        assert_eq!(page.total, 1);
        let names: Vec<&str> = page.courses[0]
            .categories
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["C1"]);
    }

    #[test]
    fn inactive_course_is_hidden_from_get() {
        let repo = repo_with(vec![sample_course(1, "Java", &[1], Lifecycle::Inactive)]);
        assert!(matches!(
            get_course(CourseId::new(1).unwrap(), &repo),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn delete_course_reports_repeat_as_not_found() {
        let repo = repo_with(vec![sample_course(1, "Java", &[1], Lifecycle::Active)]);
        let id = CourseId::new(1).unwrap();
        assert!(delete_course(id, &repo).is_ok());
        assert_eq!(
            delete_course(id, &repo),
            Err(ServiceError::NotFound(
                "Course not found or already deleted".to_string()
            ))
        );
    }
}
