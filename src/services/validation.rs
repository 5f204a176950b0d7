//! Read-only cross-entity checks guarding course and sub-category mutations.
//!
//! Checks always run in this order, whatever order they were queued in:
//!
//! 1. [`ValidationStep::Categories`]: every category id resolves to an active record.
//! 2. [`ValidationStep::SubCategories`]: every sub-category id resolves to an
//!    active record, then every resolved sub-category is owned by an allowed
//!    category. An inactive sub-category is reported as missing, never as an
//!    ownership mismatch.
//! 3. [`ValidationStep::NameUniqueness`]: no other non-deleted course shares the
//!    name within the final category and sub-category scope.
//!
//! The first failing step aborts the run. Nothing here writes to the store.
//!
//! The uniqueness step is check-then-act: two concurrent mutations targeting
//! the same scope can both pass it. Category and sub-category names are also
//! guarded by unique indexes in the store; course scopes are not.

use std::collections::HashSet;

use crate::domain::category::Category;
use crate::domain::sub_category::SubCategory;
use crate::domain::types::{CategoryId, SubCategoryId};
use crate::repository::{
    ActiveIdFilter, CategoryReader, CourseNameScope, CourseReader, SubCategoryReader,
};
use crate::services::errors::{ReferenceKind, ServiceError, ServiceResult};

/// Message reported when a course name collides inside its scope.
pub const DUPLICATE_COURSE_NAME: &str =
    "Course name already exists for the selected category and sub-category";

/// Resolves `ids` to active categories.
///
/// Fails with [`ServiceError::InvalidReference`] naming every id that is
/// unknown, inactive or deleted. Duplicate ids are counted once.
pub fn validate_categories<R>(repo: &R, ids: &[CategoryId]) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader,
{
    let filter = ActiveIdFilter::new(ids);
    let found = repo.find_categories(&filter).map_err(|e| {
        log::error!("Failed to resolve categories: {e}");
        ServiceError::Internal
    })?;

    if found.len() < filter.len() {
        let found_ids: Vec<CategoryId> = found.iter().map(|c| c.id).collect();
        let missing = filter.missing(&found_ids);
        log::debug!("Rejected category references: {missing:?}");
        return Err(ServiceError::InvalidReference {
            kind: ReferenceKind::Category,
            ids: missing.into_iter().map(i32::from).collect(),
        });
    }

    Ok(found)
}

/// Resolves `ids` to active sub-categories owned by one of `allowed`.
///
/// An empty `ids` succeeds without touching the store.
pub fn validate_sub_categories<R>(
    repo: &R,
    ids: &[SubCategoryId],
    allowed: &[CategoryId],
) -> ServiceResult<Vec<SubCategory>>
where
    R: SubCategoryReader,
{
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let filter = ActiveIdFilter::new(ids);
    let found = repo.find_sub_categories(&filter).map_err(|e| {
        log::error!("Failed to resolve sub-categories: {e}");
        ServiceError::Internal
    })?;

    if found.len() < filter.len() {
        let found_ids: Vec<SubCategoryId> = found.iter().map(|s| s.id).collect();
        let missing = filter.missing(&found_ids);
        log::debug!("Rejected sub-category references: {missing:?}");
        return Err(ServiceError::InvalidReference {
            kind: ReferenceKind::SubCategory,
            ids: missing.into_iter().map(i32::from).collect(),
        });
    }

    let allowed: HashSet<CategoryId> = allowed.iter().copied().collect();
    if let Some(stray) = found.iter().find(|s| !allowed.contains(&s.category_id)) {
        return Err(ServiceError::OwnershipViolation {
            sub_category_id: stray.id.get(),
            category_id: stray.category_id.get(),
        });
    }

    Ok(found)
}

/// Fails with [`ServiceError::DuplicateName`] when a course other than
/// `scope.exclude` already occupies the scope.
pub fn validate_course_name_uniqueness<R>(repo: &R, scope: &CourseNameScope) -> ServiceResult<()>
where
    R: CourseReader,
{
    match repo.course_exists(scope) {
        Ok(false) => Ok(()),
        Ok(true) => Err(ServiceError::DuplicateName(
            DUPLICATE_COURSE_NAME.to_string(),
        )),
        Err(e) => {
            log::error!("Failed to check course name uniqueness: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// A single check queued on a [`ValidationPipeline`].
#[derive(Debug, Clone, Copy)]
pub enum ValidationStep<'a> {
    Categories(&'a [CategoryId]),
    SubCategories {
        ids: &'a [SubCategoryId],
        allowed: &'a [CategoryId],
    },
    NameUniqueness(&'a CourseNameScope),
}

impl ValidationStep<'_> {
    fn rank(&self) -> u8 {
        match self {
            Self::Categories(_) => 0,
            Self::SubCategories { .. } => 1,
            Self::NameUniqueness(_) => 2,
        }
    }
}

/// Result of a single passing step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Categories(Vec<Category>),
    SubCategories(Vec<SubCategory>),
    NameAvailable,
}

/// Records resolved by a successful pipeline run.
///
/// Lists stay empty for steps that were not queued.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedReferences {
    pub categories: Vec<Category>,
    pub sub_categories: Vec<SubCategory>,
}

/// Ordered set of checks that must all pass before a course is written.
#[derive(Debug, Clone, Default)]
pub struct ValidationPipeline<'a> {
    steps: Vec<ValidationStep<'a>>,
}

impl<'a> ValidationPipeline<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(mut self, ids: &'a [CategoryId]) -> Self {
        self.steps.push(ValidationStep::Categories(ids));
        self
    }

    pub fn sub_categories(mut self, ids: &'a [SubCategoryId], allowed: &'a [CategoryId]) -> Self {
        self.steps
            .push(ValidationStep::SubCategories { ids, allowed });
        self
    }

    pub fn name_uniqueness(mut self, scope: &'a CourseNameScope) -> Self {
        self.steps.push(ValidationStep::NameUniqueness(scope));
        self
    }

    /// Queued steps in execution order.
    pub fn steps(&self) -> Vec<ValidationStep<'a>> {
        let mut steps = self.steps.clone();
        steps.sort_by_key(ValidationStep::rank);
        steps
    }

    /// Runs every queued step, stopping at the first failure.
    pub fn run<R>(self, repo: &R) -> ServiceResult<ValidatedReferences>
    where
        R: CategoryReader + SubCategoryReader + CourseReader,
    {
        let mut resolved = ValidatedReferences::default();
        for step in self.steps() {
            let outcome = run_step(repo, step).inspect_err(|e| {
                log::warn!("Course mutation rejected: {e}");
            })?;
            match outcome {
                StepOutcome::Categories(categories) => resolved.categories = categories,
                StepOutcome::SubCategories(sub_categories) => {
                    resolved.sub_categories = sub_categories
                }
                StepOutcome::NameAvailable => {}
            }
        }
        Ok(resolved)
    }
}

fn run_step<R>(repo: &R, step: ValidationStep<'_>) -> ServiceResult<StepOutcome>
where
    R: CategoryReader + SubCategoryReader + CourseReader,
{
    match step {
        ValidationStep::Categories(ids) => {
            validate_categories(repo, ids).map(StepOutcome::Categories)
        }
        ValidationStep::SubCategories { ids, allowed } => {
            validate_sub_categories(repo, ids, allowed).map(StepOutcome::SubCategories)
        }
        ValidationStep::NameUniqueness(scope) => {
            validate_course_name_uniqueness(repo, scope).map(|()| StepOutcome::NameAvailable)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::domain::course::Course;
    use crate::domain::types::{CategoryName, CourseId, CourseName, Description, Lifecycle, SubCategoryName};
    use crate::repository::test::TestRepository;

    fn ts() -> chrono::NaiveDateTime {
        DateTime::from_timestamp(0, 0).unwrap().naive_utc()
    }

    fn cat(id: i32) -> CategoryId {
        CategoryId::new(id).unwrap()
    }

    fn sub(id: i32) -> SubCategoryId {
        SubCategoryId::new(id).unwrap()
    }

    fn category(id: i32, status: Lifecycle) -> Category {
        Category {
            id: cat(id),
            name: CategoryName::new(format!("Category {id}")).unwrap(),
            description: Description::new("desc").unwrap(),
            status,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn sub_category(id: i32, owner: i32, status: Lifecycle) -> SubCategory {
        SubCategory {
            id: sub(id),
            category_id: cat(owner),
            name: SubCategoryName::new(format!("Sub {id}")).unwrap(),
            description: Description::new("desc").unwrap(),
            status,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn course(id: i32, name: &str, categories: &[i32], status: Lifecycle) -> Course {
        Course {
            id: CourseId::new(id).unwrap(),
            name: CourseName::new(name).unwrap(),
            description: Description::new("desc").unwrap(),
            category_ids: categories.iter().map(|c| cat(*c)).collect(),
            sub_category_ids: vec![],
            status,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn repo() -> TestRepository {
        TestRepository::new(
            vec![
                category(1, Lifecycle::Active),
                category(2, Lifecycle::Active),
                category(3, Lifecycle::Inactive),
                category(4, Lifecycle::Deleted),
            ],
            vec![
                sub_category(1, 1, Lifecycle::Active),
                sub_category(2, 2, Lifecycle::Active),
                sub_category(3, 1, Lifecycle::Inactive),
            ],
            vec![
                course(1, "Java", &[1], Lifecycle::Active),
                course(2, "Go", &[1], Lifecycle::Deleted),
            ],
        )
    }

    #[test]
    fn categories_resolve_when_all_active() {
        let found = validate_categories(&repo(), &[cat(1), cat(2)]).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn duplicate_category_ids_count_once() {
        let found = validate_categories(&repo(), &[cat(1), cat(1), cat(2)]).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn inactive_deleted_and_unknown_categories_are_invalid() {
        let err = validate_categories(&repo(), &[cat(1), cat(3), cat(4), cat(9)]).unwrap_err();
        assert_eq!(
            err,
            ServiceError::InvalidReference {
                kind: ReferenceKind::Category,
                ids: vec![3, 4, 9],
            }
        );
    }

    #[test]
    fn category_validation_is_idempotent() {
        let repo = repo();
        let first = validate_categories(&repo, &[cat(1), cat(3)]);
        let second = validate_categories(&repo, &[cat(1), cat(3)]);
        assert_eq!(first, second);
        assert_eq!(repo.writes(), 0);
    }

    #[test]
    fn empty_sub_category_list_always_passes() {
        let found = validate_sub_categories(&repo(), &[], &[]).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn sub_categories_must_belong_to_allowed_categories() {
        let err = validate_sub_categories(&repo(), &[sub(1), sub(2)], &[cat(1)]).unwrap_err();
        assert_eq!(
            err,
            ServiceError::OwnershipViolation {
                sub_category_id: 2,
                category_id: 2,
            }
        );
    }

    #[test]
    fn inactive_sub_category_is_missing_not_foreign() {
        // Sub-category 3 is inactive and owned by an allowed category; sub-category 2
        // is active but foreign. Existence is checked first.
        let err = validate_sub_categories(&repo(), &[sub(2), sub(3)], &[cat(1)]).unwrap_err();
        assert_eq!(
            err,
            ServiceError::InvalidReference {
                kind: ReferenceKind::SubCategory,
                ids: vec![3],
            }
        );
    }

    #[test]
    fn name_collides_only_within_overlapping_scope() {
        let repo = repo();
        let java = CourseName::new("Java").unwrap();

        let same_scope = CourseNameScope::new(java.clone(), &[cat(1)], &[]);
        assert_eq!(
            validate_course_name_uniqueness(&repo, &same_scope),
            Err(ServiceError::DuplicateName(DUPLICATE_COURSE_NAME.to_string()))
        );

        let disjoint = CourseNameScope::new(java.clone(), &[cat(2)], &[]);
        assert!(validate_course_name_uniqueness(&repo, &disjoint).is_ok());

        let own = CourseNameScope::new(java, &[cat(1)], &[]).excluding(CourseId::new(1).unwrap());
        assert!(validate_course_name_uniqueness(&repo, &own).is_ok());
    }

    #[test]
    fn deleted_courses_do_not_occupy_names() {
        let scope = CourseNameScope::new(CourseName::new("Go").unwrap(), &[cat(1)], &[]);
        assert!(validate_course_name_uniqueness(&repo(), &scope).is_ok());
    }

    #[test]
    fn pipeline_runs_steps_in_fixed_order() {
        let scope = CourseNameScope::new(CourseName::new("Java").unwrap(), &[cat(1)], &[]);
        let categories = [cat(1)];
        let sub_categories = [sub(1)];
        let pipeline = ValidationPipeline::new()
            .name_uniqueness(&scope)
            .sub_categories(&sub_categories, &categories)
            .categories(&categories);

        let order: Vec<u8> = pipeline.steps().iter().map(ValidationStep::rank).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn pipeline_reports_first_failing_step() {
        // Both the category and the name are invalid; the category failure wins.
        let scope = CourseNameScope::new(CourseName::new("Java").unwrap(), &[cat(1)], &[]);
        let categories = [cat(3)];
        let err = ValidationPipeline::new()
            .name_uniqueness(&scope)
            .categories(&categories)
            .run(&repo())
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidReference { .. }));
    }

    #[test]
    fn pipeline_returns_resolved_references() {
        let scope = CourseNameScope::new(CourseName::new("Rust").unwrap(), &[cat(1)], &[sub(1)]);
        let categories = [cat(1)];
        let sub_categories = [sub(1)];
        let resolved = ValidationPipeline::new()
            .categories(&categories)
            .sub_categories(&sub_categories, &categories)
            .name_uniqueness(&scope)
            .run(&repo())
            .unwrap();
        assert_eq!(resolved.categories.len(), 1);
        assert_eq!(resolved.sub_categories[0].id, sub(1));
    }
}
