use chrono::Utc;
use course_catalog::domain::category::CategoryUpdate;
use course_catalog::domain::course::{CourseUpdate, NewCourse};
use course_catalog::domain::types::{
    CategoryName, CourseId, CourseName, Description, Lifecycle, SubCategoryName,
};
use course_catalog::pagination::{Pagination, Sort, SortField, SortOrder};
use course_catalog::repository::{
    ActiveIdFilter, CategoryListQuery, CategoryReader, CategoryWriter, CourseListQuery,
    CourseNameScope, CourseReader, CourseWriter, RepositoryError, SubCategoryReader,
    SubCategoryWriter,
};

mod common;

use common::{seed_category, seed_sub_category};

fn new_course(
    name: &str,
    category_ids: Vec<course_catalog::domain::types::CategoryId>,
    sub_category_ids: Vec<course_catalog::domain::types::SubCategoryId>,
) -> NewCourse {
    let now = Utc::now().naive_utc();
    NewCourse {
        name: CourseName::new(name).expect("valid course name"),
        description: Description::new("A course").expect("valid description"),
        category_ids,
        sub_category_ids,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn find_categories_returns_only_active_records() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let programming = seed_category(&repo, "Programming");
    let design = seed_category(&repo, "Design");
    let marketing = seed_category(&repo, "Marketing");

    repo.update_category(
        design.id,
        &CategoryUpdate {
            status: Some(Lifecycle::Inactive),
            ..Default::default()
        },
    )
    .expect("should deactivate category");
    repo.delete_category(marketing.id)
        .expect("should delete category");

    let filter = ActiveIdFilter::new(&[programming.id, design.id, marketing.id, programming.id]);
    assert_eq!(filter.len(), 3);

    let found = repo
        .find_categories(&filter)
        .expect("should resolve categories");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, programming.id);
    assert_eq!(filter.missing(&[programming.id]), vec![design.id, marketing.id]);
}

#[test]
fn unique_index_rejects_live_duplicate_category_name() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let first = seed_category(&repo, "Programming");
    let now = Utc::now().naive_utc();
    let duplicate = course_catalog::domain::category::NewCategory {
        name: CategoryName::new("Programming").unwrap(),
        description: Description::new("again").unwrap(),
        created_at: now,
        updated_at: now,
    };

    let result = repo.create_category(&duplicate);
    assert!(matches!(result, Err(RepositoryError::Conflict(_))));

    repo.delete_category(first.id).expect("should delete category");
    assert!(repo.create_category(&duplicate).is_ok());
}

#[test]
fn sub_category_names_are_unique_per_category() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let programming = seed_category(&repo, "Programming");
    let design = seed_category(&repo, "Design");
    seed_sub_category(&repo, &programming, "Basics");
    seed_sub_category(&repo, &design, "Basics");

    let name = SubCategoryName::new("Basics").unwrap();
    assert!(
        repo.sub_category_name_taken(programming.id, &name, None)
            .unwrap()
    );
    let other = SubCategoryName::new("Advanced").unwrap();
    assert!(
        !repo
            .sub_category_name_taken(programming.id, &other, None)
            .unwrap()
    );
}

#[test]
fn count_active_sub_categories_groups_by_owner() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let programming = seed_category(&repo, "Programming");
    let design = seed_category(&repo, "Design");
    seed_sub_category(&repo, &programming, "Rust");
    let go = seed_sub_category(&repo, &programming, "Go");
    repo.delete_sub_category(go.id).expect("should delete");

    let counts = repo
        .count_active_sub_categories(&[programming.id, design.id])
        .expect("should count");
    assert_eq!(counts.get(&programming.id), Some(&1));
    assert_eq!(counts.get(&design.id), None);
}

#[test]
fn course_references_keep_order_and_drop_duplicates() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let programming = seed_category(&repo, "Programming");
    let design = seed_category(&repo, "Design");
    let rust = seed_sub_category(&repo, &programming, "Rust");

    let course = repo
        .create_course(&new_course(
            "Systems",
            vec![design.id, programming.id, design.id],
            vec![rust.id],
        ))
        .expect("should create course");
    assert_eq!(course.category_ids, vec![design.id, programming.id]);

    let stored = repo
        .get_course_by_id(course.id)
        .expect("should load")
        .expect("course exists");
    assert_eq!(stored.category_ids, vec![design.id, programming.id]);
    assert_eq!(stored.sub_category_ids, vec![rust.id]);
}

#[test]
fn course_scope_matches_on_overlap_only() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let programming = seed_category(&repo, "Programming");
    let design = seed_category(&repo, "Design");
    let data = seed_category(&repo, "Data");
    let rust = seed_sub_category(&repo, &programming, "Rust");

    let java = repo
        .create_course(&new_course(
            "Java",
            vec![programming.id, design.id],
            vec![rust.id],
        ))
        .expect("should create course");

    let name = CourseName::new("Java").unwrap();
    let overlapping = CourseNameScope::new(name.clone(), &[design.id, data.id], &[]);
    assert!(repo.course_exists(&overlapping).unwrap());

    let disjoint = CourseNameScope::new(name.clone(), &[data.id], &[]);
    assert!(!repo.course_exists(&disjoint).unwrap());

    let with_sub = CourseNameScope::new(name.clone(), &[programming.id], &[rust.id]);
    assert!(repo.course_exists(&with_sub).unwrap());

    let excluded = CourseNameScope::new(name.clone(), &[programming.id], &[]).excluding(java.id);
    assert!(!repo.course_exists(&excluded).unwrap());

    repo.delete_course(java.id).expect("should delete course");
    let after_delete = CourseNameScope::new(name, &[programming.id], &[]);
    assert!(!repo.course_exists(&after_delete).unwrap());
}

#[test]
fn course_scope_requires_sub_category_overlap_when_supplied() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let programming = seed_category(&repo, "Programming");
    let backend = seed_sub_category(&repo, &programming, "Backend");
    let mobile = seed_sub_category(&repo, &programming, "Mobile");

    let java = repo
        .create_course(&new_course("Java", vec![programming.id], vec![backend.id]))
        .expect("should create course");

    let name = CourseName::new("Java").unwrap();
    let other_track = CourseNameScope::new(name.clone(), &[programming.id], &[mobile.id]);
    assert!(!repo.course_exists(&other_track).unwrap());
    assert!(!other_track.matches(&java));

    let same_track = CourseNameScope::new(name, &[programming.id], &[backend.id]);
    assert!(repo.course_exists(&same_track).unwrap());
    assert!(same_track.matches(&java));

    repo.create_course(&new_course("Java", vec![programming.id], vec![mobile.id]))
        .expect("should create course in another track");
}

#[test]
fn update_course_rewrites_only_supplied_fields() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let programming = seed_category(&repo, "Programming");
    let rust = seed_sub_category(&repo, &programming, "Rust");
    let course = repo
        .create_course(&new_course("Rust 101", vec![programming.id], vec![rust.id]))
        .expect("should create course");

    let updated = repo
        .update_course(
            course.id,
            &CourseUpdate {
                description: Some(Description::new("Ownership and borrowing").unwrap()),
                ..Default::default()
            },
        )
        .expect("should update")
        .expect("course exists");

    assert_eq!(updated.description.as_str(), "Ownership and borrowing");
    assert_eq!(updated.name, course.name);
    assert_eq!(updated.category_ids, vec![programming.id]);
    assert_eq!(updated.sub_category_ids, vec![rust.id]);

    let cleared = repo
        .update_course(
            course.id,
            &CourseUpdate {
                sub_category_ids: Some(vec![]),
                ..Default::default()
            },
        )
        .expect("should update")
        .expect("course exists");
    assert!(cleared.sub_category_ids.is_empty());
}

#[test]
fn update_of_missing_course_returns_none() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let result = repo
        .update_course(
            CourseId::new(42).unwrap(),
            &CourseUpdate {
                description: Some(Description::new("x").unwrap()),
                ..Default::default()
            },
        )
        .expect("query should succeed");
    assert!(result.is_none());
}

#[test]
fn list_courses_filters_and_sorts() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let programming = seed_category(&repo, "Programming");
    let design = seed_category(&repo, "Design");
    for name in ["Java", "Kotlin", "Figma"] {
        let category = if name == "Figma" { design.id } else { programming.id };
        repo.create_course(&new_course(name, vec![category], vec![]))
            .expect("should create course");
    }

    let sort = Sort {
        field: SortField::Name,
        order: SortOrder::Asc,
    };
    let (total, courses) = repo
        .list_courses(
            CourseListQuery::default()
                .category(programming.id)
                .status(Lifecycle::Active)
                .sort(sort),
        )
        .expect("should list courses");
    assert_eq!(total, 2);
    let names: Vec<&str> = courses.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Java", "Kotlin"]);

    let (total, courses) = repo
        .list_courses(
            CourseListQuery::default()
                .paginate(Pagination::resolve(Some(2), Some(2), true))
                .sort(sort),
        )
        .expect("should list courses");
    assert_eq!(total, 3);
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].name.as_str(), "Kotlin");

    let (total, _) = repo
        .list_courses(CourseListQuery::default().search("java"))
        .expect("should search courses");
    assert_eq!(total, 1);
}

#[test]
fn search_treats_wildcards_literally() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let programming = seed_category(&repo, "Programming");
    for name in ["100% Rust", "Go_Basics", "Go Basics"] {
        repo.create_course(&new_course(name, vec![programming.id], vec![]))
            .expect("should create course");
    }

    let (total, courses) = repo
        .list_courses(CourseListQuery::default().search("%"))
        .expect("should search courses");
    assert_eq!(total, 1);
    assert_eq!(courses[0].name.as_str(), "100% Rust");

    let (total, courses) = repo
        .list_courses(CourseListQuery::default().search("o_b"))
        .expect("should search courses");
    assert_eq!(total, 1);
    assert_eq!(courses[0].name.as_str(), "Go_Basics");

    let (total, _) = repo
        .list_categories(CategoryListQuery::default().search("_"))
        .expect("should search categories");
    assert_eq!(total, 0);
}

#[test]
fn far_page_is_empty_rather_than_failing() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let programming = seed_category(&repo, "Programming");
    repo.create_course(&new_course("Java", vec![programming.id], vec![]))
        .expect("should create course");

    let (total, courses) = repo
        .list_courses(
            CourseListQuery::default()
                .paginate(Pagination::resolve(Some(i64::MAX), Some(i64::MAX), true)),
        )
        .expect("should list courses");
    assert_eq!(total, 1);
    assert!(courses.is_empty());
}

#[test]
fn deleted_categories_are_not_listed() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let programming = seed_category(&repo, "Programming");
    seed_category(&repo, "Design");
    repo.delete_category(programming.id).expect("should delete");

    let (total, categories) = repo
        .list_categories(CategoryListQuery::default())
        .expect("should list");
    assert_eq!(total, 1);
    assert_eq!(categories[0].name.as_str(), "Design");

    let stored = repo
        .get_category_by_id(programming.id)
        .expect("should load")
        .expect("row kept");
    assert_eq!(stored.status, Lifecycle::Deleted);
    assert_eq!(repo.delete_category(programming.id).unwrap(), 0);
}
