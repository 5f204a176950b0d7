//! Helpers for integration tests.
#![allow(dead_code)]

use chrono::Utc;
use course_catalog::db::{DbPool, establish_connection_pool};
use course_catalog::domain::category::{Category, NewCategory};
use course_catalog::domain::sub_category::{NewSubCategory, SubCategory};
use course_catalog::domain::types::{CategoryName, Description, SubCategoryName};
use course_catalog::repository::{CategoryWriter, DieselRepository, SubCategoryWriter};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

pub fn seed_category(repo: &DieselRepository, name: &str) -> Category {
    let now = Utc::now().naive_utc();
    repo.create_category(&NewCategory {
        name: CategoryName::new(name).expect("valid category name"),
        description: Description::new(format!("{name} courses")).expect("valid description"),
        created_at: now,
        updated_at: now,
    })
    .expect("should create category")
}

pub fn seed_sub_category(repo: &DieselRepository, category: &Category, name: &str) -> SubCategory {
    let now = Utc::now().naive_utc();
    repo.create_sub_category(&NewSubCategory {
        category_id: category.id,
        name: SubCategoryName::new(name).expect("valid sub-category name"),
        description: Description::new(format!("{name} track")).expect("valid description"),
        created_at: now,
        updated_at: now,
    })
    .expect("should create sub-category")
}
