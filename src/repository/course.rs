use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::course::{Course, CourseUpdate, NewCourse};
use crate::domain::types::{CourseId, Lifecycle, dedup_ids};
use crate::models::course::{
    Course as DbCourse, CourseChangeset, NewCourse as DbNewCourse, course_category_rows,
    course_sub_category_rows,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CourseListQuery, CourseNameScope, CourseReader, CourseWriter, DieselRepository, LIKE_ESCAPE,
    contains_pattern, order_by_sort,
};

/// Ordered category and sub-category ids keyed by course id.
type ReferenceMap = HashMap<i32, Vec<i32>>;

fn load_references(
    conn: &mut SqliteConnection,
    course_ids: &[i32],
) -> RepositoryResult<(ReferenceMap, ReferenceMap)> {
    use crate::schema::{course_categories, course_sub_categories};

    let category_rows: Vec<(i32, i32)> = course_categories::table
        .filter(course_categories::course_id.eq_any(course_ids.to_vec()))
        .order((
            course_categories::course_id.asc(),
            course_categories::position.asc(),
        ))
        .select((course_categories::course_id, course_categories::category_id))
        .load(conn)?;

    let sub_category_rows: Vec<(i32, i32)> = course_sub_categories::table
        .filter(course_sub_categories::course_id.eq_any(course_ids.to_vec()))
        .order((
            course_sub_categories::course_id.asc(),
            course_sub_categories::position.asc(),
        ))
        .select((
            course_sub_categories::course_id,
            course_sub_categories::sub_category_id,
        ))
        .load(conn)?;

    let mut categories = ReferenceMap::new();
    for (course_id, category_id) in category_rows {
        categories.entry(course_id).or_default().push(category_id);
    }

    let mut sub_categories = ReferenceMap::new();
    for (course_id, sub_category_id) in sub_category_rows {
        sub_categories
            .entry(course_id)
            .or_default()
            .push(sub_category_id);
    }

    Ok((categories, sub_categories))
}

fn attach_references(
    conn: &mut SqliteConnection,
    rows: Vec<DbCourse>,
) -> RepositoryResult<Vec<Course>> {
    let course_ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
    let (categories, sub_categories) = load_references(conn, &course_ids)?;

    rows.into_iter()
        .map(|row| -> RepositoryResult<Course> {
            let category_ids = categories.get(&row.id).map(Vec::as_slice).unwrap_or(&[]);
            let sub_category_ids = sub_categories
                .get(&row.id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            Ok(row.into_domain(category_ids, sub_category_ids)?)
        })
        .collect()
}

fn replace_category_references(
    conn: &mut SqliteConnection,
    course_id: i32,
    category_ids: &[i32],
) -> RepositoryResult<()> {
    use crate::schema::course_categories;

    diesel::delete(course_categories::table.filter(course_categories::course_id.eq(course_id)))
        .execute(conn)?;

    let rows = course_category_rows(course_id, category_ids);
    if !rows.is_empty() {
        diesel::insert_into(course_categories::table)
            .values(&rows)
            .execute(conn)?;
    }
    Ok(())
}

fn replace_sub_category_references(
    conn: &mut SqliteConnection,
    course_id: i32,
    sub_category_ids: &[i32],
) -> RepositoryResult<()> {
    use crate::schema::course_sub_categories;

    diesel::delete(
        course_sub_categories::table.filter(course_sub_categories::course_id.eq(course_id)),
    )
    .execute(conn)?;

    let rows = course_sub_category_rows(course_id, sub_category_ids);
    if !rows.is_empty() {
        diesel::insert_into(course_sub_categories::table)
            .values(&rows)
            .execute(conn)?;
    }
    Ok(())
}

fn raw_ids<I: Copy + Eq + std::hash::Hash + Into<i32>>(ids: &[I]) -> Vec<i32> {
    dedup_ids(ids).into_iter().map(Into::into).collect()
}

impl CourseReader for DieselRepository {
    fn list_courses(&self, query: CourseListQuery) -> RepositoryResult<(usize, Vec<Course>)> {
        use crate::schema::{course_categories, course_sub_categories, courses};

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = courses::table
                .filter(courses::status.ne(Lifecycle::Deleted.as_str()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(status) = query.status {
                items = items.filter(courses::status.eq(status.as_str()));
            }

            if let Some(search) = &query.search {
                items = items.filter(
                    courses::name
                        .like(contains_pattern(search))
                        .escape(LIKE_ESCAPE),
                );
            }

            if let Some(category_id) = query.category_id {
                items = items.filter(
                    courses::id.eq_any(
                        course_categories::table
                            .filter(course_categories::category_id.eq(category_id.get()))
                            .select(course_categories::course_id),
                    ),
                );
            }

            if let Some(sub_category_id) = query.sub_category_id {
                items = items.filter(
                    courses::id.eq_any(
                        course_sub_categories::table
                            .filter(course_sub_categories::sub_category_id.eq(sub_category_id.get()))
                            .select(course_sub_categories::course_id),
                    ),
                );
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(i64::try_from(pagination.offset()).unwrap_or(i64::MAX))
                .limit(i64::try_from(pagination.per_page).unwrap_or(i64::MAX));
        }

        let rows = order_by_sort!(items, courses, query.sort).load::<DbCourse>(&mut conn)?;
        let items = attach_references(&mut conn, rows)?;

        Ok((total, items))
    }

    fn get_course_by_id(&self, id: CourseId) -> RepositoryResult<Option<Course>> {
        use crate::schema::courses;

        let mut conn = self.conn()?;

        let row = courses::table
            .filter(courses::id.eq(id.get()))
            .first::<DbCourse>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(attach_references(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn course_exists(&self, scope: &CourseNameScope) -> RepositoryResult<bool> {
        use crate::schema::{course_categories, course_sub_categories, courses};

        let mut conn = self.conn()?;

        let mut query = courses::table
            .select(courses::id)
            .filter(courses::name.eq(scope.name.as_str()))
            .filter(courses::status.ne(Lifecycle::Deleted.as_str()))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if !scope.category_ids.is_empty() {
            query = query.filter(
                courses::id.eq_any(
                    course_categories::table
                        .filter(course_categories::category_id.eq_any(raw_ids(&scope.category_ids)))
                        .select(course_categories::course_id),
                ),
            );
        }

        if !scope.sub_category_ids.is_empty() {
            query = query.filter(
                courses::id.eq_any(
                    course_sub_categories::table
                        .filter(
                            course_sub_categories::sub_category_id
                                .eq_any(raw_ids(&scope.sub_category_ids)),
                        )
                        .select(course_sub_categories::course_id),
                ),
            );
        }

        if let Some(exclude) = scope.exclude {
            query = query.filter(courses::id.ne(exclude.get()));
        }

        let found = query.first::<i32>(&mut conn).optional()?;
        Ok(found.is_some())
    }
}

impl CourseWriter for DieselRepository {
    fn create_course(&self, course: &NewCourse) -> RepositoryResult<Course> {
        use crate::schema::courses;

        let mut conn = self.conn()?;
        let db_course = DbNewCourse::from(course);
        let category_ids = raw_ids(&course.category_ids);
        let sub_category_ids = raw_ids(&course.sub_category_ids);

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let row = diesel::insert_into(courses::table)
                .values(&db_course)
                .get_result::<DbCourse>(conn)?;

            replace_category_references(conn, row.id, &category_ids)?;
            replace_sub_category_references(conn, row.id, &sub_category_ids)?;

            Ok(row.into_domain(&category_ids, &sub_category_ids)?)
        })
    }

    fn update_course(
        &self,
        id: CourseId,
        update: &CourseUpdate,
    ) -> RepositoryResult<Option<Course>> {
        use crate::schema::courses;

        let mut conn = self.conn()?;
        let changeset = CourseChangeset::new(update, Utc::now().naive_utc());

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let affected = diesel::update(
                courses::table
                    .filter(courses::id.eq(id.get()))
                    .filter(courses::status.ne(Lifecycle::Deleted.as_str())),
            )
            .set(&changeset)
            .execute(conn)?;

            if affected == 0 {
                return Ok(None);
            }

            if let Some(category_ids) = &update.category_ids {
                replace_category_references(conn, id.get(), &raw_ids(category_ids))?;
            }

            if let Some(sub_category_ids) = &update.sub_category_ids {
                replace_sub_category_references(conn, id.get(), &raw_ids(sub_category_ids))?;
            }

            let row = courses::table
                .filter(courses::id.eq(id.get()))
                .first::<DbCourse>(conn)?;

            Ok(attach_references(conn, vec![row])?.pop())
        })
    }

    fn delete_course(&self, id: CourseId) -> RepositoryResult<usize> {
        use crate::schema::courses;

        let mut conn = self.conn()?;

        let affected = diesel::update(
            courses::table
                .filter(courses::id.eq(id.get()))
                .filter(courses::status.ne(Lifecycle::Deleted.as_str())),
        )
        .set((
            courses::status.eq(Lifecycle::Deleted.as_str()),
            courses::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        Ok(affected)
    }
}
