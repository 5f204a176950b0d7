use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::category::{Category, CategoryUpdate, NewCategory};
use crate::domain::types::{CategoryId, CategoryName, Lifecycle};
use crate::models::category::{
    Category as DbCategory, CategoryChangeset, NewCategory as DbNewCategory,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ActiveIdFilter, CategoryListQuery, CategoryReader, CategoryWriter, DieselRepository,
    LIKE_ESCAPE, contains_pattern, order_by_sort,
};

impl CategoryReader for DieselRepository {
    fn list_categories(
        &self,
        query: CategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<Category>)> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = categories::table
                .filter(categories::status.ne(Lifecycle::Deleted.as_str()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(status) = query.status {
                items = items.filter(categories::status.eq(status.as_str()));
            }

            if let Some(search) = &query.search {
                items = items.filter(
                    categories::name
                        .like(contains_pattern(search))
                        .escape(LIKE_ESCAPE),
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

        let items = order_by_sort!(items, categories, query.sort)
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok((total, items))
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::id.eq(id.get()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }

    fn find_categories(
        &self,
        filter: &ActiveIdFilter<CategoryId>,
    ) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        if filter.is_empty() {
            return Ok(vec![]);
        }

        let mut conn = self.conn()?;
        let ids: Vec<i32> = filter.ids().iter().map(|id| id.get()).collect();

        let items = categories::table
            .filter(categories::id.eq_any(ids))
            .filter(categories::status.eq(Lifecycle::Active.as_str()))
            .order(categories::id.asc())
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn category_name_taken(
        &self,
        name: &CategoryName,
        exclude: Option<CategoryId>,
    ) -> RepositoryResult<bool> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let mut query = categories::table
            .select(categories::id)
            .filter(categories::name.eq(name.as_str()))
            .filter(categories::status.ne(Lifecycle::Deleted.as_str()))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(exclude) = exclude {
            query = query.filter(categories::id.ne(exclude.get()));
        }

        let found = query.first::<i32>(&mut conn).optional()?;
        Ok(found.is_some())
    }

    fn count_active_sub_categories(
        &self,
        category_ids: &[CategoryId],
    ) -> RepositoryResult<HashMap<CategoryId, usize>> {
        use crate::schema::sub_categories;

        if category_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self.conn()?;
        let ids: Vec<i32> = category_ids.iter().map(|id| id.get()).collect();

        let rows: Vec<(i32, i64)> = sub_categories::table
            .filter(sub_categories::category_id.eq_any(ids))
            .filter(sub_categories::status.eq(Lifecycle::Active.as_str()))
            .group_by(sub_categories::category_id)
            .select((sub_categories::category_id, diesel::dsl::count_star()))
            .load(&mut conn)?;

        let mut counts = HashMap::with_capacity(rows.len());
        for (category_id, count) in rows {
            counts.insert(CategoryId::new(category_id)?, count as usize);
        }
        Ok(counts)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category: DbNewCategory = category.clone().into();

        let created = diesel::insert_into(categories::table)
            .values(&db_category)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_category(&self, id: CategoryId, update: &CategoryUpdate) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let changeset = CategoryChangeset::new(update, Utc::now().naive_utc());

        let affected = diesel::update(
            categories::table
                .filter(categories::id.eq(id.get()))
                .filter(categories::status.ne(Lifecycle::Deleted.as_str())),
        )
        .set(&changeset)
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let affected = diesel::update(
            categories::table
                .filter(categories::id.eq(id.get()))
                .filter(categories::status.ne(Lifecycle::Deleted.as_str())),
        )
        .set((
            categories::status.eq(Lifecycle::Deleted.as_str()),
            categories::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        Ok(affected)
    }
}
