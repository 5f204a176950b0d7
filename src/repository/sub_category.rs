use chrono::Utc;
use diesel::prelude::*;

use crate::domain::sub_category::{NewSubCategory, SubCategory, SubCategoryUpdate};
use crate::domain::types::{CategoryId, Lifecycle, SubCategoryId, SubCategoryName};
use crate::models::sub_category::{
    NewSubCategory as DbNewSubCategory, SubCategory as DbSubCategory, SubCategoryChangeset,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ActiveIdFilter, DieselRepository, SubCategoryListQuery, SubCategoryReader, SubCategoryWriter,
    LIKE_ESCAPE, contains_pattern, order_by_sort,
};

impl SubCategoryReader for DieselRepository {
    fn list_sub_categories(
        &self,
        query: SubCategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<SubCategory>)> {
        use crate::schema::sub_categories;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = sub_categories::table
                .filter(sub_categories::status.ne(Lifecycle::Deleted.as_str()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(status) = query.status {
                items = items.filter(sub_categories::status.eq(status.as_str()));
            }

            if let Some(category_id) = query.category_id {
                items = items.filter(sub_categories::category_id.eq(category_id.get()));
            }

            if let Some(search) = &query.search {
                items = items.filter(
                    sub_categories::name
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

        let items = order_by_sort!(items, sub_categories, query.sort)
            .load::<DbSubCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<SubCategory>, _>>()?;

        Ok((total, items))
    }

    fn get_sub_category_by_id(&self, id: SubCategoryId) -> RepositoryResult<Option<SubCategory>> {
        use crate::schema::sub_categories;

        let mut conn = self.conn()?;

        let sub_category = sub_categories::table
            .filter(sub_categories::id.eq(id.get()))
            .first::<DbSubCategory>(&mut conn)
            .optional()?;

        let sub_category = sub_category.map(TryInto::try_into).transpose()?;
        Ok(sub_category)
    }

    fn find_sub_categories(
        &self,
        filter: &ActiveIdFilter<SubCategoryId>,
    ) -> RepositoryResult<Vec<SubCategory>> {
        use crate::schema::sub_categories;

        if filter.is_empty() {
            return Ok(vec![]);
        }

        let mut conn = self.conn()?;
        let ids: Vec<i32> = filter.ids().iter().map(|id| id.get()).collect();

        let items = sub_categories::table
            .filter(sub_categories::id.eq_any(ids))
            .filter(sub_categories::status.eq(Lifecycle::Active.as_str()))
            .order(sub_categories::id.asc())
            .load::<DbSubCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<SubCategory>, _>>()?;

        Ok(items)
    }

    fn sub_category_name_taken(
        &self,
        category_id: CategoryId,
        name: &SubCategoryName,
        exclude: Option<SubCategoryId>,
    ) -> RepositoryResult<bool> {
        use crate::schema::sub_categories;

        let mut conn = self.conn()?;

        let mut query = sub_categories::table
            .select(sub_categories::id)
            .filter(sub_categories::category_id.eq(category_id.get()))
            .filter(sub_categories::name.eq(name.as_str()))
            .filter(sub_categories::status.ne(Lifecycle::Deleted.as_str()))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(exclude) = exclude {
            query = query.filter(sub_categories::id.ne(exclude.get()));
        }

        let found = query.first::<i32>(&mut conn).optional()?;
        Ok(found.is_some())
    }
}

impl SubCategoryWriter for DieselRepository {
    fn create_sub_category(&self, sub_category: &NewSubCategory) -> RepositoryResult<SubCategory> {
        use crate::schema::sub_categories;

        let mut conn = self.conn()?;
        let db_sub_category: DbNewSubCategory = sub_category.clone().into();

        let created = diesel::insert_into(sub_categories::table)
            .values(&db_sub_category)
            .get_result::<DbSubCategory>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_sub_category(
        &self,
        id: SubCategoryId,
        update: &SubCategoryUpdate,
    ) -> RepositoryResult<usize> {
        use crate::schema::sub_categories;

        let mut conn = self.conn()?;
        let changeset = SubCategoryChangeset::new(update, Utc::now().naive_utc());

        let affected = diesel::update(
            sub_categories::table
                .filter(sub_categories::id.eq(id.get()))
                .filter(sub_categories::status.ne(Lifecycle::Deleted.as_str())),
        )
        .set(&changeset)
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_sub_category(&self, id: SubCategoryId) -> RepositoryResult<usize> {
        use crate::schema::sub_categories;

        let mut conn = self.conn()?;

        let affected = diesel::update(
            sub_categories::table
                .filter(sub_categories::id.eq(id.get()))
                .filter(sub_categories::status.ne(Lifecycle::Deleted.as_str())),
        )
        .set((
            sub_categories::status.eq(Lifecycle::Deleted.as_str()),
            sub_categories::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        Ok(affected)
    }
}
