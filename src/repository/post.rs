use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::category::Category;
use crate::domain::location::Location;
use crate::domain::post::{NewPost, Post, PostPatch, PostPreview};
use crate::domain::types::PostId;
use crate::domain::user::User;
use crate::models::category::Category as DbCategory;
use crate::models::location::Location as DbLocation;
use crate::models::post::{NewPost as DbNewPost, Post as DbPost, PostPatch as DbPostPatch};
use crate::models::user::User as DbUser;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, PostListQuery, PostListScope, PostOrder, PostReader, PostWriter,
};

/// Fetch the rows referenced by a page of posts and assemble previews.
///
/// Related rows are loaded in three batched queries, one per table; the
/// comment count itself arrives precomputed with each post row.
fn assemble_previews(
    conn: &mut SqliteConnection,
    rows: Vec<(DbPost, Option<i64>)>,
) -> RepositoryResult<Vec<PostPreview>> {
    use crate::schema::{categories, locations, users};

    let author_ids: Vec<i32> = rows.iter().map(|(p, _)| p.author_id).collect();
    let category_ids: Vec<i32> = rows.iter().filter_map(|(p, _)| p.category_id).collect();
    let location_ids: Vec<i32> = rows.iter().filter_map(|(p, _)| p.location_id).collect();

    let authors = users::table
        .filter(users::id.eq_any(author_ids))
        .load::<DbUser>(conn)?
        .into_iter()
        .map(|u| User::try_from(u).map(|u| (u.id.get(), u)))
        .collect::<Result<HashMap<i32, User>, _>>()?;

    let categories = categories::table
        .filter(categories::id.eq_any(category_ids))
        .load::<DbCategory>(conn)?
        .into_iter()
        .map(|c| Category::try_from(c).map(|c| (c.id.get(), c)))
        .collect::<Result<HashMap<i32, Category>, _>>()?;

    let locations = locations::table
        .filter(locations::id.eq_any(location_ids))
        .load::<DbLocation>(conn)?
        .into_iter()
        .map(|l| Location::try_from(l).map(|l| (l.id.get(), l)))
        .collect::<Result<HashMap<i32, Location>, _>>()?;

    rows.into_iter()
        .map(|(db_post, comment_count)| {
            let post = Post::try_from(db_post)?;
            let author = authors.get(&post.author_id.get()).cloned().ok_or_else(|| {
                RepositoryError::Validation(format!("post {} references a missing author", post.id))
            })?;
            let category = post
                .category_id
                .and_then(|id| categories.get(&id.get()).cloned());
            let location = post
                .location_id
                .and_then(|id| locations.get(&id.get()).cloned());
            Ok(PostPreview {
                post,
                author,
                category,
                location,
                comment_count: comment_count.unwrap_or(0),
            })
        })
        .collect()
}

impl PostReader for DieselRepository {
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<PostPreview>)> {
        use crate::schema::{categories, comments, posts};

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        // Ids of published categories, needed wherever the publish gate
        // applies. A post with a NULL category never matches.
        let gate_category_ids: Vec<Option<i32>> = match query.scope {
            PostListScope::Public | PostListScope::PublicByAuthor(_) => categories::table
                .filter(categories::is_published.eq(true))
                .select(categories::id)
                .load::<i32>(&mut conn)?
                .into_iter()
                .map(Some)
                .collect(),
            _ => Vec::new(),
        };

        let comment_count = comments::table
            .filter(comments::post_id.eq(posts::id))
            .count()
            .single_value();

        let mut count_query = posts::table.into_boxed::<Sqlite>();
        let mut items = posts::table
            .select((posts::all_columns, comment_count))
            .into_boxed::<Sqlite>();

        match query.scope {
            PostListScope::Public => {
                count_query = count_query
                    .filter(posts::is_published.eq(true))
                    .filter(posts::pub_date.le(now))
                    .filter(posts::category_id.eq_any(gate_category_ids.clone()));
                items = items
                    .filter(posts::is_published.eq(true))
                    .filter(posts::pub_date.le(now))
                    .filter(posts::category_id.eq_any(gate_category_ids));
            }
            PostListScope::PublicByAuthor(author_id) => {
                count_query = count_query
                    .filter(posts::author_id.eq(author_id.get()))
                    .filter(posts::is_published.eq(true))
                    .filter(posts::pub_date.le(now))
                    .filter(posts::category_id.eq_any(gate_category_ids.clone()));
                items = items
                    .filter(posts::author_id.eq(author_id.get()))
                    .filter(posts::is_published.eq(true))
                    .filter(posts::pub_date.le(now))
                    .filter(posts::category_id.eq_any(gate_category_ids));
            }
            PostListScope::Author(author_id) => {
                count_query = count_query.filter(posts::author_id.eq(author_id.get()));
                items = items.filter(posts::author_id.eq(author_id.get()));
            }
            PostListScope::Category(category_id) => {
                count_query = count_query
                    .filter(posts::category_id.eq(Some(category_id.get())))
                    .filter(posts::is_published.eq(true))
                    .filter(posts::pub_date.le(now));
                items = items
                    .filter(posts::category_id.eq(Some(category_id.get())))
                    .filter(posts::is_published.eq(true))
                    .filter(posts::pub_date.le(now));
            }
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        items = match query.order {
            PostOrder::NewestFirst => items.order(posts::pub_date.desc()),
            PostOrder::OldestFirst => items.order(posts::pub_date.asc()),
        };

        if let Some(pagination) = &query.pagination {
            // Page numbers come straight from the query string; keep the
            // offset math from wrapping on absurd values.
            let offset = pagination
                .page
                .max(1)
                .saturating_sub(1)
                .saturating_mul(pagination.per_page);
            let offset = i64::try_from(offset).unwrap_or(i64::MAX);
            let limit = i64::try_from(pagination.per_page).unwrap_or(i64::MAX);
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<(DbPost, Option<i64>)>(&mut conn)?;
        let previews = assemble_previews(&mut conn, rows)?;

        Ok((total, previews))
    }

    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<Post>> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let post = posts::table
            .filter(posts::id.eq(id.get()))
            .first::<DbPost>(&mut conn)
            .optional()?;

        let post = post.map(TryInto::try_into).transpose()?;
        Ok(post)
    }

    fn get_post_preview(&self, id: PostId) -> RepositoryResult<Option<PostPreview>> {
        use crate::schema::{comments, posts};

        let mut conn = self.conn()?;

        let comment_count = comments::table
            .filter(comments::post_id.eq(posts::id))
            .count()
            .single_value();

        let row = posts::table
            .filter(posts::id.eq(id.get()))
            .select((posts::all_columns, comment_count))
            .first::<(DbPost, Option<i64>)>(&mut conn)
            .optional()?;

        match row {
            Some(row) => {
                let mut previews = assemble_previews(&mut conn, vec![row])?;
                Ok(previews.pop())
            }
            None => Ok(None),
        }
    }
}

impl PostWriter for DieselRepository {
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post> {
        use crate::schema::posts;

        let mut conn = self.conn()?;
        let db_post: DbNewPost = post.clone().into();

        let created = diesel::insert_into(posts::table)
            .values(db_post)
            .get_result::<DbPost>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_post(&self, id: PostId, patch: &PostPatch) -> RepositoryResult<usize> {
        use crate::schema::posts;

        let mut conn = self.conn()?;
        let db_patch: DbPostPatch = patch.clone().into();

        let affected = diesel::update(posts::table.filter(posts::id.eq(id.get())))
            .set(db_patch)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_post(&self, id: PostId) -> RepositoryResult<usize> {
        use crate::schema::{comments, posts};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            diesel::delete(comments::table.filter(comments::post_id.eq(id.get())))
                .execute(conn)?;

            diesel::delete(posts::table.filter(posts::id.eq(id.get()))).execute(conn)
        })?;

        Ok(affected)
    }
}
