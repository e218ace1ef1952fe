use diesel::prelude::*;

use crate::domain::comment::{Comment, CommentWithAuthor, NewComment};
use crate::domain::types::{CommentBody, CommentId, PostId};
use crate::domain::user::User;
use crate::models::comment::{Comment as DbComment, NewComment as DbNewComment};
use crate::models::user::User as DbUser;
use crate::repository::errors::RepositoryResult;
use crate::repository::{CommentReader, CommentWriter, DieselRepository};

impl CommentReader for DieselRepository {
    fn list_comments_for_post(
        &self,
        post_id: PostId,
    ) -> RepositoryResult<Vec<CommentWithAuthor>> {
        use crate::schema::{comments, users};

        let mut conn = self.conn()?;

        let rows = comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(post_id.get()))
            .order(comments::created_at.asc())
            .load::<(DbComment, DbUser)>(&mut conn)?;

        rows.into_iter()
            .map(|(comment, author)| {
                Ok(CommentWithAuthor {
                    comment: Comment::try_from(comment)?,
                    author: User::try_from(author)?,
                })
            })
            .collect()
    }

    fn get_comment_by_id(&self, id: CommentId) -> RepositoryResult<Option<Comment>> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let comment = comments::table
            .filter(comments::id.eq(id.get()))
            .first::<DbComment>(&mut conn)
            .optional()?;

        let comment = comment.map(TryInto::try_into).transpose()?;
        Ok(comment)
    }
}

impl CommentWriter for DieselRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;
        let db_comment: DbNewComment = comment.clone().into();

        let affected = diesel::insert_into(comments::table)
            .values(db_comment)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn update_comment(&self, id: CommentId, body: &CommentBody) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let affected = diesel::update(comments::table.filter(comments::id.eq(id.get())))
            .set(comments::body.eq(body.as_str()))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let affected =
            diesel::delete(comments::table.filter(comments::id.eq(id.get()))).execute(&mut conn)?;

        Ok(affected)
    }
}
