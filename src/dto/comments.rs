use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::comment::{Comment, CommentWithAuthor};

/// A comment as rendered in a post's thread.
#[derive(Debug, Clone, Serialize)]
pub struct CommentDto {
    pub id: i32,
    pub post_id: i32,
    pub author_id: i32,
    pub author_username: String,
    pub author_name: String,
    pub text: String,
    pub created_at: NaiveDateTime,
}

impl From<CommentWithAuthor> for CommentDto {
    fn from(value: CommentWithAuthor) -> Self {
        Self {
            id: value.comment.id.get(),
            post_id: value.comment.post_id.get(),
            author_id: value.author.id.get(),
            author_username: value.author.username.as_str().to_string(),
            author_name: value.author.display_name(),
            text: value.comment.body.into_inner(),
            created_at: value.comment.created_at,
        }
    }
}

/// A bare comment, used by the edit form where the author is the viewer.
#[derive(Debug, Clone, Serialize)]
pub struct OwnCommentDto {
    pub id: i32,
    pub post_id: i32,
    pub text: String,
    pub created_at: NaiveDateTime,
}

impl From<Comment> for OwnCommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.get(),
            post_id: comment.post_id.get(),
            text: comment.body.into_inner(),
            created_at: comment.created_at,
        }
    }
}
