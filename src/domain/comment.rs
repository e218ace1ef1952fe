use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CommentBody, CommentId, PostId, UserId};
use crate::domain::user::User;

/// A comment left under a post. Mutable only by its author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub body: CommentBody,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`Comment`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewComment {
    pub post_id: PostId,
    pub author_id: UserId,
    pub body: CommentBody,
    pub created_at: NaiveDateTime,
}

/// A comment joined with its author for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: User,
}
