use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::location::Location;
use crate::domain::types::{CategoryId, ImagePath, LocationId, PostBody, PostId, PostTitle, UserId};
use crate::domain::user::User;

/// A blog entry authored by one user.
///
/// `pub_date` may lie in the future; such posts are "scheduled" and hidden
/// from public listings until the date is reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub category_id: Option<CategoryId>,
    pub location_id: Option<LocationId>,
    pub title: PostTitle,
    pub body: PostBody,
    pub pub_date: NaiveDateTime,
    pub image: Option<ImagePath>,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

impl Post {
    /// Whether the publication date is still in the future.
    pub fn is_scheduled(&self, now: NaiveDateTime) -> bool {
        self.pub_date > now
    }
}

/// Information required to create a new [`Post`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPost {
    pub author_id: UserId,
    pub category_id: Option<CategoryId>,
    pub location_id: Option<LocationId>,
    pub title: PostTitle,
    pub body: PostBody,
    pub pub_date: NaiveDateTime,
    pub image: Option<ImagePath>,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

/// Fields an author may change on an existing [`Post`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostPatch {
    pub category_id: Option<CategoryId>,
    pub location_id: Option<LocationId>,
    pub title: PostTitle,
    pub body: PostBody,
    pub pub_date: NaiveDateTime,
    pub image: Option<ImagePath>,
    pub is_published: bool,
}

/// A post together with the related rows needed to render a listing entry.
///
/// The comment count is computed inside the listing query, never per row
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPreview {
    pub post: Post,
    pub author: User,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: i64,
}

impl PostPreview {
    /// The publish gate: a post is publicly visible only when it is published,
    /// its category exists and is published, and its publication date has
    /// been reached. Uncategorized posts never pass the gate.
    pub fn passes_publish_gate(&self, now: NaiveDateTime) -> bool {
        self.post.is_published
            && !self.post.is_scheduled(now)
            && self.category.as_ref().is_some_and(|c| c.is_published)
    }
}
