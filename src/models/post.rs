use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::post::{
    NewPost as DomainNewPost, Post as DomainPost, PostPatch as DomainPostPatch,
};
use crate::domain::types::{ImagePath, PostBody, PostTitle, TypeConstraintError};

/// Diesel model representing the `posts` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::posts)]
pub struct Post {
    pub id: i32,
    pub author_id: i32,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub title: String,
    pub body: String,
    pub pub_date: NaiveDateTime,
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Post`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost {
    pub author_id: i32,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub title: String,
    pub body: String,
    pub pub_date: NaiveDateTime,
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

/// Changeset applied when an author edits a post.
///
/// `treat_none_as_null` so clearing the category, location or image actually
/// nulls the column instead of skipping it.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::posts)]
#[diesel(treat_none_as_null = true)]
pub struct PostPatch {
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub title: String,
    pub body: String,
    pub pub_date: NaiveDateTime,
    pub image: Option<String>,
    pub is_published: bool,
}

impl TryFrom<Post> for DomainPost {
    type Error = TypeConstraintError;

    fn try_from(post: Post) -> Result<Self, Self::Error> {
        Ok(Self {
            id: post.id.try_into()?,
            author_id: post.author_id.try_into()?,
            category_id: post.category_id.map(TryInto::try_into).transpose()?,
            location_id: post.location_id.map(TryInto::try_into).transpose()?,
            title: PostTitle::new(post.title)?,
            body: PostBody::new(post.body)?,
            pub_date: post.pub_date,
            image: post.image.map(ImagePath::new).transpose()?,
            is_published: post.is_published,
            created_at: post.created_at,
        })
    }
}

impl From<DomainNewPost> for NewPost {
    fn from(post: DomainNewPost) -> Self {
        Self {
            author_id: post.author_id.get(),
            category_id: post.category_id.map(|id| id.get()),
            location_id: post.location_id.map(|id| id.get()),
            title: post.title.into_inner(),
            body: post.body.into_inner(),
            pub_date: post.pub_date,
            image: post.image.map(ImagePath::into_inner),
            is_published: post.is_published,
            created_at: post.created_at,
        }
    }
}

impl From<DomainPostPatch> for PostPatch {
    fn from(patch: DomainPostPatch) -> Self {
        Self {
            category_id: patch.category_id.map(|id| id.get()),
            location_id: patch.location_id.map(|id| id.get()),
            title: patch.title.into_inner(),
            body: patch.body.into_inner(),
            pub_date: patch.pub_date,
            image: patch.image.map(ImagePath::into_inner),
            is_published: patch.is_published,
        }
    }
}
