use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::post::PostPreview;
use crate::dto::comments::CommentDto;

/// Category reference embedded in a rendered post.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryRefDto {
    pub title: String,
    pub slug: String,
}

/// A post as rendered in listings and on its detail page.
#[derive(Debug, Clone, Serialize)]
pub struct PostDto {
    pub id: i32,
    pub title: String,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub image: Option<String>,
    pub is_published: bool,
    pub author_id: i32,
    pub author_username: String,
    pub author_name: String,
    pub category: Option<CategoryRefDto>,
    pub location: Option<String>,
    pub comment_count: i64,
}

impl From<PostPreview> for PostDto {
    fn from(preview: PostPreview) -> Self {
        Self {
            id: preview.post.id.get(),
            title: preview.post.title.into_inner(),
            text: preview.post.body.into_inner(),
            pub_date: preview.post.pub_date,
            image: preview.post.image.map(|i| i.into_inner()),
            is_published: preview.post.is_published,
            author_id: preview.author.id.get(),
            author_username: preview.author.username.as_str().to_string(),
            author_name: preview.author.display_name(),
            category: preview.category.map(|c| CategoryRefDto {
                title: c.title.into_inner(),
                slug: c.slug.into_inner(),
            }),
            location: preview.location.map(|l| l.name.into_inner()),
            comment_count: preview.comment_count,
        }
    }
}

/// Detail page payload: the post plus its comment thread.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetailDto {
    pub post: PostDto,
    pub comments: Vec<CommentDto>,
}
