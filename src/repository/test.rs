use std::cell::RefCell;

use chrono::{NaiveDateTime, Utc};
use diesel::result::DatabaseErrorKind;

use crate::domain::category::{Category, NewCategory};
use crate::domain::comment::{Comment, CommentWithAuthor, NewComment};
use crate::domain::location::{Location, NewLocation};
use crate::domain::post::{NewPost, Post, PostPatch, PostPreview};
use crate::domain::types::{
    CategoryId, CategorySlug, CommentBody, CommentId, LocationId, PostId, UserId, Username,
};
use crate::domain::user::{NewUser, ProfilePatch, User};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CategoryReader, CategoryWriter, CommentReader, CommentWriter, LocationReader, LocationWriter,
    PostListQuery, PostListScope, PostOrder, PostReader, PostWriter, UserReader, UserWriter,
};

/// Simple in-memory repository used for unit tests.
///
/// Writers mutate the backing vectors so tests can observe effects; the
/// publish gate is evaluated against a clock fixed at construction.
#[derive(Default)]
pub struct TestRepository {
    users: RefCell<Vec<User>>,
    categories: RefCell<Vec<Category>>,
    locations: RefCell<Vec<Location>>,
    posts: RefCell<Vec<Post>>,
    comments: RefCell<Vec<Comment>>,
    now: Option<NaiveDateTime>,
}

impl TestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        *self.users.borrow_mut() = users;
        self
    }

    pub fn with_categories(self, categories: Vec<Category>) -> Self {
        *self.categories.borrow_mut() = categories;
        self
    }

    pub fn with_locations(self, locations: Vec<Location>) -> Self {
        *self.locations.borrow_mut() = locations;
        self
    }

    pub fn with_posts(self, posts: Vec<Post>) -> Self {
        *self.posts.borrow_mut() = posts;
        self
    }

    pub fn with_comments(self, comments: Vec<Comment>) -> Self {
        *self.comments.borrow_mut() = comments;
        self
    }

    /// Pin the clock used by the publish gate.
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    fn now(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| Utc::now().naive_utc())
    }

    fn make_preview(&self, post: Post) -> RepositoryResult<PostPreview> {
        let author = self
            .users
            .borrow()
            .iter()
            .find(|u| u.id == post.author_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::Validation(format!(
                    "post {} references a missing author",
                    post.id
                ))
            })?;
        let category = post.category_id.and_then(|id| {
            self.categories
                .borrow()
                .iter()
                .find(|c| c.id == id)
                .cloned()
        });
        let location = post.location_id.and_then(|id| {
            self.locations.borrow().iter().find(|l| l.id == id).cloned()
        });
        let comment_count = self
            .comments
            .borrow()
            .iter()
            .filter(|c| c.post_id == post.id)
            .count() as i64;
        Ok(PostPreview {
            post,
            author,
            category,
            location,
            comment_count,
        })
    }

    fn category_is_published(&self, id: Option<CategoryId>) -> bool {
        id.is_some_and(|id| {
            self.categories
                .borrow()
                .iter()
                .any(|c| c.id == id && c.is_published)
        })
    }

    fn passes_gate(&self, post: &Post) -> bool {
        post.is_published
            && post.pub_date <= self.now()
            && self.category_is_published(post.category_id)
    }
}

impl PostReader for TestRepository {
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<PostPreview>)> {
        let mut items: Vec<Post> = self.posts.borrow().clone();

        match query.scope {
            PostListScope::Public => items.retain(|p| self.passes_gate(p)),
            PostListScope::PublicByAuthor(author_id) => {
                items.retain(|p| p.author_id == author_id && self.passes_gate(p));
            }
            PostListScope::Author(author_id) => items.retain(|p| p.author_id == author_id),
            PostListScope::Category(category_id) => {
                items.retain(|p| {
                    p.category_id == Some(category_id)
                        && p.is_published
                        && p.pub_date <= self.now()
                });
            }
        }

        let total = items.len();

        match query.order {
            PostOrder::NewestFirst => items.sort_by(|a, b| b.pub_date.cmp(&a.pub_date)),
            PostOrder::OldestFirst => items.sort_by(|a, b| a.pub_date.cmp(&b.pub_date)),
        }

        if let Some(pagination) = &query.pagination {
            let start = pagination
                .page
                .max(1)
                .saturating_sub(1)
                .saturating_mul(pagination.per_page);
            items = items
                .into_iter()
                .skip(start)
                .take(pagination.per_page)
                .collect();
        }

        let previews = items
            .into_iter()
            .map(|p| self.make_preview(p))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, previews))
    }

    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<Post>> {
        Ok(self.posts.borrow().iter().find(|p| p.id == id).cloned())
    }

    fn get_post_preview(&self, id: PostId) -> RepositoryResult<Option<PostPreview>> {
        let post = self.posts.borrow().iter().find(|p| p.id == id).cloned();
        post.map(|p| self.make_preview(p)).transpose()
    }
}

impl PostWriter for TestRepository {
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post> {
        let mut posts = self.posts.borrow_mut();
        let next_id = posts.iter().map(|p| p.id.get()).max().unwrap_or(0) + 1;
        let created = Post {
            id: PostId::new(next_id)?,
            author_id: post.author_id,
            category_id: post.category_id,
            location_id: post.location_id,
            title: post.title.clone(),
            body: post.body.clone(),
            pub_date: post.pub_date,
            image: post.image.clone(),
            is_published: post.is_published,
            created_at: post.created_at,
        };
        posts.push(created.clone());
        Ok(created)
    }

    fn update_post(&self, id: PostId, patch: &PostPatch) -> RepositoryResult<usize> {
        let mut posts = self.posts.borrow_mut();
        match posts.iter_mut().find(|p| p.id == id) {
            Some(post) => {
                post.category_id = patch.category_id;
                post.location_id = patch.location_id;
                post.title = patch.title.clone();
                post.body = patch.body.clone();
                post.pub_date = patch.pub_date;
                post.image = patch.image.clone();
                post.is_published = patch.is_published;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_post(&self, id: PostId) -> RepositoryResult<usize> {
        self.comments.borrow_mut().retain(|c| c.post_id != id);
        let mut posts = self.posts.borrow_mut();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(before - posts.len())
    }
}

impl CategoryReader for TestRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        let mut items: Vec<Category> = self
            .categories
            .borrow()
            .iter()
            .filter(|c| c.is_published)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(items)
    }

    fn get_category_by_slug(&self, slug: &CategorySlug) -> RepositoryResult<Option<Category>> {
        Ok(self
            .categories
            .borrow()
            .iter()
            .find(|c| &c.slug == slug)
            .cloned())
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        Ok(self
            .categories
            .borrow()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }
}

impl CategoryWriter for TestRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<usize> {
        let mut categories = self.categories.borrow_mut();
        let next_id = categories.iter().map(|c| c.id.get()).max().unwrap_or(0) + 1;
        categories.push(Category {
            id: CategoryId::new(next_id)?,
            title: category.title.clone(),
            description: category.description.clone(),
            slug: category.slug.clone(),
            is_published: category.is_published,
            created_at: category.created_at,
        });
        Ok(1)
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        for post in self.posts.borrow_mut().iter_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        let mut categories = self.categories.borrow_mut();
        let before = categories.len();
        categories.retain(|c| c.id != id);
        Ok(before - categories.len())
    }
}

impl LocationReader for TestRepository {
    fn list_locations(&self) -> RepositoryResult<Vec<Location>> {
        let mut items: Vec<Location> = self
            .locations
            .borrow()
            .iter()
            .filter(|l| l.is_published)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    fn get_location_by_id(&self, id: LocationId) -> RepositoryResult<Option<Location>> {
        Ok(self
            .locations
            .borrow()
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }
}

impl LocationWriter for TestRepository {
    fn create_location(&self, location: &NewLocation) -> RepositoryResult<usize> {
        let mut locations = self.locations.borrow_mut();
        let next_id = locations.iter().map(|l| l.id.get()).max().unwrap_or(0) + 1;
        locations.push(Location {
            id: LocationId::new(next_id)?,
            name: location.name.clone(),
            is_published: location.is_published,
            created_at: location.created_at,
        });
        Ok(1)
    }

    fn delete_location(&self, id: LocationId) -> RepositoryResult<usize> {
        for post in self.posts.borrow_mut().iter_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
        let mut locations = self.locations.borrow_mut();
        let before = locations.len();
        locations.retain(|l| l.id != id);
        Ok(before - locations.len())
    }
}

impl CommentReader for TestRepository {
    fn list_comments_for_post(
        &self,
        post_id: PostId,
    ) -> RepositoryResult<Vec<CommentWithAuthor>> {
        let mut comments: Vec<Comment> = self
            .comments
            .borrow()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        comments
            .into_iter()
            .map(|comment| {
                let author = self
                    .users
                    .borrow()
                    .iter()
                    .find(|u| u.id == comment.author_id)
                    .cloned()
                    .ok_or_else(|| {
                        RepositoryError::Validation(format!(
                            "comment {} references a missing author",
                            comment.id
                        ))
                    })?;
                Ok(CommentWithAuthor { comment, author })
            })
            .collect()
    }

    fn get_comment_by_id(&self, id: CommentId) -> RepositoryResult<Option<Comment>> {
        Ok(self.comments.borrow().iter().find(|c| c.id == id).cloned())
    }
}

impl CommentWriter for TestRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<usize> {
        let mut comments = self.comments.borrow_mut();
        let next_id = comments.iter().map(|c| c.id.get()).max().unwrap_or(0) + 1;
        comments.push(Comment {
            id: CommentId::new(next_id)?,
            post_id: comment.post_id,
            author_id: comment.author_id,
            body: comment.body.clone(),
            created_at: comment.created_at,
        });
        Ok(1)
    }

    fn update_comment(&self, id: CommentId, body: &CommentBody) -> RepositoryResult<usize> {
        let mut comments = self.comments.borrow_mut();
        match comments.iter_mut().find(|c| c.id == id) {
            Some(comment) => {
                comment.body = body.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize> {
        let mut comments = self.comments.borrow_mut();
        let before = comments.len();
        comments.retain(|c| c.id != id);
        Ok(before - comments.len())
    }
}

impl UserReader for TestRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        Ok(self.users.borrow().iter().find(|u| u.id == id).cloned())
    }

    fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .borrow()
            .iter()
            .find(|u| u.username.as_str() == username.as_str())
            .cloned())
    }
}

impl UserWriter for TestRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        let mut users = self.users.borrow_mut();
        if users
            .iter()
            .any(|u| u.username.as_str() == user.username.as_str())
        {
            return Err(RepositoryError::Database(
                diesel::result::Error::DatabaseError(
                    DatabaseErrorKind::UniqueViolation,
                    Box::new("users.username".to_string()),
                ),
            ));
        }
        let next_id = users.iter().map(|u| u.id.get()).max().unwrap_or(0) + 1;
        let created = User {
            id: UserId::new(next_id)?,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: user.created_at,
        };
        users.push(created.clone());
        Ok(created)
    }

    fn update_profile(&self, id: UserId, patch: &ProfilePatch) -> RepositoryResult<usize> {
        let mut users = self.users.borrow_mut();
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.first_name = patch.first_name.clone();
                user.last_name = patch.last_name.clone();
                user.email = patch.email.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
