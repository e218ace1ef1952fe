use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory};
use crate::domain::comment::{Comment, CommentWithAuthor, NewComment};
use crate::domain::location::{Location, NewLocation};
use crate::domain::post::{NewPost, Post, PostPatch, PostPreview};
use crate::domain::types::{
    CategoryId, CategorySlug, CommentBody, CommentId, LocationId, PostId, UserId, Username,
};
use crate::domain::user::{NewUser, ProfilePatch, User};
use crate::pagination::Pagination;
use crate::repository::errors::RepositoryResult;

pub mod category;
pub mod comment;
pub mod errors;
pub mod location;
pub mod post;
#[cfg(test)]
pub mod test;
pub mod user;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// The identity and scope under which a post listing is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostListScope {
    /// Anonymous/public listing: only posts passing the publish gate.
    Public,
    /// Publicly visible posts by one author (someone else's profile page).
    PublicByAuthor(UserId),
    /// Every post by one author regardless of publish state (own profile).
    Author(UserId),
    /// Publicly visible posts within one category. Callers resolve the slug
    /// and check the category's own publish flag first.
    Category(CategoryId),
}

/// Listing order over `pub_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Query parameters used when listing posts.
#[derive(Debug, Clone)]
pub struct PostListQuery {
    pub scope: PostListScope,
    pub order: PostOrder,
    pub pagination: Option<Pagination>,
}

impl PostListQuery {
    pub fn public() -> Self {
        Self {
            scope: PostListScope::Public,
            order: PostOrder::default(),
            pagination: None,
        }
    }

    pub fn published_by_author(author_id: UserId) -> Self {
        Self {
            scope: PostListScope::PublicByAuthor(author_id),
            order: PostOrder::default(),
            pagination: None,
        }
    }

    pub fn by_author(author_id: UserId) -> Self {
        Self {
            scope: PostListScope::Author(author_id),
            order: PostOrder::default(),
            pagination: None,
        }
    }

    pub fn in_category(category_id: CategoryId) -> Self {
        Self {
            scope: PostListScope::Category(category_id),
            order: PostOrder::default(),
            pagination: None,
        }
    }

    pub fn order(mut self, order: PostOrder) -> Self {
        self.order = order;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for post entities.
pub trait PostReader {
    /// List posts matching the supplied query, annotated with their comment
    /// counts and related rows. Returns the unpaginated total alongside the
    /// requested page.
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<PostPreview>)>;
    /// Retrieve a bare post by its identifier.
    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<Post>>;
    /// Retrieve a post with author, category, location and comment count.
    fn get_post_preview(&self, id: PostId) -> RepositoryResult<Option<PostPreview>>;
}

/// Write operations for post entities.
pub trait PostWriter {
    /// Persist a new post.
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post>;
    /// Apply a patch to an existing post.
    fn update_post(&self, id: PostId, patch: &PostPatch) -> RepositoryResult<usize>;
    /// Delete a post. Comments go with it.
    fn delete_post(&self, id: PostId) -> RepositoryResult<usize>;
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List published categories ordered by title.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its slug regardless of publish state.
    fn get_category_by_slug(&self, slug: &CategorySlug) -> RepositoryResult<Option<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<usize>;
    /// Delete a category, detaching dependent posts instead of deleting them.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for location entities.
pub trait LocationReader {
    /// List published locations ordered by name.
    fn list_locations(&self) -> RepositoryResult<Vec<Location>>;
    /// Retrieve a location by its identifier.
    fn get_location_by_id(&self, id: LocationId) -> RepositoryResult<Option<Location>>;
}

/// Write operations for location entities.
pub trait LocationWriter {
    /// Persist a new location.
    fn create_location(&self, location: &NewLocation) -> RepositoryResult<usize>;
    /// Delete a location, detaching dependent posts instead of deleting them.
    fn delete_location(&self, id: LocationId) -> RepositoryResult<usize>;
}

/// Read-only operations for comment entities.
pub trait CommentReader {
    /// Comments under a post with their authors, oldest first.
    fn list_comments_for_post(&self, post_id: PostId)
    -> RepositoryResult<Vec<CommentWithAuthor>>;
    /// Retrieve a comment by its identifier.
    fn get_comment_by_id(&self, id: CommentId) -> RepositoryResult<Option<Comment>>;
}

/// Write operations for comment entities.
pub trait CommentWriter {
    /// Persist a new comment.
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<usize>;
    /// Replace the body of an existing comment.
    fn update_comment(&self, id: CommentId, body: &CommentBody) -> RepositoryResult<usize>;
    /// Delete a comment.
    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize>;
}

/// Read-only operations for user entities.
pub trait UserReader {
    /// Retrieve a user by its identifier.
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    /// Retrieve a user by login name.
    fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>>;
}

/// Write operations for user entities.
pub trait UserWriter {
    /// Persist a new user and return the stored row.
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
    /// Apply profile changes to an existing user.
    fn update_profile(&self, id: UserId, patch: &ProfilePatch) -> RepositoryResult<usize>;
}
