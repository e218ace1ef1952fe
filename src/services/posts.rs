use chrono::Utc;

use crate::auth::AuthenticatedUser;
use crate::domain::category::Category;
use crate::domain::location::Location;
use crate::domain::post::Post;
use crate::domain::types::PostId;
use crate::dto::comments::CommentDto;
use crate::dto::posts::{PostDetailDto, PostDto};
use crate::forms::posts::PostFormPayload;
use crate::repository::{
    CategoryReader, CommentReader, LocationReader, PostReader, PostWriter,
};

use super::{ServiceError, ServiceResult};

fn detail_url(post_id: PostId) -> String {
    format!("/posts/{}", post_id.get())
}

/// Check that the category and location a form submission references still
/// exist. The select options can go stale between render and submit, and a
/// crafted id must not reach the database as a foreign-key failure.
fn check_form_references<R>(payload: &PostFormPayload, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader + LocationReader,
{
    if let Some(category_id) = payload.category_id {
        match repo.get_category_by_id(category_id) {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(ServiceError::Form(
                    "The selected category no longer exists".to_string(),
                ));
            }
            Err(e) => {
                log::error!("Failed to get category {}: {e}", category_id.get());
                return Err(ServiceError::Internal);
            }
        }
    }
    if let Some(location_id) = payload.location_id {
        match repo.get_location_by_id(location_id) {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(ServiceError::Form(
                    "The selected location no longer exists".to_string(),
                ));
            }
            Err(e) => {
                log::error!("Failed to get location {}: {e}", location_id.get());
                return Err(ServiceError::Internal);
            }
        }
    }
    Ok(())
}

/// Render a post's detail page.
///
/// The author always sees their own post. Anyone else only sees it when it
/// passes the publish gate; otherwise the post does not exist for them.
pub fn show_post<R>(
    post_id: PostId,
    viewer: Option<&AuthenticatedUser>,
    repo: &R,
) -> ServiceResult<PostDetailDto>
where
    R: PostReader + CommentReader,
{
    let preview = match repo.get_post_preview(post_id) {
        Ok(Some(preview)) => preview,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post {}: {e}", post_id.get());
            return Err(ServiceError::Internal);
        }
    };

    let viewer_is_author = viewer.is_some_and(|v| v.id == preview.post.author_id.get());
    if !viewer_is_author && !preview.passes_publish_gate(Utc::now().naive_utc()) {
        return Err(ServiceError::NotFound);
    }

    let comments = match repo.list_comments_for_post(post_id) {
        Ok(comments) => comments.into_iter().map(CommentDto::from).collect(),
        Err(e) => {
            log::error!("Failed to list comments for post {}: {e}", post_id.get());
            return Err(ServiceError::Internal);
        }
    };

    Ok(PostDetailDto {
        post: PostDto::from(preview),
        comments,
    })
}

/// Published categories and locations offered in the post form selects.
pub fn post_form_options<R>(repo: &R) -> ServiceResult<(Vec<Category>, Vec<Location>)>
where
    R: CategoryReader + LocationReader,
{
    let categories = match repo.list_categories() {
        Ok(categories) => categories,
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            return Err(ServiceError::Internal);
        }
    };
    let locations = match repo.list_locations() {
        Ok(locations) => locations,
        Err(e) => {
            log::error!("Failed to list locations: {e}");
            return Err(ServiceError::Internal);
        }
    };
    Ok((categories, locations))
}

/// Persist a new post authored by the current user.
pub fn create_post<R>(
    payload: PostFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<PostId>
where
    R: PostWriter + CategoryReader + LocationReader,
{
    check_form_references(&payload, repo)?;

    let author_id = user.user_id()?;
    let new_post = payload.into_new_post(author_id);

    match repo.create_post(&new_post) {
        Ok(post) => Ok(post.id),
        Err(e) => {
            log::error!("Failed to create post: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetch a post for its edit form. Non-authors are bounced to the detail
/// page rather than told the page exists behind a login.
pub fn get_post_for_edit<R>(
    post_id: PostId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Post>
where
    R: PostReader,
{
    let post = match repo.get_post_by_id(post_id) {
        Ok(Some(post)) => post,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post {}: {e}", post_id.get());
            return Err(ServiceError::Internal);
        }
    };

    if post.author_id.get() != user.id {
        return Err(ServiceError::Redirect(detail_url(post_id)));
    }

    Ok(post)
}

/// Apply edits to a post. Only the author may change it.
pub fn update_post<R>(
    post_id: PostId,
    payload: PostFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: PostReader + PostWriter + CategoryReader + LocationReader,
{
    get_post_for_edit(post_id, user, repo)?;
    check_form_references(&payload, repo)?;

    let patch = payload.into_patch();
    match repo.update_post(post_id, &patch) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to update post {}: {e}", post_id.get());
            Err(ServiceError::Internal)
        }
    }
}

/// Delete a post and its comments. Only the author may do this.
pub fn delete_post<R>(
    post_id: PostId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: PostReader + PostWriter,
{
    get_post_for_edit(post_id, user, repo)?;

    match repo.delete_post(post_id) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete post {}: {e}", post_id.get());
            Err(ServiceError::Internal)
        }
    }
}
