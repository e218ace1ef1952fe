use chrono::Utc;

use crate::auth::AuthenticatedUser;
use crate::domain::comment::{Comment, NewComment};
use crate::domain::types::{CommentId, PostId};
use crate::dto::comments::OwnCommentDto;
use crate::forms::comments::CommentFormPayload;
use crate::repository::{CommentReader, CommentWriter, PostReader};

use super::{ServiceError, ServiceResult};

/// Attach a comment to an existing post.
pub fn add_comment<R>(
    post_id: PostId,
    payload: CommentFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: PostReader + CommentWriter,
{
    match repo.get_post_by_id(post_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post {}: {e}", post_id.get());
            return Err(ServiceError::Internal);
        }
    }

    let comment = NewComment {
        post_id,
        author_id: user.user_id()?,
        body: payload.body,
        created_at: Utc::now().naive_utc(),
    };

    match repo.create_comment(&comment) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to create comment on post {}: {e}", post_id.get());
            Err(ServiceError::Internal)
        }
    }
}

/// Load a comment the current user may edit or delete.
///
/// A comment owned by someone else is indistinguishable from a missing one.
fn get_own_comment<R>(
    post_id: PostId,
    comment_id: CommentId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Comment>
where
    R: CommentReader,
{
    let comment = match repo.get_comment_by_id(comment_id) {
        Ok(Some(comment)) => comment,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get comment {}: {e}", comment_id.get());
            return Err(ServiceError::Internal);
        }
    };

    if comment.post_id != post_id || comment.author_id.get() != user.id {
        return Err(ServiceError::NotFound);
    }

    Ok(comment)
}

/// Fetch a comment for its edit form.
pub fn get_comment_for_edit<R>(
    post_id: PostId,
    comment_id: CommentId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<OwnCommentDto>
where
    R: CommentReader,
{
    get_own_comment(post_id, comment_id, user, repo).map(OwnCommentDto::from)
}

/// Replace the body of the user's own comment.
pub fn update_comment<R>(
    post_id: PostId,
    comment_id: CommentId,
    payload: CommentFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: CommentReader + CommentWriter,
{
    get_own_comment(post_id, comment_id, user, repo)?;

    match repo.update_comment(comment_id, &payload.body) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to update comment {}: {e}", comment_id.get());
            Err(ServiceError::Internal)
        }
    }
}

/// Delete the user's own comment.
pub fn delete_comment<R>(
    post_id: PostId,
    comment_id: CommentId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: CommentReader + CommentWriter,
{
    get_own_comment(post_id, comment_id, user, repo)?;

    match repo.delete_comment(comment_id) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete comment {}: {e}", comment_id.get());
            Err(ServiceError::Internal)
        }
    }
}
