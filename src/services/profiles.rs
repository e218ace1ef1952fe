use crate::auth::AuthenticatedUser;
use crate::domain::types::Username;
use crate::dto::posts::PostDto;
use crate::dto::users::ProfileDto;
use crate::forms::profiles::ProfileFormPayload;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{PostListQuery, PostReader, UserReader, UserWriter};

use super::{ServiceError, ServiceResult};

/// A user's profile page with their posts.
///
/// The owner sees everything they wrote, drafts and scheduled posts
/// included. Everyone else sees only posts passing the publish gate.
pub fn show_profile<R>(
    username: &Username,
    viewer: Option<&AuthenticatedUser>,
    page: usize,
    repo: &R,
) -> ServiceResult<(ProfileDto, Paginated<PostDto>)>
where
    R: UserReader + PostReader,
{
    let user = match repo.get_user_by_username(username) {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get user {username}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let viewer_is_owner = viewer.is_some_and(|v| v.id == user.id.get());
    let query = if viewer_is_owner {
        PostListQuery::by_author(user.id)
    } else {
        PostListQuery::published_by_author(user.id)
    }
    .paginate(page, DEFAULT_ITEMS_PER_PAGE);

    match repo.list_posts(query) {
        Ok((total, previews)) => {
            let items = previews.into_iter().map(PostDto::from).collect();
            Ok((
                ProfileDto::from(user),
                Paginated::new(items, page, DEFAULT_ITEMS_PER_PAGE, total),
            ))
        }
        Err(e) => {
            log::error!("Failed to list posts for user {username}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Current profile values for the edit form.
pub fn get_profile_for_edit<R>(
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ProfileDto>
where
    R: UserReader,
{
    match repo.get_user_by_id(user.user_id()?) {
        Ok(Some(user)) => Ok(ProfileDto::from(user)),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get user {}: {e}", user.id);
            Err(ServiceError::Internal)
        }
    }
}

/// Apply profile changes and return the username for the redirect back to
/// the profile page.
pub fn update_profile<R>(
    payload: ProfileFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<String>
where
    R: UserWriter,
{
    let patch = payload.into();
    match repo.update_profile(user.user_id()?, &patch) {
        Ok(_) => Ok(user.username.clone()),
        Err(e) => {
            log::error!("Failed to update profile for user {}: {e}", user.id);
            Err(ServiceError::Internal)
        }
    }
}
