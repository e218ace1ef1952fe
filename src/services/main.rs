use crate::dto::posts::PostDto;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{PostListQuery, PostReader};

use super::{ServiceError, ServiceResult};

/// Core logic behind the front page: the latest publicly visible posts,
/// newest first, ten per page.
pub fn show_index<R>(page: usize, repo: &R) -> ServiceResult<Paginated<PostDto>>
where
    R: PostReader,
{
    let query = PostListQuery::public().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    match repo.list_posts(query) {
        Ok((total, previews)) => {
            let items = previews.into_iter().map(PostDto::from).collect();
            Ok(Paginated::new(items, page, DEFAULT_ITEMS_PER_PAGE, total))
        }
        Err(e) => {
            log::error!("Failed to list posts for the index page: {e}");
            Err(ServiceError::Internal)
        }
    }
}
