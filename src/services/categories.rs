use crate::domain::types::CategorySlug;
use crate::dto::categories::CategoryDto;
use crate::dto::posts::PostDto;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{CategoryReader, PostListQuery, PostReader};

use super::{ServiceError, ServiceResult};

/// Published categories for the category index.
pub fn show_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    match repo.list_categories() {
        Ok(categories) => Ok(categories.into_iter().map(CategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// A category page: the category itself plus its publicly visible posts.
///
/// An unpublished category does not exist as far as visitors are concerned.
pub fn show_category<R>(
    slug: &CategorySlug,
    page: usize,
    repo: &R,
) -> ServiceResult<(CategoryDto, Paginated<PostDto>)>
where
    R: CategoryReader + PostReader,
{
    let category = match repo.get_category_by_slug(slug) {
        Ok(Some(category)) if category.is_published => category,
        Ok(_) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category {slug}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let query = PostListQuery::in_category(category.id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    match repo.list_posts(query) {
        Ok((total, previews)) => {
            let items = previews.into_iter().map(PostDto::from).collect();
            Ok((
                CategoryDto::from(category),
                Paginated::new(items, page, DEFAULT_ITEMS_PER_PAGE, total),
            ))
        }
        Err(e) => {
            log::error!("Failed to list posts for category {slug}: {e}");
            Err(ServiceError::Internal)
        }
    }
}
