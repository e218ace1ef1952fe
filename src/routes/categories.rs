use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::types::CategorySlug;
use crate::repository::DieselRepository;
use crate::routes::{PageQuery, base_context, render_template};
use crate::services::ServiceError;
use crate::services::categories::{
    show_categories as show_categories_service, show_category as show_category_service,
};

#[get("/category")]
pub async fn show_categories(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_categories_service(repo.get_ref()) {
        Ok(categories) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "categories");
            context.insert("categories", &categories);
            render_template(&tera, "categories/index.html", &context)
        }
        Err(e) => {
            log::error!("Failed to render category list: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/category/{slug}")]
pub async fn show_category(
    slug: web::Path<String>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    query: web::Query<PageQuery>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let slug = match CategorySlug::new(slug.into_inner()) {
        Ok(slug) => slug,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    match show_category_service(&slug, query.page(), repo.get_ref()) {
        Ok((category, posts)) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "category");
            context.insert("category", &category);
            context.insert("posts", &posts);
            render_template(&tera, "categories/detail.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(e) => {
            log::error!("Failed to render category page: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
