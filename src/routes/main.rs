use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{PageQuery, base_context, render_template};
use crate::services::main::show_index as show_index_service;

#[get("/")]
pub async fn index(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    query: web::Query<PageQuery>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_index_service(query.page(), repo.get_ref()) {
        Ok(posts) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "index");
            context.insert("posts", &posts);
            render_template(&tera, "main/index.html", &context)
        }
        Err(e) => {
            log::error!("Failed to render index page: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
