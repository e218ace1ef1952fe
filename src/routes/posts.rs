use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::types::PostId;
use crate::forms::posts::{PostForm, PostFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::posts::{
    create_post as create_post_service, delete_post as delete_post_service,
    get_post_for_edit as get_post_for_edit_service, post_form_options,
    show_post as show_post_service, update_post as update_post_service,
};

#[get("/posts/{post_id}")]
pub async fn show_post(
    post_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let post_id = match PostId::new(post_id.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    match show_post_service(post_id, user.as_ref(), repo.get_ref()) {
        Ok(detail) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "post");
            context.insert("post", &detail.post);
            context.insert("comments", &detail.comments);
            render_template(&tera, "posts/detail.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(e) => {
            log::error!("Failed to render post page: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/posts/create")]
pub async fn create_post_form(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match post_form_options(repo.get_ref()) {
        Ok((categories, locations)) => {
            let mut context = base_context(&flash_messages, Some(&user), "create_post");
            context.insert("categories", &categories);
            context.insert("locations", &locations);
            render_template(&tera, "posts/form.html", &context)
        }
        Err(e) => {
            log::error!("Failed to render post form: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/posts/create")]
pub async fn create_post(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<PostForm>,
) -> impl Responder {
    let payload: PostFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/posts/create");
        }
    };

    match create_post_service(payload, &user, repo.get_ref()) {
        Ok(_) => {
            FlashMessage::success("Post created.").send();
            redirect(&format!("/profile/{}", user.username))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/posts/create")
        }
        Err(e) => {
            log::error!("Failed to create post: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/posts/{post_id}/edit")]
pub async fn edit_post_form(
    post_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let post_id = match PostId::new(post_id.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    let post = match get_post_for_edit_service(post_id, &user, repo.get_ref()) {
        Ok(post) => post,
        Err(ServiceError::NotFound) => return HttpResponse::NotFound().finish(),
        Err(ServiceError::Redirect(location)) => return redirect(&location),
        Err(e) => {
            log::error!("Failed to render post edit form: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match post_form_options(repo.get_ref()) {
        Ok((categories, locations)) => {
            let mut context = base_context(&flash_messages, Some(&user), "edit_post");
            context.insert("post", &post);
            context.insert("categories", &categories);
            context.insert("locations", &locations);
            render_template(&tera, "posts/form.html", &context)
        }
        Err(e) => {
            log::error!("Failed to render post edit form: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/posts/{post_id}/edit")]
pub async fn update_post(
    post_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<PostForm>,
) -> impl Responder {
    let post_id = match PostId::new(post_id.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    let payload: PostFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&format!("/posts/{post_id}/edit"));
        }
    };

    match update_post_service(post_id, payload, &user, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Post updated.").send();
            redirect(&format!("/posts/{post_id}"))
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Redirect(location)) => redirect(&location),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/posts/{post_id}/edit"))
        }
        Err(e) => {
            log::error!("Failed to update post: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/posts/{post_id}/delete")]
pub async fn delete_post(
    post_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let post_id = match PostId::new(post_id.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    match delete_post_service(post_id, &user, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Post deleted.").send();
            redirect(&format!("/profile/{}", user.username))
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Redirect(location)) => redirect(&location),
        Err(e) => {
            log::error!("Failed to delete post: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
