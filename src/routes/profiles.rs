use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::types::Username;
use crate::forms::profiles::{ProfileForm, ProfileFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{PageQuery, base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::profiles::{
    get_profile_for_edit as get_profile_for_edit_service,
    show_profile as show_profile_service, update_profile as update_profile_service,
};

#[get("/profile/edit")]
pub async fn edit_profile_form(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match get_profile_for_edit_service(&user, repo.get_ref()) {
        Ok(profile) => {
            let mut context = base_context(&flash_messages, Some(&user), "edit_profile");
            context.insert("profile", &profile);
            render_template(&tera, "profiles/edit.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(e) => {
            log::error!("Failed to render profile edit form: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/profile/edit")]
pub async fn update_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ProfileForm>,
) -> impl Responder {
    let payload: ProfileFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/profile/edit");
        }
    };

    match update_profile_service(payload, &user, repo.get_ref()) {
        Ok(username) => {
            FlashMessage::success("Profile updated.").send();
            redirect(&format!("/profile/{username}"))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/profile/edit")
        }
        Err(e) => {
            log::error!("Failed to update profile: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/profile/{username}")]
pub async fn show_profile(
    username: web::Path<String>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    query: web::Query<PageQuery>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let username = match Username::new(username.into_inner()) {
        Ok(username) => username,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    match show_profile_service(&username, user.as_ref(), query.page(), repo.get_ref()) {
        Ok((profile, posts)) => {
            let viewer_is_owner = user.as_ref().is_some_and(|u| u.id == profile.id);
            let mut context = base_context(&flash_messages, user.as_ref(), "profile");
            context.insert("profile", &profile);
            context.insert("posts", &posts);
            context.insert("viewer_is_owner", &viewer_is_owner);
            render_template(&tera, "profiles/detail.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(e) => {
            log::error!("Failed to render profile page: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
