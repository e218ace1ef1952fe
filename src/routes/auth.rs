use actix_identity::Identity;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::forms::auth::{LoginForm, LoginFormPayload, RegisterForm, RegisterFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::{login as login_service, register as register_service};

#[get("/auth/register")]
pub async fn register_form(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }
    let context = base_context(&flash_messages, None, "register");
    render_template(&tera, "auth/register.html", &context)
}

#[post("/auth/register")]
pub async fn register(
    request: HttpRequest,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<RegisterForm>,
) -> impl Responder {
    let payload: RegisterFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/auth/register");
        }
    };

    match register_service(payload, repo.get_ref()) {
        Ok(user) => {
            let claims = AuthenticatedUser::from(&user);
            if let Err(e) = claims.login(&request) {
                log::error!("Failed to log in after registration: {e}");
                return redirect("/auth/login");
            }
            FlashMessage::success("Welcome!").send();
            redirect(&format!("/profile/{}", user.username))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/auth/register")
        }
        Err(e) => {
            log::error!("Failed to register user: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/auth/login")]
pub async fn login_form(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }
    let context = base_context(&flash_messages, None, "login");
    render_template(&tera, "auth/login.html", &context)
}

#[post("/auth/login")]
pub async fn login(
    request: HttpRequest,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let payload: LoginFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/auth/login");
        }
    };

    match login_service(payload, repo.get_ref()) {
        Ok(user) => {
            let claims = AuthenticatedUser::from(&user);
            if let Err(e) = claims.login(&request) {
                log::error!("Failed to persist login session: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/auth/login")
        }
        Err(e) => {
            log::error!("Failed to log user in: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/auth/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect("/")
}
