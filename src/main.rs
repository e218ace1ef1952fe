use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use tera::Tera;

use blogr::db::establish_connection_pool;
use blogr::models::config::ServerConfig;
use blogr::repository::DieselRepository;
use blogr::routes::auth::{login, login_form, logout, register, register_form};
use blogr::routes::categories::{show_categories, show_category};
use blogr::routes::comments::{add_comment, delete_comment, edit_comment_form, update_comment};
use blogr::routes::main::index;
use blogr::routes::posts::{
    create_post, create_post_form, delete_post, edit_post_form, show_post, update_post,
};
use blogr::routes::profiles::{edit_profile_form, show_profile, update_profile};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::default())
        .build()
        .map_err(|e| std::io::Error::other(format!("failed to load configuration: {e}")))?;
    let config: ServerConfig = config
        .try_deserialize()
        .map_err(|e| std::io::Error::other(format!("invalid configuration: {e}")))?;

    let pool = establish_connection_pool(&config.database_url)
        .map_err(|e| std::io::Error::other(format!("failed to connect to database: {e}")))?;
    let repo = DieselRepository::new(pool);

    let tera = match Tera::new("templates/**/*.html") {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to parse templates: {e}");
            std::process::exit(1);
        }
    };

    let secret_key = Key::derive_from(config.secret_key.as_bytes());
    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(SessionMiddleware::new(
                CookieSessionStore::default(),
                secret_key.clone(),
            ))
            .wrap(message_framework.clone())
            .wrap(Logger::default())
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(tera.clone()))
            .service(index)
            .service(register_form)
            .service(register)
            .service(login_form)
            .service(login)
            .service(logout)
            // `/posts/create` must be registered before `/posts/{post_id}`.
            .service(create_post_form)
            .service(create_post)
            .service(show_post)
            .service(edit_post_form)
            .service(update_post)
            .service(delete_post)
            .service(add_comment)
            .service(edit_comment_form)
            .service(update_comment)
            .service(delete_comment)
            .service(show_categories)
            .service(show_category)
            // `/profile/edit` must be registered before `/profile/{username}`.
            .service(edit_profile_form)
            .service(update_profile)
            .service(show_profile)
            .service(Files::new("/static", "./static"))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
