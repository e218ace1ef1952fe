//! Session identity for the blog.
//!
//! The identity cookie stores a small JSON claims object; handlers receive it
//! through the [`AuthenticatedUser`] extractor. Anonymous pages take
//! `Option<AuthenticatedUser>` instead.

use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::http::header;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::types::{TypeConstraintError, UserId};
use crate::domain::user::User;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("failed to persist session identity: {0}")]
    Session(String),
}

/// Claims stored in the identity cookie for the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub email: String,
}

impl AuthenticatedUser {
    /// Typed user id from the raw claim.
    pub fn user_id(&self) -> Result<UserId, TypeConstraintError> {
        UserId::new(self.id)
    }

    /// Attach these claims to the current session.
    pub fn login(&self, request: &HttpRequest) -> Result<(), AuthError> {
        let claims =
            serde_json::to_string(self).map_err(|e| AuthError::Session(e.to_string()))?;
        Identity::login(&request.extensions(), claims)
            .map_err(|e| AuthError::Session(e.to_string()))?;
        Ok(())
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            username: user.username.as_str().to_string(),
            name: user.display_name(),
            email: user.email.as_str().to_string(),
        }
    }
}

/// Unauthenticated requests to protected pages are sent to the login form.
fn login_redirect() -> actix_web::Error {
    let response = HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/auth/login"))
        .finish();
    InternalError::from_response("authentication required", response).into()
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let claims = Identity::from_request(req, payload)
            .into_inner()
            .and_then(|identity| identity.id().map_err(|_| login_redirect()))
            .map_err(|_| login_redirect())
            .and_then(|raw| {
                serde_json::from_str::<AuthenticatedUser>(&raw).map_err(|_| login_redirect())
            });
        ready(claims)
    }
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
