//! Business logic sitting between the HTTP routes and the repository.
//!
//! Service functions are plain functions generic over the repository traits
//! they need, so every rule is testable against the in-memory repository.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;

pub mod auth;
pub mod categories;
pub mod comments;
pub mod main;
pub mod posts;
pub mod profiles;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Not found")]
    NotFound,
    /// The caller must be sent elsewhere instead of seeing the page.
    #[error("Redirect to {0}")]
    Redirect(String),
    /// User-facing form failure, shown as a flash message.
    #[error("{0}")]
    Form(String),
    #[error("Internal error")]
    Internal,
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<TypeConstraintError> for ServiceError {
    fn from(e: TypeConstraintError) -> Self {
        log::error!("Invalid value reached the service layer: {e}");
        ServiceError::Internal
    }
}
