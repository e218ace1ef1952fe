use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{EmailAddress, TypeConstraintError};
use crate::domain::user::ProfilePatch;

/// Form submitted when a user edits their own profile.
#[derive(Deserialize, Validate)]
pub struct ProfileForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileFormPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
}

impl From<ProfileFormPayload> for ProfilePatch {
    fn from(payload: ProfileFormPayload) -> Self {
        Self {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProfileFormError {
    #[error("Profile form validation failed: {0}")]
    Validation(String),
    #[error("Profile form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ProfileFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ProfileFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ProfileForm> for ProfileFormPayload {
    type Error = ProfileFormError;

    fn try_from(value: ProfileForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            first_name: value.first_name.unwrap_or_default().trim().to_string(),
            last_name: value.last_name.unwrap_or_default().trim().to_string(),
            email: EmailAddress::new(value.email)?,
        })
    }
}
