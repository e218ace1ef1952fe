use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{EmailAddress, TypeConstraintError, Username};

/// Registration form.
#[derive(Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 3, max = 150))]
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub repeat_password: String,
}

#[derive(Debug, Clone)]
pub struct RegisterFormPayload {
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum RegisterFormError {
    #[error("Registration form validation failed: {0}")]
    Validation(String),
    #[error("Registration form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl From<ValidationErrors> for RegisterFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for RegisterFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<RegisterForm> for RegisterFormPayload {
    type Error = RegisterFormError;

    fn try_from(value: RegisterForm) -> Result<Self, Self::Error> {
        value.validate()?;
        if value.password != value.repeat_password {
            return Err(RegisterFormError::PasswordMismatch);
        }
        Ok(Self {
            username: Username::new(value.username)?,
            first_name: value.first_name.unwrap_or_default().trim().to_string(),
            last_name: value.last_name.unwrap_or_default().trim().to_string(),
            email: EmailAddress::new(value.email)?,
            password: value.password,
        })
    }
}

/// Login form.
#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginFormPayload {
    pub username: Username,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum LoginFormError {
    #[error("Login form validation failed: {0}")]
    Validation(String),
    #[error("Login form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for LoginFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for LoginFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<LoginForm> for LoginFormPayload {
    type Error = LoginFormError;

    fn try_from(value: LoginForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            username: Username::new(value.username)?,
            password: value.password,
        })
    }
}
