use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{CommentBody, TypeConstraintError};

/// Form submitted when adding or editing a comment.
#[derive(Deserialize, Validate)]
pub struct CommentForm {
    #[validate(length(min = 1))]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentFormPayload {
    pub body: CommentBody,
}

#[derive(Debug, Error)]
pub enum CommentFormError {
    #[error("Comment form validation failed: {0}")]
    Validation(String),
    #[error("Comment form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CommentFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CommentFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CommentForm> for CommentFormPayload {
    type Error = CommentFormError;

    fn try_from(value: CommentForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            body: CommentBody::new(value.text)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_comment_text() {
        let form = CommentForm {
            text: "  Nice trip!  ".to_string(),
        };
        let payload: CommentFormPayload = form.try_into().unwrap();
        assert_eq!(payload.body.as_str(), "Nice trip!");
    }

    #[test]
    fn rejects_blank_comments() {
        let form = CommentForm {
            text: "   ".to_string(),
        };
        let payload: Result<CommentFormPayload, _> = form.try_into();
        assert!(payload.is_err());
    }
}
