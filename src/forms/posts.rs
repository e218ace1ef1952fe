use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::post::{NewPost, PostPatch};
use crate::domain::types::{
    CategoryId, ImagePath, LocationId, PostBody, PostTitle, TypeConstraintError, UserId,
};

/// Formats accepted for the publication date. The first is what
/// `<input type="datetime-local">` submits.
const PUB_DATE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

fn parse_pub_date(value: &str) -> Result<NaiveDateTime, PostFormError> {
    let trimmed = value.trim();
    for format in PUB_DATE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }
    Err(PostFormError::InvalidDate(trimmed.to_string()))
}

/// Select inputs submit an empty string when nothing is chosen.
fn parse_optional_id<T>(value: Option<String>, field: &'static str) -> Result<Option<T>, PostFormError>
where
    T: TryFrom<i32, Error = TypeConstraintError>,
{
    match value {
        Some(raw) if !raw.trim().is_empty() => {
            let id: i32 = raw
                .trim()
                .parse()
                .map_err(|_| PostFormError::InvalidId(field))?;
            Ok(Some(T::try_from(id)?))
        }
        _ => Ok(None),
    }
}

/// Form submitted when creating or editing a post.
#[derive(Deserialize, Validate)]
pub struct PostForm {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub text: String,
    pub pub_date: String,
    pub image: Option<String>,
    pub category_id: Option<String>,
    pub location_id: Option<String>,
    /// Checkboxes are absent when unchecked.
    pub is_published: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostFormPayload {
    pub title: PostTitle,
    pub body: PostBody,
    pub pub_date: NaiveDateTime,
    pub image: Option<ImagePath>,
    pub category_id: Option<CategoryId>,
    pub location_id: Option<LocationId>,
    pub is_published: bool,
}

impl PostFormPayload {
    pub fn into_new_post(self, author_id: UserId) -> NewPost {
        NewPost {
            author_id,
            category_id: self.category_id,
            location_id: self.location_id,
            title: self.title,
            body: self.body,
            pub_date: self.pub_date,
            image: self.image,
            is_published: self.is_published,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn into_patch(self) -> PostPatch {
        PostPatch {
            category_id: self.category_id,
            location_id: self.location_id,
            title: self.title,
            body: self.body,
            pub_date: self.pub_date,
            image: self.image,
            is_published: self.is_published,
        }
    }
}

#[derive(Debug, Error)]
pub enum PostFormError {
    #[error("Post form validation failed: {0}")]
    Validation(String),
    #[error("Post form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("'{0}' is not a valid publication date")]
    InvalidDate(String),
    #[error("{0} is not a valid identifier")]
    InvalidId(&'static str),
}

impl From<ValidationErrors> for PostFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for PostFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<PostForm> for PostFormPayload {
    type Error = PostFormError;

    fn try_from(value: PostForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let image = match value.image {
            Some(raw) if !raw.trim().is_empty() => Some(ImagePath::new(raw)?),
            _ => None,
        };

        Ok(Self {
            title: PostTitle::new(value.title)?,
            body: PostBody::new(value.text)?,
            pub_date: parse_pub_date(&value.pub_date)?,
            image,
            category_id: parse_optional_id(value.category_id, "category_id")?,
            location_id: parse_optional_id(value.location_id, "location_id")?,
            is_published: value.is_published.is_some(),
        })
    }
}
