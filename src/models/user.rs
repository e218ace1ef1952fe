use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{EmailAddress, TypeConstraintError, Username};
use crate::domain::user::{
    NewUser as DomainNewUser, ProfilePatch as DomainProfilePatch, User as DomainUser,
};

/// Diesel model representing the `users` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`User`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// Changeset applied when a user edits their profile.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct ProfilePatch {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id.try_into()?,
            username: Username::new(user.username)?,
            first_name: user.first_name,
            last_name: user.last_name,
            email: EmailAddress::new(user.email)?,
            password_hash: user.password_hash,
            created_at: user.created_at,
        })
    }
}

impl From<DomainNewUser> for NewUser {
    fn from(user: DomainNewUser) -> Self {
        Self {
            username: user.username.into_inner(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email.into_inner(),
            password_hash: user.password_hash,
            created_at: user.created_at,
        }
    }
}

impl From<DomainProfilePatch> for ProfilePatch {
    fn from(patch: DomainProfilePatch) -> Self {
        Self {
            first_name: patch.first_name,
            last_name: patch.last_name,
            email: patch.email.into_inner(),
        }
    }
}
