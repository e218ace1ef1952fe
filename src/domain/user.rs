use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{EmailAddress, UserId, Username};

/// A registered author. The password hash never leaves the service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

impl User {
    /// First and last name joined, falling back to the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.as_str().to_string()
        } else {
            full.to_string()
        }
    }
}

/// Data required to insert a new [`User`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// Profile fields a user may change about themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePatch {
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
}
