use serde::Serialize;

use crate::domain::user::User;

/// A user profile as rendered on the profile page.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileDto {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub full_name: String,
}

impl From<User> for ProfileDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.get(),
            full_name: user.display_name(),
            username: user.username.as_str().to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email.into_inner(),
        }
    }
}
