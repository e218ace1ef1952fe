//! Domain entities and value objects.

pub mod category;
pub mod comment;
pub mod location;
pub mod post;
pub mod types;
pub mod user;
