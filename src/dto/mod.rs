//! Serializable view models handed to templates.

pub mod categories;
pub mod comments;
pub mod posts;
pub mod users;
