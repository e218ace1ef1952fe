//! HTML form types and their validated payload counterparts.

pub mod auth;
pub mod comments;
pub mod posts;
pub mod profiles;
