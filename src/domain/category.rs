use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryDescription, CategoryId, CategorySlug, CategoryTitle};

/// Canonical category record. The slug doubles as the public URL identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: CategoryTitle,
    pub description: CategoryDescription,
    pub slug: CategorySlug,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub title: CategoryTitle,
    pub description: CategoryDescription,
    pub slug: CategorySlug,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}
