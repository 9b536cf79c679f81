//! Blog post model.

use crate::Patch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A blog post written by a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Patch)]
pub struct Post {
    /// Store-assigned identifier.
    #[patch(skip)]
    pub id: Uuid,

    pub title: String,

    /// Short summary shown in listings.
    pub extract: String,

    pub content: String,

    /// Owning user.
    pub author_id: Uuid,

    #[patch(skip)]
    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a post with a title for the given author.
    #[must_use]
    pub fn new(title: impl Into<String>, author_id: Uuid) -> Self {
        Self {
            title: title.into(),
            author_id,
            ..Self::default()
        }
    }

    /// Set the extract.
    #[must_use]
    pub fn with_extract(mut self, extract: impl Into<String>) -> Self {
        self.extract = extract.into();
        self
    }

    /// Set the body.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Whether the post belongs to `author_id`.
    #[must_use]
    pub fn is_owned_by(&self, author_id: Uuid) -> bool {
        self.author_id == author_id
    }
}
