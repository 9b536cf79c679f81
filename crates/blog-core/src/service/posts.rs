//! Post use cases.

use crate::error::{CoreError, Result};
use crate::model::Post;
use crate::patch::Patch;
use crate::repository::{Page, PostsRepository};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Post operations backed by a [`PostsRepository`].
#[derive(Clone)]
pub struct PostsService {
    repo: Arc<dyn PostsRepository>,
}

impl PostsService {
    #[must_use]
    pub fn new(repo: Arc<dyn PostsRepository>) -> Self {
        Self { repo }
    }

    /// Create a post.
    ///
    /// # Errors
    /// Returns `CoreError::Validation` if the title is empty or the author id
    /// is nil.
    pub fn create_post(&self, post: Post) -> Result<Uuid> {
        if post.title.trim().is_empty() {
            return Err(CoreError::Validation("title is required".to_string()));
        }
        if post.author_id.is_nil() {
            return Err(CoreError::Validation("author_id is required".to_string()));
        }

        let id = self.repo.create_post(post)?;
        info!(id = %id, "Created post");
        Ok(id)
    }

    /// List posts, newest first, optionally for a single author.
    pub fn find_all_posts(&self, page: Page, author_id: Option<Uuid>) -> Result<Vec<Post>> {
        self.repo.find_all_posts(page, author_id)
    }

    /// Get a post by id. With `author_id`, a post owned by someone else is
    /// reported as missing.
    ///
    /// # Errors
    /// Returns `CoreError::NotFound` if the post does not exist or belongs to
    /// another author.
    pub fn find_post_by_id(&self, id: Uuid, author_id: Option<Uuid>) -> Result<Post> {
        let post = self.repo.find_post_by_id(id)?;
        match author_id {
            Some(author) if !post.is_owned_by(author) => Err(CoreError::not_found("post", id)),
            _ => Ok(post),
        }
    }

    /// Apply a partial update to a stored post.
    ///
    /// # Errors
    /// Returns `CoreError::NotFound` if the post does not exist or belongs to
    /// another author.
    pub fn update_post_by_id(
        &self,
        id: Uuid,
        author_id: Option<Uuid>,
        update: &Post,
    ) -> Result<()> {
        let mut post = self.find_post_by_id(id, author_id)?;
        post.patch(update);
        debug!(id = %id, "Merged post update");

        self.repo.update_post_by_id(id, &post)?;
        info!(id = %id, "Updated post");
        Ok(())
    }

    /// Delete a post.
    ///
    /// # Errors
    /// Returns `CoreError::NotFound` if the post does not exist.
    pub fn delete_post_by_id(&self, id: Uuid) -> Result<()> {
        self.repo.delete_post_by_id(id)?;
        info!(id = %id, "Deleted post");
        Ok(())
    }
}
