//! User use cases.

use crate::error::{CoreError, Result};
use crate::model::User;
use crate::patch::Patch;
use crate::repository::{Page, UsersRepository};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// User operations backed by a [`UsersRepository`].
#[derive(Clone)]
pub struct UsersService {
    repo: Arc<dyn UsersRepository>,
}

impl UsersService {
    #[must_use]
    pub fn new(repo: Arc<dyn UsersRepository>) -> Self {
        Self { repo }
    }

    /// Create a user.
    ///
    /// # Errors
    /// Returns `CoreError::Validation` if username or email is empty.
    pub fn create_user(&self, user: User) -> Result<Uuid> {
        if user.username.trim().is_empty() {
            return Err(CoreError::Validation("username is required".to_string()));
        }
        if user.email.trim().is_empty() {
            return Err(CoreError::Validation("email is required".to_string()));
        }

        let id = self.repo.create_user(user)?;
        info!(id = %id, "Created user");
        Ok(id)
    }

    /// List users, newest first.
    pub fn find_all_users(&self, page: Page) -> Result<Vec<User>> {
        self.repo.find_all_users(page)
    }

    /// Get a user by id.
    ///
    /// # Errors
    /// Returns `CoreError::NotFound` if no user has this id.
    pub fn find_user_by_id(&self, id: Uuid) -> Result<User> {
        self.repo.find_user_by_id(id)
    }

    /// Apply a partial update to a stored user.
    ///
    /// Fields of `update` left at their zero value keep their stored value.
    ///
    /// # Errors
    /// Returns `CoreError::NotFound` if no user has this id.
    pub fn update_user_by_id(&self, id: Uuid, update: &User) -> Result<()> {
        let mut user = self.repo.find_user_by_id(id)?;
        user.patch(update);
        debug!(id = %id, "Merged user update");

        self.repo.update_user_by_id(id, &user)?;
        info!(id = %id, "Updated user");
        Ok(())
    }

    /// Delete a user.
    ///
    /// # Errors
    /// Returns `CoreError::NotFound` if no user has this id.
    pub fn delete_user_by_id(&self, id: Uuid) -> Result<()> {
        self.repo.delete_user_by_id(id)?;
        info!(id = %id, "Deleted user");
        Ok(())
    }
}
