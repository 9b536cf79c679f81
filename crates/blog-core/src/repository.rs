//! Persistence interfaces consumed by the service layer.

use crate::error::Result;
use crate::model::{Post, User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of entities returned by a list call.
pub const DEFAULT_LIMIT: usize = 10;

/// Window into a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    #[must_use]
    pub const fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Apply the window to an already ordered sequence.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, 0)
    }
}

/// Storage for users.
pub trait UsersRepository: Send + Sync {
    /// Insert a user and return its new id.
    fn create_user(&self, user: User) -> Result<Uuid>;

    /// Users ordered by creation time, newest first.
    fn find_all_users(&self, page: Page) -> Result<Vec<User>>;

    fn find_user_by_id(&self, id: Uuid) -> Result<User>;

    /// Replace the stored document with `user` and refresh `updated_at`.
    fn update_user_by_id(&self, id: Uuid, user: &User) -> Result<()>;

    fn delete_user_by_id(&self, id: Uuid) -> Result<()>;
}

/// Storage for posts.
pub trait PostsRepository: Send + Sync {
    /// Insert a post and return its new id.
    fn create_post(&self, post: Post) -> Result<Uuid>;

    /// Posts ordered by creation time, newest first, optionally limited to
    /// one author.
    fn find_all_posts(&self, page: Page, author_id: Option<Uuid>) -> Result<Vec<Post>>;

    fn find_post_by_id(&self, id: Uuid) -> Result<Post>;

    /// Replace the stored document with `post` and refresh `updated_at`.
    fn update_post_by_id(&self, id: Uuid, post: &Post) -> Result<()>;

    fn delete_post_by_id(&self, id: Uuid) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_apply() {
        let page = Page::new(2, 1);
        assert_eq!(page.apply(1..=5), vec![2, 3]);
        assert_eq!(Page::new(10, 10).apply(1..=5), Vec::<i32>::new());
    }

    #[test]
    fn test_default_page() {
        assert_eq!(Page::default(), Page::new(10, 0));
    }
}
