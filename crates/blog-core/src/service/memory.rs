//! In-memory repositories for service tests.

use crate::clock::{Clock, FixedClock};
use crate::error::{CoreError, Result};
use crate::model::{Post, User};
use crate::repository::{Page, PostsRepository, UsersRepository};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryRepository {
    users: Mutex<Vec<User>>,
    posts: Mutex<Vec<Post>>,
    user_writes: AtomicUsize,
    post_writes: AtomicUsize,
    clock: FixedClock,
}

impl MemoryRepository {
    pub fn user_writes(&self) -> usize {
        self.user_writes.load(Ordering::SeqCst)
    }

    pub fn post_writes(&self) -> usize {
        self.post_writes.load(Ordering::SeqCst)
    }
}

impl UsersRepository for MemoryRepository {
    fn create_user(&self, mut user: User) -> Result<Uuid> {
        user.id = Uuid::new_v4();
        user.created_at = self.clock.now();
        user.updated_at = user.created_at;
        let id = user.id;
        self.users.lock().unwrap().push(user);
        Ok(id)
    }

    fn find_all_users(&self, page: Page) -> Result<Vec<User>> {
        Ok(page.apply(self.users.lock().unwrap().iter().rev().cloned()))
    }

    fn find_user_by_id(&self, id: Uuid) -> Result<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("user", id))
    }

    fn update_user_by_id(&self, id: Uuid, user: &User) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        let slot = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| CoreError::not_found("user", id))?;
        *slot = user.clone();
        slot.updated_at = self.clock.now();
        self.user_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn delete_user_by_id(&self, id: Uuid) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(CoreError::not_found("user", id));
        }
        Ok(())
    }
}

impl PostsRepository for MemoryRepository {
    fn create_post(&self, mut post: Post) -> Result<Uuid> {
        post.id = Uuid::new_v4();
        post.created_at = self.clock.now();
        post.updated_at = post.created_at;
        let id = post.id;
        self.posts.lock().unwrap().push(post);
        Ok(id)
    }

    fn find_all_posts(&self, page: Page, author_id: Option<Uuid>) -> Result<Vec<Post>> {
        let posts = self.posts.lock().unwrap();
        Ok(page.apply(
            posts
                .iter()
                .rev()
                .filter(|p| author_id.is_none_or(|a| p.is_owned_by(a)))
                .cloned(),
        ))
    }

    fn find_post_by_id(&self, id: Uuid) -> Result<Post> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("post", id))
    }

    fn update_post_by_id(&self, id: Uuid, post: &Post) -> Result<()> {
        let mut posts = self.posts.lock().unwrap();
        let slot = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::not_found("post", id))?;
        *slot = post.clone();
        slot.updated_at = self.clock.now();
        self.post_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn delete_post_by_id(&self, id: Uuid) -> Result<()> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Err(CoreError::not_found("post", id));
        }
        Ok(())
    }
}
