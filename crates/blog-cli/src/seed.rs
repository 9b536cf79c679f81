//! Loading a store from a seed file.
//!
//! A seed file lists users, each with the posts they wrote:
//!
//! ```yaml
//! users:
//!   - username: alice
//!     email: alice@example.com
//!     posts:
//!       - title: Hello
//!         content: First post
//! ```

use anyhow::{Context, Result};
use blog_core::{Post, PostsService, User, UsersService};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub birth_date: Option<NaiveDate>,
    pub posts: Vec<SeedPost>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedPost {
    pub title: String,
    pub extract: String,
    pub content: String,
}

/// Counts of created entities.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub users: usize,
    pub posts: usize,
}

impl SeedFile {
    /// Read a seed file. `.json` files are parsed as JSON, anything else as
    /// YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let seed = if is_json {
            serde_json::from_str(&content).context("Invalid JSON seed file")?
        } else {
            serde_yaml::from_str(&content).context("Invalid YAML seed file")?
        };
        Ok(seed)
    }

    /// Create every user and post through the services.
    ///
    /// Stops at the first entity that fails validation; entities created
    /// before that point are kept.
    pub fn apply(self, users: &UsersService, posts: &PostsService) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        for seed_user in self.users {
            let username = seed_user.username.clone();
            let user = User {
                first_name: seed_user.first_name,
                last_name: seed_user.last_name,
                email: seed_user.email,
                username: seed_user.username,
                hashed_password: seed_user.password,
                birth_date: seed_user.birth_date.unwrap_or_default(),
                ..User::default()
            };
            let author_id = users
                .create_user(user)
                .with_context(|| format!("Failed to create user '{username}'"))?;
            report.users += 1;

            for seed_post in seed_user.posts {
                let post = Post::new(seed_post.title, author_id)
                    .with_extract(seed_post.extract)
                    .with_content(seed_post.content);
                posts
                    .create_post(post)
                    .with_context(|| format!("Failed to create post for '{username}'"))?;
                report.posts += 1;
            }
        }

        info!(users = report.users, posts = report.posts, "Seeded store");
        Ok(report)
    }
}
