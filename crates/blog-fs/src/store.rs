//! Document store and repository implementations.

use crate::config::BlogConfig;
use crate::error::{FsError, Result};
use blog_core::{Clock, Page, Post, PostsRepository, SystemClock, User, UsersRepository};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Directory name for store metadata.
const BLOG_DIR: &str = ".blog";
/// Configuration file name.
const CONFIG_FILE: &str = "config.yml";
/// Extension of document files.
const DOC_EXT: &str = "yml";

/// An entity stored as one YAML document per id.
trait Document: Serialize + DeserializeOwned {
    /// Singular name used in errors and logs.
    const COLLECTION: &'static str;
    /// Directory relative to the store root.
    const DIR: &'static str;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn stamp(&mut self, id: Uuid, created_at: DateTime<Utc>, updated_at: DateTime<Utc>);
}

impl Document for User {
    const COLLECTION: &'static str = "user";
    const DIR: &'static str = "data/users";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn stamp(&mut self, id: Uuid, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
        self.updated_at = updated_at;
    }
}

impl Document for Post {
    const COLLECTION: &'static str = "post";
    const DIR: &'static str = "data/posts";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn stamp(&mut self, id: Uuid, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
        self.updated_at = updated_at;
    }
}

/// A store keeps users and posts as YAML documents on the filesystem.
#[derive(Clone)]
pub struct Store {
    /// Root path of the store.
    root: PathBuf,
    /// Store configuration.
    config: BlogConfig,
    /// Source of created/updated timestamps.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("root", &self.root)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Initialize a new store at the given path with default configuration.
    ///
    /// # Errors
    /// Returns error if the store already exists or IO fails.
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        Self::init_with(path, BlogConfig::default())
    }

    /// Initialize a new store at the given path.
    ///
    /// # Errors
    /// Returns error if the store already exists or IO fails.
    pub fn init_with(path: impl AsRef<Path>, config: BlogConfig) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let blog_dir = root.join(BLOG_DIR);

        if blog_dir.exists() {
            return Err(FsError::StoreExists(root));
        }

        fs::create_dir_all(&blog_dir)?;
        fs::create_dir_all(root.join(User::DIR))?;
        fs::create_dir_all(root.join(Post::DIR))?;

        let config_content = serde_yaml::to_string(&config)?;
        fs::write(blog_dir.join(CONFIG_FILE), config_content)?;

        info!(path = %root.display(), "Initialized store");

        Ok(Self {
            root,
            config,
            clock: Arc::new(SystemClock),
        })
    }

    /// Open an existing store at the given path.
    ///
    /// # Errors
    /// Returns error if the store doesn't exist or config is invalid.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let config_path = root.join(BLOG_DIR).join(CONFIG_FILE);

        if !config_path.exists() {
            return Err(FsError::StoreNotFound(root));
        }

        let config_content = fs::read_to_string(&config_path)?;
        let config: BlogConfig = serde_yaml::from_str(&config_content)?;

        debug!(path = %root.display(), "Opened store");

        Ok(Self {
            root,
            config,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the clock used for timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Get the store root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the store configuration.
    #[must_use]
    pub const fn config(&self) -> &BlogConfig {
        &self.config
    }

    fn doc_path<D: Document>(&self, id: Uuid) -> PathBuf {
        self.root
            .join(D::DIR)
            .join(format!("{}.{DOC_EXT}", id.as_hyphenated()))
    }

    fn insert<D: Document>(&self, mut doc: D) -> Result<Uuid> {
        let now = self.clock.now();
        let id = Uuid::new_v4();

        let created_at = if doc.created_at() == DateTime::<Utc>::default() {
            now
        } else {
            doc.created_at()
        };
        doc.stamp(id, created_at, now);

        self.write(&doc)?;
        info!(collection = D::COLLECTION, id = %id, "Inserted document");
        Ok(id)
    }

    fn read<D: Document>(&self, id: Uuid) -> Result<D> {
        let path = self.doc_path::<D>(id);
        if !path.exists() {
            return Err(FsError::DocumentNotFound {
                collection: D::COLLECTION,
                id,
            });
        }

        let content = fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Every document of a collection, newest first.
    fn list<D: Document>(&self) -> Result<Vec<D>> {
        let dir = self.root.join(D::DIR);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut docs: Vec<D> = Vec::new();

        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type()?.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(DOC_EXT)
            {
                continue;
            }

            let parsed = fs::read_to_string(&path)
                .map_err(FsError::from)
                .and_then(|content| serde_yaml::from_str(&content).map_err(FsError::from));

            match parsed {
                Ok(doc) => docs.push(doc),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Failed to read document, skipping");
                }
            }
        }

        docs.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });

        Ok(docs)
    }

    /// Overwrite an existing document, keeping its id and creation time.
    fn replace<D: Document + Clone>(&self, id: Uuid, doc: &D) -> Result<()> {
        let stored: D = self.read(id)?;

        let mut doc = doc.clone();
        doc.stamp(id, stored.created_at(), self.clock.now());

        self.write(&doc)?;
        info!(collection = D::COLLECTION, id = %id, "Replaced document");
        Ok(())
    }

    fn remove<D: Document>(&self, id: Uuid) -> Result<()> {
        let path = self.doc_path::<D>(id);
        if !path.exists() {
            return Err(FsError::DocumentNotFound {
                collection: D::COLLECTION,
                id,
            });
        }

        fs::remove_file(&path)?;
        info!(collection = D::COLLECTION, id = %id, "Removed document");
        Ok(())
    }

    fn write<D: Document>(&self, doc: &D) -> Result<()> {
        let content = serde_yaml::to_string(doc)?;
        fs::write(self.doc_path::<D>(doc.id()), content)?;
        Ok(())
    }
}

impl UsersRepository for Store {
    fn create_user(&self, user: User) -> blog_core::Result<Uuid> {
        Ok(self.insert(user)?)
    }

    fn find_all_users(&self, page: Page) -> blog_core::Result<Vec<User>> {
        Ok(page.apply(self.list::<User>()?))
    }

    fn find_user_by_id(&self, id: Uuid) -> blog_core::Result<User> {
        Ok(self.read(id)?)
    }

    fn update_user_by_id(&self, id: Uuid, user: &User) -> blog_core::Result<()> {
        Ok(self.replace(id, user)?)
    }

    fn delete_user_by_id(&self, id: Uuid) -> blog_core::Result<()> {
        Ok(self.remove::<User>(id)?)
    }
}

impl PostsRepository for Store {
    fn create_post(&self, post: Post) -> blog_core::Result<Uuid> {
        Ok(self.insert(post)?)
    }

    fn find_all_posts(&self, page: Page, author_id: Option<Uuid>) -> blog_core::Result<Vec<Post>> {
        let posts = self.list::<Post>()?;
        Ok(page.apply(
            posts
                .into_iter()
                .filter(|p| author_id.is_none_or(|a| p.is_owned_by(a))),
        ))
    }

    fn find_post_by_id(&self, id: Uuid) -> blog_core::Result<Post> {
        Ok(self.read(id)?)
    }

    fn update_post_by_id(&self, id: Uuid, post: &Post) -> blog_core::Result<()> {
        Ok(self.replace(id, post)?)
    }

    fn delete_post_by_id(&self, id: Uuid) -> blog_core::Result<()> {
        Ok(self.remove::<Post>(id)?)
    }
}
