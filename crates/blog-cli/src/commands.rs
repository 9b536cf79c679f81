//! CLI command implementations.

use crate::output::{self, OutputFormat, UserView};
use crate::seed::SeedFile;
use anyhow::{Context, Result};
use blog_core::{Page, PostsService, UsersService};
use blog_fs::{BlogConfig, Store};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

fn open(path: &Path) -> Result<Store> {
    Store::open(path).context("Failed to open store")
}

fn services(store: Store) -> (UsersService, PostsService) {
    let store = Arc::new(store);
    (UsersService::new(store.clone()), PostsService::new(store))
}

fn page(store: &Store, limit: Option<usize>, offset: usize) -> Page {
    let settings = &store.config().pagination;
    let limit = limit.unwrap_or(settings.default_limit).min(settings.max_limit);
    Page::new(limit, offset)
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).with_context(|| format!("Invalid id '{raw}'"))
}

/// Initialize a new store.
pub fn init(path: &Path, name: Option<String>, format: OutputFormat) -> Result<()> {
    let config = name.map_or_else(BlogConfig::default, BlogConfig::new);
    Store::init_with(path, config).context("Failed to initialize store")?;
    output::print_success(&format!("Initialized store at {}", path.display()), format)
}

/// Load users and posts from a seed file.
pub fn seed(path: &Path, file: &Path, format: OutputFormat) -> Result<()> {
    let (users, posts) = services(open(path)?);
    let report = SeedFile::load(file)?.apply(&users, &posts)?;

    output::print_success(
        &format!("Seeded {} users and {} posts", report.users, report.posts),
        format,
    )
}

/// List users.
pub fn users_list(
    path: &Path,
    limit: Option<usize>,
    offset: usize,
    format: OutputFormat,
) -> Result<()> {
    let store = open(path)?;
    let page = page(&store, limit, offset);
    let (users, _) = services(store);

    let views: Vec<UserView> = users
        .find_all_users(page)
        .context("Failed to list users")?
        .into_iter()
        .map(UserView::from)
        .collect();
    output::print_table(&views, format)
}

/// Show a user.
pub fn users_get(path: &Path, id: &str, format: OutputFormat) -> Result<()> {
    let id = parse_id(id)?;
    let (users, _) = services(open(path)?);

    let user = users.find_user_by_id(id)?;
    output::print(&UserView::from(user), format)
}

/// List posts, optionally for one author.
pub fn posts_list(
    path: &Path,
    author: Option<&str>,
    limit: Option<usize>,
    offset: usize,
    format: OutputFormat,
) -> Result<()> {
    let author_id = author.map(parse_id).transpose()?;
    let store = open(path)?;
    let page = page(&store, limit, offset);
    let (_, posts) = services(store);

    let posts = posts
        .find_all_posts(page, author_id)
        .context("Failed to list posts")?;
    output::print_table(&posts, format)
}

/// Show a post.
pub fn posts_get(path: &Path, id: &str, format: OutputFormat) -> Result<()> {
    let id = parse_id(id)?;
    let (_, posts) = services(open(path)?);

    let post = posts.find_post_by_id(id, None)?;
    output::print(&post, format)
}

/// Start the HTTP server.
pub fn serve(path: &Path, host: &str, port: u16) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async { blog_server::serve(path, host, port).await })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_init_with_name() {
        let tmp = TempDir::new().unwrap();
        init(tmp.path(), Some("notes".into()), OutputFormat::Json).unwrap();

        let store = open(tmp.path()).unwrap();
        assert_eq!(store.config().site.name.as_deref(), Some("notes"));

        assert!(init(tmp.path(), None, OutputFormat::Json).is_err());
    }

    #[test]
    fn test_page_clamps_to_config() {
        let tmp = TempDir::new().unwrap();
        let store = Store::init(tmp.path()).unwrap();

        assert_eq!(page(&store, None, 0), Page::new(10, 0));
        assert_eq!(page(&store, Some(1000), 5), Page::new(100, 5));
    }

    #[test]
    fn test_get_rejects_bad_id() {
        let tmp = TempDir::new().unwrap();
        Store::init(tmp.path()).unwrap();

        let err = users_get(tmp.path(), "nope", OutputFormat::Json).unwrap_err();
        assert!(err.to_string().contains("Invalid id"));
    }
}
