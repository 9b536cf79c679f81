//! Filesystem storage for the blog.
//!
//! A store is a directory with a `.blog/config.yml` file and one YAML
//! document per user or post under `data/`.

pub mod config;
pub mod error;
pub mod store;

pub use config::{BlogConfig, PaginationSettings, SiteSettings};
pub use error::{FsError, Result};
pub use store::Store;
