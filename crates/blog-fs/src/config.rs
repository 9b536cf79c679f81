//! Store configuration.

use blog_core::DEFAULT_LIMIT;
use serde::{Deserialize, Serialize};

/// Store configuration kept in `.blog/config.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogConfig {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Site settings.
    #[serde(default)]
    pub site: SiteSettings,

    /// List endpoint defaults.
    #[serde(default)]
    pub pagination: PaginationSettings,
}

fn default_version() -> u32 {
    1
}

/// Site-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Display name of the blog.
    #[serde(default)]
    pub name: Option<String>,
}

/// Limits applied to list requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationSettings {
    /// Limit used when the request does not set one.
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Upper bound for a requested limit.
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_max_limit() -> usize {
    100
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            version: 1,
            site: SiteSettings::default(),
            pagination: PaginationSettings::default(),
        }
    }
}

impl BlogConfig {
    /// Create a new config with the given site name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            site: SiteSettings {
                name: Some(name.into()),
            },
            ..Default::default()
        }
    }
}
