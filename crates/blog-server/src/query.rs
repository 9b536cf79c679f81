//! Query string parsing for list and scoped endpoints.

use crate::error::AppError;
use blog_core::Page;
use blog_fs::PaginationSettings;
use serde::Deserialize;
use uuid::Uuid;

/// Raw query parameters. Values are kept as strings so that malformed
/// input produces our own error messages.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub author_id: Option<String>,
}

impl ListParams {
    /// Resolve `limit` and `offset`, clamping the limit to the configured
    /// maximum.
    ///
    /// # Errors
    /// Returns a bad request if either value is not a non-negative integer.
    pub fn page(&self, settings: &PaginationSettings) -> Result<Page, AppError> {
        let limit = match non_empty(self.limit.as_deref()) {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| AppError::bad_request("invalid limit value"))?,
            None => settings.default_limit,
        };
        let offset = match non_empty(self.offset.as_deref()) {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| AppError::bad_request("invalid offset value"))?,
            None => 0,
        };

        Ok(Page::new(limit.min(settings.max_limit), offset))
    }

    /// Resolve the optional `author_id` filter.
    ///
    /// # Errors
    /// Returns a bad request if the value is not a UUID.
    pub fn author_id(&self) -> Result<Option<Uuid>, AppError> {
        non_empty(self.author_id.as_deref())
            .map(|raw| Uuid::parse_str(raw).map_err(|_| AppError::bad_request("invalid author_id")))
            .transpose()
    }
}

/// Parse a path segment as an id.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request("invalid id"))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params(limit: Option<&str>, offset: Option<&str>) -> ListParams {
        ListParams {
            limit: limit.map(String::from),
            offset: offset.map(String::from),
            author_id: None,
        }
    }

    #[test]
    fn test_page_defaults() {
        let page = params(None, Some("")).page(&PaginationSettings::default()).unwrap();
        assert_eq!(page, Page::new(10, 0));
    }

    #[test]
    fn test_page_clamps_limit() {
        let page = params(Some("500"), Some("3"))
            .page(&PaginationSettings::default())
            .unwrap();
        assert_eq!(page, Page::new(100, 3));
    }

    #[test]
    fn test_page_rejects_garbage() {
        let settings = PaginationSettings::default();
        assert!(matches!(
            params(Some("ten"), None).page(&settings),
            Err(AppError::BadRequest(m)) if m == "invalid limit value"
        ));
        assert!(matches!(
            params(None, Some("-1")).page(&settings),
            Err(AppError::BadRequest(m)) if m == "invalid offset value"
        ));
    }

    #[test]
    fn test_author_id() {
        let id = Uuid::new_v4();
        let ok = ListParams {
            author_id: Some(id.to_string()),
            ..ListParams::default()
        };
        assert_eq!(ok.author_id().unwrap(), Some(id));
        assert_eq!(ListParams::default().author_id().unwrap(), None);

        let bad = ListParams {
            author_id: Some("nope".into()),
            ..ListParams::default()
        };
        assert!(bad.author_id().is_err());
    }
}
