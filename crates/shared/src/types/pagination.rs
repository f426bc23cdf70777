//! Cursor pagination types for list endpoints.
//!
//! The remote API pages scans with a `limit` plus an opaque `startAfter`
//! cursor (the last key of the previous page), so these types model cursor
//! pagination rather than page numbers.

use serde::{Deserialize, Serialize};

/// Request parameters for cursor-paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorRequest {
    /// Maximum number of items to return.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Opaque cursor: return items strictly after this key.
    #[serde(default)]
    pub start_after: Option<String>,
}

fn default_limit() -> u32 {
    10
}

impl Default for CursorRequest {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            start_after: None,
        }
    }
}

impl CursorRequest {
    /// Creates a request for the first page.
    #[must_use]
    pub fn first(limit: u32) -> Self {
        Self {
            limit,
            start_after: None,
        }
    }

    /// Creates the request for the page following `page`.
    ///
    /// Returns `None` when `page` was the last one.
    #[must_use]
    pub fn after<T>(&self, page: &CursorPage<T>) -> Option<Self> {
        page.next_cursor.as_ref().map(|cursor| Self {
            limit: self.limit,
            start_after: Some(cursor.clone()),
        })
    }
}

/// One page of a cursor-paginated result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorPage<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Cursor for the next page; `None` when this page is the last.
    pub next_cursor: Option<String>,
}

impl<T> CursorPage<T> {
    /// Creates a new page.
    #[must_use]
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// Returns true if there are more pages to fetch.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request() {
        let req = CursorRequest::default();
        assert_eq!(req.limit, 10);
        assert!(req.start_after.is_none());
    }

    #[test]
    fn test_after_follows_cursor() {
        let req = CursorRequest::first(25);
        let page = CursorPage::new(vec![1, 2, 3], Some("k3".to_string()));
        let next = req.after(&page).unwrap();
        assert_eq!(next.limit, 25);
        assert_eq!(next.start_after.as_deref(), Some("k3"));
    }

    #[test]
    fn test_after_stops_on_last_page() {
        let req = CursorRequest::first(25);
        let page: CursorPage<i32> = CursorPage::new(vec![], None);
        assert!(req.after(&page).is_none());
        assert!(!page.has_more());
    }
}
