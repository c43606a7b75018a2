//! Search query and related data models

use crate::error::SearchError;
use serde::Serialize;

/// A validated search request.
///
/// The only way to obtain one is [`SearchQuery::new`], so every instance has
/// non-blank text, `page >= 1` and `page_size > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    text: String,
    page: u32,
    page_size: u32,
}

impl SearchQuery {
    /// Build a query, rejecting blank text and impossible pagination
    pub fn new(text: impl Into<String>, page: u32, page_size: u32) -> Result<Self, SearchError> {
        let text = text.into();
        let trimmed = text.trim();

        if trimmed.is_empty() {
            return Err(SearchError::InvalidQuery(
                "Query parameter required".to_string(),
            ));
        }
        if page < 1 {
            return Err(SearchError::InvalidQuery(
                "page must be at least 1".to_string(),
            ));
        }
        if page_size == 0 {
            return Err(SearchError::InvalidQuery(
                "size must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            text: trimmed.to_string(),
            page,
            page_size,
        })
    }

    /// Query text, trimmed
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Page number (1-indexed)
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Index offset of the first hit on this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// Number of pages needed for `total` hits
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.page_size))
    }
}
