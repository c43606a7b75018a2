//! Page navigation window
//!
//! Computes the compressed list of page links shown under a result list:
//! first and last page always present, a fixed-width window around the
//! current page, and ellipsis markers for the skipped ranges.

use serde::{Serialize, Serializer};

/// One entry of the navigation window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl PageItem {
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::Page(n) => Some(*n),
            Self::Ellipsis => None,
        }
    }
}

/// Pages serialize as numbers, gaps as `"..."`
impl Serialize for PageItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Page(n) => serializer.serialize_u32(*n),
            Self::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Compute the window for `current_page` out of `total_pages`.
///
/// `current_page` is clamped into `1..=total_pages`; `max_visible` is the
/// number of pages shown between the first and the last page.
pub fn window(current_page: u32, total_pages: u32, max_visible: u32) -> Vec<PageItem> {
    match total_pages {
        0 => return Vec::new(),
        1 => return vec![PageItem::Page(1)],
        _ => {}
    }

    let last = total_pages;
    let current = current_page.clamp(1, last);
    let width = max_visible.max(1).min(last - 2);

    let mut items = Vec::with_capacity(width as usize + 4);
    items.push(PageItem::Page(1));

    if width > 0 {
        // Inner pages live in 2..=last-1; keep the window inside that range.
        let half = width / 2;
        let mut start = current.saturating_sub(half).max(2);
        let mut end = start + width - 1;
        if end > last - 1 {
            end = last - 1;
            start = end + 1 - width;
        }

        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
        items.extend((start..=end).map(PageItem::Page));
        if end < last - 1 {
            items.push(PageItem::Ellipsis);
        }
    }

    items.push(PageItem::Page(last));
    items
}
