// Bounded pagination loop shared by every search scope.

use std::future::Future;

use tracing::debug;

use crate::error::Result;

/// Largest page size the search API accepts.
pub const PER_PAGE: u32 = 100;

/// Hard ceiling on pages per scope; the search API stops serving results past 1000 items.
pub const MAX_PAGES: u32 = 10;

/// Limits applied to one scope's pagination loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub per_page: u32,
    pub max_pages: u32,
    pub max_results: Option<usize>,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            per_page: PER_PAGE,
            max_pages: MAX_PAGES,
            max_results: None,
        }
    }
}

impl PageLimits {
    /// Limits with `max_pages` clamped to `1..=MAX_PAGES`.
    pub fn new(max_pages: Option<u32>, max_results: Option<usize>) -> Self {
        Self {
            per_page: PER_PAGE,
            max_pages: max_pages.unwrap_or(MAX_PAGES).clamp(1, MAX_PAGES),
            max_results,
        }
    }
}

/// Fetch pages 1..=max_pages, stopping early on a short page or once
/// `max_results` items have been collected.
pub async fn paginate<T, F, Fut>(limits: PageLimits, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut items = Vec::new();

    for page in 1..=limits.max_pages {
        let batch = fetch_page(page).await?;
        let last_page = batch.len() < limits.per_page as usize;
        debug!(page, count = batch.len(), "fetched page");
        items.extend(batch);

        if last_page {
            break;
        }
        if limits.max_results.is_some_and(|max| items.len() >= max) {
            break;
        }
    }

    Ok(items)
}
