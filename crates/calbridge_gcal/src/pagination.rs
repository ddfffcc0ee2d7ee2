// --- File: crates/calbridge_gcal/src/pagination.rs ---
//! Accumulate-then-trim paging over continuation tokens.

use std::future::Future;

use calbridge_common::Result;
use tracing::debug;

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// `None` (or empty) ends the listing
    pub next_page_token: Option<String>,
}

/// Fetches pages until the token runs out or `max_results` items were collected.
///
/// Pages are fetched one after another, each with the token of the previous one.
/// The last page may overshoot `max_results`; the result is trimmed afterwards.
/// `Some(0)` returns immediately without fetching.
pub async fn collect_pages<T, F, Fut>(max_results: Option<usize>, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    if max_results == Some(0) {
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = fetch(page_token.take()).await?;
        pages += 1;
        items.extend(page.items);

        page_token = page.next_page_token.filter(|token| !token.is_empty());
        let cap_reached = max_results.is_some_and(|max| items.len() >= max);
        if page_token.is_none() || cap_reached {
            break;
        }
    }

    if let Some(max) = max_results {
        items.truncate(max);
    }

    debug!("fetched {} item(s) in {} page(s)", items.len(), pages);
    Ok(items)
}
