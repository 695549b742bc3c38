//! Marker-based pagination.
//!
//! Listing operations return results one page at a time together with a
//! truncation flag and an opaque continuation marker. [`fetch_all`] drives a
//! page fetcher until the listing is exhausted and concatenates the items in
//! page order.

use std::future::Future;

/// One page of a marker-paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_marker: Option<String>,
    pub is_truncated: bool,
}

impl<T> Page<T> {
    /// A final page.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_marker: None,
            is_truncated: false,
        }
    }

    /// A page with more results behind `marker`.
    pub fn truncated(items: Vec<T>, marker: impl Into<String>) -> Self {
        Self {
            items,
            next_marker: Some(marker.into()),
            is_truncated: true,
        }
    }

    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_marker: self.next_marker,
            is_truncated: self.is_truncated,
        }
    }

    /// The marker to request the next page with, if there is one.
    ///
    /// A truncated page without a usable marker ends the listing.
    fn continuation(&self) -> Option<&str> {
        if !self.is_truncated {
            return None;
        }
        self.next_marker.as_deref().filter(|m| !m.is_empty())
    }
}

/// Fetch every page of a listing.
///
/// `fetch_page` is called first with `None`, then with each page's marker
/// until a page reports it is not truncated. Pages are fetched sequentially.
/// Any error aborts the listing and items collected so far are discarded.
///
/// `listing` names the listing in log output.
pub async fn fetch_all<T, E, F, Fut>(listing: &str, mut fetch_page: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let mut items = Vec::new();
    let mut marker: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let mut page = fetch_page(marker.take()).await?;
        pages += 1;

        let next = page.continuation().map(str::to_string);
        if page.is_truncated && next.is_none() {
            log::warn!(
                "{} page {} is truncated but carries no marker, stopping",
                listing,
                pages
            );
        }

        items.append(&mut page.items);

        match next {
            Some(next) => marker = Some(next),
            None => break,
        }
    }

    log::debug!("{}: {} items across {} pages", listing, items.len(), pages);
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedPages;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_single_page() {
        let result: Result<Vec<u32>, String> =
            fetch_all("numbers", |_| async { Ok(Page::last(vec![1, 2, 3])) }).await;
        assert_eq!(result.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_markers_are_threaded_through() {
        let pages = ScriptedPages::new()
            .with_page(Page::truncated(vec!["a", "b"], "m1"))
            .with_page(Page::truncated(vec!["c"], "m2"))
            .with_page(Page::last(vec!["d"]));

        let result = fetch_all("letters", |m| pages.next(m)).await;

        assert_eq!(result.unwrap(), vec!["a", "b", "c", "d"]);
        assert_eq!(
            pages.markers(),
            vec![None, Some("m1".to_string()), Some("m2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_error_on_first_page() {
        let pages = ScriptedPages::<u32>::new()
            .with_error("AccessDenied")
            .with_page(Page::last(vec![1]));

        let result = fetch_all("numbers", |m| pages.next(m)).await;

        assert_eq!(result.unwrap_err(), "AccessDenied");
        assert_eq!(pages.call_count(), 1);
    }

    #[tokio::test]
    async fn test_error_on_later_page_discards_items() {
        let pages = ScriptedPages::new()
            .with_page(Page::truncated(vec![1, 2], "m1"))
            .with_page(Page::truncated(vec![3], "m2"))
            .with_error("throttled")
            .with_page(Page::last(vec![4]));

        let result = fetch_all("numbers", |m| pages.next(m)).await;

        assert_eq!(result.unwrap_err(), "throttled");
        assert_eq!(pages.call_count(), 3);
    }

    #[tokio::test]
    async fn test_truncated_without_marker_stops() {
        let calls = Mutex::new(0);

        let result: Result<Vec<u32>, String> = fetch_all("numbers", |_| {
            *calls.lock().unwrap() += 1;
            async {
                Ok(Page {
                    items: vec![7],
                    next_marker: None,
                    is_truncated: true,
                })
            }
        })
        .await;

        assert_eq!(result.unwrap(), vec![7]);
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_truncated_with_empty_marker_stops() {
        let result: Result<Vec<u32>, String> =
            fetch_all("numbers", |_| async { Ok(Page::truncated(vec![1], "")) }).await;
        assert_eq!(result.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let result: Result<Vec<u32>, String> =
            fetch_all("numbers", |_| async { Ok(Page::last(Vec::new())) }).await;
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_map_items_keeps_continuation() {
        let page = Page::truncated(vec![1, 2], "m").map_items(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.next_marker.as_deref(), Some("m"));
        assert!(page.is_truncated);
    }
}
