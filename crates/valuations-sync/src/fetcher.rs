//! # Fetcher
//!
//! Stateless page-at-a-time walk over the external collection.
//!
//! ```text
//!   PageCursor { url, page_number: 1 }
//!        │
//!        ▼  fetch_next(source, &cursor)
//!   Page { records, declared_total (page 1 only), next: Some(cursor 2) }
//!        │
//!        ▼  fetch_next(source, &cursor)
//!   Page { records, declared_total: None, next: None }   ← walk ends
//! ```
//!
//! The caller owns the cursor and threads it from one call to the next.
//! Any error is fatal to the walk; there are no retries.

use tracing::debug;
use valuations_core::ExternalProperty;

use crate::error::SyncResult;
use crate::source::PropertySource;

/// Where the next page lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    pub url: String,
    /// 1-based position of the page this cursor points at.
    pub page_number: u32,
}

impl PageCursor {
    /// Cursor for the first page of a collection.
    pub fn start(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            page_number: 1,
        }
    }
}

/// One fetched page.
#[derive(Debug, Clone)]
pub struct Page {
    pub number: u32,
    pub records: Vec<ExternalProperty>,
    /// Collection size declared by the source. Only read from the first page.
    pub declared_total: Option<i64>,
    /// `None` when the source gave no next link, or an empty one.
    pub next: Option<PageCursor>,
}

/// Fetches the page under `cursor`.
pub async fn fetch_next<S>(source: &S, cursor: &PageCursor) -> SyncResult<Page>
where
    S: PropertySource + ?Sized,
{
    let response = source.fetch_page(&cursor.url).await?;

    let next = response
        .meta
        .next_page_url
        .filter(|url| !url.trim().is_empty())
        .map(|url| PageCursor {
            url,
            page_number: cursor.page_number + 1,
        });

    let declared_total = (cursor.page_number == 1).then_some(response.meta.total);

    debug!(
        page = cursor.page_number,
        records = response.data.len(),
        has_next = next.is_some(),
        "Page fetched"
    );

    Ok(Page {
        number: cursor.page_number,
        records: response.data,
        declared_total,
        next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::source::MockPropertySource;
    use valuations_core::wire::PageMeta;
    use valuations_core::PropertiesPage;

    fn page(ids: &[u64], total: i64, next: Option<&str>) -> PropertiesPage {
        PropertiesPage {
            data: ids
                .iter()
                .map(|&id| ExternalProperty {
                    id,
                    ..Default::default()
                })
                .collect(),
            meta: PageMeta {
                total,
                next_page_url: next.map(str::to_string),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_walks_until_next_is_absent() {
        let source = MockPropertySource::new()
            .with_page("http://s/p?page=1", page(&[1, 2], 3, Some("http://s/p?page=2")))
            .with_page("http://s/p?page=2", page(&[3], 99, None));

        let first = fetch_next(&source, &PageCursor::start("http://s/p?page=1"))
            .await
            .unwrap();
        assert_eq!(first.number, 1);
        assert_eq!(first.records.len(), 2);
        assert_eq!(first.declared_total, Some(3));
        let cursor = first.next.unwrap();
        assert_eq!(cursor.page_number, 2);

        let second = fetch_next(&source, &cursor).await.unwrap();
        assert_eq!(second.number, 2);
        // Later pages never override the declared total.
        assert_eq!(second.declared_total, None);
        assert!(second.next.is_none());
    }

    #[tokio::test]
    async fn test_empty_next_url_ends_walk() {
        let source =
            MockPropertySource::new().with_page("http://s/p", page(&[1], 1, Some("")));

        let first = fetch_next(&source, &PageCursor::start("http://s/p"))
            .await
            .unwrap();
        assert!(first.next.is_none());
    }

    #[tokio::test]
    async fn test_error_propagates() {
        let source = MockPropertySource::new().with_status("http://s/p", 500, "boom");

        let err = fetch_next(&source, &PageCursor::start("http://s/p"))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::HttpStatus { status: 500, .. }));
    }
}
