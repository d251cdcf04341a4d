//! Mock property source for tests and local development.
//!
//! Pre-populate it with URL → response mappings; no network access.
//!
//! # Example
//!
//! ```ignore
//! let source = MockPropertySource::new()
//!     .with_page("http://source/properties", page_one)
//!     .with_status("http://source/properties?page=2", 500, "boom");
//!
//! let page = source.fetch_page("http://source/properties").await?;
//! assert_eq!(source.requested(), vec!["http://source/properties"]);
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use valuations_core::PropertiesPage;

use super::{decode_page, PropertySource};
use crate::error::{SyncError, SyncResult};

/// What the mock answers for one URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A well-formed page.
    Page(PropertiesPage),
    /// A raw body, decoded exactly like a live response.
    Body(String),
    /// A non-success status with a body.
    Status { status: u16, body: String },
    /// The request never completed.
    Timeout { secs: u64 },
    /// Connection-level failure.
    Transport(String),
}

/// Source answering from a fixed URL → response map.
///
/// Unknown URLs answer `404`.
#[derive(Debug, Default)]
pub struct MockPropertySource {
    responses: HashMap<String, MockResponse>,
    requested: Mutex<Vec<String>>,
}

impl MockPropertySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, url: impl Into<String>, response: MockResponse) -> Self {
        self.responses.insert(url.into(), response);
        self
    }

    pub fn with_page(self, url: impl Into<String>, page: PropertiesPage) -> Self {
        self.with_response(url, MockResponse::Page(page))
    }

    pub fn with_status(self, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.with_response(
            url,
            MockResponse::Status {
                status,
                body: body.into(),
            },
        )
    }

    /// URLs requested so far, in order.
    pub fn requested(&self) -> Vec<String> {
        self.log().clone()
    }

    fn log(&self) -> MutexGuard<'_, Vec<String>> {
        self.requested
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PropertySource for MockPropertySource {
    async fn fetch_page(&self, url: &str) -> SyncResult<PropertiesPage> {
        self.log().push(url.to_string());

        match self.responses.get(url) {
            Some(MockResponse::Page(page)) => Ok(page.clone()),
            Some(MockResponse::Body(body)) => decode_page(url, body),
            Some(MockResponse::Status { status, body }) => Err(SyncError::HttpStatus {
                url: url.to_string(),
                status: *status,
                body: body.clone(),
            }),
            Some(MockResponse::Timeout { secs }) => Err(SyncError::Timeout {
                url: url.to_string(),
                secs: *secs,
            }),
            Some(MockResponse::Transport(message)) => Err(SyncError::Transport {
                url: url.to_string(),
                message: message.clone(),
            }),
            None => Err(SyncError::HttpStatus {
                url: url.to_string(),
                status: 404,
                body: "not found in mock".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_answers_and_records() {
        let source = MockPropertySource::new()
            .with_page("http://source/p1", PropertiesPage::default())
            .with_response("http://source/p2", MockResponse::Body("nope".into()));

        assert!(source.fetch_page("http://source/p1").await.is_ok());
        let err = source.fetch_page("http://source/p2").await.unwrap_err();
        assert!(matches!(err, SyncError::Decode { .. }));
        let err = source.fetch_page("http://source/p3").await.unwrap_err();
        assert!(matches!(err, SyncError::HttpStatus { status: 404, .. }));

        assert_eq!(
            source.requested(),
            vec!["http://source/p1", "http://source/p2", "http://source/p3"]
        );
    }
}
