//! # Property Source
//!
//! Where pages of external property records come from.
//!
//! - [`PropertySource`] trait so the fetcher can run against a fake
//! - [`HttpPropertySource`] production client (reqwest, fixed timeout)
//! - [`MockPropertySource`] URL → response map for tests, no network
//!
//! ```text
//! fetch_page(url)
//!     │
//!     ├── transport failure      → SyncError::Transport
//!     ├── timeout                → SyncError::Timeout
//!     ├── non-2xx status         → SyncError::HttpStatus (body kept)
//!     ├── body not a page        → SyncError::Decode
//!     └── ok                     → PropertiesPage
//! ```

mod mock;

pub use mock::{MockPropertySource, MockResponse};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::debug;
use valuations_core::PropertiesPage;

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};

/// Longest response body kept in an [`SyncError::HttpStatus`].
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Fetches one page of the external property collection.
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// GET `url` and decode it as a properties page.
    async fn fetch_page(&self, url: &str) -> SyncResult<PropertiesPage>;
}

#[async_trait]
impl<T: PropertySource + ?Sized> PropertySource for Arc<T> {
    async fn fetch_page(&self, url: &str) -> SyncResult<PropertiesPage> {
        (**self).fetch_page(url).await
    }
}

/// Production source backed by reqwest.
///
/// # Example
///
/// ```ignore
/// let source = HttpPropertySource::new(Duration::from_secs(30))?;
/// let page = source.fetch_page("https://api.example.com/api/properties").await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpPropertySource {
    client: Client,
    timeout: Duration,
}

impl HttpPropertySource {
    pub fn new(timeout: Duration) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client, timeout })
    }

    pub fn from_config(config: &SyncConfig) -> SyncResult<Self> {
        Self::new(config.request_timeout())
    }

    fn request_error(&self, url: &str, err: reqwest::Error) -> SyncError {
        if err.is_timeout() {
            SyncError::Timeout {
                url: url.to_string(),
                secs: self.timeout.as_secs(),
            }
        } else {
            SyncError::Transport {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl PropertySource for HttpPropertySource {
    async fn fetch_page(&self, url: &str) -> SyncResult<PropertiesPage> {
        debug!(url, "Requesting page");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.request_error(url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.request_error(url, e))?;

        if !status.is_success() {
            return Err(SyncError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        decode_page(url, &body)
    }
}

/// Decodes a response body into a page.
pub(crate) fn decode_page(url: &str, body: &str) -> SyncResult<PropertiesPage> {
    serde_json::from_str(body).map_err(|e| SyncError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use tokio::net::TcpListener;

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_fetches_and_decodes_page() {
        let base = serve(Router::new().route(
            "/api/properties",
            get(|| async {
                r#"{"data":[{"id":10,"owner_name":null}],
                    "meta":{"current_page":1,"last_page":1,"per_page":15,"total":1,
                            "next_page_url":null,"prev_page_url":null}}"#
            }),
        ))
        .await;

        let source = HttpPropertySource::new(Duration::from_secs(5)).unwrap();
        let page = source
            .fetch_page(&format!("{base}/api/properties"))
            .await
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, 10);
        assert_eq!(page.data[0].owner_name, "");
        assert_eq!(page.meta.total, 1);
        assert!(page.meta.next_page_url.is_none());
    }

    #[tokio::test]
    async fn test_non_success_status_keeps_body() {
        let base = serve(Router::new().route(
            "/api/properties",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance") }),
        ))
        .await;

        let source = HttpPropertySource::new(Duration::from_secs(5)).unwrap();
        let err = source
            .fetch_page(&format!("{base}/api/properties"))
            .await
            .unwrap_err();

        match err {
            SyncError::HttpStatus { status, body, .. } => {
                assert_eq!(status, 503);
                assert_eq!(body, "down for maintenance");
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let base = serve(Router::new().route(
            "/api/properties",
            get(|| async { "<html>not json</html>" }),
        ))
        .await;

        let source = HttpPropertySource::new(Duration::from_secs(5)).unwrap();
        let err = source
            .fetch_page(&format!("{base}/api/properties"))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Decode { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_slow_source_times_out() {
        let base = serve(Router::new().route(
            "/api/properties",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "{}"
            }),
        ))
        .await;

        let source = HttpPropertySource::new(Duration::from_millis(200)).unwrap();
        let err = source
            .fetch_page(&format!("{base}/api/properties"))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Timeout { .. }), "{err:?}");
        assert!(err.is_fetch_error());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpPropertySource::new(Duration::from_secs(5)).unwrap();
        let err = source
            .fetch_page(&format!("http://{addr}/api/properties"))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Transport { .. }), "{err:?}");
    }
}
