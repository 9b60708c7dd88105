//! Full-page fetch and extraction for article enrichment.
//!
//! Fetching is async and network-bound. Extraction works on the raw page
//! string synchronously, because `scraper::Html` is not `Send` and must not be
//! held across an await point.

pub mod extract;
pub mod metadata;

use std::future::Future;

use reqwest::header::ACCEPT;

use crate::error::CurateError;

/// Page-fetch and extraction collaborator used by the content enricher.
///
/// Each operation fails independently; the enricher decides how to fall back.
pub trait PageFetcher {
    /// Fetch the raw page at `url`. `Ok(None)` means the server answered with
    /// an empty body.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Option<String>, CurateError>> + Send;

    /// Cleaned HTML rendition of the article body, if one can be found.
    ///
    /// # Errors
    ///
    /// Returns [`CurateError::Extract`] when the page cannot be processed.
    fn extract_html(&self, raw: &str) -> Result<Option<String>, CurateError> {
        extract::extract_article_html(raw)
    }

    /// Image URL declared in page metadata (Open Graph, Twitter cards,
    /// JSON-LD), resolved against `url`.
    ///
    /// # Errors
    ///
    /// Returns [`CurateError::Extract`] when the page cannot be processed.
    fn extract_metadata_image(&self, raw: &str, url: &str) -> Result<Option<String>, CurateError> {
        metadata::extract_metadata_image(raw, url)
    }
}

/// [`PageFetcher`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<Option<String>, CurateError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CurateError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(body))
    }
}

/// Compile a CSS selector, surfacing parse failures as extraction errors.
pub(crate) fn selector(css: &str) -> Result<scraper::Selector, CurateError> {
    scraper::Selector::parse(css)
        .map_err(|e| CurateError::Extract(format!("invalid selector {css:?}: {e}")))
}
