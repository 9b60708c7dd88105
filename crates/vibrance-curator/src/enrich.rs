//! Full-page enrichment of curated entries.

use reqwest::Url;

use crate::image;
use crate::page::PageFetcher;

/// Outcome of enriching one article URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    /// Cleaned article body, when the page could be fetched and extracted.
    pub full_html: Option<String>,
    /// Best image found, falling back to the one passed in.
    pub image_url: Option<String>,
}

/// Replaces feed-supplied content and imagery with richer full-page
/// equivalents where the page provides them.
#[derive(Debug, Clone)]
pub struct ContentEnricher<P> {
    pages: P,
}

impl<P: PageFetcher + Sync> ContentEnricher<P> {
    #[must_use]
    pub fn new(pages: P) -> Self {
        Self { pages }
    }

    /// Enrich the article at `url`. Never fails: each step falls back to the
    /// best value known before it.
    ///
    /// 1. Fetch the page. On failure or an empty body, return `existing_image`
    ///    and no HTML.
    /// 2. Extract the article body; failure leaves the HTML absent.
    /// 3. A hero image in the extracted body overrides `existing_image`.
    /// 4. Only when there is still no image, the page metadata image is used.
    pub async fn enrich(&self, url: &str, existing_image: Option<String>) -> Enrichment {
        let raw = match self.pages.fetch(url).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(url, "empty page body; keeping feed content");
                return Enrichment {
                    full_html: None,
                    image_url: existing_image,
                };
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "page fetch failed; keeping feed content");
                return Enrichment {
                    full_html: None,
                    image_url: existing_image,
                };
            }
        };

        let full_html = match self.pages.extract_html(&raw) {
            Ok(html) => html.filter(|h| !h.trim().is_empty()),
            Err(e) => {
                tracing::warn!(url, error = %e, "article extraction failed");
                None
            }
        };

        let mut image_url = existing_image;
        if let Some(hero) = image::resolve_from_html(full_html.as_deref().unwrap_or_default()) {
            image_url = Some(absolutize(&hero, url));
        } else if image_url.is_none() {
            match self.pages.extract_metadata_image(&raw, url) {
                Ok(Some(meta)) => image_url = Some(meta),
                Ok(None) => {}
                Err(e) => tracing::debug!(url, error = %e, "metadata image extraction failed"),
            }
        }

        Enrichment {
            full_html,
            image_url,
        }
    }
}

/// Resolve an image reference found in page HTML against the page URL.
/// References that cannot be resolved are returned unchanged.
fn absolutize(src: &str, page_url: &str) -> String {
    Url::parse(page_url)
        .and_then(|base| base.join(src))
        .map_or_else(|_| src.to_string(), |resolved| resolved.to_string())
}
