//! Article-body extraction from a fetched page.

use dom_smoothie::{Config, Readability};

use crate::error::CurateError;

/// Element budget for one page; larger documents are rejected by the parser.
const MAX_ELEMENTS: usize = 9000;

/// Extract a cleaned HTML rendition of the article body.
///
/// Runs Readability over the page: the highest-scoring content container is
/// kept with its paragraphs, bare text runs and images, while navigation,
/// sidebars, footers and forms are dropped. Relative links are left as found;
/// callers resolve them against the page URL.
///
/// Returns `Ok(None)` when the page has no readable body text.
///
/// # Errors
///
/// Returns [`CurateError::Extract`] if Readability cannot process the page.
pub fn extract_article_html(raw: &str) -> Result<Option<String>, CurateError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let cfg = Config {
        max_elements_to_parse: MAX_ELEMENTS,
        ..Default::default()
    };
    let mut readability = Readability::new(raw, None, Some(cfg))
        .map_err(|e| CurateError::Extract(format!("readability setup failed: {e}")))?;
    let article = readability
        .parse()
        .map_err(|e| CurateError::Extract(format!("readability parse failed: {e}")))?;

    if article.text_content.trim().is_empty() {
        return Ok(None);
    }
    let html = article.content.to_string();
    Ok((!html.trim().is_empty()).then_some(html))
}
