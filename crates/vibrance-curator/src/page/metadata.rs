//! Image URLs declared in page metadata.

use reqwest::Url;
use scraper::Html;
use serde_json::Value;

use super::selector;
use crate::error::CurateError;

/// `(selector, attribute)` pairs checked in order.
const META_IMAGE_TAGS: &[(&str, &str)] = &[
    ("meta[property='og:image']", "content"),
    ("meta[property='og:image:url']", "content"),
    ("meta[property='og:image:secure_url']", "content"),
    ("meta[name='twitter:image']", "content"),
    ("meta[property='twitter:image']", "content"),
    ("meta[name='twitter:image:src']", "content"),
    ("link[rel='image_src']", "href"),
];

/// Find the page's declared image and resolve it against `page_url`.
///
/// Open Graph and Twitter card tags win over JSON-LD. Within JSON-LD, the
/// `image` of an article-typed node is preferred over any other node's.
/// Candidates that do not resolve to an http(s) URL are ignored.
///
/// # Errors
///
/// Returns [`CurateError::Extract`] if a built-in selector fails to compile.
pub fn extract_metadata_image(raw: &str, page_url: &str) -> Result<Option<String>, CurateError> {
    let document = Html::parse_document(raw);
    let base = Url::parse(page_url).ok();

    for (css, attr) in META_IMAGE_TAGS {
        let tags = selector(css)?;
        let found = document
            .select(&tags)
            .filter_map(|tag| tag.value().attr(attr))
            .find_map(|candidate| resolve(candidate, base.as_ref()));
        if found.is_some() {
            return Ok(found);
        }
    }

    let scripts = selector("script[type='application/ld+json']")?;
    let mut article_images = Vec::new();
    let mut other_images = Vec::new();
    for script in document.select(&scripts) {
        let raw_json = script.text().collect::<String>();
        let Ok(value) = serde_json::from_str::<Value>(raw_json.trim()) else {
            continue;
        };
        collect_json_ld_images(&value, &mut article_images, &mut other_images);
    }

    Ok(article_images
        .iter()
        .chain(other_images.iter())
        .find_map(|candidate| resolve(candidate, base.as_ref())))
}

fn resolve(candidate: &str, base: Option<&Url>) -> Option<String> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }
    let url = match Url::parse(candidate) {
        Ok(url) => url,
        Err(_) => base?.join(candidate).ok()?,
    };
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

fn collect_json_ld_images(value: &Value, articles: &mut Vec<String>, others: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(image) = map.get("image") {
                let target = if looks_like_article_node(map.get("@type")) {
                    &mut *articles
                } else {
                    &mut *others
                };
                image_urls(image, target);
            }
            for (key, child) in map {
                if key != "image" {
                    collect_json_ld_images(child, articles, others);
                }
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_json_ld_images(child, articles, others);
            }
        }
        _ => {}
    }
}

/// JSON-LD `image` may be a URL string, an `ImageObject`, or a list of either.
fn image_urls(image: &Value, out: &mut Vec<String>) {
    match image {
        Value::String(url) => out.push(url.clone()),
        Value::Object(map) => {
            if let Some(url) = map
                .get("url")
                .or_else(|| map.get("contentUrl"))
                .and_then(Value::as_str)
            {
                out.push(url.to_string());
            }
        }
        Value::Array(items) => {
            for item in items {
                image_urls(item, out);
            }
        }
        _ => {}
    }
}

fn looks_like_article_node(node_type: Option<&Value>) -> bool {
    let is_article = |s: &str| {
        let lower = s.to_lowercase();
        lower.contains("article") || lower.contains("blogposting") || lower.contains("report")
    };
    match node_type {
        Some(Value::String(s)) => is_article(s),
        Some(Value::Array(values)) => values.iter().filter_map(Value::as_str).any(is_article),
        _ => false,
    }
}
