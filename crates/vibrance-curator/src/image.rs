//! Representative-image resolution for feed entries and fetched pages.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

use crate::types::{MediaDescriptor, RawEntry};

static IMG_SRC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["']"#).expect("valid img src regex")
});

/// Path fragments that mark branding or UI chrome rather than article imagery.
const NON_HERO_MARKERS: &[&str] = &["logo", "icon", "avatar", "sprite"];

/// Pick an image for a feed entry from what the feed itself carries.
///
/// Order: first `media:content` URL, first `media:thumbnail` URL, first link
/// typed `image/*`, then the first `<img src>` in the summary HTML (or the
/// content HTML when the summary is empty).
#[must_use]
pub fn resolve_from_entry(
    entry: &RawEntry,
    summary_html: &str,
    content_html: &str,
) -> Option<String> {
    if let Some(url) = first_descriptor_url(&entry.media_content) {
        return Some(url);
    }

    if let Some(url) = first_descriptor_url(&entry.media_thumbnails) {
        return Some(url);
    }

    if let Some(link) = entry.links.iter().find(|link| {
        link.media_type
            .as_deref()
            .is_some_and(|media_type| media_type.starts_with("image/"))
            && !link.href.trim().is_empty()
    }) {
        return Some(link.href.trim().to_string());
    }

    let html = if summary_html.is_empty() {
        content_html
    } else {
        summary_html
    };
    img_sources(html).next()
}

/// Pick a hero image from article HTML.
///
/// Returns the first `<img src>` whose path does not look like a logo, icon,
/// avatar, or sprite. When every image looks like branding, the first one is
/// still better than nothing.
#[must_use]
pub fn resolve_from_html(html: &str) -> Option<String> {
    let candidates: Vec<String> = img_sources(html).collect();
    let first = candidates.first()?;

    let hero = candidates
        .iter()
        .find(|candidate| !looks_like_branding(candidate))
        .unwrap_or(first);
    Some(hero.clone())
}

fn first_descriptor_url(descriptors: &[MediaDescriptor]) -> Option<String> {
    descriptors
        .first()
        .and_then(|descriptor| descriptor.url.as_deref())
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(ToString::to_string)
}

fn img_sources(html: &str) -> impl Iterator<Item = String> + '_ {
    IMG_SRC_RE
        .captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|src| !src.is_empty())
}

fn looks_like_branding(candidate: &str) -> bool {
    let path = url_path(candidate).to_lowercase();
    NON_HERO_MARKERS.iter().any(|marker| path.contains(marker))
}

/// The path portion of an image URL. Relative references are already path-like
/// and only lose their query and fragment.
fn url_path(candidate: &str) -> String {
    let absolute = if candidate.starts_with("//") {
        Url::parse(&format!("https:{candidate}"))
    } else {
        Url::parse(candidate)
    };

    match absolute {
        Ok(url) => url.path().to_string(),
        Err(_) => candidate
            .split(['?', '#'])
            .next()
            .unwrap_or(candidate)
            .to_string(),
    }
}
