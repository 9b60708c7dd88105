//! Feed retrieval and conversion into [`RawEntry`] records.

use std::future::Future;

use feed_rs::model::Entry;

use crate::error::CurateError;
use crate::types::{EntryLink, MediaDescriptor, RawEntry};

/// Feed collaborator: turns a feed URL into entries.
pub trait FeedReader {
    /// Fetch and parse the feed at `url`.
    ///
    /// A malformed document is reported as [`CurateError::FeedParse`].
    fn fetch_entries(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Vec<RawEntry>, CurateError>> + Send;
}

/// [`FeedReader`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFeedReader {
    client: reqwest::Client,
}

impl HttpFeedReader {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl FeedReader for HttpFeedReader {
    async fn fetch_entries(&self, url: &str) -> Result<Vec<RawEntry>, CurateError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CurateError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        let entries = parse_feed(&body)?;
        tracing::debug!(url, entries = entries.len(), "parsed feed");
        Ok(entries)
    }
}

/// Parse an RSS, Atom, or JSON Feed document.
///
/// # Errors
///
/// Returns [`CurateError::FeedParse`] if the document is not a recognizable feed.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<RawEntry>, CurateError> {
    let feed = feed_rs::parser::parse(bytes)?;
    Ok(feed.entries.into_iter().map(raw_entry).collect())
}

fn raw_entry(entry: Entry) -> RawEntry {
    let link = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref().is_none_or(|rel| rel == "alternate"))
        .or_else(|| entry.links.first())
        .map(|l| l.href.clone());

    let author = entry
        .authors
        .iter()
        .map(|person| person.name.trim())
        .find(|name| !name.is_empty())
        .map(ToString::to_string);

    let media_content = entry
        .media
        .iter()
        .flat_map(|object| object.content.iter())
        // RSS enclosures land here too; an audio or video enclosure is not an image.
        .filter(|content| {
            content
                .content_type
                .as_ref()
                .is_none_or(|mime| mime.essence().to_string().starts_with("image/"))
        })
        .map(|content| MediaDescriptor {
            url: content.url.as_ref().map(ToString::to_string),
        })
        .collect();

    let media_thumbnails = entry
        .media
        .iter()
        .flat_map(|object| object.thumbnails.iter())
        .map(|thumbnail| MediaDescriptor {
            url: Some(thumbnail.image.uri.clone()),
        })
        .collect();

    let links = entry
        .links
        .iter()
        .map(|l| EntryLink {
            href: l.href.clone(),
            media_type: l.media_type.clone(),
        })
        .collect();

    RawEntry {
        link,
        title: entry.title.map(|t| t.content),
        author,
        summary_html: entry.summary.map(|t| t.content),
        content_html: entry.content.and_then(|c| c.body),
        published_at: entry.published,
        media_content,
        media_thumbnails,
        links,
    }
}
