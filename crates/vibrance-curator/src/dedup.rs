//! URL-based deduplication against the article store.

use std::collections::HashSet;

use crate::error::CurateError;
use crate::store::ArticleStore;

/// Decides whether an entry's URL has already been curated.
///
/// Besides the store, the gate remembers URLs claimed by entries queued
/// earlier in the same run: those are not stored until their feed's batch is
/// inserted (or never, in a dry run), so the store alone would let a repeated
/// link through twice.
pub struct DedupGate<'s, A> {
    store: &'s A,
    claimed: HashSet<String>,
}

impl<'s, A: ArticleStore + Sync> DedupGate<'s, A> {
    #[must_use]
    pub fn new(store: &'s A) -> Self {
        Self {
            store,
            claimed: HashSet::new(),
        }
    }

    /// `true` if `url` is stored or already claimed in this run.
    ///
    /// An empty URL is never a duplicate and never reaches the store.
    ///
    /// # Errors
    ///
    /// Propagates the store's error from the existence query.
    pub async fn exists(&self, url: &str) -> Result<bool, CurateError> {
        if url.is_empty() {
            return Ok(false);
        }
        if self.claimed.contains(url) {
            return Ok(true);
        }
        self.store.exists_by_url(url).await
    }

    /// Record that `url` is queued for insertion in this run.
    pub fn claim(&mut self, url: &str) {
        self.claimed.insert(url.to_string());
    }

    /// Forget claims for a batch that will not be persisted.
    pub fn release<'u>(&mut self, urls: impl IntoIterator<Item = &'u str>) {
        for url in urls {
            self.claimed.remove(url);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use vibrance_core::{CuratedArticle, SentimentLabel};

    use super::*;
    use crate::store::MemoryArticleStore;

    fn article(url: &str) -> CuratedArticle {
        CuratedArticle {
            title: "t".to_string(),
            author: None,
            source: "s".to_string(),
            url: url.to_string(),
            summary: String::new(),
            content_html: String::new(),
            image_url: None,
            sentiment_label: SentimentLabel::Positive,
            sentiment_score: 0.9,
            top_emotions: vec![],
            positivity_score: 0.9,
            tags: vec![],
            published_at: Utc::now(),
            published: true,
        }
    }

    #[tokio::test]
    async fn empty_url_is_not_a_duplicate() {
        let store = MemoryArticleStore::new();
        store.insert_batch(&[article("")]).await.unwrap();
        let gate = DedupGate::new(&store);
        assert!(!gate.exists("").await.unwrap());
    }

    #[tokio::test]
    async fn stored_url_is_a_duplicate() {
        let store = MemoryArticleStore::new();
        store
            .insert_batch(&[article("https://example.com/a")])
            .await
            .unwrap();
        let gate = DedupGate::new(&store);
        assert!(gate.exists("https://example.com/a").await.unwrap());
        assert!(!gate.exists("https://example.com/b").await.unwrap());
    }

    #[tokio::test]
    async fn claimed_url_is_a_duplicate_before_insert() {
        let store = MemoryArticleStore::new();
        let mut gate = DedupGate::new(&store);
        assert!(!gate.exists("https://example.com/a").await.unwrap());
        gate.claim("https://example.com/a");
        assert!(gate.exists("https://example.com/a").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn released_url_is_no_longer_a_duplicate() {
        let store = MemoryArticleStore::new();
        let mut gate = DedupGate::new(&store);
        gate.claim("https://example.com/a");
        gate.claim("https://example.com/b");
        gate.release(["https://example.com/a"]);
        assert!(!gate.exists("https://example.com/a").await.unwrap());
        assert!(gate.exists("https://example.com/b").await.unwrap());
    }

    #[tokio::test]
    async fn match_is_exact() {
        let store = MemoryArticleStore::new();
        store
            .insert_batch(&[article("https://example.com/a")])
            .await
            .unwrap();
        let gate = DedupGate::new(&store);
        assert!(!gate.exists("https://example.com/a/").await.unwrap());
        assert!(!gate.exists("HTTPS://EXAMPLE.COM/a").await.unwrap());
    }
}
