//! Persistence seam for curated articles.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use vibrance_core::CuratedArticle;

use crate::error::CurateError;

/// Document store the pipeline persists into.
pub trait ArticleStore {
    /// Whether an article with exactly this URL is already stored.
    fn exists_by_url(&self, url: &str) -> impl Future<Output = Result<bool, CurateError>> + Send;

    /// Store a batch atomically, returning the number of articles written.
    fn insert_batch(
        &self,
        articles: &[CuratedArticle],
    ) -> impl Future<Output = Result<u64, CurateError>> + Send;

    /// Remove every stored article, returning how many were removed.
    fn delete_all(&self) -> impl Future<Output = Result<u64, CurateError>> + Send;
}

/// In-process store backed by a `Vec`, for tests and local experiments.
#[derive(Debug, Default)]
pub struct MemoryArticleStore {
    articles: Mutex<Vec<CuratedArticle>>,
}

impl MemoryArticleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored article, in insertion order.
    #[must_use]
    pub fn articles(&self) -> Vec<CuratedArticle> {
        self.articles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.articles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArticleStore for MemoryArticleStore {
    async fn exists_by_url(&self, url: &str) -> Result<bool, CurateError> {
        Ok(self
            .articles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|article| article.url == url))
    }

    async fn insert_batch(&self, articles: &[CuratedArticle]) -> Result<u64, CurateError> {
        self.articles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(articles);
        Ok(articles.len() as u64)
    }

    async fn delete_all(&self) -> Result<u64, CurateError> {
        let mut articles = self.articles.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = articles.len() as u64;
        articles.clear();
        Ok(removed)
    }
}
