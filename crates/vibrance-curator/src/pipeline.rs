//! Per-feed, per-entry curation.
//!
//! Each entry moves through dedup check, sentiment gate, image resolution,
//! enrichment and assembly, or leaves early with a [`SkipReason`]. Curated
//! articles are collected per feed and persisted in one batch once the feed
//! has been fully processed.

use chrono::Utc;
use vibrance_core::{CuratedArticle, FeedSource, SentimentLabel};

use crate::classifier::{TeiClassifier, TextClassifier, ToneAnalyzer};
use crate::client::build_http_client;
use crate::dedup::DedupGate;
use crate::enrich::ContentEnricher;
use crate::error::CurateError;
use crate::feed::{FeedReader, HttpFeedReader};
use crate::image;
use crate::page::{HttpPageFetcher, PageFetcher};
use crate::sanitize::sanitize;
use crate::store::ArticleStore;
use crate::types::{CuratorConfig, EntryOutcome, FeedReport, RawEntry, RunReport, SkipReason};

/// The curation pipeline, generic over its collaborators.
pub struct Curator<R, C, P, A> {
    feeds: R,
    analyzer: ToneAnalyzer<C>,
    enricher: ContentEnricher<P>,
    store: A,
    threshold: f64,
    dry_run: bool,
}

/// Curator wired to live HTTP feeds, TEI classifiers and page fetches.
pub type HttpCurator<A> = Curator<HttpFeedReader, TeiClassifier, HttpPageFetcher, A>;

impl<A: ArticleStore + Sync> HttpCurator<A> {
    /// Build the HTTP-backed curator. All outbound requests share one client.
    ///
    /// # Errors
    ///
    /// Returns [`CurateError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &CuratorConfig, store: A) -> Result<Self, CurateError> {
        let client = build_http_client(config.request_timeout_secs, &config.user_agent)?;
        let analyzer = ToneAnalyzer::new(
            TeiClassifier::new(client.clone(), &config.sentiment_model_url),
            TeiClassifier::new(client.clone(), &config.emotion_model_url),
        );
        Ok(Curator::new(
            HttpFeedReader::new(client.clone()),
            analyzer,
            ContentEnricher::new(HttpPageFetcher::new(client)),
            store,
            config.positivity_threshold,
        ))
    }
}

impl<R, C, P, A> Curator<R, C, P, A>
where
    R: FeedReader + Sync,
    C: TextClassifier + Sync,
    P: PageFetcher + Sync,
    A: ArticleStore + Sync,
{
    #[must_use]
    pub fn new(
        feeds: R,
        analyzer: ToneAnalyzer<C>,
        enricher: ContentEnricher<P>,
        store: A,
        threshold: f64,
    ) -> Self {
        Self {
            feeds,
            analyzer,
            enricher,
            store,
            threshold,
            dry_run: false,
        }
    }

    /// When set, curated batches are reported but never inserted.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn store(&self) -> &A {
        &self.store
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Curate every feed in order.
    ///
    /// With `reset`, the store is emptied before the first feed is read. A
    /// feed that fails is recorded in its [`FeedReport`] and the run moves on.
    ///
    /// # Errors
    ///
    /// Only a failed reset aborts the run.
    pub async fn run(&self, feeds: &[FeedSource], reset: bool) -> Result<RunReport, CurateError> {
        let mut report = RunReport::default();

        if reset {
            let deleted = if self.dry_run {
                0
            } else {
                self.store.delete_all().await?
            };
            tracing::info!(deleted, dry_run = self.dry_run, "reset article collection");
            report.reset_deleted = Some(deleted);
        }

        let mut gate = DedupGate::new(&self.store);
        for source in feeds {
            tracing::info!(feed = %source.name, url = %source.url, "processing feed");
            let mut feed_report = FeedReport::new(&source.name);
            if let Err(e) = self.process_feed(source, &mut feed_report, &mut gate).await {
                tracing::error!(feed = %source.name, error = %e, "feed processing failed");
                feed_report.error = Some(e.to_string());
            }
            report.feeds.push(feed_report);
        }

        tracing::info!(
            feeds = report.feeds.len(),
            inserted = report.total_inserted(),
            failed = report.failed_feeds(),
            "curation run complete"
        );
        Ok(report)
    }

    /// Curate one feed into a single batch. URLs claimed for the batch are
    /// released again if the feed is abandoned, so later feeds may still
    /// curate them.
    async fn process_feed(
        &self,
        source: &FeedSource,
        report: &mut FeedReport,
        gate: &mut DedupGate<'_, A>,
    ) -> Result<(), CurateError> {
        let entries = self.feeds.fetch_entries(&source.url).await?;
        report.entries = entries.len();

        let mut batch: Vec<CuratedArticle> = Vec::new();
        for entry in &entries {
            match self.process_entry(source, entry, gate).await {
                Ok(EntryOutcome::Skipped(reason)) => report.record_skip(reason),
                Ok(EntryOutcome::Curated(article)) => {
                    gate.claim(&article.url);
                    batch.push(*article);
                }
                Err(e) => {
                    gate.release(batch.iter().map(|a| a.url.as_str()));
                    return Err(e);
                }
            }
        }
        report.curated = batch.len();

        if batch.is_empty() {
            tracing::info!(feed = %source.name, "no new positive articles");
            return Ok(());
        }
        if self.dry_run {
            tracing::info!(feed = %source.name, curated = batch.len(), "dry run; batch not persisted");
            return Ok(());
        }

        report.inserted = match self.store.insert_batch(&batch).await {
            Ok(inserted) => inserted,
            Err(e) => {
                gate.release(batch.iter().map(|a| a.url.as_str()));
                return Err(e);
            }
        };
        tracing::info!(feed = %source.name, inserted = report.inserted, "inserted positive articles");
        Ok(())
    }

    /// Run one entry through the curation states.
    ///
    /// # Errors
    ///
    /// Store and classifier failures propagate; the caller abandons the feed.
    pub async fn process_entry(
        &self,
        source: &FeedSource,
        entry: &RawEntry,
        gate: &DedupGate<'_, A>,
    ) -> Result<EntryOutcome, CurateError> {
        let title = entry.title.as_deref().map(str::trim).unwrap_or_default();
        let link = entry.link.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() || link.is_empty() {
            tracing::debug!(feed = %source.name, title, link, "skipping incomplete entry");
            return Ok(EntryOutcome::Skipped(SkipReason::Incomplete));
        }

        if gate.exists(link).await? {
            tracing::info!(url = link, "skipping existing article");
            return Ok(EntryOutcome::Skipped(SkipReason::AlreadyCurated));
        }

        let summary_html = entry.summary_html.as_deref().unwrap_or_default();
        let content_html = entry
            .content_html
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(summary_html);
        let summary = sanitize(Some(summary_html));
        let text = if summary.is_empty() { title } else { summary.as_str() };

        let analysis = self.analyzer.analyze(text).await?;
        if analysis.sentiment_label != SentimentLabel::Positive
            || analysis.sentiment_score < self.threshold
        {
            tracing::info!(
                title,
                label = %analysis.sentiment_label,
                score = analysis.sentiment_score,
                threshold = self.threshold,
                "skipping article not positive enough"
            );
            return Ok(EntryOutcome::Skipped(SkipReason::NotPositiveEnough));
        }

        let entry_image = image::resolve_from_entry(entry, summary_html, content_html);
        let enrichment = self.enricher.enrich(link, entry_image).await;

        let article = CuratedArticle {
            title: title.to_string(),
            author: entry
                .author
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(ToString::to_string),
            source: source.name.clone(),
            url: link.to_string(),
            summary,
            content_html: enrichment
                .full_html
                .unwrap_or_else(|| content_html.to_string()),
            image_url: enrichment.image_url,
            sentiment_label: analysis.sentiment_label,
            sentiment_score: analysis.sentiment_score,
            top_emotions: analysis.top_emotions,
            positivity_score: analysis.positivity_score,
            tags: Vec::new(),
            published_at: entry.published_at.unwrap_or_else(Utc::now),
            published: true,
        };
        tracing::debug!(url = %article.url, emotions = ?article.top_emotions, "curated article");
        Ok(EntryOutcome::Curated(Box::new(article)))
    }
}
