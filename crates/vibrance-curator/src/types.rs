use chrono::{DateTime, Utc};
use serde::Deserialize;
use vibrance_core::{AppConfig, CuratedArticle, SentimentLabel};

/// A media descriptor attached to a feed entry (`media:content`,
/// `media:thumbnail`, or an enclosure). The URL may be missing in sloppy feeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaDescriptor {
    pub url: Option<String>,
}

/// An entry-level `<link>` with its declared MIME type, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryLink {
    pub href: String,
    pub media_type: Option<String>,
}

/// One entry as delivered by a feed, before curation.
///
/// Every field is optional because feed dialects disagree on what they carry.
#[derive(Debug, Clone, Default)]
pub struct RawEntry {
    pub link: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub summary_html: Option<String>,
    pub content_html: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub media_content: Vec<MediaDescriptor>,
    pub media_thumbnails: Vec<MediaDescriptor>,
    pub links: Vec<EntryLink>,
}

/// A single `(label, confidence)` pair as returned by a text classifier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Sentiment and emotion read of a text snippet.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub sentiment_label: SentimentLabel,
    /// Confidence of `sentiment_label`, in `[0, 1]`.
    pub sentiment_score: f64,
    /// At most two emotion labels, most confident first.
    pub top_emotions: Vec<String>,
    /// `sentiment_score` for POSITIVE, `1 - sentiment_score` for NEGATIVE.
    pub positivity_score: f64,
}

/// Settings for building the HTTP-backed curator.
#[derive(Debug, Clone)]
pub struct CuratorConfig {
    pub sentiment_model_url: String,
    pub emotion_model_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub positivity_threshold: f64,
}

impl CuratorConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            sentiment_model_url: config.sentiment_model_url.clone(),
            emotion_model_url: config.emotion_model_url.clone(),
            request_timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            positivity_threshold: config.positivity_threshold,
        }
    }
}

/// Why an entry left the pipeline without becoming an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry has no title or no link.
    Incomplete,
    /// The URL is already stored, or was queued earlier in this run.
    AlreadyCurated,
    /// Label is not POSITIVE, or its confidence is below the threshold.
    NotPositiveEnough,
}

/// Terminal state of one entry.
#[derive(Debug, Clone)]
pub enum EntryOutcome {
    Skipped(SkipReason),
    Curated(Box<CuratedArticle>),
}

/// What happened to one feed during a run.
#[derive(Debug, Clone, Default)]
pub struct FeedReport {
    pub feed: String,
    pub entries: usize,
    pub skipped_incomplete: usize,
    pub skipped_existing: usize,
    pub skipped_not_positive: usize,
    /// Articles that passed every gate, persisted or not.
    pub curated: usize,
    pub inserted: u64,
    /// Set when the feed was abandoned; nothing from it was persisted.
    pub error: Option<String>,
}

impl FeedReport {
    #[must_use]
    pub fn new(feed: &str) -> Self {
        Self {
            feed: feed.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Incomplete => self.skipped_incomplete += 1,
            SkipReason::AlreadyCurated => self.skipped_existing += 1,
            SkipReason::NotPositiveEnough => self.skipped_not_positive += 1,
        }
    }

    #[must_use]
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Summary of a whole curation run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Rows removed by the reset, when one was requested.
    pub reset_deleted: Option<u64>,
    pub feeds: Vec<FeedReport>,
}

impl RunReport {
    #[must_use]
    pub fn total_inserted(&self) -> u64 {
        self.feeds.iter().map(|f| f.inserted).sum()
    }

    #[must_use]
    pub fn total_curated(&self) -> usize {
        self.feeds.iter().map(|f| f.curated).sum()
    }

    #[must_use]
    pub fn failed_feeds(&self) -> usize {
        self.feeds.iter().filter(|f| f.failed()).count()
    }
}
