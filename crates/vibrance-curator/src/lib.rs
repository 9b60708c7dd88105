//! Positive-news curation pipeline for Vibrance.
//!
//! Reads configured RSS/Atom feeds, skips entries that are already stored,
//! gates the rest on sentiment from two text classifiers (binary sentiment and
//! multi-label emotion), enriches survivors with the full article body and a
//! hero image, and hands per-feed batches to an [`ArticleStore`].

pub mod classifier;
pub mod client;
pub mod dedup;
pub mod enrich;
pub mod error;
pub mod feed;
pub mod image;
pub mod page;
pub mod pipeline;
pub mod sanitize;
pub mod store;
pub mod types;

pub use classifier::{TeiClassifier, TextClassifier, ToneAnalyzer};
pub use client::build_http_client;
pub use dedup::DedupGate;
pub use enrich::{ContentEnricher, Enrichment};
pub use error::CurateError;
pub use feed::{parse_feed, FeedReader, HttpFeedReader};
pub use page::{HttpPageFetcher, PageFetcher};
pub use pipeline::{Curator, HttpCurator};
pub use sanitize::sanitize;
pub use store::{ArticleStore, MemoryArticleStore};
pub use types::{
    AnalysisResult, CuratorConfig, EntryLink, EntryOutcome, FeedReport, LabelScore,
    MediaDescriptor, RawEntry, RunReport, SkipReason,
};
