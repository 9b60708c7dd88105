//! `curate` command: run the pipeline against Postgres.
//!
//! Per-feed failures are reported in the summary table and do not change the
//! exit status; only configuration, connection, and reset failures do.

use sqlx::PgPool;
use vibrance_core::{AppConfig, CuratedArticle, FeedSource, FeedsFile};
use vibrance_curator::{ArticleStore, CurateError, CuratorConfig, HttpCurator, RunReport};
use vibrance_db::DbError;

/// [`ArticleStore`] backed by the `articles` table.
pub(crate) struct PgArticleStore {
    pool: PgPool,
}

impl PgArticleStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn store_error(error: DbError) -> CurateError {
    CurateError::Store(error.to_string())
}

impl ArticleStore for PgArticleStore {
    async fn exists_by_url(&self, url: &str) -> Result<bool, CurateError> {
        vibrance_db::article_exists_by_url(&self.pool, url)
            .await
            .map_err(store_error)
    }

    async fn insert_batch(&self, articles: &[CuratedArticle]) -> Result<u64, CurateError> {
        vibrance_db::insert_articles(&self.pool, articles)
            .await
            .map_err(store_error)
    }

    async fn delete_all(&self) -> Result<u64, CurateError> {
        vibrance_db::delete_all_articles(&self.pool)
            .await
            .map_err(store_error)
    }
}

/// Pick the feeds to process: all of them, or the single feed named by
/// `feed_filter`.
pub(crate) fn select_feeds(
    feeds_file: FeedsFile,
    feed_filter: Option<&str>,
) -> anyhow::Result<Vec<FeedSource>> {
    let Some(name) = feed_filter else {
        return Ok(feeds_file.feeds);
    };
    let feed = feeds_file.find(name).cloned().ok_or_else(|| {
        anyhow::anyhow!("feed '{name}' is not configured; run `feeds` to list them")
    })?;
    Ok(vec![feed])
}

/// Curate the configured feeds into the database.
///
/// # Errors
///
/// Returns an error if the feeds file cannot be loaded, the named feed does
/// not exist, the HTTP client cannot be built, or the reset fails.
pub(crate) async fn run_curate(
    pool: &PgPool,
    config: &AppConfig,
    feed_filter: Option<&str>,
    threshold: Option<f64>,
    reset: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let feeds_file = vibrance_core::load_feeds(&config.feeds_path)?;
    let feeds = select_feeds(feeds_file, feed_filter)?;

    let mut curator_config = CuratorConfig::from_app_config(config);
    if let Some(threshold) = threshold {
        curator_config.positivity_threshold = threshold;
    }

    tracing::info!(
        feeds = feeds.len(),
        threshold = curator_config.positivity_threshold,
        reset,
        dry_run,
        "starting curation run"
    );

    let store = PgArticleStore::new(pool.clone());
    let curator = HttpCurator::from_config(&curator_config, store)?.with_dry_run(dry_run);
    let report = curator.run(&feeds, reset).await?;

    print_report(&report, dry_run);
    Ok(())
}

fn print_report(report: &RunReport, dry_run: bool) {
    if let Some(deleted) = report.reset_deleted {
        if dry_run {
            println!("dry-run: would reset the article collection");
        } else {
            println!("reset: deleted {deleted} article(s)");
        }
    }

    println!(
        "{:<32}{:>9}{:>9}{:>10}{:>10}{:>12}",
        "FEED", "ENTRIES", "CURATED", "INSERTED", "EXISTING", "NOT POSITIVE"
    );
    for feed in &report.feeds {
        if let Some(error) = &feed.error {
            println!("{:<32}FAILED: {error}", feed.feed);
            continue;
        }
        println!(
            "{:<32}{:>9}{:>9}{:>10}{:>10}{:>12}",
            feed.feed,
            feed.entries,
            feed.curated,
            feed.inserted,
            feed.skipped_existing,
            feed.skipped_not_positive
        );
    }

    if dry_run {
        println!(
            "dry-run: would insert {} article(s) from {} feed(s); {} feed(s) failed",
            report.total_curated(),
            report.feeds.len(),
            report.failed_feeds()
        );
    } else {
        println!(
            "inserted {} article(s) from {} feed(s); {} feed(s) failed",
            report.total_inserted(),
            report.feeds.len(),
            report.failed_feeds()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(name: &str) -> FeedSource {
        FeedSource {
            name: name.to_string(),
            url: format!("https://{name}.example.com/rss"),
        }
    }

    fn file(names: &[&str]) -> FeedsFile {
        FeedsFile {
            feeds: names.iter().map(|name| feed(name)).collect(),
        }
    }

    #[test]
    fn select_feeds_without_filter_keeps_all() {
        let feeds = select_feeds(file(&["a", "b"]), None).unwrap();
        assert_eq!(feeds.len(), 2);
    }

    #[test]
    fn select_feeds_matches_case_insensitively() {
        let feeds = select_feeds(file(&["Mindful", "Other"]), Some("mindful")).unwrap();
        assert_eq!(feeds, vec![feed("Mindful")]);
    }

    #[test]
    fn select_feeds_unknown_name_is_error() {
        let err = select_feeds(file(&["a"]), Some("zzz")).unwrap_err();
        assert!(err.to_string().contains("zzz"));
    }
}
