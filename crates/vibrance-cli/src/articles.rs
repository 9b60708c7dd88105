//! Read-only listing commands.

use vibrance_core::AppConfig;

/// Shorten `text` to `max` characters, marking the cut with `...`.
pub(crate) fn truncate_display(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Print published articles at or above `min_positivity`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_articles_list(
    pool: &sqlx::PgPool,
    min_positivity: f64,
    limit: i64,
) -> anyhow::Result<()> {
    let articles = vibrance_db::list_published_articles(pool, min_positivity, limit).await?;

    if articles.is_empty() {
        println!("no articles with positivity >= {min_positivity:.2}; run `curate` first");
        return Ok(());
    }

    println!(
        "{:<8}{:<12}{:<24}{:<22}TITLE",
        "SCORE", "PUBLISHED", "SOURCE", "EMOTIONS"
    );
    for article in &articles {
        println!(
            "{:<8.3}{:<12}{:<24}{:<22}{}",
            article.positivity_score,
            article.published_at.format("%Y-%m-%d"),
            truncate_display(&article.source, 22),
            article.top_emotions.join(", "),
            truncate_display(&article.title, 60)
        );
    }

    Ok(())
}

/// Print the configured feed sources.
///
/// # Errors
///
/// Returns an error if the feeds file cannot be read or is invalid.
pub(crate) fn run_feeds_list(config: &AppConfig) -> anyhow::Result<()> {
    let feeds_file = vibrance_core::load_feeds(&config.feeds_path)?;
    println!("{:<32}URL", "NAME");
    for feed in &feeds_file.feeds {
        println!("{:<32}{}", feed.name, feed.url);
    }
    Ok(())
}
