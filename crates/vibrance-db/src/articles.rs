//! Database operations for the `articles` table.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use vibrance_core::CuratedArticle;

use crate::DbError;

/// Rows per multi-row `INSERT`. 15 bound columns per row keeps each statement
/// well under Postgres' 65535 bind-parameter limit.
const INSERT_CHUNK_SIZE: usize = 1000;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `articles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleRow {
    pub id: i64,
    pub title: String,
    pub author: Option<String>,
    pub source: String,
    pub url: String,
    pub summary: String,
    pub content_html: String,
    pub image_url: Option<String>,
    pub sentiment_label: String,
    pub sentiment_score: f64,
    pub top_emotions: Vec<String>,
    pub positivity_score: f64,
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const ARTICLE_COLUMNS: &str = "id, title, author, source, url, summary, content_html, image_url, \
     sentiment_label, sentiment_score, top_emotions, positivity_score, tags, \
     published_at, published, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Return `true` if at least one article with exactly this URL is stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn article_exists_by_url(pool: &PgPool, url: &str) -> Result<bool, DbError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM articles WHERE url = $1)")
        .bind(url)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// Insert a batch of curated articles in one transaction.
///
/// Either every article is stored or none is. Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails; the transaction is rolled back.
pub async fn insert_articles(pool: &PgPool, articles: &[CuratedArticle]) -> Result<u64, DbError> {
    if articles.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0_u64;

    for chunk in articles.chunks(INSERT_CHUNK_SIZE) {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "INSERT INTO articles \
                 (title, author, source, url, summary, content_html, image_url, \
                  sentiment_label, sentiment_score, top_emotions, positivity_score, tags, \
                  published_at, published, updated_at) ",
        );
        builder.push_values(chunk, |mut row, article| {
            row.push_bind(&article.title)
                .push_bind(&article.author)
                .push_bind(&article.source)
                .push_bind(&article.url)
                .push_bind(&article.summary)
                .push_bind(&article.content_html)
                .push_bind(&article.image_url)
                .push_bind(article.sentiment_label.as_str())
                .push_bind(article.sentiment_score)
                .push_bind(&article.top_emotions)
                .push_bind(article.positivity_score)
                .push_bind(&article.tags)
                .push_bind(article.published_at)
                .push_bind(article.published)
                .push("NOW()");
        });

        let result = builder.build().execute(&mut *tx).await?;
        inserted += result.rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

/// Delete every stored article. Returns the number of rows removed.
///
/// Only used for the explicit full reset before a curation run.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_all_articles(pool: &PgPool) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM articles").execute(pool).await?;
    Ok(result.rows_affected())
}

/// Count stored articles.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_articles(pool: &PgPool) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// List published articles with `positivity_score >= min_positivity`.
///
/// Results are ordered by `positivity_score DESC`, then `published_at DESC`,
/// then `id DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_published_articles(
    pool: &PgPool,
    min_positivity: f64,
    limit: i64,
) -> Result<Vec<ArticleRow>, DbError> {
    let rows = sqlx::query_as::<_, ArticleRow>(&format!(
        "SELECT {ARTICLE_COLUMNS} \
         FROM articles \
         WHERE published = true AND positivity_score >= $1 \
         ORDER BY positivity_score DESC, published_at DESC, id DESC \
         LIMIT $2"
    ))
    .bind(min_positivity)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
