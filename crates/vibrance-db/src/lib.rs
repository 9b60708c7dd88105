use std::collections::HashSet;
use std::time::{Duration, Instant};

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use vibrance_core::AppConfig;

// Path relative to crates/vibrance-db/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Postgres `undefined_table`, raised before the first migration has run.
const UNDEFINED_TABLE: &str = "42P01";

/// Pool sizing, taken from [`AppConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            // A minimum above the maximum would make the pool refuse to start.
            min_connections: config.db_min_connections.min(config.db_max_connections),
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Open the article store's connection pool.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the connection cannot be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await
}

/// Versions of the embedded migrations the database has not recorded yet.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the migration ledger cannot be read.
pub async fn pending_migrations(pool: &PgPool) -> Result<Vec<i64>, DbError> {
    let applied: HashSet<i64> = match sqlx::query_scalar::<_, i64>(
        "SELECT version FROM _sqlx_migrations WHERE success",
    )
    .fetch_all(pool)
    .await
    {
        Ok(versions) => versions.into_iter().collect(),
        Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNDEFINED_TABLE) => {
            HashSet::new()
        }
        Err(e) => return Err(e.into()),
    };

    Ok(MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
        .map(|m| m.version)
        .filter(|version| !applied.contains(version))
        .collect())
}

/// Apply every pending migration, returning how many were applied.
///
/// # Errors
///
/// Returns [`DbError`] if the ledger cannot be read or a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, DbError> {
    let pending = pending_migrations(pool).await?;
    MIGRATOR.run(pool).await?;
    Ok(pending.len())
}

/// Round-trip a trivial query and report how long it took.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the database cannot be reached.
pub async fn health_check(pool: &PgPool) -> Result<Duration, DbError> {
    let started = Instant::now();
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(started.elapsed())
}

pub mod articles;

pub use articles::{
    article_exists_by_url, count_articles, delete_all_articles, insert_articles,
    list_published_articles, ArticleRow,
};
