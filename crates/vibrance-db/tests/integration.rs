//! Offline unit tests for vibrance-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use vibrance_core::{AppConfig, Environment};
use vibrance_db::{ArticleRow, PoolConfig};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        feeds_path: PathBuf::from("./config/feeds.yaml"),
        positivity_threshold: 0.85,
        sentiment_model_url: "http://localhost:8081".to_string(),
        emotion_model_url: "http://localhost:8082".to_string(),
        request_timeout_secs: 30,
        user_agent: "ua".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn pool_config_never_asks_for_more_idle_than_max_connections() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        feeds_path: PathBuf::from("./config/feeds.yaml"),
        positivity_threshold: 0.85,
        sentiment_model_url: "http://localhost:8081".to_string(),
        emotion_model_url: "http://localhost:8082".to_string(),
        request_timeout_secs: 30,
        user_agent: "ua".to_string(),
        db_max_connections: 2,
        db_min_connections: 8,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.min_connections, 2);
}

/// Compile-time smoke test: confirm that [`ArticleRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn article_row_has_expected_fields() {
    use chrono::Utc;

    let row = ArticleRow {
        id: 1_i64,
        title: "New mindfulness study shows promise".to_string(),
        author: None,
        source: "Mindful.org".to_string(),
        url: "https://example.com/mindfulness".to_string(),
        summary: "Researchers found...".to_string(),
        content_html: String::new(),
        image_url: Some("https://example.com/hero.jpg".to_string()),
        sentiment_label: "POSITIVE".to_string(),
        sentiment_score: 0.91,
        top_emotions: vec!["optimism".to_string(), "joy".to_string()],
        positivity_score: 0.91,
        tags: vec![],
        published_at: Utc::now(),
        published: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.id, 1);
    assert_eq!(row.sentiment_label, "POSITIVE");
    assert_eq!(row.top_emotions.len(), 2);
    assert!(row.tags.is_empty());
    assert!(row.published);
}
