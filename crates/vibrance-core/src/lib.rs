//! Shared domain types and configuration for the Vibrance curator.

pub mod app_config;
pub mod articles;
pub mod config;
pub mod feeds;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use articles::{CuratedArticle, SentimentLabel};
pub use config::{
    load_app_config, load_app_config_from_env, parse_threshold, DEFAULT_POSITIVITY_THRESHOLD,
};
pub use feeds::{load_feeds, FeedSource, FeedsFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read feeds file {path}: {source}")]
    FeedsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse feeds file: {0}")]
    FeedsFileParse(#[from] serde_yaml::Error),

    #[error("invalid feeds configuration: {0}")]
    Validation(String),
}
