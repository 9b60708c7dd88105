use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("feed parse error: {0}")]
    FeedParse(#[from] feed_rs::parser::ParseFeedError),

    #[error("classifier error: {0}")]
    Classifier(String),

    #[error("classifier returned unexpected sentiment label: {0}")]
    UnexpectedLabel(String),

    #[error("page extraction error: {0}")]
    Extract(String),

    #[error("article store error: {0}")]
    Store(String),
}
