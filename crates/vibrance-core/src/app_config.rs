use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub feeds_path: PathBuf,
    /// Minimum sentiment confidence a POSITIVE entry needs to be curated.
    pub positivity_threshold: f64,
    /// Base URL of the inference server hosting the binary sentiment model.
    pub sentiment_model_url: String,
    /// Base URL of the inference server hosting the multi-label emotion model.
    pub emotion_model_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("feeds_path", &self.feeds_path)
            .field("database_url", &"[redacted]")
            .field("positivity_threshold", &self.positivity_threshold)
            .field("sentiment_model_url", &self.sentiment_model_url)
            .field("emotion_model_url", &self.emotion_model_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
