use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Positivity threshold applied when `VIBRANCE_POSITIVITY_THRESHOLD` is unset.
pub const DEFAULT_POSITIVITY_THRESHOLD: f64 = 0.85;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("VIBRANCE_ENV", "development"))?;
    let bind_addr = parse_addr("VIBRANCE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("VIBRANCE_LOG_LEVEL", "info");
    let feeds_path = PathBuf::from(or_default("VIBRANCE_FEEDS_PATH", "./config/feeds.yaml"));

    let positivity_threshold = match lookup("VIBRANCE_POSITIVITY_THRESHOLD") {
        Ok(raw) => parse_threshold(&raw)
            .map_err(|reason| invalid("VIBRANCE_POSITIVITY_THRESHOLD", reason))?,
        Err(_) => DEFAULT_POSITIVITY_THRESHOLD,
    };

    let sentiment_model_url = trim_base_url(&or_default(
        "VIBRANCE_SENTIMENT_URL",
        "http://localhost:8081",
    ));
    let emotion_model_url =
        trim_base_url(&or_default("VIBRANCE_EMOTION_URL", "http://localhost:8082"));

    let request_timeout_secs = parse_u64("VIBRANCE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("VIBRANCE_USER_AGENT", "vibrance/0.1 (positive-news-curator)");

    let db_max_connections = parse_u32("VIBRANCE_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("VIBRANCE_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("VIBRANCE_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        feeds_path,
        positivity_threshold,
        sentiment_model_url,
        emotion_model_url,
        request_timeout_secs,
        user_agent,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a positivity threshold, which must be a finite number in `[0, 1]`.
///
/// # Errors
///
/// Returns a human-readable reason when the value is not a number or is out of range.
pub fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value = raw.trim().parse::<f64>().map_err(|e| e.to_string())?;
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(format!("{value} is outside [0, 1]"));
    }
    Ok(value)
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VIBRANCE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn trim_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
