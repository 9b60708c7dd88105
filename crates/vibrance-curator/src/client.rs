//! Shared outbound HTTP client construction.

use std::time::Duration;

use reqwest::Client;

use crate::error::CurateError;

/// Build the `reqwest::Client` used for feed, page, and classifier requests.
///
/// # Errors
///
/// Returns [`CurateError::Http`] if the underlying client cannot be
/// constructed (e.g., invalid TLS config).
pub fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, CurateError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}
