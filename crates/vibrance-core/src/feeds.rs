use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One configured RSS/Atom source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    /// Display name, stored as the `source` of every article curated from this feed.
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedsFile {
    pub feeds: Vec<FeedSource>,
}

impl FeedsFile {
    /// Find a feed by name, case-insensitively.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&FeedSource> {
        self.feeds
            .iter()
            .find(|feed| feed.name.eq_ignore_ascii_case(name.trim()))
    }
}

/// Load and validate the feed list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_feeds(path: &Path) -> Result<FeedsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FeedsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let feeds_file: FeedsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::FeedsFileParse)?;

    validate_feeds(&feeds_file)?;

    Ok(feeds_file)
}

fn validate_feeds(feeds_file: &FeedsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_urls = HashSet::new();

    for feed in &feeds_file.feeds {
        if feed.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "feed name must be non-empty".to_string(),
            ));
        }

        let url = feed.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "feed '{}' has invalid url '{}'; must start with http:// or https://",
                feed.name, feed.url
            )));
        }

        if !seen_names.insert(feed.name.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate feed name: '{}'",
                feed.name
            )));
        }

        if !seen_urls.insert(url.to_string()) {
            return Err(ConfigError::Validation(format!(
                "duplicate feed url: '{}' (from feed '{}')",
                feed.url, feed.name
            )));
        }
    }

    Ok(())
}
