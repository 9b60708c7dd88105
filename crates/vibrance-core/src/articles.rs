use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Polarity reported by the binary sentiment classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
        }
    }

    /// Normalize a confidence for this label into a positivity score:
    /// the score itself for POSITIVE, its complement for NEGATIVE.
    #[must_use]
    pub fn positivity(self, score: f64) -> f64 {
        match self {
            SentimentLabel::Positive => score,
            SentimentLabel::Negative => 1.0 - score,
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Ok(SentimentLabel::Positive),
            "NEGATIVE" => Ok(SentimentLabel::Negative),
            other => Err(format!("unknown sentiment label '{other}'")),
        }
    }
}

/// A feed entry that passed both gates, ready to be persisted.
///
/// `url` is the deduplication key: at most one article per URL is ever stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuratedArticle {
    pub title: String,
    pub author: Option<String>,
    /// Name of the feed the entry came from.
    pub source: String,
    pub url: String,
    /// Plain-text summary from the feed (markup stripped).
    pub summary: String,
    pub content_html: String,
    pub image_url: Option<String>,
    pub sentiment_label: SentimentLabel,
    pub sentiment_score: f64,
    /// At most two labels, most confident first.
    pub top_emotions: Vec<String>,
    pub positivity_score: f64,
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub published: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positivity_keeps_positive_score() {
        assert!((SentimentLabel::Positive.positivity(0.91) - 0.91).abs() < f64::EPSILON);
    }

    #[test]
    fn positivity_inverts_negative_score() {
        for score in [0.0, 0.25, 0.5, 0.97, 1.0] {
            let expected = 1.0 - score;
            assert!((SentimentLabel::Negative.positivity(score) - expected).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn label_parses_case_insensitively() {
        assert_eq!(
            "positive".parse::<SentimentLabel>().unwrap(),
            SentimentLabel::Positive
        );
        assert_eq!(
            " NEGATIVE ".parse::<SentimentLabel>().unwrap(),
            SentimentLabel::Negative
        );
        assert!("LABEL_1".parse::<SentimentLabel>().is_err());
    }

    #[test]
    fn article_serializes_with_camel_case_keys() {
        let article = CuratedArticle {
            title: "New mindfulness study shows promise".to_string(),
            author: None,
            source: "Mindful.org".to_string(),
            url: "https://example.com/a".to_string(),
            summary: "Researchers found...".to_string(),
            content_html: "<p>Researchers found...</p>".to_string(),
            image_url: None,
            sentiment_label: SentimentLabel::Positive,
            sentiment_score: 0.91,
            top_emotions: vec!["optimism".to_string()],
            positivity_score: 0.91,
            tags: vec![],
            published_at: Utc::now(),
            published: true,
        };
        let json = serde_json::to_value(&article).expect("serialize");
        assert_eq!(json["sentimentLabel"], "POSITIVE");
        assert_eq!(json["positivityScore"], 0.91);
        assert_eq!(json["published"], true);
        assert!(json["tags"].as_array().is_some_and(Vec::is_empty));
    }
}
