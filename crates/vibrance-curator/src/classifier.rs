//! Sentiment and emotion classification over TEI (Text Embeddings Inference).
//!
//! Both models are served by TEI's `/predict` route: a binary sentiment model
//! (POSITIVE/NEGATIVE) and a multi-label emotion model. [`ToneAnalyzer`] wraps
//! the pair behind a single `analyze` call.

use std::future::Future;

use serde::{Deserialize, Serialize};
use vibrance_core::SentimentLabel;

use crate::error::CurateError;
use crate::types::{AnalysisResult, LabelScore};

/// Characters of input text sent to the classifiers.
pub const MAX_ANALYSIS_CHARS: usize = 1000;

/// Emotion labels kept per analysis.
const TOP_EMOTIONS: usize = 2;

/// A text-in, labels-out classifier.
pub trait TextClassifier {
    /// Classify `text`, returning every label the model reports in the model's
    /// native output order.
    fn classify(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<LabelScore>, CurateError>> + Send;
}

/// TEI `/predict` client for one sequence-classification model.
#[derive(Debug, Clone)]
pub struct TeiClassifier {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    inputs: &'a str,
    raw_scores: bool,
    truncate: bool,
}

/// TEI answers a single input with a flat list and a batch with nested lists.
#[derive(Deserialize)]
#[serde(untagged)]
enum PredictResponse {
    Single(Vec<LabelScore>),
    Batch(Vec<Vec<LabelScore>>),
}

impl TeiClassifier {
    /// Create a client for the TEI server at `base_url`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            url: format!("{}/predict", base_url.trim_end_matches('/')),
        }
    }
}

impl TextClassifier for TeiClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, CurateError> {
        let request = PredictRequest {
            inputs: text,
            raw_scores: false,
            truncate: true,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CurateError::Classifier(format!("TEI request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(CurateError::Classifier(format!(
                "TEI returned status {}",
                response.status()
            )));
        }

        let parsed: PredictResponse = response
            .json()
            .await
            .map_err(|e| CurateError::Classifier(format!("TEI response parse error: {e}")))?;

        Ok(match parsed {
            PredictResponse::Single(scores) => scores,
            PredictResponse::Batch(mut batches) => {
                if batches.is_empty() {
                    Vec::new()
                } else {
                    batches.swap_remove(0)
                }
            }
        })
    }
}

/// Runs the sentiment and emotion classifiers over the same snippet.
#[derive(Debug, Clone)]
pub struct ToneAnalyzer<C> {
    sentiment: C,
    emotion: C,
}

impl<C: TextClassifier + Sync> ToneAnalyzer<C> {
    #[must_use]
    pub fn new(sentiment: C, emotion: C) -> Self {
        Self { sentiment, emotion }
    }

    /// Analyze the first [`MAX_ANALYSIS_CHARS`] characters of `text`.
    ///
    /// The sentiment label is the sentiment model's most confident label. The
    /// emotions are the two most confident emotion labels; the sort is stable,
    /// so equal scores keep the model's own order.
    ///
    /// # Errors
    ///
    /// Returns [`CurateError::Classifier`] if either model call fails or the
    /// sentiment model returns no labels, and [`CurateError::UnexpectedLabel`]
    /// if its top label is neither POSITIVE nor NEGATIVE.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, CurateError> {
        let snippet = truncate_chars(text, MAX_ANALYSIS_CHARS);

        let sentiment = self.sentiment.classify(snippet).await?;
        let top = top_label(&sentiment).ok_or_else(|| {
            CurateError::Classifier("sentiment model returned no labels".to_string())
        })?;
        let sentiment_label: SentimentLabel = top
            .label
            .parse()
            .map_err(|_| CurateError::UnexpectedLabel(top.label.clone()))?;
        let sentiment_score = top.score.clamp(0.0, 1.0);

        let emotions = self.emotion.classify(snippet).await?;

        Ok(AnalysisResult {
            sentiment_label,
            sentiment_score,
            top_emotions: top_emotions(emotions, TOP_EMOTIONS),
            positivity_score: sentiment_label.positivity(sentiment_score),
        })
    }
}

/// First `max_chars` characters of `text`, never splitting a code point.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Highest-scoring label; on a tie the earlier label wins.
fn top_label(scores: &[LabelScore]) -> Option<&LabelScore> {
    scores.iter().reduce(|best, candidate| {
        if candidate.score > best.score {
            candidate
        } else {
            best
        }
    })
}

fn top_emotions(mut scores: Vec<LabelScore>, keep: usize) -> Vec<String> {
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores.into_iter().take(keep).map(|s| s.label).collect()
}
