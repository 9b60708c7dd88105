//! TEI classifier client tests against wiremock.

use serde_json::json;
use vibrance_core::SentimentLabel;
use vibrance_curator::{CurateError, TeiClassifier, TextClassifier, ToneAnalyzer};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn tei(base: &str) -> TeiClassifier {
    TeiClassifier::new(reqwest::Client::new(), base)
}

#[tokio::test]
async fn classify_posts_predict_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({
            "inputs": "hello",
            "raw_scores": false,
            "truncate": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"score": 0.98, "label": "POSITIVE"},
            {"score": 0.02, "label": "NEGATIVE"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let scores = tei(&server.uri()).classify("hello").await.expect("classify");
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0].label, "POSITIVE");
}

#[tokio::test]
async fn classify_accepts_batched_response_and_trailing_slash() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([[{"score": 0.7, "label": "joy"}]])),
        )
        .mount(&server)
        .await;

    let base = format!("{}/", server.uri());
    let scores = tei(&base).classify("text").await.expect("classify");
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].label, "joy");
}

#[tokio::test]
async fn classify_server_error_is_classifier_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .mount(&server)
        .await;

    let err = tei(&server.uri()).classify("text").await.unwrap_err();
    assert!(matches!(err, CurateError::Classifier(_)), "got {err:?}");
}

/// Analyzer over two mock TEI servers; the servers must outlive the analyzer.
async fn analyzer(
    sentiment: serde_json::Value,
    emotion: serde_json::Value,
) -> (ToneAnalyzer<TeiClassifier>, MockServer, MockServer) {
    let sentiment_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sentiment))
        .mount(&sentiment_server)
        .await;

    let emotion_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(emotion))
        .mount(&emotion_server)
        .await;

    let analyzer = ToneAnalyzer::new(tei(&sentiment_server.uri()), tei(&emotion_server.uri()));
    (analyzer, sentiment_server, emotion_server)
}

#[tokio::test]
async fn analyze_negative_inverts_positivity() {
    let (analyzer, _s, _e) = analyzer(
        json!([{"score": 0.8, "label": "NEGATIVE"}, {"score": 0.2, "label": "POSITIVE"}]),
        json!([
            {"score": 0.5, "label": "sadness"},
            {"score": 0.3, "label": "grief"},
            {"score": 0.2, "label": "neutral"}
        ]),
    )
    .await;

    let result = analyzer.analyze("A sad story").await.expect("analyze");
    assert_eq!(result.sentiment_label, SentimentLabel::Negative);
    assert!((result.sentiment_score - 0.8).abs() < 1e-9);
    assert!((result.positivity_score - 0.2).abs() < 1e-9);
    assert_eq!(result.top_emotions, vec!["sadness", "grief"]);
}

#[tokio::test]
async fn analyze_truncates_input_to_1000_chars() {
    let sentiment_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_partial_json(json!({ "inputs": "a".repeat(1000) })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"score": 0.9, "label": "POSITIVE"}])),
        )
        .expect(1)
        .mount(&sentiment_server)
        .await;

    let emotion_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_partial_json(json!({ "inputs": "a".repeat(1000) })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"score": 0.9, "label": "joy"}])))
        .expect(1)
        .mount(&emotion_server)
        .await;

    let analyzer = ToneAnalyzer::new(tei(&sentiment_server.uri()), tei(&emotion_server.uri()));
    let result = analyzer.analyze(&"a".repeat(1500)).await.expect("analyze");
    assert_eq!(result.top_emotions, vec!["joy"]);
}

#[tokio::test]
async fn analyze_rejects_unknown_sentiment_label() {
    let (analyzer, _s, _e) = analyzer(
        json!([{"score": 0.9, "label": "LABEL_1"}]),
        json!([{"score": 0.9, "label": "joy"}]),
    )
    .await;

    let err = analyzer.analyze("text").await.unwrap_err();
    assert!(
        matches!(err, CurateError::UnexpectedLabel(ref label) if label == "LABEL_1"),
        "got {err:?}"
    );
}
