//! Shared fixtures for integration tests.

use std::sync::Arc;

use serde_json::{Value, json};

use accord::{MockModelClient, ScoringConfig};

pub const THEME_NOUNS_AND_VERBS: &str = "Words that are both nouns and verbs";

/// Similarity response in the inference API's list shape.
pub fn similarity_body(score: f64) -> Value {
    json!([score])
}

/// Classification response with symbolic labels.
pub fn nli_body(entailment: f64, neutral: f64, contradiction: f64) -> Value {
    json!([
        {"label": "ENTAILMENT", "score": entailment},
        {"label": "NEUTRAL", "score": neutral},
        {"label": "CONTRADICTION", "score": contradiction},
    ])
}

/// Mock client scripted with one similarity and one NLI answer, served for
/// every call (both NLI directions see the same triplet).
pub fn scripted_client(
    config: &ScoringConfig,
    similarity: f64,
    nli: Value,
) -> Arc<MockModelClient> {
    let client = Arc::new(MockModelClient::new());
    client.sticky_value(config.models.similarity_model(), similarity_body(similarity));
    client.sticky_value(&config.models.entailment, nli);
    client
}

/// Mock client with every configured model unavailable.
pub fn dark_client(config: &ScoringConfig) -> Arc<MockModelClient> {
    let client = Arc::new(MockModelClient::new());
    client.sticky_unavailable(config.models.similarity_model(), "endpoint down");
    client.sticky_unavailable(&config.models.entailment, "endpoint down");
    if let Some(fallback) = &config.models.entailment_fallback {
        client.sticky_unavailable(fallback, "endpoint down");
    }
    client
}
