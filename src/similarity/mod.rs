//! Embedding similarity signal.
//!
//! One remote call comparing the two PROCESSED texts. The general-purpose
//! and paraphrase-tuned models are interchangeable here: which one answers
//! is decided by configuration alone, never by code.


use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use crate::config::ScoringConfig;
use crate::remote::{ModelClient, RemoteError};

/// Similarity provider bound to the configured sentence model.
#[derive(Debug)]
pub struct EmbeddingSimilarity<C> {
    client: Arc<C>,
    model: String,
}

impl<C: ModelClient> EmbeddingSimilarity<C> {
    pub fn new(client: Arc<C>, config: &ScoringConfig) -> Self {
        Self {
            client,
            model: config.models.similarity_model().to_string(),
        }
    }

    /// Model id this provider calls.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Cosine similarity of the processed texts, clamped into [0, 1].
    pub async fn similarity(
        &self,
        processed_theme: &str,
        processed_guess: &str,
    ) -> Result<f64, RemoteError> {
        let payload = json!({
            "inputs": {
                "source_sentence": processed_theme,
                "sentences": [processed_guess],
            }
        });

        let response = self.client.call(&self.model, &payload).await?;
        let score = parse_similarity(&response).map_err(|reason| {
            RemoteError::UnexpectedResponse {
                model: self.model.clone(),
                reason,
            }
        })?;

        debug!(model = %self.model, score, "embedding similarity");
        Ok(score)
    }
}

/// Decodes a similarity response: a bare float, `[f]`, or `[[f]]`.
///
/// Cosine output can dip below zero for unrelated texts; scores are clamped
/// into [0, 1] so downstream fusion stays in range.
fn parse_similarity(value: &Value) -> Result<f64, String> {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::Array(items) => match items.first() {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::Array(inner)) => inner.first().and_then(Value::as_f64),
            _ => None,
        },
        _ => None,
    };

    match raw {
        Some(score) if score.is_finite() => Ok(score.clamp(0.0, 1.0)),
        Some(score) => Err(format!("non-finite similarity {score}")),
        None => Err(format!("expected a similarity float, got: {value}")),
    }
}
