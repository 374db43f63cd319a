//! Bidirectional NLI entailment signal.
//!
//! Theme/guess equivalence is symmetric but inference models are not, so
//! both orderings are always scored and merged: entailment and neutral are
//! averaged, contradiction takes the max (a contradiction found in either
//! direction is disqualifying and must not be diluted by the other).


use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::ScoringConfig;
use crate::remote::{ModelClient, RemoteError};
use crate::text::NliPair;

/// NLI probability triplet.
///
/// Each component is in [0, 1]. Per-direction triplets are normalized by the
/// model; a merged triplet keeps `max(contradiction)` deliberately, so its
/// sum may exceed 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NliScores {
    pub entailment: f64,
    pub neutral: f64,
    pub contradiction: f64,
}

impl NliScores {
    /// All-neutral triplet, the defensive default.
    pub fn neutral() -> Self {
        Self {
            entailment: 0.0,
            neutral: 1.0,
            contradiction: 0.0,
        }
    }
}

/// Merges the two directional triplets.
pub fn merge_bidirectional(forward: NliScores, reverse: NliScores) -> NliScores {
    NliScores {
        entailment: (forward.entailment + reverse.entailment) / 2.0,
        neutral: (forward.neutral + reverse.neutral) / 2.0,
        contradiction: forward.contradiction.max(reverse.contradiction),
    }
}

/// Entailment provider bound to the configured NLI model and its fallback.
#[derive(Debug)]
pub struct EntailmentProvider<C> {
    client: Arc<C>,
    model: String,
    fallback: Option<String>,
}

impl<C: ModelClient> EntailmentProvider<C> {
    pub fn new(client: Arc<C>, config: &ScoringConfig) -> Self {
        Self {
            client,
            model: config.models.entailment.clone(),
            fallback: config.models.entailment_fallback.clone(),
        }
    }

    /// Primary model id this provider calls.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Scores both orderings concurrently and merges them.
    pub async fn entailment(
        &self,
        forward: &NliPair,
        reverse: &NliPair,
    ) -> Result<NliScores, RemoteError> {
        let (forward_scores, reverse_scores) =
            tokio::join!(self.direction(forward), self.direction(reverse));
        let merged = merge_bidirectional(forward_scores?, reverse_scores?);
        debug!(
            entailment = merged.entailment,
            neutral = merged.neutral,
            contradiction = merged.contradiction,
            "bidirectional NLI"
        );
        Ok(merged)
    }

    /// One direction: primary model, then the configured fallback once.
    async fn direction(&self, pair: &NliPair) -> Result<NliScores, RemoteError> {
        match self.score_with(&self.model, pair).await {
            Ok(scores) => Ok(scores),
            Err(primary_error) => match &self.fallback {
                Some(fallback) => {
                    warn!(
                        primary = %self.model,
                        fallback = %fallback,
                        error = %primary_error,
                        "primary NLI model failed, trying fallback"
                    );
                    self.score_with(fallback, pair).await
                }
                None => Err(primary_error),
            },
        }
    }

    async fn score_with(&self, model: &str, pair: &NliPair) -> Result<NliScores, RemoteError> {
        let payload = json!({
            "inputs": {
                "text": pair.premise,
                "text_pair": pair.hypothesis,
            }
        });

        let response = self.client.call(model, &payload).await?;
        parse_nli(&response).map_err(|reason| RemoteError::UnexpectedResponse {
            model: model.to_string(),
            reason,
        })
    }
}

/// Decodes a classification response: a flat or singly-nested list of
/// `{label, score}` entries.
///
/// Label mapping is defensive: symbolic names are matched by substring,
/// positional `LABEL_0/1/2` follow the MNLI convention
/// (contradiction/neutral/entailment), and anything unrecognized counts as
/// neutral rather than being dropped.
fn parse_nli(value: &Value) -> Result<NliScores, String> {
    let entries = match value {
        Value::Array(items) => match items.first() {
            Some(Value::Array(inner)) => inner.as_slice(),
            Some(_) => items.as_slice(),
            None => return Err("empty classification list".to_string()),
        },
        _ => return Err(format!("expected a classification list, got: {value}")),
    };

    let mut scores = NliScores {
        entailment: 0.0,
        neutral: 0.0,
        contradiction: 0.0,
    };
    let mut seen = 0usize;

    for entry in entries {
        let Some(label) = entry.get("label").and_then(Value::as_str) else {
            continue;
        };
        let Some(score) = entry.get("score").and_then(Value::as_f64) else {
            continue;
        };
        let score = score.clamp(0.0, 1.0);
        seen += 1;

        let label = label.to_ascii_lowercase();
        if label.contains("entail") {
            scores.entailment += score;
        } else if label.contains("contradict") {
            scores.contradiction += score;
        } else if label.contains("neutral") || label == "label_1" {
            scores.neutral += score;
        } else if label == "label_0" {
            scores.contradiction += score;
        } else if label == "label_2" {
            scores.entailment += score;
        } else {
            scores.neutral += score;
        }
    }

    if seen == 0 {
        return Err(format!("no usable {{label, score}} entries in: {value}"));
    }

    scores.entailment = scores.entailment.clamp(0.0, 1.0);
    scores.neutral = scores.neutral.clamp(0.0, 1.0);
    scores.contradiction = scores.contradiction.clamp(0.0, 1.0);
    Ok(scores)
}
