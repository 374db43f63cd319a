//! Decision policy engine.
//!
//! Orchestrates one scoring request end to end: builds the text views, runs
//! the lexical extractor locally, fans out the remote signals concurrently
//! (embedding plus both NLI directions, at most three calls in flight),
//! then walks the policy ladder in strict order:
//!
//! 1. contradiction override — absolute no-match
//! 2. strong fast pass — three independent signals agree, skip fusion
//! 3. weighted fusion with multiplicative penalties
//!
//! Remote failures are absorbed: a missing signal forfeits its fusion weight
//! to the remaining one, and with both gone the keyword overlap is judged
//! alone against a conservative threshold. The request always produces a
//! verdict; only invalid input is an error here.

pub mod error;
pub mod types;


pub use error::EngineError;
pub use types::{
    AppliedPenalty, Diagnostics, FusionWeights, PolicyBranch, ScoringResult, SignalRecord,
};

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, ScoringConfig};
use crate::entailment::{EntailmentProvider, NliScores};
use crate::lexical::{LexicalExtractor, LexicalSignals};
use crate::remote::ModelClient;
use crate::similarity::EmbeddingSimilarity;
use crate::text::{InputError, TextViews};

/// The theme-matching engine.
///
/// Holds the validated configuration, compiled lexical tables, and the
/// signal providers. Requests share it read-only; each request owns its own
/// views and signal results.
pub struct MatchEngine<C> {
    config: Arc<ScoringConfig>,
    lexical: LexicalExtractor,
    similarity: EmbeddingSimilarity<C>,
    entailment: EntailmentProvider<C>,
}

impl<C> std::fmt::Debug for MatchEngine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEngine")
            .field("config_version", &self.config.config_version)
            .finish()
    }
}

impl<C: ModelClient> MatchEngine<C> {
    /// Validates the configuration and builds the engine.
    ///
    /// All configuration failures surface here, before any request is served.
    /// The client is shared: tests keep their own handle to a mock for call
    /// counting, production passes a fresh [`Arc`].
    pub fn new(config: ScoringConfig, client: Arc<C>) -> Result<Self, ConfigError> {
        config.validate()?;
        let lexical = LexicalExtractor::compile(&config.lexical)?;
        let similarity = EmbeddingSimilarity::new(Arc::clone(&client), &config);
        let entailment = EntailmentProvider::new(Arc::clone(&client), &config);

        Ok(Self {
            config: Arc::new(config),
            lexical,
            similarity,
            entailment,
        })
    }

    /// The configuration this engine decides with.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores one `(theme, guess)` pair.
    ///
    /// Synchronous from the caller's perspective; internally the remote
    /// signals run concurrently, each additionally bounded by the
    /// per-request deadline so a hung endpoint degrades instead of blocking.
    pub async fn score(&self, theme: &str, guess: &str) -> Result<ScoringResult, InputError> {
        let views = TextViews::build(theme, guess, &self.config.templates)?;
        let lexical = self.lexical.extract(&views.raw_theme, &views.raw_guess);
        debug!(
            keyword_overlap = lexical.keyword_overlap,
            negation_mismatch = lexical.negation_mismatch(),
            trivial = lexical.trivial_guess,
            "lexical signals"
        );

        let deadline = self.config.network.call_deadline();
        let (embedding, nli) = tokio::join!(
            tokio::time::timeout(
                deadline,
                self.similarity
                    .similarity(&views.processed_theme, &views.processed_guess),
            ),
            tokio::time::timeout(
                deadline,
                self.entailment.entailment(&views.forward, &views.reverse),
            ),
        );

        // Deadline expiry abandons the in-flight call; both failure shapes
        // collapse to "signal unavailable" with the reason preserved.
        let embedding: Result<f64, String> = match embedding {
            Ok(inner) => inner.map_err(|e| e.to_string()),
            Err(_) => Err(format!("request deadline exceeded ({deadline:?})")),
        };
        let nli: Result<NliScores, String> = match nli {
            Ok(inner) => inner.map_err(|e| e.to_string()),
            Err(_) => Err(format!("request deadline exceeded ({deadline:?})")),
        };

        if let Err(reason) = &embedding {
            warn!(reason = %reason, "embedding signal unavailable");
        }
        if let Err(reason) = &nli {
            warn!(reason = %reason, "entailment signal unavailable");
        }

        let result = self.decide(&lexical, &embedding, &nli);
        info!(
            is_match = result.is_match,
            score = result.score,
            branch = ?result.diagnostics.branch,
            degraded = result.diagnostics.degraded,
            config_version = %self.config.config_version,
            "scored theme guess"
        );
        Ok(result)
    }

    /// Pure policy walk over already-gathered signals.
    ///
    /// Deterministic: identical signals and config always produce the same
    /// verdict (the backoff jitter upstream affects timing only).
    fn decide(
        &self,
        lexical: &LexicalSignals,
        embedding: &Result<f64, String>,
        nli: &Result<NliScores, String>,
    ) -> ScoringResult {
        let policy = &self.config.policy;
        let signals = signal_records(lexical, embedding, nli);
        let degraded = embedding.is_err() || nli.is_err();

        // Rung 1: a detected contradiction outranks every similarity score.
        if let Ok(scores) = nli {
            if scores.contradiction >= policy.contradiction_override {
                return self.verdict(
                    false,
                    0.0,
                    vec!["contradiction"],
                    PolicyBranch::ContradictionOverride,
                    degraded,
                    signals,
                    Vec::new(),
                    None,
                );
            }
        }

        // Rung 2: three independent signals agreeing strongly beat the
        // weighted path; no lucky-weight false negative can undo them.
        if let (Ok(similarity), Ok(scores)) = (embedding, nli) {
            if scores.entailment >= policy.strong_entailment_min
                && *similarity >= policy.embedding_fast_pass_min
                && lexical.keyword_overlap >= policy.keyword_fast_pass_min
            {
                let score = (similarity * policy.w_embedding
                    + scores.entailment * policy.w_entailment)
                    .clamp(0.0, 1.0);
                return self.verdict(
                    true,
                    score,
                    vec!["entailment", "embedding", "keyword"],
                    PolicyBranch::FastPass,
                    degraded,
                    signals,
                    Vec::new(),
                    None,
                );
            }
        }

        // Rung 3: weighted fusion over whatever survived, or keyword overlap
        // alone when nothing did.
        let (base, branch, weights) = match (embedding, nli) {
            (Ok(similarity), Ok(scores)) => (
                similarity * policy.w_embedding + scores.entailment * policy.w_entailment,
                PolicyBranch::WeightedFusion,
                Some(FusionWeights {
                    embedding: policy.w_embedding,
                    entailment: policy.w_entailment,
                }),
            ),
            // One signal missing: its weight forfeits to the survivor.
            (Ok(similarity), Err(_)) => (
                *similarity,
                PolicyBranch::WeightedFusion,
                Some(FusionWeights {
                    embedding: 1.0,
                    entailment: 0.0,
                }),
            ),
            (Err(_), Ok(scores)) => (
                scores.entailment,
                PolicyBranch::WeightedFusion,
                Some(FusionWeights {
                    embedding: 0.0,
                    entailment: 1.0,
                }),
            ),
            (Err(_), Err(_)) => (
                lexical.keyword_overlap,
                PolicyBranch::LexicalFallback,
                None,
            ),
        };

        let mut penalties = Vec::new();
        if lexical.negation_mismatch() {
            penalties.push(AppliedPenalty {
                name: "negation_mismatch",
                factor: 1.0 - policy.negation_penalty,
            });
        }
        // Guards against embedding models that find superficially similar
        // phrases similar: a guess sharing almost no keywords with the theme
        // forfeits part of its model-driven score. Deliberately independent
        // of the embedding's magnitude, so raising the embedding score can
        // never lower the fused score.
        if embedding.is_ok() && lexical.keyword_overlap < policy.low_overlap_max {
            penalties.push(AppliedPenalty {
                name: "low_keyword_overlap",
                factor: 1.0 - policy.low_overlap_penalty,
            });
        }
        if lexical.specificity_flagged {
            penalties.push(AppliedPenalty {
                name: "trivial_guess",
                factor: 1.0 - policy.specificity_penalty,
            });
        }

        let score = penalties
            .iter()
            .fold(base, |acc, penalty| acc * penalty.factor)
            .clamp(0.0, 1.0);

        let threshold = match branch {
            PolicyBranch::LexicalFallback => policy.lexical_only_min,
            _ => policy.hybrid_final_min,
        };

        self.verdict(
            score >= threshold,
            score,
            Vec::new(),
            branch,
            degraded,
            signals,
            penalties,
            weights,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn verdict(
        &self,
        is_match: bool,
        score: f64,
        matched_signals: Vec<&'static str>,
        branch: PolicyBranch,
        degraded: bool,
        signals: Vec<SignalRecord>,
        penalties: Vec<AppliedPenalty>,
        fusion_weights: Option<FusionWeights>,
    ) -> ScoringResult {
        ScoringResult {
            is_match,
            score,
            matched_signals,
            diagnostics: Diagnostics {
                config_version: self.config.config_version.clone(),
                branch,
                degraded,
                signals,
                penalties,
                fusion_weights,
            },
        }
    }
}

/// Builds the per-signal trace shared by every policy branch.
fn signal_records(
    lexical: &LexicalSignals,
    embedding: &Result<f64, String>,
    nli: &Result<NliScores, String>,
) -> Vec<SignalRecord> {
    let mut records = vec![
        SignalRecord {
            signal: "keyword_overlap",
            available: true,
            payload: json!({
                "overlap": lexical.keyword_overlap,
                "theme_token_count": lexical.theme_token_count,
                "guess_token_count": lexical.guess_token_count,
                "matches": lexical.token_matches,
            }),
        },
        SignalRecord {
            signal: "negation",
            available: true,
            payload: json!({
                "in_theme": lexical.negation_in_theme,
                "in_guess": lexical.negation_in_guess,
                "mismatch": lexical.negation_mismatch(),
            }),
        },
        SignalRecord {
            signal: "specificity",
            available: true,
            payload: json!({
                "trivial_guess": lexical.trivial_guess,
                "flagged": lexical.specificity_flagged,
            }),
        },
    ];

    records.push(match embedding {
        Ok(similarity) => SignalRecord {
            signal: "embedding",
            available: true,
            payload: json!({ "similarity": similarity }),
        },
        Err(reason) => SignalRecord {
            signal: "embedding",
            available: false,
            payload: json!({ "error": reason }),
        },
    });

    records.push(match nli {
        Ok(scores) => SignalRecord {
            signal: "entailment",
            available: true,
            payload: json!({
                "entailment": scores.entailment,
                "neutral": scores.neutral,
                "contradiction": scores.contradiction,
            }),
        },
        Err(reason) => SignalRecord {
            signal: "entailment",
            available: false,
            payload: json!({ "error": reason }),
        },
    });

    records
}

/// One-shot consumer contract: build an engine for `config` and score a
/// single pair.
///
/// Callers holding many requests should build a [`MatchEngine`] once and
/// reuse it; this exists for the simple call sites.
pub async fn score_theme_guess<C: ModelClient>(
    theme: &str,
    guess: &str,
    config: ScoringConfig,
    client: Arc<C>,
) -> Result<ScoringResult, EngineError> {
    let engine = MatchEngine::new(config, client)?;
    Ok(engine.score(theme, guess).await?)
}
