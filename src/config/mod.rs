//! Versioned scoring configuration.
//!
//! The whole decision policy is parameterized by a [`ScoringConfig`] document
//! (JSON), loaded once and shared read-only across requests. Nothing numeric
//! is hardcoded in the decision path, so multiple configurations can be
//! evaluated side-by-side (see [`crate::experiment`]) without code changes.

pub mod error;


pub use error::ConfigError;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EMBEDDING_MODEL, DEFAULT_ENDPOINT, DEFAULT_ENTAILMENT_FALLBACK_MODEL,
    DEFAULT_ENTAILMENT_MODEL, DEFAULT_HYPOTHESIS_TEMPLATE, DEFAULT_PARAPHRASE_MODEL,
    DEFAULT_PREMISE_TEMPLATE, DEFAULT_PROCESSED_TEMPLATE, TEMPLATE_PLACEHOLDER,
};

/// Immutable scoring configuration.
///
/// `config_version` is the reproducibility contract: identical versions imply
/// identical numeric parameters, so a verdict can be replayed exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Version tag of this parameter set. Bumped on any numeric change.
    pub config_version: String,

    /// Remote model identifiers.
    #[serde(default)]
    pub models: ModelsConfig,

    /// HTTP client parameters.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Sentence templates for the processed and entailment views.
    #[serde(default)]
    pub templates: TemplateConfig,

    /// Synonym table, negation patterns, and keyword match weights.
    #[serde(default)]
    pub lexical: LexicalConfig,

    /// Thresholds, fusion weights, and penalty factors.
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Remote model identifiers consumed by the signal providers.
///
/// Model choice is a configuration value, not a code branch: swapping the
/// embedding model for the paraphrase-tuned one never touches decision logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// General-purpose embedding model.
    pub embedding: String,
    /// Paraphrase-tuned embedding model.
    pub paraphrase: String,
    /// Selects `paraphrase` over `embedding` for the similarity signal.
    pub prefer_paraphrase: bool,
    /// Primary NLI model.
    pub entailment: String,
    /// Optional NLI fallback, tried after the primary's retries are spent.
    pub entailment_fallback: Option<String>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            embedding: DEFAULT_EMBEDDING_MODEL.to_string(),
            paraphrase: DEFAULT_PARAPHRASE_MODEL.to_string(),
            prefer_paraphrase: false,
            entailment: DEFAULT_ENTAILMENT_MODEL.to_string(),
            entailment_fallback: Some(DEFAULT_ENTAILMENT_FALLBACK_MODEL.to_string()),
        }
    }
}

impl ModelsConfig {
    /// Model id used for the similarity signal.
    pub fn similarity_model(&self) -> &str {
        if self.prefer_paraphrase {
            &self.paraphrase
        } else {
            &self.embedding
        }
    }
}

/// HTTP parameters for the remote model client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Base URL; model ids are appended as path segments.
    pub endpoint: String,
    /// Bearer token for the inference API.
    pub api_token: Option<String>,
    /// Per-attempt timeout.
    pub timeout_ms: u64,
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// First backoff delay; doubles per attempt.
    pub backoff_base_ms: u64,
    /// Upper bound on any single backoff delay.
    pub backoff_cap_ms: u64,
    /// Maximum uniform jitter added to each backoff delay.
    pub jitter_ms: u64,
    /// HTTP statuses worth retrying. Any other 4xx fails fast.
    pub retryable_statuses: Vec<u16>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_token: None,
            timeout_ms: 8_000,
            max_retries: 2,
            backoff_base_ms: 250,
            backoff_cap_ms: 4_000,
            jitter_ms: 250,
            retryable_statuses: vec![429, 502, 503, 504],
        }
    }
}

impl NetworkConfig {
    /// Per-attempt timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Worst-case duration of one fully retried call.
    ///
    /// Every attempt is bounded by `timeout_ms` and every backoff by the
    /// jittered cap, so this bounds the whole retry loop. The engine uses it
    /// as the per-request deadline: once it fires, in-flight calls are
    /// abandoned and scored as unavailable.
    pub fn call_deadline(&self) -> Duration {
        let attempts = u64::from(self.max_retries) + 1;
        let backoff: u64 = (0..self.max_retries)
            .map(|attempt| {
                let exp = self.backoff_base_ms.saturating_mul(1u64 << attempt.min(16));
                exp.min(self.backoff_cap_ms).saturating_add(self.jitter_ms)
            })
            .sum();
        Duration::from_millis(
            attempts
                .saturating_mul(self.timeout_ms)
                .saturating_add(backoff),
        )
    }
}

/// Sentence templates for the processed and entailment views.
///
/// Each template must contain a `{text}` placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Wrapped around *both* embedding inputs, keeping comparison symmetric.
    pub processed: String,
    /// Premise-side NLI template.
    pub premise: String,
    /// Hypothesis-side NLI template.
    pub hypothesis: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            processed: DEFAULT_PROCESSED_TEMPLATE.to_string(),
            premise: DEFAULT_PREMISE_TEMPLATE.to_string(),
            hypothesis: DEFAULT_HYPOTHESIS_TEMPLATE.to_string(),
        }
    }
}

/// Weights for the keyword match priority ladder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordWeights {
    pub exact: f64,
    pub stem: f64,
    pub synonym: f64,
    pub substring: f64,
}

impl Default for KeywordWeights {
    fn default() -> Self {
        Self {
            exact: 1.0,
            stem: 0.9,
            synonym: 0.6,
            substring: 0.3,
        }
    }
}

/// Lexical tables and gates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalConfig {
    /// Token -> accepted alternatives, applied in both directions.
    pub synonyms: BTreeMap<String, Vec<String>>,
    /// Word-boundary-guarded negation/qualifier patterns.
    pub negation_patterns: Vec<String>,
    /// Match weights for the keyword priority ladder.
    pub weights: KeywordWeights,
    /// A guess with at most this many content tokens is a triviality candidate.
    pub trivial_max_tokens: usize,
    /// Triviality only penalizes when overlap is also below this cutoff.
    pub triviality_overlap_cutoff: f64,
}

impl Default for LexicalConfig {
    fn default() -> Self {
        let table: &[(&str, &[&str])] = &[
            ("both", &["dual", "two", "double"]),
            ("word", &["term", "vocabulary"]),
            ("noun", &["speech"]),
            ("verb", &["speech", "action"]),
            ("begin", &["start"]),
            ("end", &["finish", "last"]),
            ("letter", &["character"]),
            ("meaning", &["definition", "sense"]),
        ];
        let mut synonyms = BTreeMap::new();
        for (key, alts) in table {
            synonyms.insert(
                (*key).to_string(),
                alts.iter().map(|s| (*s).to_string()).collect(),
            );
        }

        Self {
            synonyms,
            negation_patterns: vec![
                r"\bnot\b".to_string(),
                r"\bno\b".to_string(),
                r"\bnever\b".to_string(),
                r"\bwithout\b".to_string(),
                r"\bnon\b".to_string(),
                r"\bexcept\b".to_string(),
                r"\bopposite\s+of\b".to_string(),
                r"\bbegins?\s+with\b".to_string(),
                r"\bstarts?\s+with\b".to_string(),
                r"\bends?\s+with\b".to_string(),
                r"\bcontains?\b".to_string(),
                r"\brhymes?\s+with\b".to_string(),
            ],
            weights: KeywordWeights::default(),
            trivial_max_tokens: 2,
            triviality_overlap_cutoff: 0.34,
        }
    }
}

/// Decision policy thresholds, fusion weights, and penalty factors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// NLI contradiction at or above this is an absolute no-match.
    pub contradiction_override: f64,
    /// Entailment floor for the three-signal fast pass.
    pub strong_entailment_min: f64,
    /// Embedding floor for the fast pass.
    pub embedding_fast_pass_min: f64,
    /// Keyword-overlap floor for the fast pass.
    pub keyword_fast_pass_min: f64,
    /// Fusion weight of the embedding signal.
    pub w_embedding: f64,
    /// Fusion weight of the entailment signal.
    pub w_entailment: f64,
    /// Multiplicative penalty for a negation/qualifier mismatch.
    pub negation_penalty: f64,
    /// Multiplicative penalty for trivial low-overlap guesses.
    pub specificity_penalty: f64,
    /// Multiplicative penalty when the embedding signal is present but the
    /// guess shares almost no keywords with the theme.
    pub low_overlap_penalty: f64,
    /// Overlap ceiling that arms the low-overlap penalty.
    pub low_overlap_max: f64,
    /// Fused score at or above this is a match.
    pub hybrid_final_min: f64,
    /// Conservative overlap threshold when every remote signal is down.
    pub lexical_only_min: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            contradiction_override: 0.60,
            strong_entailment_min: 0.85,
            embedding_fast_pass_min: 0.78,
            keyword_fast_pass_min: 0.10,
            w_embedding: 0.55,
            w_entailment: 0.45,
            negation_penalty: 0.35,
            specificity_penalty: 0.25,
            low_overlap_penalty: 0.20,
            low_overlap_max: 0.15,
            hybrid_final_min: 0.58,
            lexical_only_min: 0.72,
        }
    }
}

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            config_version: "baseline-2025.1".to_string(),
            models: ModelsConfig::default(),
            network: NetworkConfig::default(),
            templates: TemplateConfig::default(),
            lexical: LexicalConfig::default(),
            policy: PolicyConfig::default(),
        }
    }
}

impl ScoringConfig {
    /// Parses and validates a configuration document from a JSON string.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(document).map_err(|source| ConfigError::Parse { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a configuration document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&document)
    }

    /// Validates the parameter set.
    ///
    /// Runs at load time; a request never observes an invalid configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.config_version.trim().is_empty() {
            return Err(ConfigError::EmptyVersion);
        }

        let p = &self.policy;
        let w = &self.lexical.weights;
        let unit_fields: &[(&'static str, f64)] = &[
            ("policy.contradiction_override", p.contradiction_override),
            ("policy.strong_entailment_min", p.strong_entailment_min),
            ("policy.embedding_fast_pass_min", p.embedding_fast_pass_min),
            ("policy.keyword_fast_pass_min", p.keyword_fast_pass_min),
            ("policy.w_embedding", p.w_embedding),
            ("policy.w_entailment", p.w_entailment),
            ("policy.negation_penalty", p.negation_penalty),
            ("policy.specificity_penalty", p.specificity_penalty),
            ("policy.low_overlap_penalty", p.low_overlap_penalty),
            ("policy.low_overlap_max", p.low_overlap_max),
            ("policy.hybrid_final_min", p.hybrid_final_min),
            ("policy.lexical_only_min", p.lexical_only_min),
            (
                "lexical.triviality_overlap_cutoff",
                self.lexical.triviality_overlap_cutoff,
            ),
            ("lexical.weights.exact", w.exact),
            ("lexical.weights.stem", w.stem),
            ("lexical.weights.synonym", w.synonym),
            ("lexical.weights.substring", w.substring),
        ];
        for &(field, value) in unit_fields {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        let weight_sum = p.w_embedding + p.w_entailment;
        if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum { sum: weight_sum });
        }

        if p.lexical_only_min < p.hybrid_final_min {
            return Err(ConfigError::DegradedThreshold {
                lexical_only_min: p.lexical_only_min,
                hybrid_final_min: p.hybrid_final_min,
            });
        }

        let templates: &[(&'static str, &str)] = &[
            ("processed", &self.templates.processed),
            ("premise", &self.templates.premise),
            ("hypothesis", &self.templates.hypothesis),
        ];
        for &(name, template) in templates {
            if !template.contains(TEMPLATE_PLACEHOLDER) {
                return Err(ConfigError::TemplateMissingPlaceholder { name });
            }
        }

        for pattern in &self.lexical.negation_patterns {
            regex::Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
        }

        let n = &self.network;
        if n.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if n.backoff_cap_ms < n.backoff_base_ms {
            return Err(ConfigError::BackoffCapBelowBase {
                base_ms: n.backoff_base_ms,
                cap_ms: n.backoff_cap_ms,
            });
        }
        for &status in &n.retryable_statuses {
            if !(100..=599).contains(&status) {
                return Err(ConfigError::InvalidStatus { status });
            }
        }

        Ok(())
    }
}
