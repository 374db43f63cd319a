//! Verdict, diagnostics, and policy trace types.

use serde::Serialize;
use serde_json::Value;

/// Which rung of the policy ladder produced the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyBranch {
    /// NLI contradiction at or above the override threshold; absolute no-match.
    ContradictionOverride,
    /// Entailment, embedding, and keyword overlap all strong; immediate match.
    FastPass,
    /// Weighted fusion of the available remote signals plus penalties.
    WeightedFusion,
    /// Every remote signal unavailable; keyword overlap judged alone against
    /// the conservative threshold.
    LexicalFallback,
}

/// One signal's outcome, kept verbatim for explainability.
///
/// Never mutated after creation; `payload` carries the free-form detail
/// (matched tokens, raw model scores, or the unavailability reason).
#[derive(Debug, Clone, Serialize)]
pub struct SignalRecord {
    pub signal: &'static str,
    pub available: bool,
    pub payload: Value,
}

/// A multiplicative penalty that fired during fusion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AppliedPenalty {
    pub name: &'static str,
    /// The multiplier applied to the score (e.g. 0.65 for a 0.35 penalty).
    pub factor: f64,
}

/// Effective fusion weights after redistribution over available signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FusionWeights {
    pub embedding: f64,
    pub entailment: f64,
}

/// Ordered record of everything the policy saw and did.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    /// Version of the parameter set that produced this verdict.
    pub config_version: String,
    /// The rung that decided.
    pub branch: PolicyBranch,
    /// At least one remote signal was unavailable.
    pub degraded: bool,
    /// Every signal's raw outcome, including unavailable ones.
    pub signals: Vec<SignalRecord>,
    /// Penalties that fired, in application order.
    pub penalties: Vec<AppliedPenalty>,
    /// Weights actually used by fusion, when that rung ran.
    pub fusion_weights: Option<FusionWeights>,
}

/// Final verdict for one `(theme, guess)` request.
///
/// Constructed once by the policy engine, immutable, never persisted here;
/// storage is the caller's concern.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringResult {
    pub is_match: bool,
    /// Confidence in [0, 1].
    pub score: f64,
    /// Signals that triggered an override or fast pass, empty otherwise.
    pub matched_signals: Vec<&'static str>,
    pub diagnostics: Diagnostics,
}
