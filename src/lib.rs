//! Accord: hybrid theme-matching decision engine.
//!
//! Decides whether a free-text guess identifies a target theme phrase,
//! fusing independent lexical and semantic evidence under a deterministic,
//! configuration-driven policy:
//!
//! - [`text`] normalizes input and builds the raw/processed/entailment views
//! - [`lexical`] computes keyword overlap, negation mismatch, and the
//!   triviality gate, locally and synchronously
//! - [`remote`] is the hardened HTTP client (bounded retry, jittered
//!   backoff) behind the [`ModelClient`] seam
//! - [`similarity`] and [`entailment`] are the remote signal providers
//! - [`engine`] fans the signals out concurrently and walks the policy
//!   ladder: contradiction override, strong fast pass, weighted fusion
//! - [`config`] is the immutable, versioned parameter document everything
//!   above reads from
//! - [`experiment`] replays labeled cases across configurations for
//!   threshold calibration
//!
//! The typical entrypoint is [`MatchEngine::score`], or [`score_theme_guess`]
//! for one-shot callers. Remote model failures never fail a request: the
//! policy degrades (weight redistribution, lexical-only fallback) and flags
//! the result in its diagnostics.
//!
//! # Test/Mock Support
//!
//! [`MockModelClient`] is available behind `#[cfg(any(test, feature = "mock"))]`
//! for deterministic, call-counted scoring in tests.

pub mod config;
pub mod constants;
pub mod engine;
pub mod entailment;
pub mod experiment;
pub mod lexical;
pub mod remote;
pub mod similarity;
pub mod text;

pub use config::{
    ConfigError, KeywordWeights, LexicalConfig, ModelsConfig, NetworkConfig, PolicyConfig,
    ScoringConfig, TemplateConfig,
};
pub use engine::{
    AppliedPenalty, Diagnostics, EngineError, FusionWeights, MatchEngine, PolicyBranch,
    ScoringResult, SignalRecord, score_theme_guess,
};
pub use entailment::{EntailmentProvider, NliScores, merge_bidirectional};
pub use experiment::{
    CaseVerdict, ComparisonReport, ConfigReport, Divergence, LabeledCase, compare_configs,
};
pub use lexical::{LexicalExtractor, LexicalSignals, MatchKind, TokenMatch};
#[cfg(any(test, feature = "mock"))]
pub use remote::MockModelClient;
pub use remote::{HttpModelClient, ModelClient, RemoteError};
pub use similarity::EmbeddingSimilarity;
pub use text::{InputError, NliPair, TextViews, normalize};
