//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a scoring configuration.
///
/// All of these surface at configuration-load time, before any request is
/// served; a constructed engine never sees an invalid config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document could not be read.
    #[error("failed to read config document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid JSON for the expected schema.
    #[error("failed to parse config document: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    /// `config_version` is empty. Every numeric change must be versioned.
    #[error("config_version must be a non-empty string")]
    EmptyVersion,

    /// A threshold, weight, or penalty fell outside the unit interval.
    #[error("{field} must be in [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    /// Fusion weights must sum to 1.0 so the fused score stays in [0, 1].
    #[error("fusion weights must sum to 1.0, got {sum}")]
    WeightSum { sum: f64 },

    /// The degraded-mode threshold must not be laxer than the hybrid one.
    #[error(
        "lexical_only_min ({lexical_only_min}) must be >= hybrid_final_min ({hybrid_final_min})"
    )]
    DegradedThreshold {
        lexical_only_min: f64,
        hybrid_final_min: f64,
    },

    /// A template is missing the `{text}` placeholder.
    #[error("template '{name}' does not contain the {{text}} placeholder")]
    TemplateMissingPlaceholder { name: &'static str },

    /// A negation/qualifier pattern is not a valid regular expression.
    #[error("invalid negation pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Per-call timeout must be positive.
    #[error("timeout_ms must be greater than zero")]
    ZeroTimeout,

    /// Backoff cap below the base would make the cap meaningless.
    #[error("backoff_cap_ms ({cap_ms}) must be >= backoff_base_ms ({base_ms})")]
    BackoffCapBelowBase { base_ms: u64, cap_ms: u64 },

    /// A retryable status code outside the HTTP status range.
    #[error("retryable status {status} is not a valid HTTP status code")]
    InvalidStatus { status: u16 },
}
