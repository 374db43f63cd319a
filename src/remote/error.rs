//! Remote model call errors.

use thiserror::Error;

/// Terminal failure of a remote model call.
///
/// Never surfaced to the player: the policy engine absorbs these into
/// degraded-mode fusion and records them in diagnostics.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The model could not be reached within the retry budget, or answered
    /// with a non-retryable failure.
    #[error("model '{model}' unavailable after {attempts} attempt(s): {reason}")]
    Unavailable {
        model: String,
        attempts: u32,
        reason: String,
    },

    /// The model answered 200 with a body the provider cannot interpret.
    #[error("model '{model}' returned an unexpected response shape: {reason}")]
    UnexpectedResponse { model: String, reason: String },
}

impl RemoteError {
    /// Model id the failure belongs to.
    pub fn model(&self) -> &str {
        match self {
            RemoteError::Unavailable { model, .. }
            | RemoteError::UnexpectedResponse { model, .. } => model,
        }
    }
}
