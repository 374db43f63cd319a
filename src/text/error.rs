//! Input validation errors.

use thiserror::Error;

/// Rejected request input.
///
/// Raised before any signal is computed; an empty input never reaches the
/// lexical extractor or a remote model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Theme text is empty after trimming and whitespace collapse.
    #[error("theme is empty after normalization")]
    EmptyTheme,

    /// Guess text is empty after trimming and whitespace collapse.
    #[error("guess is empty after normalization")]
    EmptyGuess,
}
