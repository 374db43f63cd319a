//! Text normalization and view construction.
//!
//! Every request derives three parallel views of the `(theme, guess)` pair:
//!
//! - **raw** — normalized only; feeds the lexical extractor (template
//!   boilerplate would pollute keyword statistics)
//! - **processed** — both sides wrapped in the *same* sentence template, so
//!   the embedding comparison stays symmetric
//! - **entailment** — premise/hypothesis framing in both orderings, since
//!   NLI models are order-sensitive but theme/guess equivalence is not

pub mod error;

#[cfg(test)]
mod tests;

pub use error::InputError;

use crate::config::TemplateConfig;
use crate::constants::TEMPLATE_PLACEHOLDER;

/// A premise/hypothesis pair in one NLI direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NliPair {
    pub premise: String,
    pub hypothesis: String,
}

/// Immutable per-request views of the input pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextViews {
    /// Normalized theme, no template.
    pub raw_theme: String,
    /// Normalized guess, no template.
    pub raw_guess: String,
    /// Template-wrapped theme for the embedding model.
    pub processed_theme: String,
    /// Template-wrapped guess for the embedding model.
    pub processed_guess: String,
    /// Theme as premise, guess as hypothesis.
    pub forward: NliPair,
    /// Guess as premise, theme as hypothesis.
    pub reverse: NliPair,
}

impl TextViews {
    /// Normalizes both inputs and builds all three views.
    ///
    /// Fails with [`InputError`] if either side is empty once normalized,
    /// before any signal work happens.
    pub fn build(theme: &str, guess: &str, templates: &TemplateConfig) -> Result<Self, InputError> {
        let raw_theme = normalize(theme);
        if raw_theme.is_empty() {
            return Err(InputError::EmptyTheme);
        }
        let raw_guess = normalize(guess);
        if raw_guess.is_empty() {
            return Err(InputError::EmptyGuess);
        }

        let forward = NliPair {
            premise: apply_template(&templates.premise, &raw_theme),
            hypothesis: apply_template(&templates.hypothesis, &raw_guess),
        };
        let reverse = NliPair {
            premise: apply_template(&templates.premise, &raw_guess),
            hypothesis: apply_template(&templates.hypothesis, &raw_theme),
        };

        Ok(Self {
            processed_theme: apply_template(&templates.processed, &raw_theme),
            processed_guess: apply_template(&templates.processed, &raw_guess),
            forward,
            reverse,
            raw_theme,
            raw_guess,
        })
    }
}

/// Trims, lowercases, and collapses internal whitespace.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Substitutes `text` into the template's `{text}` placeholder.
fn apply_template(template: &str, text: &str) -> String {
    template.replace(TEMPLATE_PLACEHOLDER, text)
}
