use serde::Serialize;

/// How a theme token was recovered from the guess, if at all.
///
/// Ordered by evidence strength: exact and stem hits are strong evidence of
/// a shared concept, synonym and substring hits corroborate only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Stem,
    Synonym,
    Substring,
    None,
}

/// Per-theme-token match record, kept for the diagnostic trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenMatch {
    /// Content token from the theme.
    pub theme_token: String,
    /// Guess token it matched, if any.
    pub guess_token: Option<String>,
    pub kind: MatchKind,
    pub weight: f64,
}

/// All lexical signals for one request. Computed locally, no I/O.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexicalSignals {
    /// Weighted fraction of theme tokens recoverable from the guess, in [0, 1].
    pub keyword_overlap: f64,
    /// One record per theme content token.
    pub token_matches: Vec<TokenMatch>,
    pub theme_token_count: usize,
    pub guess_token_count: usize,
    /// A negation/qualifier pattern matched the theme.
    pub negation_in_theme: bool,
    /// A negation/qualifier pattern matched the guess.
    pub negation_in_guess: bool,
    /// Guess is at or below the trivial content-token count.
    pub trivial_guess: bool,
    /// Triviality penalty armed: trivial *and* overlap below the cutoff.
    /// A short guess that still lands the theme's key concepts is spared.
    pub specificity_flagged: bool,
}

impl LexicalSignals {
    /// Negation or qualifier present on exactly one side.
    ///
    /// Only ever contributes a penalty, never a pass.
    pub fn negation_mismatch(&self) -> bool {
        self.negation_in_theme != self.negation_in_guess
    }
}
