//! Lexical signal extraction.
//!
//! Three independent sub-computations over the RAW views only: weighted
//! keyword overlap, negation/qualifier mismatch, and a triviality gate.
//! No remote calls; this always runs, even when every model is down.

pub mod types;


pub use types::{LexicalSignals, MatchKind, TokenMatch};

use std::collections::BTreeMap;

use regex::Regex;

use crate::config::{ConfigError, KeywordWeights, LexicalConfig};
use crate::constants::{MIN_SUBSTRING_LEN, STOP_WORDS};

/// Compiled lexical tables, built once per engine from the configuration.
///
/// Shared read-only across concurrent requests.
#[derive(Debug)]
pub struct LexicalExtractor {
    synonyms: BTreeMap<String, Vec<String>>,
    negation: Vec<Regex>,
    weights: KeywordWeights,
    trivial_max_tokens: usize,
    triviality_overlap_cutoff: f64,
}

impl LexicalExtractor {
    /// Compiles the configured tables and patterns.
    pub fn compile(config: &LexicalConfig) -> Result<Self, ConfigError> {
        let negation = config
            .negation_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            synonyms: config.synonyms.clone(),
            negation,
            weights: config.weights,
            trivial_max_tokens: config.trivial_max_tokens,
            triviality_overlap_cutoff: config.triviality_overlap_cutoff,
        })
    }

    /// Extracts all lexical signals from the normalized raw texts.
    pub fn extract(&self, raw_theme: &str, raw_guess: &str) -> LexicalSignals {
        let theme_tokens = content_tokens(raw_theme);
        let guess_tokens = content_tokens(raw_guess);

        let token_matches: Vec<TokenMatch> = theme_tokens
            .iter()
            .map(|token| self.best_match(token, &guess_tokens))
            .collect();

        let keyword_overlap = if theme_tokens.is_empty() {
            0.0
        } else {
            let sum: f64 = token_matches.iter().map(|m| m.weight).sum();
            (sum / theme_tokens.len() as f64).clamp(0.0, 1.0)
        };

        let negation_in_theme = self.matches_negation(raw_theme);
        let negation_in_guess = self.matches_negation(raw_guess);

        let trivial_guess = guess_tokens.len() <= self.trivial_max_tokens;
        let specificity_flagged =
            trivial_guess && keyword_overlap < self.triviality_overlap_cutoff;

        LexicalSignals {
            keyword_overlap,
            token_matches,
            theme_token_count: theme_tokens.len(),
            guess_token_count: guess_tokens.len(),
            negation_in_theme,
            negation_in_guess,
            trivial_guess,
            specificity_flagged,
        }
    }

    /// Finds the best guess-side match for one theme token.
    ///
    /// Priority order: exact, stem, synonym, substring. The first tier with
    /// any hit wins; ties within a tier take the first guess token.
    fn best_match(&self, theme_token: &str, guess_tokens: &[String]) -> TokenMatch {
        let theme_stem = stem(theme_token);

        let tiers: [(MatchKind, f64); 4] = [
            (MatchKind::Exact, self.weights.exact),
            (MatchKind::Stem, self.weights.stem),
            (MatchKind::Synonym, self.weights.synonym),
            (MatchKind::Substring, self.weights.substring),
        ];

        for (kind, weight) in tiers {
            let hit = guess_tokens.iter().find(|guess_token| match kind {
                MatchKind::Exact => theme_token == guess_token.as_str(),
                MatchKind::Stem => theme_stem == stem(guess_token),
                MatchKind::Synonym => self.synonym_match(theme_token, guess_token),
                MatchKind::Substring => substring_match(theme_token, guess_token),
                MatchKind::None => false,
            });
            if let Some(guess_token) = hit {
                return TokenMatch {
                    theme_token: theme_token.to_string(),
                    guess_token: Some(guess_token.clone()),
                    kind,
                    weight,
                };
            }
        }

        TokenMatch {
            theme_token: theme_token.to_string(),
            guess_token: None,
            kind: MatchKind::None,
            weight: 0.0,
        }
    }

    /// Synonym-table lookup, applied in both directions and over stems.
    fn synonym_match(&self, theme_token: &str, guess_token: &str) -> bool {
        let theme_stem = stem(theme_token);
        let guess_stem = stem(guess_token);

        let lookup = |key: &str, other: &str, other_stem: &str| {
            self.synonyms
                .get(key)
                .is_some_and(|alts| alts.iter().any(|alt| alt == other || stem(alt) == other_stem))
        };

        lookup(theme_token, guess_token, &guess_stem)
            || lookup(&theme_stem, guess_token, &guess_stem)
            || lookup(guess_token, theme_token, &theme_stem)
            || lookup(&guess_stem, theme_token, &theme_stem)
    }

    fn matches_negation(&self, text: &str) -> bool {
        self.negation.iter().any(|pattern| pattern.is_match(text))
    }
}

/// Splits normalized text into content tokens: alphanumeric runs with
/// stop-words removed.
pub fn content_tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty() && !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Light suffix stripping for stem comparison.
///
/// Not a linguistic stemmer; just enough to equate plural/inflected forms
/// ("nouns"/"noun", "begins"/"begin", "connected"/"connect").
pub fn stem(token: &str) -> String {
    const REPLACEMENTS: &[(&str, &str)] = &[("ies", "y"), ("ied", "y")];
    const STRIP: &[&str] = &[
        "ations", "ation", "ingly", "ions", "ing", "ion", "edly", "ed", "ly", "s",
    ];
    const MIN_STEM_LEN: usize = 3;

    for (suffix, replacement) in REPLACEMENTS {
        if let Some(base) = token.strip_suffix(suffix) {
            if base.len() + 1 >= MIN_STEM_LEN {
                return format!("{base}{replacement}");
            }
        }
    }

    for suffix in STRIP {
        // Bare-"s" stripping spares "ss" endings ("chess", "glass").
        if *suffix == "s" && token.ends_with("ss") {
            continue;
        }
        if let Some(base) = token.strip_suffix(suffix) {
            if base.len() >= MIN_STEM_LEN {
                return base.to_string();
            }
        }
    }

    token.to_string()
}

/// Substring containment, guarded against short-token noise.
fn substring_match(a: &str, b: &str) -> bool {
    a.len() >= MIN_SUBSTRING_LEN && b.len() >= MIN_SUBSTRING_LEN && (a.contains(b) || b.contains(a))
}
