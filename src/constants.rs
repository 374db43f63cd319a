//! Cross-cutting constants and calibrated defaults.
//!
//! Numeric policy values here are *defaults* only. Live values always come
//! from the loaded [`ScoringConfig`](crate::config::ScoringConfig) document,
//! and any change to them must bump `config_version`.

/// General-purpose sentence embedding model served over the inference API.
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Paraphrase-tuned alternative, selectable purely by configuration.
pub const DEFAULT_PARAPHRASE_MODEL: &str = "sentence-transformers/paraphrase-mpnet-base-v2";

/// Primary NLI model.
pub const DEFAULT_ENTAILMENT_MODEL: &str = "facebook/bart-large-mnli";

/// Fallback NLI model, tried after the primary's retries are exhausted.
pub const DEFAULT_ENTAILMENT_FALLBACK_MODEL: &str = "roberta-large-mnli";

/// Inference API base URL; model ids are appended as path segments.
pub const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models";

/// Placeholder replaced by the normalized text when a template is applied.
pub const TEMPLATE_PLACEHOLDER: &str = "{text}";

/// Template wrapped around *both* sides of the embedding comparison.
///
/// Using one template for theme and guess keeps the comparison symmetric:
/// both sides answer the same implicit question.
pub const DEFAULT_PROCESSED_TEMPLATE: &str = "What connects this week's words? {text}";

/// Premise-side template for the NLI pair.
pub const DEFAULT_PREMISE_TEMPLATE: &str = "The connection between the words is: {text}.";

/// Hypothesis-side template for the NLI pair.
pub const DEFAULT_HYPOTHESIS_TEMPLATE: &str =
    "The connection between the words can be described as: {text}.";

/// Words carrying no theme content, dropped before keyword statistics.
///
/// Deliberately excludes quantifiers like "both" and "all": themes such as
/// "words that are both nouns and verbs" lean on them.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "am", "do", "does", "did",
    "have", "has", "had", "of", "in", "on", "at", "to", "for", "from", "by", "with", "about", "as",
    "into", "through", "without", "within", "and", "or", "but", "if", "then", "than", "that",
    "this", "these", "those",
    "it", "its", "they", "them", "their", "there", "here", "which", "who", "whom", "whose", "what",
    "when", "where", "why", "how", "can", "could", "will", "would", "shall", "should", "may",
    "might", "must", "not", "no", "so", "too", "very", "just", "also", "each", "some", "any",
    "things", "thing", "stuff", "something",
];

/// Shortest token length eligible for substring matching.
///
/// Below this, substring hits are noise ("be" inside "begins").
pub const MIN_SUBSTRING_LEN: usize = 4;
