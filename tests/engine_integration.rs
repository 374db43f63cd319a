//! End-to-end scoring scenarios against the mock model client.

mod common;

use std::sync::Arc;

use common::fixtures::{THEME_NOUNS_AND_VERBS, dark_client, nli_body, scripted_client};

use accord::{
    EngineError, InputError, MatchEngine, MockModelClient, PolicyBranch, ScoringConfig,
    score_theme_guess,
};

#[tokio::test]
async fn paraphrased_theme_guess_matches() {
    // "dual part of speech" for "words that are both nouns and verbs":
    // embedding ~0.82, entailment high, keyword overlap moderate.
    let config = ScoringConfig::default();
    let client = scripted_client(&config, 0.82, nli_body(0.90, 0.07, 0.03));
    let engine = MatchEngine::new(config, Arc::clone(&client)).expect("engine builds");

    let result = engine
        .score(THEME_NOUNS_AND_VERBS, "dual part of speech")
        .await
        .expect("valid input");

    assert!(result.is_match);
    assert_eq!(result.diagnostics.branch, PolicyBranch::FastPass);
    assert!(result.score >= 0.78);
    assert!(!result.diagnostics.degraded);
}

#[tokio::test]
async fn surface_level_qualifier_guess_is_rejected() {
    // "begins with b" shares letters, not concepts: qualifier mismatch and
    // near-zero keyword overlap must sink it despite nonzero similarity.
    let config = ScoringConfig::default();
    let client = scripted_client(&config, 0.55, nli_body(0.20, 0.50, 0.30));
    let engine = MatchEngine::new(config, Arc::clone(&client)).expect("engine builds");

    let result = engine
        .score(THEME_NOUNS_AND_VERBS, "begins with b")
        .await
        .expect("valid input");

    assert!(!result.is_match);
    assert!(
        result
            .diagnostics
            .penalties
            .iter()
            .any(|p| p.name == "negation_mismatch")
    );
    assert!(result.score < 0.58);
}

#[tokio::test]
async fn empty_guess_fails_fast_with_zero_remote_calls() {
    let config = ScoringConfig::default();
    let client = scripted_client(&config, 0.9, nli_body(0.9, 0.05, 0.05));
    let engine = MatchEngine::new(config, Arc::clone(&client)).expect("engine builds");

    let err = engine
        .score(THEME_NOUNS_AND_VERBS, "   ")
        .await
        .unwrap_err();

    assert_eq!(err, InputError::EmptyGuess);
    assert_eq!(client.total_calls(), 0);
}

#[tokio::test]
async fn strong_keywords_rescue_a_near_threshold_embedding() {
    // Embedding 0.77 sits just under the 0.78 fast-pass floor. With full
    // keyword overlap and moderate entailment, fusion must still clear the
    // final threshold: no cliff-edge false negative.
    let config = ScoringConfig::default();
    let client = scripted_client(&config, 0.77, nli_body(0.55, 0.35, 0.10));
    let engine = MatchEngine::new(config, Arc::clone(&client)).expect("engine builds");

    let result = engine
        .score("colors of the rainbow", "rainbow colors")
        .await
        .expect("valid input");

    assert!(result.is_match);
    assert_eq!(result.diagnostics.branch, PolicyBranch::WeightedFusion);
    assert!(result.diagnostics.penalties.is_empty());
}

#[tokio::test]
async fn all_models_down_still_produces_a_verdict() {
    let config = ScoringConfig::default();
    let client = dark_client(&config);
    let engine = MatchEngine::new(config, Arc::clone(&client)).expect("engine builds");

    let result = engine
        .score("rainbow colors", "rainbow colors")
        .await
        .expect("degraded mode must not error");

    assert!(result.diagnostics.degraded);
    assert_eq!(result.diagnostics.branch, PolicyBranch::LexicalFallback);
    assert!(result.is_match);

    // Both remote records carry their failure reason.
    let unavailable = result
        .diagnostics
        .signals
        .iter()
        .filter(|s| !s.available)
        .count();
    assert_eq!(unavailable, 2);
}

#[tokio::test]
async fn entailment_signal_is_symmetric_under_swap() {
    let config = ScoringConfig::default();
    let client = scripted_client(&config, 0.70, nli_body(0.60, 0.30, 0.10));
    let engine = MatchEngine::new(config.clone(), Arc::clone(&client)).expect("engine builds");

    let forward = engine
        .score(THEME_NOUNS_AND_VERBS, "dual part of speech")
        .await
        .expect("valid input");
    let swapped = engine
        .score("dual part of speech", THEME_NOUNS_AND_VERBS)
        .await
        .expect("valid input");

    let entailment_payload = |result: &accord::ScoringResult| {
        result
            .diagnostics
            .signals
            .iter()
            .find(|s| s.signal == "entailment")
            .expect("entailment record")
            .payload
            .clone()
    };
    assert_eq!(entailment_payload(&forward), entailment_payload(&swapped));
}

#[tokio::test]
async fn one_shot_contract_reports_input_errors() {
    let config = ScoringConfig::default();
    let client = Arc::new(MockModelClient::new());

    let err = score_theme_guess("", "a guess", config, client)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Input(InputError::EmptyTheme)));
}

#[tokio::test]
async fn config_document_loads_from_disk_and_drives_the_verdict() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("strict.json");
    std::fs::write(
        &path,
        r#"{
            "config_version": "strict-2025.2",
            "policy": { "hybrid_final_min": 0.9, "lexical_only_min": 0.95 }
        }"#,
    )
    .expect("write config");

    let config = ScoringConfig::from_path(&path).expect("document loads");
    assert_eq!(config.config_version, "strict-2025.2");

    // Signals that pass the baseline comfortably fail the strict document.
    let client = scripted_client(&config, 0.77, nli_body(0.55, 0.35, 0.10));
    let engine = MatchEngine::new(config, Arc::clone(&client)).expect("engine builds");
    let result = engine
        .score("colors of the rainbow", "rainbow colors")
        .await
        .expect("valid input");

    assert!(!result.is_match);
    assert_eq!(result.diagnostics.config_version, "strict-2025.2");
}

#[tokio::test]
async fn malformed_config_document_is_rejected_at_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{
            "config_version": "bad",
            "policy": { "w_embedding": 0.9, "w_entailment": 0.9 }
        }"#,
    )
    .expect("write config");

    assert!(ScoringConfig::from_path(&path).is_err());
}

#[tokio::test]
async fn degraded_verdicts_never_use_the_lenient_threshold() {
    // Overlap 0.45 would be nowhere near a hybrid match anyway, but the
    // point is the branch: lexical-only applies the conservative threshold.
    let config = ScoringConfig::default();
    let lexical_only_min = config.policy.lexical_only_min;
    let client = dark_client(&config);
    let engine = MatchEngine::new(config, Arc::clone(&client)).expect("engine builds");

    let result = engine
        .score(THEME_NOUNS_AND_VERBS, "dual part of speech")
        .await
        .expect("valid input");

    assert!(!result.is_match);
    assert!(result.score < lexical_only_min);
    assert_eq!(result.diagnostics.branch, PolicyBranch::LexicalFallback);
}
