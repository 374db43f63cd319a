use super::*;

use serde_json::json;

use crate::remote::MockModelClient;

const SIM_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
const NLI_MODEL: &str = "facebook/bart-large-mnli";

fn scripted_client() -> Arc<MockModelClient> {
    let client = Arc::new(MockModelClient::new());
    client.sticky_value(SIM_MODEL, json!([0.70]));
    client.sticky_value(
        NLI_MODEL,
        json!([
            {"label": "ENTAILMENT", "score": 0.60},
            {"label": "NEUTRAL", "score": 0.30},
            {"label": "CONTRADICTION", "score": 0.10},
        ]),
    );
    client
}

fn config_with_final_min(version: &str, hybrid_final_min: f64) -> ScoringConfig {
    let mut config = ScoringConfig::default();
    config.config_version = version.to_string();
    config.policy.hybrid_final_min = hybrid_final_min;
    config
}

#[tokio::test]
async fn borderline_case_diverges_between_thresholds() {
    // Fused score for the scripted signals is 0.55*0.70 + 0.45*0.60 = 0.655.
    let cases = vec![LabeledCase::new("colors of the rainbow", "rainbow colors", true)];
    let configs = vec![
        config_with_final_min("lenient", 0.58),
        config_with_final_min("strict", 0.70),
    ];

    let report = compare_configs(&cases, configs, scripted_client())
        .await
        .expect("comparison should run");

    assert_eq!(report.reports.len(), 2);
    assert_eq!(report.reports[0].correct, 1);
    assert_eq!(report.reports[0].accuracy(), 1.0);
    assert_eq!(report.reports[1].correct, 0);

    assert_eq!(report.divergences.len(), 1);
    let divergence = &report.divergences[0];
    assert_eq!(divergence.case_index, 0);
    assert!(divergence.verdicts[0].is_match);
    assert!(!divergence.verdicts[1].is_match);
    // Same signals, same score; only the threshold moved.
    assert!((divergence.verdicts[0].score - divergence.verdicts[1].score).abs() < 1e-9);
}

#[tokio::test]
async fn unanimous_cases_produce_no_divergence() {
    let cases = vec![
        LabeledCase::new("colors of the rainbow", "rainbow colors", true),
        LabeledCase::new("colors of the rainbow", "types of weather", false),
    ];
    let configs = vec![
        config_with_final_min("a", 0.58),
        config_with_final_min("b", 0.60),
    ];

    let report = compare_configs(&cases, configs, scripted_client())
        .await
        .expect("comparison should run");

    assert!(report.divergences.is_empty());
    assert_eq!(report.reports[0].total, 2);
}

#[tokio::test]
async fn invalid_config_fails_the_whole_comparison() {
    let mut bad = ScoringConfig::default();
    bad.policy.w_entailment = 0.9;
    let result = compare_configs(
        &[LabeledCase::new("t", "g", true)],
        vec![bad],
        scripted_client(),
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn accuracy_of_empty_report_is_zero() {
    let report = ConfigReport {
        config_version: "x".to_string(),
        correct: 0,
        total: 0,
    };
    assert_eq!(report.accuracy(), 0.0);
}
