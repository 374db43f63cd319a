//! Side-by-side configuration replay.
//!
//! Thresholds are calibrated empirically, not frozen: this harness replays
//! the same labeled cases against several configurations and tabulates
//! per-config agreement plus the cases where configurations disagree with
//! each other. No persistence; callers feed it whatever labeled set they
//! keep.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::ScoringConfig;
use crate::engine::{EngineError, MatchEngine};
use crate::remote::ModelClient;

/// One labeled `(theme, guess)` pair.
#[derive(Debug, Clone)]
pub struct LabeledCase {
    pub theme: String,
    pub guess: String,
    /// The verdict a human judge assigned.
    pub expected_match: bool,
}

impl LabeledCase {
    pub fn new(theme: &str, guess: &str, expected_match: bool) -> Self {
        Self {
            theme: theme.to_string(),
            guess: guess.to_string(),
            expected_match,
        }
    }
}

/// One configuration's verdict on one case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseVerdict {
    pub config_version: String,
    pub is_match: bool,
    pub score: f64,
}

/// Aggregate agreement of one configuration with the labels.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    pub config_version: String,
    pub correct: usize,
    pub total: usize,
}

impl ConfigReport {
    /// Fraction of cases where the verdict matched the label.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// A case on which the configurations did not all agree.
#[derive(Debug, Clone, Serialize)]
pub struct Divergence {
    pub case_index: usize,
    pub theme: String,
    pub guess: String,
    pub expected_match: bool,
    pub verdicts: Vec<CaseVerdict>,
}

/// Full comparison output.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub reports: Vec<ConfigReport>,
    pub divergences: Vec<Divergence>,
}

/// Replays every case against every configuration.
///
/// All engines share one client, so a scripted/mock client sees identical
/// signals per case across configurations; differences in verdicts are then
/// attributable to the parameters alone.
pub async fn compare_configs<C: ModelClient>(
    cases: &[LabeledCase],
    configs: Vec<ScoringConfig>,
    client: Arc<C>,
) -> Result<ComparisonReport, EngineError> {
    let engines = configs
        .into_iter()
        .map(|config| MatchEngine::new(config, Arc::clone(&client)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut reports: Vec<ConfigReport> = engines
        .iter()
        .map(|engine| ConfigReport {
            config_version: engine.config().config_version.clone(),
            correct: 0,
            total: 0,
        })
        .collect();
    let mut divergences = Vec::new();

    for (case_index, case) in cases.iter().enumerate() {
        let mut verdicts = Vec::with_capacity(engines.len());
        for (engine, report) in engines.iter().zip(reports.iter_mut()) {
            let result = engine.score(&case.theme, &case.guess).await?;
            report.total += 1;
            if result.is_match == case.expected_match {
                report.correct += 1;
            }
            verdicts.push(CaseVerdict {
                config_version: engine.config().config_version.clone(),
                is_match: result.is_match,
                score: result.score,
            });
        }

        let unanimous = verdicts
            .windows(2)
            .all(|pair| pair[0].is_match == pair[1].is_match);
        if !unanimous {
            divergences.push(Divergence {
                case_index,
                theme: case.theme.clone(),
                guess: case.guess.clone(),
                expected_match: case.expected_match,
                verdicts,
            });
        }
    }

    info!(
        configs = reports.len(),
        cases = cases.len(),
        divergences = divergences.len(),
        "configuration comparison finished"
    );

    Ok(ComparisonReport {
        reports,
        divergences,
    })
}
