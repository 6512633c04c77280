//! Queries the classifier and turns churn probability into a risk tier and retention action.

use super::report::{BatchReport, ScoredRow};
use crate::config::{BatchConfig, RiskConfig};
use crate::error::{RowError, RowFailure, ScoringError};
use crate::features::{FeatureRecord, FeatureRow, FEATURE_COLUMNS};
use crate::model::{default_columns, Classifier};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Slack allowed on classifier probabilities before they count as out of range (f32 outputs).
const PROBABILITY_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    /// Lower bounds are inclusive: `p == medium_threshold` is Medium, `p == high_threshold`
    /// is High. Single-record and batch scoring both bin through here.
    pub fn from_probability(p: f64, config: &RiskConfig) -> Self {
        if p >= config.high_threshold {
            RiskTier::High
        } else if p >= config.medium_threshold {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    ImmediateRetention,
    EngagementCampaign,
    Upsell,
}

impl RecommendedAction {
    pub fn for_tier(tier: RiskTier) -> Self {
        match tier {
            RiskTier::High => RecommendedAction::ImmediateRetention,
            RiskTier::Medium => RecommendedAction::EngagementCampaign,
            RiskTier::Low => RecommendedAction::Upsell,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RecommendedAction::ImmediateRetention => {
                "immediate retention outreach (discount + proactive support)"
            }
            RecommendedAction::EngagementCampaign => "engagement campaign",
            RecommendedAction::Upsell => "stable; consider upsell",
        }
    }
}

impl std::fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Scoring outcome for one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// 1 = predicted churner
    pub label: u8,
    /// Churn probability in [0, 1]
    pub probability: f64,
    pub tier: RiskTier,
    pub action: RecommendedAction,
}

impl ScoreResult {
    pub fn is_churn(&self) -> bool {
        self.label == 1
    }
}

/// A validated record queued for batch scoring, with its input position and the cells
/// to echo into the export.
#[derive(Debug, Clone)]
pub struct ScoringInput {
    pub row: usize,
    pub record: FeatureRecord,
    pub cells: Vec<String>,
}

pub struct ScoringEngine {
    classifier: Arc<dyn Classifier>,
    risk: RiskConfig,
    batch: BatchConfig,
}

impl ScoringEngine {
    pub fn new(classifier: Arc<dyn Classifier>, risk: RiskConfig, batch: BatchConfig) -> Self {
        Self {
            classifier,
            risk,
            batch,
        }
    }

    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }

    pub fn risk_config(&self) -> &RiskConfig {
        &self.risk
    }

    /// The classifier must consume exactly the record schema, names and order.
    pub fn check_schema(&self) -> Result<(), ScoringError> {
        let expected = self.classifier.input_columns();
        if expected.iter().map(String::as_str).eq(FEATURE_COLUMNS.iter().copied()) {
            return Ok(());
        }
        Err(ScoringError::SchemaMismatch {
            detail: format!(
                "classifier `{}` expects columns {:?}, records provide {:?}",
                self.classifier.name(),
                expected,
                FEATURE_COLUMNS
            ),
        })
    }

    pub fn score(&self, record: &FeatureRecord) -> Result<ScoreResult, ScoringError> {
        self.check_schema()?;
        let mut results = self.score_rows(&[record.to_row()])?;
        results.pop().ok_or_else(|| ScoringError::ClassifierInvocation {
            reason: "classifier returned no result".to_string(),
        })
    }

    /// Score typed records; row indices in the report are positions in `records`.
    pub fn score_batch(&self, records: &[FeatureRecord]) -> BatchReport {
        let inputs = records
            .iter()
            .enumerate()
            .map(|(row, record)| ScoringInput {
                row,
                record: record.clone(),
                cells: record.cells(),
            })
            .collect();
        self.score_inputs(default_columns(), inputs, Vec::new())
    }

    /// Score pre-validated rows and fold in rows already rejected upstream.
    pub fn score_inputs(
        &self,
        columns: Vec<String>,
        inputs: Vec<ScoringInput>,
        mut errors: Vec<RowError>,
    ) -> BatchReport {
        let outcomes: Vec<Result<ScoredRow, RowError>> = match self.check_schema() {
            Err(e) => inputs
                .iter()
                .map(|i| {
                    Err(RowError {
                        row: i.row,
                        reason: RowFailure::Scoring(e.clone()),
                    })
                })
                .collect(),
            Ok(()) => {
                let chunk = self.batch.chunk_size.max(1);
                if self.batch.parallel && inputs.len() >= self.batch.min_parallel_rows {
                    inputs
                        .par_chunks(chunk)
                        .flat_map_iter(|c| self.score_chunk(c))
                        .collect()
                } else {
                    inputs.chunks(chunk).flat_map(|c| self.score_chunk(c)).collect()
                }
            }
        };

        let mut rows = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                Ok(r) => rows.push(r),
                Err(e) => {
                    tracing::warn!(row = e.row, error = %e.reason, "row not scored");
                    errors.push(e);
                }
            }
        }
        // reconcile by row index, not completion order
        rows.sort_by_key(|r| r.row);
        errors.sort_by_key(|e| e.row);

        let report = BatchReport::new(columns, rows, errors);
        let s = report.summary();
        tracing::info!(
            batch_id = %report.id,
            submitted = s.submitted,
            total = s.total,
            failed = s.failed,
            predicted_churners = s.predicted_churners,
            churn_rate = s.churn_rate,
            "batch scored"
        );
        report
    }

    fn score_chunk(&self, chunk: &[ScoringInput]) -> Vec<Result<ScoredRow, RowError>> {
        let rows: Vec<FeatureRow> = chunk.iter().map(|i| i.record.to_row()).collect();
        match self.score_rows(&rows) {
            Ok(results) => {
                tracing::debug!(first_row = chunk[0].row, len = chunk.len(), "chunk scored");
                chunk
                    .iter()
                    .zip(results)
                    .map(|(i, result)| Ok(scored(i, result)))
                    .collect()
            }
            Err(e) if chunk.len() == 1 => vec![Err(RowError {
                row: chunk[0].row,
                reason: RowFailure::Scoring(e),
            })],
            Err(e) => {
                // isolate the offending records
                tracing::debug!(
                    first_row = chunk[0].row,
                    error = %e,
                    "chunk failed; scoring rows singly"
                );
                chunk
                    .iter()
                    .zip(&rows)
                    .map(|(i, row)| {
                        self.score_rows(std::slice::from_ref(row))
                            .and_then(|mut r| {
                                r.pop().ok_or_else(|| ScoringError::ClassifierInvocation {
                                    reason: "classifier returned no result".to_string(),
                                })
                            })
                            .map(|result| scored(i, result))
                            .map_err(|e| RowError {
                                row: i.row,
                                reason: RowFailure::Scoring(e),
                            })
                    })
                    .collect()
            }
        }
    }

    fn score_rows(&self, rows: &[FeatureRow]) -> Result<Vec<ScoreResult>, ScoringError> {
        let (labels, proba) = self.classifier.classify(rows)?;
        if labels.len() != rows.len() || proba.len() != rows.len() {
            return Err(ScoringError::ClassifierInvocation {
                reason: format!(
                    "classifier returned {} labels and {} probabilities for {} rows",
                    labels.len(),
                    proba.len(),
                    rows.len()
                ),
            });
        }
        labels
            .into_iter()
            .zip(proba)
            .map(|(label, p)| self.result(label, p[1]))
            .collect()
    }

    fn result(&self, label: u8, p: f64) -> Result<ScoreResult, ScoringError> {
        if label > 1 {
            return Err(ScoringError::ClassifierInvocation {
                reason: format!("label {label} is not 0 or 1"),
            });
        }
        if !p.is_finite() || p < -PROBABILITY_EPSILON || p > 1.0 + PROBABILITY_EPSILON {
            return Err(ScoringError::ClassifierInvocation {
                reason: format!("probability {p} outside [0, 1]"),
            });
        }
        let probability = p.clamp(0.0, 1.0);
        let tier = RiskTier::from_probability(probability, &self.risk);
        Ok(ScoreResult {
            label,
            probability,
            tier,
            action: RecommendedAction::for_tier(tier),
        })
    }
}

fn scored(input: &ScoringInput, result: ScoreResult) -> ScoredRow {
    ScoredRow {
        row: input.row,
        record: input.record.clone(),
        cells: input.cells.clone(),
        result,
    }
}
