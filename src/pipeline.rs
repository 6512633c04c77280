//! Validator + scoring engine: raw input → validated records → scores → report.

use crate::config::EngineConfig;
use crate::error::{EngineError, RowError};
use crate::features::{FeatureTable, FeatureValidator, RawRecord};
use crate::model::Classifier;
use crate::risk::{BatchReport, ScoreResult, ScoringEngine, ScoringInput};
use std::sync::Arc;

pub struct ChurnPipeline {
    validator: FeatureValidator,
    engine: ScoringEngine,
}

impl ChurnPipeline {
    pub fn new(validator: FeatureValidator, engine: ScoringEngine) -> Self {
        Self { validator, engine }
    }

    /// Wire a pipeline around an already-loaded classifier.
    pub fn from_config(
        config: &EngineConfig,
        classifier: Arc<dyn Classifier>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::new(
            FeatureValidator::new(config.validation.clone()),
            ScoringEngine::new(classifier, config.risk.clone(), config.batch.clone()),
        ))
    }

    pub fn validator(&self) -> &FeatureValidator {
        &self.validator
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Single customer: any validation or scoring failure ends the request.
    pub fn assess(&self, raw: &RawRecord) -> Result<ScoreResult, EngineError> {
        let record = self.validator.validate(raw)?;
        let result = self.engine.score(&record)?;
        tracing::debug!(
            label = result.label,
            probability = result.probability,
            tier = %result.tier,
            "customer scored"
        );
        Ok(result)
    }

    /// Whole table: bad rows are reported by index, the rest are scored.
    pub fn assess_table(&self, table: &FeatureTable) -> BatchReport {
        let mut readable = Vec::with_capacity(table.len());
        let mut errors: Vec<RowError> = Vec::new();
        for (row, outcome) in table.raw_records().into_iter().enumerate() {
            match outcome {
                Ok(raw) => readable.push((row, raw)),
                Err(e) => errors.push(e),
            }
        }

        let batch = self
            .validator
            .validate_rows(readable.iter().map(|(row, raw)| (*row, raw)));
        errors.extend(batch.errors);
        let inputs = batch
            .records
            .into_iter()
            .map(|v| ScoringInput {
                cells: table.rows()[v.row].clone(),
                row: v.row,
                record: v.record,
            })
            .collect();

        self.engine
            .score_inputs(table.headers().to_vec(), inputs, errors)
    }
}
