//! Batch aggregation and the exportable report table.

use super::engine::{RiskTier, ScoreResult};
use crate::error::{EngineError, RowError};
use crate::features::FeatureRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use uuid::Uuid;

/// Derived columns appended to the original ones in the export.
pub const REPORT_COLUMNS: [&str; 3] = ["Churn_Predicted", "Churn_Probability", "Risk_Level"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRow {
    /// 0-based position in the submitted batch
    pub row: usize,
    pub record: FeatureRecord,
    /// Original cells, in report column order
    #[serde(skip)]
    pub cells: Vec<String>,
    pub result: ScoreResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BatchWarning {
    /// Nothing was scored; churn rate reported as 0
    EmptyBatch { submitted: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl TierDistribution {
    pub fn count(&self, tier: RiskTier) -> usize {
        match tier {
            RiskTier::Low => self.low,
            RiskTier::Medium => self.medium,
            RiskTier::High => self.high,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }

    /// Fraction of scored customers in `tier`; 0 when nothing was scored.
    pub fn share(&self, tier: RiskTier) -> f64 {
        match self.total() {
            0 => 0.0,
            n => self.count(tier) as f64 / n as f64,
        }
    }

    fn add(&mut self, tier: RiskTier) {
        match tier {
            RiskTier::Low => self.low += 1,
            RiskTier::Medium => self.medium += 1,
            RiskTier::High => self.high += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    /// Rows received, scored or not
    pub submitted: usize,
    /// Rows scored
    pub total: usize,
    /// Rows rejected by validation or scoring
    pub failed: usize,
    pub predicted_churners: usize,
    /// `predicted_churners / total`, 0 for an empty batch
    pub churn_rate: f64,
    pub tier_distribution: TierDistribution,
}

impl BatchSummary {
    pub fn from_results<'a>(
        results: impl IntoIterator<Item = &'a ScoreResult>,
        failed: usize,
    ) -> Self {
        let mut total = 0;
        let mut predicted_churners = 0;
        let mut tier_distribution = TierDistribution::default();
        for r in results {
            total += 1;
            if r.is_churn() {
                predicted_churners += 1;
            }
            tier_distribution.add(r.tier);
        }
        let churn_rate = if total == 0 {
            0.0
        } else {
            predicted_churners as f64 / total as f64
        };
        Self {
            submitted: total + failed,
            total,
            failed,
            predicted_churners,
            churn_rate,
            tier_distribution,
        }
    }
}

/// Immutable result of one batch submission.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    columns: Vec<String>,
    rows: Vec<ScoredRow>,
    errors: Vec<RowError>,
    warnings: Vec<BatchWarning>,
    summary: BatchSummary,
}

impl BatchReport {
    pub fn new(columns: Vec<String>, rows: Vec<ScoredRow>, errors: Vec<RowError>) -> Self {
        let summary = BatchSummary::from_results(rows.iter().map(|r| &r.result), errors.len());
        let id = Uuid::new_v4();
        let mut warnings = Vec::new();
        if summary.total == 0 {
            tracing::warn!(
                batch_id = %id,
                submitted = summary.submitted,
                "empty batch; churn rate reported as 0"
            );
            warnings.push(BatchWarning::EmptyBatch {
                submitted: summary.submitted,
            });
        }
        Self {
            id,
            generated_at: Utc::now(),
            columns,
            rows,
            errors,
            warnings,
            summary,
        }
    }

    /// Original columns, without the derived ones.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[ScoredRow] {
        &self.rows
    }

    pub fn errors(&self) -> &[RowError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[BatchWarning] {
        &self.warnings
    }

    pub fn summary(&self) -> &BatchSummary {
        &self.summary
    }

    /// Export header: original columns, then `Churn_Predicted`, `Churn_Probability`, `Risk_Level`.
    pub fn header(&self) -> Vec<String> {
        self.columns
            .iter()
            .cloned()
            .chain(REPORT_COLUMNS.iter().map(|c| c.to_string()))
            .collect()
    }

    /// Write scored rows as CSV in input order. Rejected rows are listed by
    /// [`BatchReport::write_errors_csv`] instead.
    pub fn write_csv<W: Write>(&self, w: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(w);
        wtr.write_record(self.header())?;
        for r in &self.rows {
            let derived = [
                r.result.label.to_string(),
                r.result.probability.to_string(),
                r.result.tier.to_string(),
            ];
            let cells = r.cells.iter().chain(derived.iter()).map(String::as_str);
            wtr.write_record(cells)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, EngineError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
    }

    /// `Row,Error` lines for every rejected row.
    pub fn write_errors_csv<W: Write>(&self, w: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(w);
        wtr.write_record(["Row", "Error"])?;
        for e in &self.errors {
            wtr.write_record([e.row.to_string(), e.reason.to_string()])?;
        }
        wtr.flush()?;
        Ok(())
    }
}
