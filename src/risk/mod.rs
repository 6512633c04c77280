//! Risk scoring: classifier output → tier → retention action, plus batch aggregation.

mod engine;
mod report;

pub use engine::{RecommendedAction, RiskTier, ScoreResult, ScoringEngine, ScoringInput};
pub use report::{
    BatchReport, BatchSummary, BatchWarning, ScoredRow, TierDistribution, REPORT_COLUMNS,
};
