//! Error taxonomy. Validation and scoring failures are per record; in batch mode they are
//! attached to the row index and never abort the rest of the batch.

use serde::Serialize;
use thiserror::Error;

/// A raw record that does not fit the feature schema.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("field `{field}` has invalid value {value:?}: expected {expected}")]
    FieldDomain {
        field: &'static str,
        value: String,
        expected: String,
    },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField { field } => field,
            ValidationError::FieldDomain { field, .. } => field,
        }
    }
}

/// Failure raised by a classifier backend.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("input shape mismatch: expected {expected} columns, got {found}")]
    Shape { expected: usize, found: usize },

    #[error("model load failed: {0}")]
    Load(String),

    #[error("inference failed: {0}")]
    Backend(String),
}

impl From<ort::Error> for ClassifierError {
    fn from(e: ort::Error) -> Self {
        ClassifierError::Backend(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringError {
    #[error("schema mismatch: {detail}")]
    SchemaMismatch { detail: String },

    #[error("classifier invocation failed: {reason}")]
    ClassifierInvocation { reason: String },
}

impl From<ClassifierError> for ScoringError {
    fn from(e: ClassifierError) -> Self {
        let detail = e.to_string();
        match e {
            ClassifierError::Shape { .. } => ScoringError::SchemaMismatch { detail },
            _ => ScoringError::ClassifierInvocation { reason: detail },
        }
    }
}

/// Why one row of a batch was not scored.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "stage", content = "error", rename_all = "snake_case")]
pub enum RowFailure {
    #[error("malformed row: {0}")]
    Malformed(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// A rejected batch row: its 0-based position in the input and the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub reason: RowFailure,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("risk thresholds must satisfy 0 <= medium ({medium}) <= high ({high}) <= 1")]
    Thresholds { medium: f64, high: f64 },

    #[error("batch chunk_size must be at least 1")]
    ChunkSize,
}

/// Terminal failure of a single-record request or of the driver.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("table error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
