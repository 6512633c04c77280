//! Pre-trained binary churn classifiers.
//!
//! A classifier is loaded once at startup and shared read-only (`Arc<dyn Classifier>`) by
//! every scoring call for the lifetime of the process.

mod linear;
mod onnx;

pub use linear::LogisticClassifier;
pub use onnx::OnnxClassifier;

use crate::config::{ModelConfig, ModelKind};
use crate::error::ClassifierError;
use crate::features::{FeatureRow, FEATURE_COLUMNS};
use std::sync::Arc;

pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    /// Column names the model was trained on, in input order.
    fn input_columns(&self) -> &[String];

    /// Hard labels, one of {0, 1} per row.
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<u8>, ClassifierError>;

    /// `[p_no_churn, p_churn]` per row.
    fn predict_proba(&self, rows: &[FeatureRow]) -> Result<Vec<[f64; 2]>, ClassifierError>;

    /// Labels and probabilities together; backends that compute both in one pass override this.
    fn classify(&self, rows: &[FeatureRow]) -> Result<(Vec<u8>, Vec<[f64; 2]>), ClassifierError> {
        Ok((self.predict(rows)?, self.predict_proba(rows)?))
    }
}

/// Training column names as owned strings, for classifiers built against this schema.
pub fn default_columns() -> Vec<String> {
    FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect()
}

pub(crate) fn check_width(rows: &[FeatureRow], expected: usize) -> Result<(), ClassifierError> {
    match rows.iter().find(|r| r.len() != expected) {
        Some(r) => Err(ClassifierError::Shape {
            expected,
            found: r.len(),
        }),
        None => Ok(()),
    }
}

/// Load the configured classifier.
pub fn load(config: &ModelConfig) -> Result<Arc<dyn Classifier>, ClassifierError> {
    let classifier: Arc<dyn Classifier> = match config.kind {
        ModelKind::Onnx => Arc::new(OnnxClassifier::load(&config.path, config.onnx_threads)?),
        ModelKind::Logistic => Arc::new(LogisticClassifier::from_json_file(&config.path)?),
    };
    tracing::info!(
        model = classifier.name(),
        path = %config.path.display(),
        kind = ?config.kind,
        "classifier loaded"
    );
    Ok(classifier)
}
