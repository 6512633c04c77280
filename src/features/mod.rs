//! Customer feature schema and boundary validation: raw text → typed record → model row.

mod record;
mod table;
mod validator;

pub use record::{ContractLength, FeatureRecord, Gender, SubscriptionTier, FEATURE_COLUMNS};
pub use table::{FeatureTable, RawRecord};
pub use validator::{FeatureValidator, ValidatedBatch, ValidatedRow};

use serde::{Deserialize, Serialize};

/// Number of model input columns
pub const FEATURE_DIM: usize = FEATURE_COLUMNS.len();

/// One classifier input row, values in training column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub values: Vec<f32>,
}

impl FeatureRow {
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
