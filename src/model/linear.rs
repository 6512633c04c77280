//! Logistic regression over the encoded feature row. Loadable from a small JSON artifact:
//!
//! ```json
//! { "name": "churn-logit", "weights": [..10], "bias": -1.2, "means": [..], "scales": [..] }
//! ```

use super::{check_width, default_columns, Classifier};
use crate::error::ClassifierError;
use crate::features::FeatureRow;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticClassifier {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,
    pub weights: Vec<f64>,
    pub bias: f64,
    /// Per-column standardization; identity when absent
    #[serde(default)]
    pub means: Option<Vec<f64>>,
    #[serde(default)]
    pub scales: Option<Vec<f64>>,
    /// Probability at or above which the label is 1
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_name() -> String {
    "logistic".to_string()
}

fn default_threshold() -> f64 {
    0.5
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl LogisticClassifier {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self {
            name: default_name(),
            columns: default_columns(),
            weights,
            bias,
            means: None,
            scales: None,
            threshold: default_threshold(),
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ClassifierError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| ClassifierError::Load(format!("{}: {e}", path.display())))?;
        let model: Self = serde_json::from_str(&data)
            .map_err(|e| ClassifierError::Load(format!("{}: {e}", path.display())))?;
        model.check()?;
        Ok(model)
    }

    fn check(&self) -> Result<(), ClassifierError> {
        let dim = self.columns.len();
        let lens = [
            Some(self.weights.len()),
            self.means.as_ref().map(Vec::len),
            self.scales.as_ref().map(Vec::len),
        ];
        if let Some(bad) = lens.into_iter().flatten().find(|&n| n != dim) {
            return Err(ClassifierError::Load(format!(
                "parameter length {bad} does not match {dim} columns"
            )));
        }
        if let Some(s) = &self.scales {
            if s.iter().any(|&v| v == 0.0 || !v.is_finite()) {
                return Err(ClassifierError::Load("scales must be finite and non-zero".into()));
            }
        }
        Ok(())
    }

    fn churn_probability(&self, row: &FeatureRow) -> f64 {
        let z = row
            .as_slice()
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let mut x = x as f64;
                if let Some(m) = &self.means {
                    x -= m[i];
                }
                if let Some(s) = &self.scales {
                    x /= s[i];
                }
                x * self.weights[i]
            })
            .sum::<f64>()
            + self.bias;
        sigmoid(z)
    }
}

impl Classifier for LogisticClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_columns(&self) -> &[String] {
        &self.columns
    }

    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<u8>, ClassifierError> {
        self.check()?;
        check_width(rows, self.weights.len())?;
        Ok(rows
            .iter()
            .map(|r| u8::from(self.churn_probability(r) >= self.threshold))
            .collect())
    }

    fn predict_proba(&self, rows: &[FeatureRow]) -> Result<Vec<[f64; 2]>, ClassifierError> {
        self.check()?;
        check_width(rows, self.weights.len())?;
        Ok(rows
            .iter()
            .map(|r| {
                let p = self.churn_probability(r);
                [1.0 - p, p]
            })
            .collect())
    }
}
