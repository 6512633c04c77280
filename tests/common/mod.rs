//! Stub classifiers and fixtures shared by the integration tests.
#![allow(dead_code)]

use churn_scorer::error::ClassifierError;
use churn_scorer::features::FeatureRow;
use churn_scorer::model::{default_columns, Classifier};
use churn_scorer::RawRecord;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Column indices into an encoded row
pub const SUPPORT_CALLS: usize = 4;
pub const TOTAL_SPEND: usize = 8;

/// Churn probability computed from the encoded row; label is `p >= 0.5`.
pub struct StubClassifier {
    columns: Vec<String>,
    proba: Box<dyn Fn(&FeatureRow) -> f64 + Send + Sync>,
    /// Rows with this many support calls make the whole call fail
    poison_support_calls: Option<f32>,
    pub calls: AtomicUsize,
}

impl StubClassifier {
    pub fn new(proba: impl Fn(&FeatureRow) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            columns: default_columns(),
            proba: Box::new(proba),
            poison_support_calls: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always the same probability
    pub fn constant(p: f64) -> Self {
        Self::new(move |_| p)
    }

    /// Probability taken from Total Spend / 1000, so tests pick it per row.
    pub fn spend_driven() -> Self {
        Self::new(|r| r.values[TOTAL_SPEND] as f64 / 1000.0)
    }

    pub fn poisoned(mut self, support_calls: f32) -> Self {
        self.poison_support_calls = Some(support_calls);
        self
    }

    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    fn check(&self, rows: &[FeatureRow]) -> Result<(), ClassifierError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(bad) = self.poison_support_calls {
            if rows.iter().any(|r| r.values[SUPPORT_CALLS] == bad) {
                return Err(ClassifierError::Backend("incompatible feature shape".into()));
            }
        }
        Ok(())
    }
}

impl Classifier for StubClassifier {
    fn name(&self) -> &str {
        "stub"
    }

    fn input_columns(&self) -> &[String] {
        &self.columns
    }

    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<u8>, ClassifierError> {
        self.check(rows)?;
        Ok(rows.iter().map(|r| u8::from((self.proba)(r) >= 0.5)).collect())
    }

    fn predict_proba(&self, rows: &[FeatureRow]) -> Result<Vec<[f64; 2]>, ClassifierError> {
        self.check(rows)?;
        Ok(rows
            .iter()
            .map(|r| {
                let p = (self.proba)(r);
                [1.0 - p, p]
            })
            .collect())
    }
}

/// Returns a fixed, possibly malformed, output regardless of input.
pub struct BrokenClassifier {
    pub label: u8,
    pub probability: f64,
    pub drop_rows: bool,
}

impl Classifier for BrokenClassifier {
    fn name(&self) -> &str {
        "broken"
    }

    fn input_columns(&self) -> &[String] {
        static COLS: std::sync::OnceLock<Vec<String>> = std::sync::OnceLock::new();
        COLS.get_or_init(default_columns)
    }

    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<u8>, ClassifierError> {
        let n = if self.drop_rows { 0 } else { rows.len() };
        Ok(vec![self.label; n])
    }

    fn predict_proba(&self, rows: &[FeatureRow]) -> Result<Vec<[f64; 2]>, ClassifierError> {
        Ok(vec![[1.0 - self.probability, self.probability]; rows.len()])
    }
}

/// The reference customer: 45-year-old male on a monthly Basic plan.
pub fn sample_pairs() -> Vec<(&'static str, String)> {
    vec![
        ("Age", "45".to_string()),
        ("Gender", "Male".to_string()),
        ("Tenure", "2".to_string()),
        ("Usage Frequency", "5".to_string()),
        ("Support Calls", "8".to_string()),
        ("Payment Delay", "30".to_string()),
        ("Subscription Type", "Basic".to_string()),
        ("Contract Length", "Monthly".to_string()),
        ("Total Spend", "120.0".to_string()),
        ("Last Interaction", "60".to_string()),
    ]
}

pub fn sample_raw() -> RawRecord {
    sample_pairs().into_iter().collect()
}

/// The reference customer with one cell replaced.
pub fn raw_with(column: &str, value: &str) -> RawRecord {
    sample_pairs()
        .into_iter()
        .map(|(k, v)| if k == column { (k, value.to_string()) } else { (k, v) })
        .collect()
}

/// The reference customer with one column dropped.
pub fn raw_without(column: &str) -> RawRecord {
    sample_pairs().into_iter().filter(|(k, _)| *k != column).collect()
}

pub const HEADER: &str = "CustomerID,Age,Gender,Tenure,Usage Frequency,Support Calls,\
    Payment Delay,Subscription Type,Contract Length,Total Spend,Last Interaction";
