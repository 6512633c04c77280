//! ONNX Runtime inference for an exported churn classifier.
//! Input: [N, 10] f32 in training column order. Outputs: int64 labels [N] and
//! class probabilities [N, 2] (sklearn export with zipmap disabled).

use super::{check_width, default_columns, Classifier};
use crate::error::ClassifierError;
use crate::features::{FeatureRow, FEATURE_DIM};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;

/// Input columns implied by the graph's input dims. A dynamic (or absent) feature
/// dimension is taken to be the training schema; a fixed one of another width gets
/// positional names so the engine's schema check rejects it before any run.
fn graph_columns(dims: &[i64]) -> Vec<String> {
    match dims.last() {
        Some(&n) if n > 0 && n as usize != FEATURE_DIM => {
            (0..n).map(|i| format!("input_{i}")).collect()
        }
        _ => default_columns(),
    }
}

fn missing_output(name: &str) -> ClassifierError {
    ClassifierError::Backend(format!("missing output {name}"))
}

pub struct OnnxClassifier {
    name: String,
    // run() needs exclusive access to the session
    session: Mutex<Session>,
    input_name: String,
    label_output: String,
    proba_output: String,
    columns: Vec<String>,
}

impl OnnxClassifier {
    /// Load model from path. A missing file is an error: scoring never runs without a model.
    pub fn load(path: &Path, threads: usize) -> Result<Self, ClassifierError> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "ONNX model not found");
            return Err(ClassifierError::Load(format!(
                "model not found: {}",
                path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| ClassifierError::Load(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ClassifierError::Load(e.to_string()))?
            .with_intra_threads(threads.max(1))
            .map_err(|e| ClassifierError::Load(e.to_string()))?
            .commit_from_file(path)
            .map_err(|e| ClassifierError::Load(format!("{}: {e}", path.display())))?;

        let input = session.inputs.first();
        let input_name = input
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());
        let dims: Vec<i64> = input
            .and_then(|i| i.input_type.tensor_shape())
            .map(|shape| shape.iter().copied().collect())
            .unwrap_or_default();
        let columns = graph_columns(&dims);
        if columns.len() != FEATURE_DIM {
            tracing::warn!(
                path = %path.display(),
                width = columns.len(),
                expected = FEATURE_DIM,
                "ONNX input width does not match the feature schema"
            );
        }

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let label_output = output_names
            .iter()
            .find(|n| n.contains("label"))
            .or_else(|| output_names.first())
            .cloned()
            .unwrap_or_else(|| "label".to_string());
        let proba_output = output_names
            .iter()
            .find(|n| n.contains("prob"))
            .or_else(|| output_names.last())
            .cloned()
            .unwrap_or_else(|| "probabilities".to_string());

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onnx".to_string());

        tracing::debug!(
            model = %name,
            input = %input_name,
            label = %label_output,
            proba = %proba_output,
            "ONNX session ready"
        );

        Ok(Self {
            name,
            session: Mutex::new(session),
            input_name,
            label_output,
            proba_output,
            columns,
        })
    }

    fn input_tensor(&self, rows: &[FeatureRow]) -> Result<Tensor<f32>, ClassifierError> {
        let dim = self.columns.len();
        check_width(rows, dim)?;
        let mut data = Vec::with_capacity(rows.len() * dim);
        for r in rows {
            data.extend_from_slice(r.as_slice());
        }
        let shape = vec![rows.len() as i64, dim as i64];
        Ok(Tensor::from_array((shape, data))?)
    }

    /// Run the graph once and copy out both heads.
    fn run(&self, rows: &[FeatureRow]) -> Result<(Vec<u8>, Vec<[f64; 2]>), ClassifierError> {
        if rows.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }
        let input = self.input_tensor(rows)?;
        let mut session = self
            .session
            .lock()
            .map_err(|e| ClassifierError::Backend(format!("session lock poisoned: {e}")))?;
        let outputs = session.run(ort::inputs![self.input_name.as_str() => input])?;

        let labels = outputs
            .get(self.label_output.as_str())
            .ok_or_else(|| missing_output(&self.label_output))?
            .try_extract_tensor::<i64>()?
            .1
            .iter()
            // out-of-range labels are rejected by the scoring engine
            .map(|&l| u8::try_from(l).unwrap_or(u8::MAX))
            .collect::<Vec<_>>();

        let (shape, data) = outputs
            .get(self.proba_output.as_str())
            .ok_or_else(|| missing_output(&self.proba_output))?
            .try_extract_tensor::<f32>()?;
        let classes = match shape.len() {
            2 => shape[1] as usize,
            _ => 1,
        };
        let proba: Vec<[f64; 2]> = match classes {
            2 => data
                .chunks_exact(2)
                .map(|c| [c[0] as f64, c[1] as f64])
                .collect(),
            1 => data.iter().map(|&p| [1.0 - p as f64, p as f64]).collect(),
            n => {
                return Err(ClassifierError::Backend(format!(
                    "expected 2 probability columns, got {n}"
                )))
            }
        };
        Ok((labels, proba))
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_columns(&self) -> &[String] {
        &self.columns
    }

    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<u8>, ClassifierError> {
        self.run(rows).map(|(labels, _)| labels)
    }

    fn predict_proba(&self, rows: &[FeatureRow]) -> Result<Vec<[f64; 2]>, ClassifierError> {
        self.run(rows).map(|(_, proba)| proba)
    }

    fn classify(&self, rows: &[FeatureRow]) -> Result<(Vec<u8>, Vec<[f64; 2]>), ClassifierError> {
        self.run(rows)
    }
}
