//! Engine configuration. Thresholds and batch tuning are policy, not learned.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Classifier artifact
    pub model: ModelConfig,
    /// Risk tier thresholds
    pub risk: RiskConfig,
    /// Input record validation policy
    pub validation: ValidationConfig,
    /// Batch scoring execution
    pub batch: BatchConfig,
    /// Logging
    pub log: LogConfig,
    /// Customer table read by the driver binary
    pub input_path: Option<PathBuf>,
    /// Report destination; stdout when unset
    pub output_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Onnx,
    Logistic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub kind: ModelKind,
    /// Path to the exported model (ONNX graph or logistic JSON)
    pub path: PathBuf,
    /// ONNX intra-op threads
    pub onnx_threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Probability at or above this is high risk (0.0–1.0)
    pub high_threshold: f64,
    /// Probability at or above this is medium risk
    pub medium_threshold: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Require exact spelling for categorical values (`Basic`, not `basic`)
    pub case_sensitive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Score chunks on the rayon pool
    pub parallel: bool,
    /// Below this many rows a batch is scored on the calling thread
    pub min_parallel_rows: usize,
    /// Rows per classifier call
    pub chunk_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::Onnx,
            path: PathBuf::from("model/churn_model.onnx"),
            onnx_threads: 1,
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            high_threshold: 0.7,
            medium_threshold: 0.4,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_rows: 1024,
            chunk_size: 256,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = 0.0 <= self.medium_threshold
            && self.medium_threshold <= self.high_threshold
            && self.high_threshold <= 1.0;
        if !ordered {
            return Err(ConfigError::Thresholds {
                medium: self.medium_threshold,
                high: self.high_threshold,
            });
        }
        Ok(())
    }
}

impl EngineConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(data) => match serde_json::from_str::<EngineConfig>(&data) {
                    Ok(c) => return c,
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "invalid config; using defaults"
                        )
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "unreadable config; using defaults"
                    )
                }
            }
        }
        Self::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.risk.validate()?;
        if self.batch.chunk_size == 0 {
            return Err(ConfigError::ChunkSize);
        }
        Ok(())
    }
}
