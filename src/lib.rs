//! Churn Scorer — customer churn risk scoring and batch reporting.
//!
//! Modular structure:
//! - [`features`] — Feature schema, tabular input, boundary validation
//! - [`model`] — Classifier capability (ONNX, logistic)
//! - [`risk`] — Risk tiers, retention actions, batch aggregation and export
//! - [`pipeline`] — Validator + engine for single customers and whole tables
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod risk;

pub use config::EngineConfig;
pub use error::{EngineError, RowError, RowFailure, ScoringError, ValidationError};
pub use features::{FeatureRecord, FeatureTable, FeatureValidator, RawRecord};
pub use model::{Classifier, LogisticClassifier, OnnxClassifier};
pub use pipeline::ChurnPipeline;
pub use risk::{BatchReport, RecommendedAction, RiskTier, ScoreResult, ScoringEngine};
pub use logging::StructuredLogger;
