//! Structured logging setup and ndjson summary lines.

mod format;

pub use format::{StructuredLogger, SummaryLine};
