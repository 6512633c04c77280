//! JSON log lines: one JSON object per line (ndjson) for ingestion and audit.

use crate::risk::{BatchReport, BatchSummary};
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Summary line written once per scored batch
#[derive(Serialize)]
pub struct SummaryLine<'a> {
    pub ts: String,
    pub batch_id: String,
    #[serde(flatten)]
    pub summary: &'a BatchSummary,
    pub low_share: f64,
    pub medium_share: f64,
    pub high_share: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_error: Option<String>,
}

impl<'a> SummaryLine<'a> {
    pub fn from_report(report: &'a BatchReport) -> Self {
        let summary = report.summary();
        let d = &summary.tier_distribution;
        Self {
            ts: report.generated_at.to_rfc3339(),
            batch_id: report.id.to_string(),
            summary,
            low_share: d.share(crate::risk::RiskTier::Low),
            medium_share: d.share(crate::risk::RiskTier::Medium),
            high_share: d.share(crate::risk::RiskTier::High),
            first_error: report
                .errors()
                .first()
                .map(|e| format!("row {}: {}", e.row, e.reason)),
        }
    }
}

pub struct StructuredLogger;

impl StructuredLogger {
    /// Install global subscriber, level from RUST_LOG or default. Logs go to stderr so
    /// stdout stays free for the report. Returns false if a subscriber was already set.
    pub fn init(json: bool, default_level: &str) -> bool {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        if json {
            let fmt = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt)
                .try_init()
                .is_ok()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()
                .is_ok()
        }
    }

    /// Emit a single structured line without going through tracing
    pub fn emit_json(event: &impl Serialize, w: &mut impl Write) -> std::io::Result<()> {
        let line = serde_json::to_string(event).map_err(std::io::Error::from)?;
        writeln!(w, "{}", line)
    }
}
