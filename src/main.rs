//! Churn scorer entrypoint: scores one customer table and writes the report.
//! Config path from CHURN_CONFIG_PATH (default `config.json`); the classifier is loaded once
//! and handed to the pipeline.

use churn_scorer::{
    config::EngineConfig,
    features::FeatureTable,
    logging::{StructuredLogger, SummaryLine},
    model,
    pipeline::ChurnPipeline,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("CHURN_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let config = EngineConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);
    config.validate()?;

    info!(config = %config_path.display(), "churn scorer starting");

    let classifier = model::load(&config.model)?;
    let pipeline = ChurnPipeline::from_config(&config, classifier)?;

    let input_path = config
        .input_path
        .as_ref()
        .ok_or("input_path is not configured")?;
    let table = FeatureTable::from_csv_reader(BufReader::new(File::open(input_path)?))?;
    info!(path = %input_path.display(), rows = table.len(), "customer table loaded");

    let report = pipeline.assess_table(&table);

    match &config.output_path {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            report.write_csv(&mut out)?;
            out.flush()?;
            info!(path = %path.display(), rows = report.rows().len(), "report written");
        }
        None => report.write_csv(std::io::stdout().lock())?,
    }

    StructuredLogger::emit_json(&SummaryLine::from_report(&report), &mut std::io::stderr())?;
    Ok(())
}
