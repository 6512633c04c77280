//! Pipeline benchmark: customer table → validation → scoring → report, serial and parallel.

use churn_scorer::config::{BatchConfig, EngineConfig};
use churn_scorer::features::FeatureTable;
use churn_scorer::model::LogisticClassifier;
use churn_scorer::pipeline::ChurnPipeline;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

const HEADER: &str = "CustomerID,Age,Gender,Tenure,Usage Frequency,Support Calls,\
    Payment Delay,Subscription Type,Contract Length,Total Spend,Last Interaction";

fn make_table(n: usize) -> FeatureTable {
    let headers = HEADER.split(',').map(str::to_string).collect();
    let mut t = FeatureTable::new(headers);
    let subs = ["Basic", "Standard", "Premium"];
    let contracts = ["Monthly", "Quarterly", "Annual"];
    for i in 0..n {
        t.push_row(vec![
            format!("C{}", i),
            (18 + i % 70).to_string(),
            if i % 2 == 0 { "Male" } else { "Female" }.to_string(),
            (i % 60).to_string(),
            (i % 30).to_string(),
            (i % 10).to_string(),
            (i % 30).to_string(),
            subs[i % 3].to_string(),
            contracts[i % 3].to_string(),
            format!("{:.2}", 100.0 + (i % 900) as f64),
            (i % 365).to_string(),
        ]);
    }
    t
}

fn pipeline(parallel: bool) -> ChurnPipeline {
    let mut config = EngineConfig::default();
    config.batch = BatchConfig {
        parallel,
        min_parallel_rows: 1,
        chunk_size: 256,
    };
    let model = LogisticClassifier::new(
        vec![0.02, 0.1, -0.05, -0.01, 0.3, 0.04, -0.2, -0.4, -0.0005, 0.01],
        -1.5,
    );
    ChurnPipeline::from_config(&config, Arc::new(model)).unwrap()
}

fn bench_assess_table(c: &mut Criterion) {
    let table = make_table(10_000);
    let mut g = c.benchmark_group("assess_table_10k");
    for parallel in [false, true] {
        let p = pipeline(parallel);
        let name = if parallel { "parallel" } else { "serial" };
        g.bench_function(name, |b| b.iter(|| black_box(p.assess_table(black_box(&table)))));
    }
    g.finish();
}

fn bench_export(c: &mut Criterion) {
    let report = pipeline(true).assess_table(&make_table(10_000));
    c.bench_function("report_to_csv_10k", |b| {
        b.iter(|| black_box(report.to_csv_string()).unwrap())
    });
}

criterion_group!(benches, bench_assess_table, bench_export);
criterion_main!(benches);
