//! Inference benchmark: encoded rows → logistic classifier labels and probabilities.

use churn_scorer::features::FeatureRow;
use churn_scorer::model::{Classifier, LogisticClassifier};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn model() -> LogisticClassifier {
    LogisticClassifier::new(
        vec![0.02, 0.1, -0.05, -0.01, 0.3, 0.04, -0.2, -0.4, -0.0005, 0.01],
        -1.5,
    )
}

fn rows(n: usize) -> Vec<FeatureRow> {
    (0..n)
        .map(|i| FeatureRow {
            values: vec![
                30.0 + (i % 50) as f32,
                (i % 2) as f32,
                (i % 60) as f32,
                10.0,
                (i % 10) as f32,
                (i % 30) as f32,
                (i % 3) as f32,
                (i % 3) as f32,
                500.0 + i as f32,
                (i % 90) as f32,
            ],
        })
        .collect()
}

fn bench_single_row(c: &mut Criterion) {
    let m = model();
    let row = rows(1);
    c.bench_function("logistic_classify_1_row", |b| {
        b.iter(|| m.classify(black_box(&row)))
    });
}

fn bench_by_batch_size(c: &mut Criterion) {
    let m = model();
    let mut g = c.benchmark_group("logistic_classify_by_rows");
    for n in [16, 256, 4096] {
        let batch = rows(n);
        g.bench_function(format!("rows_{}", n).as_str(), |b| {
            b.iter(|| m.classify(black_box(&batch)))
        });
    }
    g.finish();
}

criterion_group!(benches, bench_single_row, bench_by_batch_size);
criterion_main!(benches);
