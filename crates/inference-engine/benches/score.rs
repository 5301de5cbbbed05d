use criterion::{black_box, criterion_group, criterion_main, Criterion};
use inference_engine::{
    ArtifactModel, ClassLabel, ComponentSlots, JsonComponent, ScoringPipeline, TrainedComponents,
};
use std::sync::Arc;
use url_features::{extract, FEATURE_DIMENSION};

fn trained_components() -> TrainedComponents {
    let scaler = JsonComponent::new(
        "scaler",
        ArtifactModel::StandardScaler {
            mean: vec![10.0; FEATURE_DIMENSION],
            scale: vec![5.0; FEATURE_DIMENSION],
        },
    )
    .unwrap();
    let classifier = JsonComponent::new(
        "phishing_model",
        ArtifactModel::LogisticRegression {
            coef: vec![0.1; FEATURE_DIMENSION],
            intercept: -1.0,
            classes: vec![ClassLabel::Int(0), ClassLabel::Int(1)],
        },
    )
    .unwrap();

    TrainedComponents::resolve(ComponentSlots {
        scaler: Some(Arc::new(scaler)),
        classifier: Some(Arc::new(classifier)),
        ..Default::default()
    })
}

fn bench_score(c: &mut Criterion) {
    let features = extract("http://192.168.10.4/secure/login.php?user=admin&next=%2Faccount");

    let heuristic = ScoringPipeline::new(Arc::new(TrainedComponents::empty()));
    c.bench_function("score_heuristic", |b| {
        b.iter(|| heuristic.score(black_box(&features)))
    });

    let trained = ScoringPipeline::new(Arc::new(trained_components()));
    c.bench_function("score_trained_linear", |b| {
        b.iter(|| trained.score(black_box(&features)))
    });
}

criterion_group!(benches, bench_score);
criterion_main!(benches);
