use criterion::{black_box, criterion_group, criterion_main, Criterion};
use medi_cardio::{
    encode, Activation, ClassifierArtifact, DenseLayer, DenseNetwork, InferenceAdapter,
    PatientRecord, ScalerArtifact, StandardScaler, FEATURE_COUNT,
};

fn bench_assess(c: &mut Criterion) {
    let hidden = DenseLayer {
        units: 16,
        activation: Activation::Relu,
        kernel: vec![vec![0.05; 16]; FEATURE_COUNT],
        bias: vec![0.0; 16],
    };
    let output = DenseLayer {
        units: 1,
        activation: Activation::Sigmoid,
        kernel: vec![vec![0.1]; 16],
        bias: vec![-0.3],
    };
    let network = DenseNetwork::new("bench", vec![hidden, output]).expect("valid network");
    let adapter = InferenceAdapter::new(
        ScalerArtifact::Standard(StandardScaler::new(
            [1.0; FEATURE_COUNT],
            [2.0; FEATURE_COUNT],
        )),
        ClassifierArtifact::Dense(network),
    );
    let features = encode(&PatientRecord::default());

    c.bench_function("assess_single_patient", |b| {
        b.iter(|| adapter.assess(black_box(&features)))
    });
}

criterion_group!(benches, bench_assess);
criterion_main!(benches);
