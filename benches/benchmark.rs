use criterion::{criterion_group, criterion_main, Criterion};
use news_classifier::{Document, Pipeline, PipelineConfig, PredictionEngine, TfIdfVectorizer};

const WORDS: [&str; 16] = [
    "pemerintah", "wajib", "denda", "jalan", "tol", "viral", "resmi", "penjara", "anggaran",
    "sebarkan", "laporan", "heboh", "program", "rahasia", "kementerian", "segera",
];

fn synthetic_corpus(n: usize) -> Vec<Document> {
    (0..n)
        .map(|i| {
            let label = if i % 2 == 0 { "hoax" } else { "valid" };
            let offset = if i % 2 == 0 { 0 } else { 8 };
            let text: Vec<&str> = (0..12).map(|j| WORDS[offset + (i * 5 + j * 3) % 8]).collect();
            Document::new(label, text.join(" "))
        })
        .collect()
}

fn pipeline_benchmark(c: &mut Criterion) {
    let docs = synthetic_corpus(2_000);

    c.bench_function("vectorizer_fit_transform", |b| {
        b.iter(|| {
            let mut vectorizer: TfIdfVectorizer = TfIdfVectorizer::new();
            vectorizer.fit(&docs).unwrap();
            vectorizer.transform_batch(&docs).unwrap()
        });
    });

    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    c.bench_function("pipeline_fit", |b| {
        b.iter(|| pipeline.fit(&docs).unwrap());
    });

    let engine = PredictionEngine::new(pipeline.fit(&docs).unwrap().artifact);
    c.bench_function("predict", |b| {
        b.iter(|| engine.predict("Semua warga wajib membayar denda atau akan dipenjara"));
    });
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
