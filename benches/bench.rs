//! Criterion benchmarks for akar.
//!
//! Covers stemming, normalization, vectorization with classification, and
//! the cached pipeline.

use std::hint::black_box;
use std::path::PathBuf;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};

use akar::analysis::analyzer::Normalizer;
use akar::analysis::token_filter::StopFilter;
use akar::artifacts::{Artifacts, load_stemmer};
use akar::config::PipelineConfig;
use akar::ml::tfidf::FitOptions;
use akar::ml::training::{load_training_data, train};
use akar::pipeline::orchestrator::Pipeline;
use akar::stemming::Stemmer;

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

fn config() -> PipelineConfig {
    PipelineConfig::default().with_dictionary(data_path("kata-dasar.txt"))
}

/// Generate affixed Indonesian words for benchmarking.
fn generate_words(count: usize) -> Vec<String> {
    let roots = [
        "ajar", "ambil", "beli", "buku", "cari", "dengar", "hasil", "ikan", "jual", "kirim",
        "lihat", "main", "makan", "olah", "pakai", "rawat", "tanam", "tani", "tulis", "ukur",
    ];
    let affixes = [
        ("", ""),
        ("ber", ""),
        ("me", "kan"),
        ("di", "i"),
        ("pe", "an"),
        ("ke", "an"),
        ("memper", "kan"),
        ("ter", "nya"),
    ];

    (0..count)
        .map(|i| {
            let (prefix, suffix) = affixes[(i * 7) % affixes.len()];
            format!("{prefix}{}{suffix}", roots[(i * 13) % roots.len()])
        })
        .collect()
}

/// Generate sentences from affixed words.
fn generate_texts(count: usize) -> Vec<String> {
    let words = generate_words(count * 12);
    words
        .chunks(12)
        .enumerate()
        .map(|(i, chunk)| format!("{} nomor {i}", chunk.join(" dan ")))
        .collect()
}

fn bench_stemming(c: &mut Criterion) {
    let mut group = c.benchmark_group("stemming");

    let stemmer = load_stemmer(&config()).unwrap();
    let words = generate_words(1000);

    group.bench_function("stem_single_word", |b| {
        b.iter(|| black_box(stemmer.stem(black_box("memperdengarkan"))))
    });

    group.throughput(Throughput::Elements(words.len() as u64));
    group.bench_function("stem_word_list", |b| {
        b.iter(|| {
            for word in &words {
                black_box(stemmer.stem(black_box(word)));
            }
        })
    });

    group.finish();
}

fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");

    let config = config();
    let stemmer = Arc::new(load_stemmer(&config).unwrap());
    let normalizer =
        Normalizer::new(&config.analysis, stemmer.clone(), StopFilter::new()).unwrap();
    let samples = load_training_data(data_path("training.json")).unwrap();
    let (vectorizer, model, _) = train(&samples, &normalizer, &FitOptions::default()).unwrap();
    let classifier = model.into_classifier();
    let texts = generate_texts(200);

    group.bench_function("normalize", |b| {
        b.iter(|| black_box(normalizer.normalize(black_box(&texts[0])).unwrap()))
    });

    group.bench_function("vectorize_and_classify", |b| {
        let document = normalizer.normalize(&texts[0]).unwrap();
        b.iter(|| {
            let vector = vectorizer.vectorize(black_box(&document));
            black_box(classifier.classify(&vector).unwrap())
        })
    });

    let artifacts = Arc::new(
        Artifacts::from_parts(stemmer, StopFilter::new(), vectorizer, classifier).unwrap(),
    );
    let pipeline = Pipeline::new(artifacts, &config).unwrap();

    group.bench_function("run_cached", |b| {
        pipeline.run(&texts[0]).unwrap();
        b.iter(|| black_box(pipeline.run(black_box(&texts[0])).unwrap()))
    });

    group.throughput(Throughput::Elements(texts.len() as u64));
    group.bench_function("normalize_batch", |b| {
        b.iter(|| black_box(normalizer.normalize_batch(black_box(&texts))))
    });

    group.finish();
}

criterion_group!(benches, bench_stemming, bench_classification);

criterion_main!(benches);
