//! Criterion benchmarks for the flare classification pipeline:
//! - Tweet analysis
//! - TF-IDF fitting and transformation
//! - Logistic regression training
//! - Splitting and scoring

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use flare::analysis::analyzer::{Analyzer, TweetAnalyzer};
use flare::ml::logistic::{LogisticRegression, TrainingConfig};
use flare::ml::metrics::score;
use flare::ml::split::{SplitConfig, split};
use flare::ml::vectorizer::{TfIdfVectorizer, VectorizerConfig};
use std::hint::black_box;

const DISASTER_WORDS: &[&str] = &[
    "fire", "flood", "earthquake", "evacuation", "wildfire", "storm", "damage", "rescue",
    "collapse", "smoke", "casualties", "emergency", "tornado", "warning",
];

const CALM_WORDS: &[&str] = &[
    "coffee", "sunny", "music", "weekend", "friends", "movie", "lovely", "garden", "party",
    "dinner", "game", "beach", "happy", "holiday",
];

/// Generate labeled tweets for benchmarking.
fn generate_test_tweets(count: usize) -> (Vec<String>, Vec<u8>) {
    let mut texts = Vec::with_capacity(count);
    let mut labels = Vec::with_capacity(count);

    for i in 0..count {
        let label = (i % 3 == 0) as u8;
        let words = if label == 1 { DISASTER_WORDS } else { CALM_WORDS };
        let length = 8 + (i % 12);
        let mut tweet = Vec::with_capacity(length + 2);
        for j in 0..length {
            // Mix in the other topic now and then so the classes overlap.
            let word = if j % 5 == 4 {
                CALM_WORDS.iter().chain(DISASTER_WORDS).nth((i + j) % 28)
            } else {
                words.get((i * 7 + j * 13) % words.len())
            };
            if let Some(word) = word {
                tweet.push(word.to_string());
            }
        }
        if i % 4 == 0 {
            tweet.push(format!("@user{}", i % 50));
            tweet.push("http://t.co/abc".to_string());
        }
        texts.push(tweet.join(" "));
        labels.push(label);
    }

    (texts, labels)
}

fn bench_text_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_analysis");

    let analyzer = TweetAnalyzer::new().unwrap();
    let (texts, _) = generate_test_tweets(1000);

    group.bench_function("analyze_single_tweet", |b| {
        b.iter(|| {
            let result = analyzer.analyze(black_box(&texts[0]));
            black_box(result)
        })
    });

    group.throughput(Throughput::Elements(1000));
    group.bench_function("analyze_1000_tweets", |b| {
        b.iter(|| {
            for text in &texts {
                let tokens: Vec<_> = analyzer.analyze(black_box(text)).unwrap().collect();
                black_box(tokens);
            }
        })
    });

    group.finish();
}

fn bench_vectorizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("vectorizer");

    for size in [100, 1000, 5000] {
        let (texts, _) = generate_test_tweets(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("fit", size), &texts, |b, texts| {
            b.iter(|| {
                let mut vectorizer = TfIdfVectorizer::with_config(VectorizerConfig::default()).unwrap();
                vectorizer.fit(black_box(texts)).unwrap();
                black_box(vectorizer)
            })
        });

        let mut vectorizer = TfIdfVectorizer::with_config(VectorizerConfig::default()).unwrap();
        vectorizer.fit(&texts).unwrap();
        group.bench_with_input(BenchmarkId::new("transform", size), &texts, |b, texts| {
            b.iter(|| black_box(vectorizer.transform(black_box(texts)).unwrap()))
        });
    }

    group.finish();
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("logistic_regression");
    group.sample_size(10);

    for size in [200, 1000] {
        let (texts, labels) = generate_test_tweets(size);
        let mut vectorizer = TfIdfVectorizer::with_config(VectorizerConfig::default()).unwrap();
        let features = vectorizer.fit_transform(&texts).unwrap();
        let trainer = LogisticRegression::new(TrainingConfig {
            max_iterations: 200,
            ..TrainingConfig::default()
        })
        .unwrap();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("fit", size), &features, |b, features| {
            b.iter(|| black_box(trainer.fit(black_box(features), &labels).unwrap()))
        });

        let model = trainer.fit(&features, &labels).unwrap().model;
        group.bench_with_input(BenchmarkId::new("predict", size), &features, |b, features| {
            b.iter(|| black_box(model.predict(black_box(features)).unwrap()))
        });
    }

    group.finish();
}

fn bench_split_and_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_and_score");

    let (texts, labels) = generate_test_tweets(10_000);
    for stratify in [false, true] {
        let config = SplitConfig {
            stratify,
            ..SplitConfig::default()
        };
        let name = if stratify { "split_stratified" } else { "split_random" };
        group.bench_function(name, |b| {
            b.iter(|| black_box(split(black_box(&texts), &labels, &config).unwrap()))
        });
    }

    let predicted: Vec<u8> = labels
        .iter()
        .enumerate()
        .map(|(i, &label)| if i % 7 == 0 { 1 - label } else { label })
        .collect();
    group.throughput(Throughput::Elements(labels.len() as u64));
    group.bench_function("f1_score", |b| {
        b.iter(|| black_box(score(black_box(&predicted), &labels).unwrap()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_text_analysis,
    bench_vectorizer,
    bench_split_and_score
);

// Training dominates the runtime.
criterion_group!(slow_benches, bench_training);

criterion_main!(benches, slow_benches);
