use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use flare::error::Result;
use flare::ml::logistic::{LogisticRegression, TrainingConfig};
use flare::ml::split::{SplitConfig, split};
use flare::ml::vectorizer::{TfIdfVectorizer, VectorizerConfig};

const DISASTER_WORDS: &[&str] = &[
    "fire", "flood", "earthquake", "wildfire", "evacuate", "storm", "collapse", "smoke",
    "explosion", "rescue",
];
const CALM_WORDS: &[&str] = &[
    "coffee", "sunny", "music", "bread", "beach", "movie", "garden", "friends", "weekend",
    "pizza",
];
const SHARED_WORDS: &[&str] = &["today", "city", "people", "news", "morning", "video"];

fn random_corpus(seed: u64, size: usize) -> (Vec<String>, Vec<u8>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut texts = Vec::with_capacity(size);
    let mut labels = Vec::with_capacity(size);
    for _ in 0..size {
        let label = u8::from(rng.random_bool(0.4));
        let topical = if label == 1 { DISASTER_WORDS } else { CALM_WORDS };
        let length = rng.random_range(0..8);
        let words: Vec<&str> = (0..length)
            .map(|_| {
                if rng.random_bool(0.7) {
                    *topical.choose(&mut rng).unwrap()
                } else {
                    *SHARED_WORDS.choose(&mut rng).unwrap()
                }
            })
            .collect();
        texts.push(words.join(" "));
        labels.push(label);
    }
    // Guarantee at least one non-empty text.
    texts[0].push_str(" fire");
    (texts, labels)
}

#[test]
fn vocabulary_never_exceeds_max_features() -> Result<()> {
    for (seed, max_features) in [(1, 5), (2, 17), (3, 40), (4, 10_000)] {
        let (texts, _) = random_corpus(seed, 60);
        let mut vectorizer = TfIdfVectorizer::with_config(VectorizerConfig {
            max_features,
            ..VectorizerConfig::default()
        })?;
        let vocabulary = vectorizer.fit(&texts)?;
        assert!(!vocabulary.is_empty());
        assert!(vocabulary.len() <= max_features);
        // Indices are contiguous from zero.
        for (position, (token, index)) in vocabulary.iter().enumerate() {
            assert_eq!(position, index);
            assert_eq!(vocabulary.get(token), Some(index));
        }
    }
    Ok(())
}

#[test]
fn fitting_is_deterministic_and_transform_is_pure() -> Result<()> {
    let (texts, _) = random_corpus(11, 80);
    let config = VectorizerConfig {
        max_features: 25,
        ..VectorizerConfig::default()
    };

    let mut a = TfIdfVectorizer::with_config(config.clone())?;
    let mut b = TfIdfVectorizer::with_config(config)?;
    a.fit(&texts)?;
    b.fit(&texts)?;
    assert_eq!(a.vocabulary(), b.vocabulary());

    let first = a.transform(&texts)?;
    let second = a.transform(&texts)?;
    assert_eq!(first, second);
    assert!(first.iter().all(|f| f.dimension() == a.dimension().unwrap()));
    Ok(())
}

#[test]
fn split_partitions_for_many_seeds() -> Result<()> {
    let (texts, labels) = random_corpus(5, 37);
    for seed in 0..20 {
        for stratify in [false, true] {
            let config = SplitConfig {
                validation_fraction: 0.3,
                seed,
                stratify,
            };
            let first = split(&texts, &labels, &config)?;
            let again = split(&texts, &labels, &config)?;
            assert_eq!(first, again);

            assert_eq!(first.validation_len(), 11);
            let mut seen = vec![false; texts.len()];
            for &i in first.train_indices.iter().chain(&first.validation_indices) {
                assert!(!seen[i], "index {i} appears twice");
                seen[i] = true;
            }
            assert!(seen.iter().all(|&s| s));
            for (text, &i) in first.validation_features.iter().zip(&first.validation_indices) {
                assert_eq!(text, &texts[i]);
            }
        }
    }
    Ok(())
}

#[test]
fn predictions_agree_with_probabilities() -> Result<()> {
    let (texts, labels) = random_corpus(21, 120);
    let mut vectorizer = TfIdfVectorizer::with_config(VectorizerConfig::default())?;
    let features = vectorizer.fit_transform(&texts)?;
    let model = LogisticRegression::new(TrainingConfig::default())?
        .fit(&features, &labels)?
        .model;

    let (probe_texts, _) = random_corpus(99, 50);
    let probes = vectorizer.transform(&probe_texts)?;
    let probabilities = model.predict_proba(&probes)?;
    let predicted = model.predict(&probes)?;
    for (p, label) in probabilities.iter().zip(&predicted) {
        assert!((0.0..=1.0).contains(p));
        assert!(*label <= 1);
        assert_eq!(*label == 1, *p >= 0.5);
    }
    Ok(())
}

#[test]
fn separable_topics_are_learned() -> Result<()> {
    let (texts, labels) = random_corpus(8, 200);
    let mut vectorizer = TfIdfVectorizer::with_config(VectorizerConfig::default())?;
    let features = vectorizer.fit_transform(&texts)?;
    let model = LogisticRegression::new(TrainingConfig::default())?
        .fit(&features, &labels)?
        .model;

    let probes = vectorizer.transform(&["wildfire smoke evacuate", "pizza movie weekend"])?;
    let probabilities = model.predict_proba(&probes)?;
    assert!(probabilities[0] > 0.5);
    assert!(probabilities[1] < 0.5);
    Ok(())
}
