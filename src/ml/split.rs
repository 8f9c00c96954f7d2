//! Seeded train/validation splitting.
//!
//! The validation subset receives `round(validation_fraction * N)` examples
//! and the training subset the rest. Both subsets keep the relative order the
//! examples had in the input, so merging them by index reconstructs it.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FlareError, Result};
use crate::ml::check_binary_labels;

/// Split options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Share of examples held out for validation, strictly between 0 and 1.
    pub validation_fraction: f64,
    /// Shuffle seed.
    pub seed: u64,
    /// Keep the class proportions of both subsets close to the input's.
    pub stratify: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            validation_fraction: 0.2,
            seed: 42,
            stratify: false,
        }
    }
}

impl SplitConfig {
    /// Check that the validation fraction lies in `(0, 1)`.
    pub fn validate(&self) -> Result<()> {
        let fraction = self.validation_fraction;
        if fraction.is_nan() || fraction <= 0.0 || fraction >= 1.0 {
            return Err(FlareError::invalid_argument(format!(
                "validation_fraction must be in (0, 1), got {fraction}"
            )));
        }
        Ok(())
    }
}

/// The two halves of a split, plus the input positions they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSplit<T> {
    pub train_features: Vec<T>,
    pub train_labels: Vec<u8>,
    pub validation_features: Vec<T>,
    pub validation_labels: Vec<u8>,
    /// Input positions of the training examples, ascending.
    pub train_indices: Vec<usize>,
    /// Input positions of the validation examples, ascending.
    pub validation_indices: Vec<usize>,
}

impl<T> DatasetSplit<T> {
    pub fn train_len(&self) -> usize {
        self.train_labels.len()
    }

    pub fn validation_len(&self) -> usize {
        self.validation_labels.len()
    }
}

/// Split `features`/`labels` into training and validation subsets.
///
/// The same seed and input always give the same partition.
///
/// # Errors
///
/// - [`FlareError::InvalidArgument`] if the fraction is outside `(0, 1)`.
/// - [`FlareError::InsufficientData`] if the lengths differ, or there are too
///   few examples for both subsets to be non-empty.
/// - [`FlareError::InvalidLabel`] if `stratify` is set and a label is not 0 or 1.
pub fn split<T: Clone>(features: &[T], labels: &[u8], config: &SplitConfig) -> Result<DatasetSplit<T>> {
    config.validate()?;
    if features.len() != labels.len() {
        return Err(FlareError::insufficient_data(features.len(), labels.len()));
    }

    let n = labels.len();
    let fraction = config.validation_fraction;
    let validation_size = validation_size(fraction, n);
    if n < 2 || validation_size == 0 || validation_size == n {
        return Err(FlareError::insufficient_data(min_examples(fraction), n));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut validation_indices = if config.stratify {
        check_binary_labels(labels)?;
        stratified_validation(labels, fraction, validation_size, &mut rng)
    } else {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut rng);
        order.truncate(validation_size);
        order
    };
    validation_indices.sort_unstable();

    let mut in_validation = vec![false; n];
    for &i in &validation_indices {
        in_validation[i] = true;
    }
    let train_indices: Vec<usize> = (0..n).filter(|&i| !in_validation[i]).collect();

    debug!(
        train = train_indices.len(),
        validation = validation_indices.len(),
        seed = config.seed,
        stratify = config.stratify,
        "split dataset"
    );

    Ok(DatasetSplit {
        train_features: train_indices.iter().map(|&i| features[i].clone()).collect(),
        train_labels: train_indices.iter().map(|&i| labels[i]).collect(),
        validation_features: validation_indices.iter().map(|&i| features[i].clone()).collect(),
        validation_labels: validation_indices.iter().map(|&i| labels[i]).collect(),
        train_indices,
        validation_indices,
    })
}

/// Unstratified split with an explicit fraction and seed.
pub fn train_validation_split<T: Clone>(
    features: &[T],
    labels: &[u8],
    validation_fraction: f64,
    seed: u64,
) -> Result<DatasetSplit<T>> {
    split(
        features,
        labels,
        &SplitConfig {
            validation_fraction,
            seed,
            stratify: false,
        },
    )
}

fn validation_size(fraction: f64, n: usize) -> usize {
    (fraction * n as f64).round() as usize
}

/// Smallest corpus size for which both subsets are non-empty.
fn min_examples(fraction: f64) -> usize {
    (2..)
        .find(|&n| {
            let size = validation_size(fraction, n);
            size > 0 && size < n
        })
        .unwrap_or(2)
}

/// Pick validation positions per class, apportioning `validation_size` by
/// largest remainder of `fraction * class_count`.
fn stratified_validation(
    labels: &[u8],
    fraction: f64,
    validation_size: usize,
    rng: &mut StdRng,
) -> Vec<usize> {
    let mut classes: [Vec<usize>; 2] = [Vec::new(), Vec::new()];
    for (i, &label) in labels.iter().enumerate() {
        classes[usize::from(label)].push(i);
    }

    let quotas: Vec<f64> = classes.iter().map(|c| fraction * c.len() as f64).collect();
    let mut take: Vec<usize> = quotas.iter().map(|q| q.floor() as usize).collect();

    let mut by_remainder = [0usize, 1];
    by_remainder.sort_by(|&a, &b| {
        let ra = quotas[a] - quotas[a].floor();
        let rb = quotas[b] - quotas[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });
    let mut missing = validation_size.saturating_sub(take.iter().sum());
    for &class in by_remainder.iter().cycle().take(4) {
        if missing == 0 {
            break;
        }
        if take[class] < classes[class].len() {
            take[class] += 1;
            missing -= 1;
        }
    }

    let mut selected = Vec::with_capacity(validation_size);
    for (class, members) in classes.iter_mut().enumerate() {
        members.shuffle(rng);
        selected.extend_from_slice(&members[..take[class]]);
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> (Vec<usize>, Vec<u8>) {
        let features: Vec<usize> = (0..n).collect();
        let labels = features.iter().map(|&i| (i % 2) as u8).collect();
        (features, labels)
    }

    #[test]
    fn test_split_sizes() {
        let (features, labels) = items(10);
        let split = train_validation_split(&features, &labels, 0.2, 42).unwrap();
        assert_eq!(split.train_len(), 8);
        assert_eq!(split.validation_len(), 2);

        let split = train_validation_split(&features, &labels, 0.25, 42).unwrap();
        // round(2.5) == 3
        assert_eq!(split.validation_len(), 3);
    }

    #[test]
    fn test_split_is_reproducible() {
        let (features, labels) = items(50);
        let a = train_validation_split(&features, &labels, 0.3, 7).unwrap();
        let b = train_validation_split(&features, &labels, 0.3, 7).unwrap();
        assert_eq!(a, b);

        let c = train_validation_split(&features, &labels, 0.3, 8).unwrap();
        assert_ne!(a.validation_indices, c.validation_indices);
    }

    #[test]
    fn test_split_partitions_input() {
        let (features, labels) = items(23);
        let split = train_validation_split(&features, &labels, 0.4, 1).unwrap();

        let mut all: Vec<usize> = split
            .train_indices
            .iter()
            .chain(&split.validation_indices)
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..23).collect::<Vec<_>>());
        assert!(
            split
                .train_indices
                .iter()
                .all(|i| !split.validation_indices.contains(i))
        );
        // Features travel with their labels.
        for (feature, label) in split.train_features.iter().zip(&split.train_labels) {
            assert_eq!(labels[*feature], *label);
        }
        assert!(split.train_indices.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_insufficient_data() {
        let err = train_validation_split(&[1.0], &[1], 0.5, 42).unwrap_err();
        assert!(matches!(
            err,
            FlareError::InsufficientData {
                required: 2,
                actual: 1
            }
        ));

        // round(0.1 * 3) == 0 leaves the validation subset empty.
        let err = train_validation_split(&[1, 2, 3], &[0, 1, 0], 0.1, 42).unwrap_err();
        assert!(matches!(
            err,
            FlareError::InsufficientData {
                required: 5,
                actual: 3
            }
        ));

        let err = train_validation_split(&[1, 2, 3], &[0, 1], 0.5, 42).unwrap_err();
        assert!(matches!(err, FlareError::InsufficientData { .. }));
    }

    #[test]
    fn test_invalid_fraction() {
        let (features, labels) = items(10);
        for fraction in [0.0, 1.0, -0.5, f64::NAN] {
            assert!(matches!(
                train_validation_split(&features, &labels, fraction, 42),
                Err(FlareError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_stratified_split_keeps_proportions() {
        let features: Vec<usize> = (0..20).collect();
        let labels: Vec<u8> = (0..20).map(|i| u8::from(i < 5)).collect();
        let config = SplitConfig {
            validation_fraction: 0.2,
            seed: 42,
            stratify: true,
        };
        let split = split(&features, &labels, &config).unwrap();

        assert_eq!(split.validation_len(), 4);
        assert_eq!(split.validation_labels.iter().filter(|&&l| l == 1).count(), 1);
        assert_eq!(split.train_labels.iter().filter(|&&l| l == 1).count(), 4);
    }

    #[test]
    fn test_stratified_split_rejects_non_binary_labels() {
        let config = SplitConfig {
            stratify: true,
            ..SplitConfig::default()
        };
        assert!(matches!(
            split(&[0, 1, 2, 3, 4], &[0, 1, 2, 0, 1], &config),
            Err(FlareError::InvalidLabel(_))
        ));
    }
}
