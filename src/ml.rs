//! The classification pipeline: TF-IDF features, seeded splitting, logistic
//! regression and F1 scoring.
//!
//! ```text
//! texts ─▶ TfIdfVectorizer ─▶ FeatureVector ─▶ split ─▶ LogisticRegression ─▶ score
//! ```
//!
//! [`pipeline::Pipeline`] runs the whole chain from labeled documents.

pub mod feature_vector;
pub mod logistic;
pub mod metrics;
pub mod pipeline;
pub mod split;
pub mod vectorizer;

pub use feature_vector::FeatureVector;
pub use logistic::{FitOutcome, LogisticModel, LogisticRegression, TrainingConfig, TrainingReport};
pub use metrics::{MetricResult, score};
pub use pipeline::{Pipeline, TrainedPipeline};
pub use split::{DatasetSplit, SplitConfig, split, train_validation_split};
pub use vectorizer::{TfIdfVectorizer, VectorizerConfig, Vocabulary};

use crate::error::{FlareError, Result};

/// Fail with [`FlareError::InvalidLabel`] unless every label is 0 or 1.
pub(crate) fn check_binary_labels(labels: &[u8]) -> Result<()> {
    match labels.iter().position(|&label| label > 1) {
        Some(position) => Err(FlareError::invalid_label(format!(
            "label {} at position {position} is not 0 or 1",
            labels[position]
        ))),
        None => Ok(()),
    }
}
