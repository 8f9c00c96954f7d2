//! Binary classification metrics, with class 1 (disaster) as the positive class.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FlareError, Result};
use crate::ml::check_binary_labels;

/// F1 score plus the confusion counts it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub accuracy: f64,
}

impl MetricResult {
    /// Derive the ratios from confusion counts.
    ///
    /// A ratio with a zero denominator is 0, and F1 is 0 when precision and
    /// recall are both 0.
    pub fn from_counts(
        true_positives: usize,
        false_positives: usize,
        true_negatives: usize,
        false_negatives: usize,
    ) -> Self {
        let precision = ratio(true_positives, true_positives + false_positives);
        let recall = ratio(true_positives, true_positives + false_negatives);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        let total = true_positives + false_positives + true_negatives + false_negatives;
        Self {
            true_positives,
            false_positives,
            true_negatives,
            false_negatives,
            precision,
            recall,
            f1,
            accuracy: ratio(true_positives + true_negatives, total),
        }
    }

    /// Number of scored examples.
    pub fn support(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }
}

impl fmt::Display for MetricResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "f1={:.4} precision={:.4} recall={:.4} accuracy={:.4} (tp={} fp={} tn={} fn={})",
            self.f1,
            self.precision,
            self.recall,
            self.accuracy,
            self.true_positives,
            self.false_positives,
            self.true_negatives,
            self.false_negatives
        )
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Score predicted labels against the truth.
///
/// # Errors
///
/// Returns [`FlareError::InvalidLabel`] if the sequences differ in length or
/// contain anything other than 0 and 1.
pub fn score(predicted: &[u8], truth: &[u8]) -> Result<MetricResult> {
    if predicted.len() != truth.len() {
        return Err(FlareError::invalid_label(format!(
            "{} predictions for {} true labels",
            predicted.len(),
            truth.len()
        )));
    }
    check_binary_labels(predicted)?;
    check_binary_labels(truth)?;

    let (mut tp, mut fp, mut tn, mut fn_) = (0, 0, 0, 0);
    for (&p, &t) in predicted.iter().zip(truth) {
        match (p, t) {
            (1, 1) => tp += 1,
            (1, _) => fp += 1,
            (_, 1) => fn_ += 1,
            _ => tn += 1,
        }
    }
    Ok(MetricResult::from_counts(tp, fp, tn, fn_))
}
