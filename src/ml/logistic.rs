//! L2-regularized logistic regression trained by full-batch gradient descent.
//!
//! The objective is the mean log-loss plus `||w||^2 / (2 * C * n)`, where `C`
//! is the inverse regularization strength and `n` the number of training
//! examples. The bias is not penalized. Each step moves the parameters by
//! `-grad / L`, with `L` an estimate of the gradient's Lipschitz constant, and
//! training stops once no parameter moves by more than the tolerance.
//!
//! Hitting the iteration cap is not an error: the last iterate is returned and
//! the [`TrainingReport`] records `converged: false`.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FlareError, Result};
use crate::ml::check_binary_labels;
use crate::ml::feature_vector::FeatureVector;

const POWER_ITERATIONS: usize = 50;
const LIPSCHITZ_SAFETY: f64 = 1.1;

/// Classifier training options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Inverse penalty weight `C` on the L2 norm of the weights.
    pub regularization_strength: f64,
    /// Optimizer iteration cap.
    pub max_iterations: usize,
    /// Stop once the largest parameter change falls below this.
    pub convergence_tolerance: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            regularization_strength: 1.0,
            max_iterations: 1000,
            convergence_tolerance: 1e-4,
        }
    }
}

impl TrainingConfig {
    /// Reject non-positive `C`, a zero iteration cap and negative tolerances.
    pub fn validate(&self) -> Result<()> {
        if !(self.regularization_strength.is_finite() && self.regularization_strength > 0.0) {
            return Err(FlareError::invalid_argument(format!(
                "regularization_strength must be positive, got {}",
                self.regularization_strength
            )));
        }
        if self.max_iterations == 0 {
            return Err(FlareError::invalid_argument("max_iterations must be at least 1"));
        }
        if self.convergence_tolerance.is_nan() || self.convergence_tolerance < 0.0 {
            return Err(FlareError::invalid_argument(format!(
                "convergence_tolerance must be non-negative, got {}",
                self.convergence_tolerance
            )));
        }
        Ok(())
    }
}

/// A fitted linear model: one weight per feature plus a bias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    weights: Vec<f64>,
    bias: f64,
}

impl LogisticModel {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Number of features the model expects.
    pub fn dimension(&self) -> usize {
        self.weights.len()
    }

    /// Linear score `w·x + b`.
    pub fn decision_function(&self, features: &FeatureVector) -> Result<f64> {
        Ok(features.dot(&self.weights)? + self.bias)
    }

    /// Sigmoid of the linear score.
    pub fn probability(&self, features: &FeatureVector) -> Result<f64> {
        Ok(sigmoid(self.decision_function(features)?))
    }

    /// Probability of class 1 for every feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`FlareError::DimensionMismatch`] if any vector's dimension
    /// differs from the model's.
    pub fn predict_proba(&self, features: &[FeatureVector]) -> Result<Vec<f64>> {
        features.iter().map(|x| self.probability(x)).collect()
    }

    /// Label 1 where the probability is at least 0.5, else 0.
    pub fn predict(&self, features: &[FeatureVector]) -> Result<Vec<u8>> {
        Ok(self
            .predict_proba(features)?
            .into_iter()
            .map(|p| u8::from(p >= 0.5))
            .collect())
    }
}

/// How a training run ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Gradient steps taken.
    pub iterations: usize,
    /// Whether the tolerance was reached before the iteration cap.
    pub converged: bool,
    /// Regularized objective at the returned parameters.
    pub final_loss: f64,
    /// Largest absolute parameter change in the last step.
    pub max_parameter_change: f64,
}

/// A model together with the report of the run that produced it.
#[derive(Debug, Clone)]
pub struct FitOutcome {
    pub model: LogisticModel,
    pub report: TrainingReport,
}

/// Logistic regression trainer.
#[derive(Debug, Clone, Default)]
pub struct LogisticRegression {
    config: TrainingConfig,
}

impl LogisticRegression {
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Fit a new model on `features` and 0/1 `labels`.
    ///
    /// # Errors
    ///
    /// - [`FlareError::InsufficientData`] if there are no examples.
    /// - [`FlareError::InvalidLabel`] if the label count differs from the
    ///   example count or a label is not 0 or 1.
    /// - [`FlareError::DimensionMismatch`] if the vectors differ in dimension.
    pub fn fit(&self, features: &[FeatureVector], labels: &[u8]) -> Result<FitOutcome> {
        let first = features
            .first()
            .ok_or_else(|| FlareError::insufficient_data(1, 0))?;
        if features.len() != labels.len() {
            return Err(FlareError::invalid_label(format!(
                "{} labels for {} feature vectors",
                labels.len(),
                features.len()
            )));
        }
        check_binary_labels(labels)?;
        let dimension = first.dimension();
        if let Some(bad) = features.iter().find(|x| x.dimension() != dimension) {
            return Err(FlareError::dimension_mismatch(dimension, bad.dimension()));
        }

        let n = features.len() as f64;
        let penalty = 1.0 / (self.config.regularization_strength * n);
        let targets: Vec<f64> = labels.iter().map(|&y| f64::from(y)).collect();
        let lipschitz = lipschitz_constant(features, dimension, penalty);
        let step = 1.0 / lipschitz;
        debug!(
            examples = features.len(),
            dimension,
            lipschitz,
            "training logistic regression"
        );

        let mut weights = vec![0.0; dimension];
        let mut bias = 0.0;
        let mut grad_w = vec![0.0; dimension];
        let mut iterations = 0;
        let mut converged = false;
        let mut max_change = f64::INFINITY;

        while iterations < self.config.max_iterations {
            grad_w.iter_mut().for_each(|g| *g = 0.0);
            let mut grad_b = 0.0;
            for (x, &y) in features.iter().zip(&targets) {
                let residual = sigmoid(x.dot_unchecked(&weights) + bias) - y;
                for (i, value) in x.iter() {
                    grad_w[i] += residual * value;
                }
                grad_b += residual;
            }

            max_change = 0.0;
            for (w, g) in weights.iter_mut().zip(&grad_w) {
                let delta = step * (g / n + penalty * *w);
                *w -= delta;
                max_change = f64::max(max_change, delta.abs());
            }
            let delta_b = step * grad_b / n;
            bias -= delta_b;
            max_change = f64::max(max_change, delta_b.abs());
            iterations += 1;

            if max_change < self.config.convergence_tolerance {
                converged = true;
                break;
            }
        }

        let final_loss = objective(features, &targets, &weights, bias, penalty);
        if converged {
            debug!(iterations, final_loss, "logistic regression converged");
        } else {
            warn!(
                iterations,
                max_parameter_change = max_change,
                tolerance = self.config.convergence_tolerance,
                "logistic regression did not converge; returning the last iterate"
            );
        }

        Ok(FitOutcome {
            model: LogisticModel { weights, bias },
            report: TrainingReport {
                iterations,
                converged,
                final_loss,
                max_parameter_change: max_change,
            },
        })
    }
}

/// Numerically stable logistic function.
pub fn sigmoid(value: f64) -> f64 {
    if value >= 0.0 {
        let z = (-value).exp();
        1.0 / (1.0 + z)
    } else {
        let z = value.exp();
        z / (1.0 + z)
    }
}

/// `ln(1 + e^z)` without overflow.
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

fn objective(features: &[FeatureVector], targets: &[f64], weights: &[f64], bias: f64, penalty: f64) -> f64 {
    let n = features.len() as f64;
    let log_loss: f64 = features
        .iter()
        .zip(targets)
        .map(|(x, &y)| {
            let z = x.dot_unchecked(weights) + bias;
            softplus(z) - y * z
        })
        .sum();
    let norm: f64 = weights.iter().map(|w| w * w).sum();
    log_loss / n + 0.5 * penalty * norm
}

/// Upper estimate of the gradient's Lipschitz constant,
/// `0.25 * lambda_max(X'X / n) + penalty`, where `X` carries a column of ones
/// for the bias. `lambda_max` comes from power iteration, capped by the bound
/// `max_i ||x_i||^2`.
fn lipschitz_constant(features: &[FeatureVector], dimension: usize, penalty: f64) -> f64 {
    let n = features.len() as f64;
    let bound = features
        .iter()
        .map(|x| x.squared_norm() + 1.0)
        .fold(0.0, f64::max);

    // v[dimension] is the bias coordinate.
    let mut v = vec![1.0 / ((dimension + 1) as f64).sqrt(); dimension + 1];
    let mut next = vec![0.0; dimension + 1];
    let mut eigenvalue = bound;
    for _ in 0..POWER_ITERATIONS {
        next.iter_mut().for_each(|e| *e = 0.0);
        for x in features {
            let projection = x.dot_unchecked(&v[..dimension]) + v[dimension];
            for (i, value) in x.iter() {
                next[i] += projection * value;
            }
            next[dimension] += projection;
        }
        let norm = next.iter().map(|e| e * e).sum::<f64>().sqrt();
        if norm == 0.0 {
            break;
        }
        eigenvalue = norm / n;
        for (vi, ei) in v.iter_mut().zip(&next) {
            *vi = ei / norm;
        }
    }

    0.25 * f64::min(eigenvalue * LIPSCHITZ_SAFETY, bound) + penalty
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectors(rows: &[&[f64]]) -> Vec<FeatureVector> {
        rows.iter().map(|r| FeatureVector::from_dense(r)).collect()
    }

    fn separable() -> (Vec<FeatureVector>, Vec<u8>) {
        let features = vectors(&[
            &[2.0, 0.0],
            &[1.5, 0.1],
            &[1.8, 0.0],
            &[0.0, 2.0],
            &[0.2, 1.6],
            &[0.0, 1.9],
        ]);
        (features, vec![1, 1, 1, 0, 0, 0])
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fits_separable_data() {
        let (features, labels) = separable();
        let outcome = LogisticRegression::default().fit(&features, &labels).unwrap();

        assert_eq!(outcome.model.dimension(), 2);
        assert_eq!(outcome.model.predict(&features).unwrap(), labels);
        assert!(outcome.report.iterations > 0);
        // Starting loss at zero weights is ln 2.
        assert!(outcome.report.final_loss < std::f64::consts::LN_2);
    }

    #[test]
    fn test_converges_with_loose_tolerance() {
        let (features, labels) = separable();
        let trainer = LogisticRegression::new(TrainingConfig {
            convergence_tolerance: 1e-3,
            max_iterations: 100_000,
            ..TrainingConfig::default()
        })
        .unwrap();
        let outcome = trainer.fit(&features, &labels).unwrap();

        assert!(outcome.report.converged);
        assert!(outcome.report.max_parameter_change < 1e-3);
        assert!(outcome.report.iterations < 100_000);
    }

    #[test]
    fn test_iteration_cap_returns_model() {
        let (features, labels) = separable();
        let trainer = LogisticRegression::new(TrainingConfig {
            max_iterations: 1,
            convergence_tolerance: 0.0,
            ..TrainingConfig::default()
        })
        .unwrap();
        let outcome = trainer.fit(&features, &labels).unwrap();

        assert!(!outcome.report.converged);
        assert_eq!(outcome.report.iterations, 1);
        assert_eq!(outcome.model.dimension(), 2);
        assert!(outcome.model.weights().iter().any(|&w| w != 0.0));
    }

    #[test]
    fn test_predict_matches_probability_threshold() {
        let (features, labels) = separable();
        let model = LogisticRegression::default().fit(&features, &labels).unwrap().model;
        let probes = vectors(&[&[0.0, 0.0], &[1.0, 1.0], &[3.0, 0.5], &[0.1, 0.1]]);

        let probabilities = model.predict_proba(&probes).unwrap();
        let predicted = model.predict(&probes).unwrap();
        for (p, label) in probabilities.iter().zip(&predicted) {
            assert!((0.0..=1.0).contains(p));
            assert_eq!(*label == 1, *p >= 0.5);
        }
    }

    #[test]
    fn test_zero_weights_predict_positive() {
        let model = LogisticModel::new(vec![0.0; 3], 0.0);
        assert_eq!(model.predict(&[FeatureVector::zeros(3)]).unwrap(), vec![1]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let (features, labels) = separable();
        let model = LogisticRegression::default().fit(&features, &labels).unwrap().model;

        assert!(matches!(
            model.predict(&[FeatureVector::zeros(3)]),
            Err(FlareError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));

        let mixed = vec![FeatureVector::zeros(2), FeatureVector::zeros(4)];
        assert!(matches!(
            LogisticRegression::default().fit(&mixed, &[0, 1]),
            Err(FlareError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_training_input() {
        let trainer = LogisticRegression::default();
        assert!(matches!(
            trainer.fit(&[], &[]),
            Err(FlareError::InsufficientData { .. })
        ));
        let (features, _) = separable();
        assert!(matches!(
            trainer.fit(&features, &[1, 0]),
            Err(FlareError::InvalidLabel(_))
        ));
        assert!(matches!(
            trainer.fit(&features, &[1, 0, 2, 0, 1, 0]),
            Err(FlareError::InvalidLabel(_))
        ));
    }

    #[test]
    fn test_invalid_parameters() {
        for config in [
            TrainingConfig {
                regularization_strength: 0.0,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                max_iterations: 0,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                convergence_tolerance: -1.0,
                ..TrainingConfig::default()
            },
        ] {
            assert!(matches!(
                LogisticRegression::new(config),
                Err(FlareError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_stronger_regularization_shrinks_weights() {
        let (features, labels) = separable();
        let fit = |c: f64| {
            LogisticRegression::new(TrainingConfig {
                regularization_strength: c,
                ..TrainingConfig::default()
            })
            .unwrap()
            .fit(&features, &labels)
            .unwrap()
            .model
        };
        let norm = |m: &LogisticModel| m.weights().iter().map(|w| w * w).sum::<f64>();

        assert!(norm(&fit(0.01)) < norm(&fit(10.0)));
    }

    #[test]
    fn test_model_serde() {
        let model = LogisticModel::new(vec![0.5, -1.25], 0.75);
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#"{"weights":[0.5,-1.25],"bias":0.75}"#);
        let restored: LogisticModel = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, model);
    }

    #[test]
    fn test_model_json_keeps_exact_weights() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let weights: Vec<f64> = (0..16).map(|_| rng.random_range(-5.0..5.0)).collect();
            let model = LogisticModel::new(weights, rng.random_range(-1.0..1.0) * 1e-3);
            let json = serde_json::to_string(&model).unwrap();
            let restored: LogisticModel = serde_json::from_str(&json).unwrap();
            assert_eq!(restored, model, "{json}");
        }
    }
}
