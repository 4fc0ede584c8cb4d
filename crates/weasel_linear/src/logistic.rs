//! L2-regularized logistic regression on sparse count features.
//!
//! Solves the primal problem
//!
//! ```text
//! min_w  0.5 * ||w||^2 + C * sum_i log(1 + exp(-y_i * w . x_i))
//! ```
//!
//! with cyclic coordinate descent: each coordinate takes one Newton step
//! followed by Armijo backtracking. When `fit_intercept` is set the bias is a
//! constant feature of value `intercept_scaling` and is regularized with the
//! rest of the weights. Multiclass problems are trained one-vs-rest, one
//! binary model per class, in parallel on the current rayon pool.

use ndarray::Array2;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use weasel_core::Seed;

use crate::error::{LinearError, Result};
use crate::sparse::{CscMatrix, CsrMatrix};

const ARMIJO_SIGMA: f64 = 0.01;
const MAX_BACKTRACKS: usize = 30;

/// Solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegressionConfig {
    /// Inverse regularization strength.
    pub c: f64,
    /// Maximum passes over the coordinates.
    pub max_iter: usize,
    /// Relative gradient tolerance.
    pub tol: f64,
    /// Learn a bias term.
    pub fit_intercept: bool,
    /// Value of the constant bias feature.
    pub intercept_scaling: f64,
    /// Seed for the coordinate order.
    pub seed: u64,
}

impl Default for LogisticRegressionConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            tol: 1e-3,
            fit_intercept: true,
            intercept_scaling: 1.0,
            seed: 0,
        }
    }
}

impl LogisticRegressionConfig {
    /// Set the inverse regularization strength.
    #[must_use]
    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Set the iteration cap.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the relative gradient tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Enable or disable the bias term.
    #[must_use]
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Set the coordinate-order seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(LinearError::InvalidConfig(format!(
                "C must be positive and finite, got {}",
                self.c
            )));
        }
        if self.max_iter == 0 {
            return Err(LinearError::InvalidConfig(
                "max_iter must be at least 1".to_string(),
            ));
        }
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(LinearError::InvalidConfig(format!(
                "tol must be positive and finite, got {}",
                self.tol
            )));
        }
        if !(self.intercept_scaling.is_finite() && self.intercept_scaling > 0.0) {
            return Err(LinearError::InvalidConfig(format!(
                "intercept_scaling must be positive and finite, got {}",
                self.intercept_scaling
            )));
        }
        Ok(())
    }
}

/// Weights of one binary model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BinaryModel {
    coef: Vec<f64>,
    intercept: f64,
    n_iter: usize,
    converged: bool,
}

/// Fitted solver state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticState {
    n_features: usize,
    n_classes: usize,
    models: Vec<BinaryModel>,
}

impl LogisticState {
    /// Number of input features.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Passes used by each binary model.
    #[must_use]
    pub fn n_iter(&self) -> Vec<usize> {
        self.models.iter().map(|m| m.n_iter).collect()
    }

    /// Whether every binary model reached the tolerance.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.models.iter().all(|m| m.converged)
    }

    /// Check model count, weight lengths and finiteness.
    pub fn validate(&self) -> Result<()> {
        if self.n_classes < 2 {
            return Err(LinearError::InvalidState(format!(
                "need at least 2 classes, got {}",
                self.n_classes
            )));
        }
        let expected_models = if self.n_classes == 2 { 1 } else { self.n_classes };
        if self.models.len() != expected_models {
            return Err(LinearError::InvalidState(format!(
                "{} classes need {} binary models, found {}",
                self.n_classes,
                expected_models,
                self.models.len()
            )));
        }
        for (k, model) in self.models.iter().enumerate() {
            if model.coef.len() != self.n_features {
                return Err(LinearError::InvalidState(format!(
                    "model {k} has {} weights for {} features",
                    model.coef.len(),
                    self.n_features
                )));
            }
            if model.coef.iter().any(|w| !w.is_finite()) || !model.intercept.is_finite() {
                return Err(LinearError::InvalidState(format!(
                    "model {k} has non-finite weights"
                )));
            }
        }
        Ok(())
    }
}

/// L2 logistic regression with one-vs-rest multiclass handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    config: LogisticRegressionConfig,
    state: Option<LogisticState>,
}

impl LogisticRegression {
    /// Create an unfitted model.
    pub fn new(config: LogisticRegressionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: None,
        })
    }

    /// Solver configuration.
    #[must_use]
    pub fn config(&self) -> &LogisticRegressionConfig {
        &self.config
    }

    /// Fitted state, if any.
    #[must_use]
    pub fn state(&self) -> Option<&LogisticState> {
        self.state.as_ref()
    }

    /// Check if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Fit on rows of `x` with class indices `y` in `0..n_classes`.
    ///
    /// Two classes train a single model for class 1; more classes train
    /// one model per class. The previous state is kept if fitting fails.
    pub fn fit(&mut self, x: &CsrMatrix, y: &[usize], n_classes: usize) -> Result<()> {
        if x.n_rows() != y.len() {
            return Err(LinearError::ShapeMismatch(format!(
                "{} rows but {} labels",
                x.n_rows(),
                y.len()
            )));
        }
        if n_classes < 2 {
            return Err(LinearError::DegenerateLabels(format!(
                "logistic regression needs at least two classes, got {n_classes}"
            )));
        }
        if let Some(&bad) = y.iter().find(|&&label| label >= n_classes) {
            return Err(LinearError::ShapeMismatch(format!(
                "label index {bad} out of range for {n_classes} classes"
            )));
        }

        let config = &self.config;
        let csc = x.to_csc();
        let targets: Vec<usize> = if n_classes == 2 {
            vec![1]
        } else {
            (0..n_classes).collect()
        };

        let models = targets
            .par_iter()
            .map(|&target| {
                let positive: Vec<bool> = y.iter().map(|&label| label == target).collect();
                let seed = Seed::new(config.seed).derive(target as u64);
                let model = fit_binary(&csc, &positive, config, seed);
                if !model.converged {
                    tracing::warn!(
                        class = target,
                        max_iter = config.max_iter,
                        "Logistic regression did not converge"
                    );
                }
                if model.coef.iter().any(|w| !w.is_finite()) || !model.intercept.is_finite() {
                    return Err(LinearError::Numerical(format!(
                        "non-finite weights for class {target}"
                    )));
                }
                Ok(model)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            n_samples = y.len(),
            n_features = x.n_cols(),
            n_classes,
            n_models = models.len(),
            "Fitted logistic regression"
        );

        self.state = Some(LogisticState {
            n_features: x.n_cols(),
            n_classes,
            models,
        });
        Ok(())
    }

    /// Raw scores, shape `[n_samples, n_models]`.
    ///
    /// `n_models` is 1 for binary problems and `n_classes` otherwise.
    pub fn decision_function(&self, x: &CsrMatrix) -> Result<Array2<f64>> {
        let state = self.state.as_ref().ok_or(LinearError::NotFitted)?;
        if x.n_cols() != state.n_features {
            return Err(LinearError::ShapeMismatch(format!(
                "expected {} features, got {}",
                state.n_features,
                x.n_cols()
            )));
        }

        let mut scores = Array2::zeros((x.n_rows(), state.models.len()));
        for i in 0..x.n_rows() {
            for (k, model) in state.models.iter().enumerate() {
                scores[[i, k]] = x.row_dot(i, &model.coef) + model.intercept;
            }
        }
        Ok(scores)
    }

    /// Class probabilities, shape `[n_samples, n_classes]`; rows sum to 1.
    pub fn predict_proba(&self, x: &CsrMatrix) -> Result<Array2<f64>> {
        let scores = self.decision_function(x)?;
        let n_classes = self.state.as_ref().map_or(0, |s| s.n_classes);
        let mut proba = Array2::zeros((x.n_rows(), n_classes));

        for (i, row) in scores.outer_iter().enumerate() {
            if n_classes == 2 {
                let p = sigmoid(row[0]);
                proba[[i, 0]] = 1.0 - p;
                proba[[i, 1]] = p;
            } else {
                let sigmoids: Vec<f64> = row.iter().map(|&s| sigmoid(s)).collect();
                let total: f64 = sigmoids.iter().sum();
                for (k, p) in sigmoids.into_iter().enumerate() {
                    proba[[i, k]] = if total > 0.0 {
                        p / total
                    } else {
                        1.0 / n_classes as f64
                    };
                }
            }
        }
        Ok(proba)
    }

    /// Predicted class indices. Ties resolve to the lowest index.
    pub fn predict(&self, x: &CsrMatrix) -> Result<Vec<usize>> {
        let scores = self.decision_function(x)?;
        Ok(scores
            .outer_iter()
            .map(|row| {
                if row.len() == 1 {
                    usize::from(row[0] > 0.0)
                } else {
                    argmax(row.iter().copied())
                }
            })
            .collect())
    }
}

fn argmax(values: impl Iterator<Item = f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (idx, value) in values.enumerate() {
        if value > best_value {
            best = idx;
            best_value = value;
        }
    }
    best
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `log(1 + exp(z))` without overflow.
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

/// One coordinate: either a feature column or the constant bias column.
#[derive(Clone, Copy)]
enum Coord {
    Feature(usize),
    Bias,
}

fn fit_binary(
    x: &CscMatrix,
    positive: &[bool],
    config: &LogisticRegressionConfig,
    seed: Seed,
) -> BinaryModel {
    let n = positive.len();
    let sign: Vec<f64> = positive
        .iter()
        .map(|&p| if p { 1.0 } else { -1.0 })
        .collect();
    let all_rows: Vec<usize> = (0..n).collect();
    let bias_values = vec![config.intercept_scaling; n];

    let mut coef = vec![0.0; x.n_cols()];
    let mut bias = 0.0;
    let mut margins = vec![0.0; n];

    let mut order: Vec<Coord> = (0..x.n_cols()).map(Coord::Feature).collect();
    if config.fit_intercept {
        order.push(Coord::Bias);
    }

    let mut rng = seed.to_rng();
    let mut initial_max = None;
    let mut n_iter = 0;
    let mut converged = order.is_empty();

    while !converged && n_iter < config.max_iter {
        n_iter += 1;
        order.shuffle(&mut rng);

        let mut max_gradient: f64 = 0.0;
        for &coord in &order {
            let (rows, values) = match coord {
                Coord::Feature(j) => x.col(j),
                Coord::Bias => (all_rows.as_slice(), bias_values.as_slice()),
            };
            let weight = match coord {
                Coord::Feature(j) => coef[j],
                Coord::Bias => bias,
            };

            let mut loss_grad = 0.0;
            let mut hess = 0.0;
            for (&i, &v) in rows.iter().zip(values) {
                let p = sigmoid(margins[i]);
                let target = if positive[i] { 1.0 } else { 0.0 };
                loss_grad += v * (p - target);
                hess += v * v * p * (1.0 - p);
            }
            let grad = weight + config.c * loss_grad;
            let hess = 1.0 + config.c * hess;
            max_gradient = max_gradient.max(grad.abs());

            let mut step = -grad / hess;
            if step == 0.0 {
                continue;
            }

            let mut accepted = false;
            for _ in 0..MAX_BACKTRACKS {
                let mut delta = weight * step + 0.5 * step * step;
                for (&i, &v) in rows.iter().zip(values) {
                    let before = softplus(-sign[i] * margins[i]);
                    let after = softplus(-sign[i] * (margins[i] + step * v));
                    delta += config.c * (after - before);
                }
                if delta <= ARMIJO_SIGMA * step * grad {
                    accepted = true;
                    break;
                }
                step *= 0.5;
            }
            if !accepted {
                continue;
            }

            match coord {
                Coord::Feature(j) => coef[j] += step,
                Coord::Bias => bias += step,
            }
            for (&i, &v) in rows.iter().zip(values) {
                margins[i] += step * v;
            }
        }

        let reference = *initial_max.get_or_insert(max_gradient);
        if max_gradient <= config.tol * reference || reference == 0.0 {
            converged = true;
        }
    }

    BinaryModel {
        coef,
        intercept: bias * config.intercept_scaling,
        n_iter,
        converged,
    }
}
