//! L2-regularised logistic regression.
//!
//! The objective follows liblinear's primal L2-loss formulation:
//!
//! ```text
//! min_w  0.5 * w.w + C * sum_i log(1 + exp(-y_i * w.x_i))
//! ```
//!
//! with labels mapped to `+1`/`-1` and the intercept appended as a constant
//! feature, so it is regularised along with the coefficients. The problem is
//! solved with damped Newton iterations.
//!
//! Features are used as given; no scaling is applied.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainError};
use crate::metrics;
use crate::model::{Dataset, Frame};

use super::linalg::{dot, norm, solve_spd};

/// Armijo sufficient-decrease constant
const ARMIJO: f64 = 1e-4;
/// Smallest line-search step before giving up on further decrease
const MIN_STEP: f64 = 1e-10;

/// Hyperparameters of an unfitted classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Inverse regularisation strength
    pub c: f64,
    /// Stopping tolerance on the relative gradient norm
    pub tol: f64,
    pub max_iter: usize,
    pub fit_intercept: bool,
    pub intercept_scaling: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            c: 1.0,
            tol: 1e-4,
            max_iter: 100,
            fit_intercept: true,
            intercept_scaling: 1.0,
        }
    }
}

impl LogisticRegression {
    pub fn new(c: f64) -> Self {
        Self {
            c,
            ..Default::default()
        }
    }

    /// Build a classifier from a regularisation rate (`C = 1 / reg_rate`)
    pub fn from_reg_rate(reg_rate: f64) -> Result<Self> {
        if !(reg_rate.is_finite() && reg_rate > 0.0) {
            return Err(TrainError::InvalidParameter {
                name: "reg_rate",
                reason: format!("must be a positive number, got {}", reg_rate),
            });
        }
        Ok(Self::new(1.0 / reg_rate))
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Estimator parameters by name, as recorded by the tracker
    pub fn params(&self) -> IndexMap<&'static str, String> {
        let mut params = IndexMap::new();
        params.insert("C", self.c.to_string());
        params.insert("penalty", "l2".to_string());
        params.insert("solver", "liblinear".to_string());
        params.insert("tol", self.tol.to_string());
        params.insert("max_iter", self.max_iter.to_string());
        params.insert("fit_intercept", self.fit_intercept.to_string());
        params.insert("intercept_scaling", self.intercept_scaling.to_string());
        params
    }

    /// Fit the classifier to a labelled dataset
    pub fn fit(&self, data: &Dataset) -> Result<LogisticModel> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(TrainError::InvalidParameter {
                name: "C",
                reason: format!("must be a positive number, got {}", self.c),
            });
        }
        if data.is_empty() {
            return Err(TrainError::EmptyData("no training rows".to_string()));
        }
        if let Some(column) = data.features.first_missing_column() {
            return Err(TrainError::MissingValues(column.to_string()));
        }
        if data.target.iter().any(|v| v.is_nan()) {
            return Err(TrainError::MissingValues("target".to_string()));
        }

        let classes = binary_classes(&data.target)?;
        let y: Vec<f64> = data
            .target
            .iter()
            .map(|&v| if v == classes[1] { 1.0 } else { -1.0 })
            .collect();
        let positives = y.iter().filter(|&&v| v > 0.0).count();
        let negatives = y.len() - positives;

        let rows: Vec<Vec<f64>> = data
            .features
            .rows()
            .iter()
            .map(|row| {
                let mut x = row.clone();
                if self.fit_intercept {
                    x.push(self.intercept_scaling);
                }
                x
            })
            .collect();

        let n_weights = data.features.column_count() + usize::from(self.fit_intercept);
        let mut w = vec![0.0; n_weights];
        let (mut loss, mut grad) = objective(&rows, &y, &w, self.c);

        let grad0 = norm(&grad);
        let eps = self.tol * positives.min(negatives).max(1) as f64 / y.len() as f64;

        let mut n_iter = 0;
        let mut converged = false;
        for _ in 0..self.max_iter {
            if norm(&grad) <= eps * grad0 {
                converged = true;
                break;
            }

            let hess = hessian(&rows, &w, self.c);
            let neg_grad: Vec<f64> = grad.iter().map(|g| -g).collect();
            let step = solve_spd(&hess, &neg_grad)?;
            let slope = dot(&grad, &step);

            let Some((candidate, cand_loss, cand_grad)) =
                line_search(&rows, &y, &w, &step, loss, slope, self.c)
            else {
                log::debug!("Line search stalled after {} iteration(s)", n_iter);
                break;
            };

            w = candidate;
            loss = cand_loss;
            grad = cand_grad;
            n_iter += 1;
        }
        if !converged && norm(&grad) <= eps * grad0 {
            converged = true;
        }

        if converged {
            log::debug!("Solver converged after {} iteration(s), loss {:.6}", n_iter, loss);
        } else {
            log::warn!(
                "Solver stopped after {} of {} iterations without converging",
                n_iter,
                self.max_iter
            );
        }

        let intercept = if self.fit_intercept {
            w.pop().unwrap_or(0.0) * self.intercept_scaling
        } else {
            0.0
        };

        Ok(LogisticModel {
            classes,
            feature_names: data.features.column_names().map(str::to_string).collect(),
            coef: w,
            intercept,
            n_iter,
            converged,
        })
    }
}

/// A fitted binary logistic regression model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    /// Class labels, ascending; `classes[1]` is the positive class
    pub classes: [f64; 2],
    pub feature_names: Vec<String>,
    pub coef: Vec<f64>,
    pub intercept: f64,
    pub n_iter: usize,
    pub converged: bool,
}

impl LogisticModel {
    /// Signed distance to the decision boundary, one value per row
    pub fn decision_function(&self, x: &Frame) -> Result<Vec<f64>> {
        if x.column_count() != self.coef.len() {
            return Err(TrainError::DimensionMismatch {
                expected: self.coef.len(),
                found: x.column_count(),
            });
        }
        if let Some(column) = x.first_missing_column() {
            return Err(TrainError::MissingValues(column.to_string()));
        }
        Ok(x
            .rows()
            .iter()
            .map(|row| dot(&self.coef, row) + self.intercept)
            .collect())
    }

    /// Class probabilities `[P(classes[0]), P(classes[1])]` per row
    pub fn predict_proba(&self, x: &Frame) -> Result<Vec<[f64; 2]>> {
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(|z| {
                let p = sigmoid(z);
                [1.0 - p, p]
            })
            .collect())
    }

    /// Predicted class label per row
    pub fn predict(&self, x: &Frame) -> Result<Vec<f64>> {
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(|z| if z > 0.0 { self.classes[1] } else { self.classes[0] })
            .collect())
    }

    /// Mean accuracy on a labelled dataset
    pub fn score(&self, data: &Dataset) -> Result<f64> {
        let predicted = self.predict(&data.features)?;
        metrics::accuracy(&data.target, &predicted)
    }
}

/// Sorted distinct labels; exactly two are required
fn binary_classes(target: &[f64]) -> Result<[f64; 2]> {
    let mut classes = target.to_vec();
    classes.sort_by(f64::total_cmp);
    classes.dedup();
    match classes.as_slice() {
        [neg, pos] => Ok([*neg, *pos]),
        other => Err(TrainError::NotBinary(other.len())),
    }
}

fn sigmoid(t: f64) -> f64 {
    if t >= 0.0 {
        1.0 / (1.0 + (-t).exp())
    } else {
        let e = t.exp();
        e / (1.0 + e)
    }
}

/// `log(1 + exp(t))` without overflow
fn log1p_exp(t: f64) -> f64 {
    if t > 0.0 {
        t + (-t).exp().ln_1p()
    } else {
        t.exp().ln_1p()
    }
}

/// Objective value and gradient at `w`
fn objective(rows: &[Vec<f64>], y: &[f64], w: &[f64], c: f64) -> (f64, Vec<f64>) {
    let mut loss = 0.5 * dot(w, w);
    let mut grad = w.to_vec();
    for (x, &yi) in rows.iter().zip(y) {
        let margin = yi * dot(w, x);
        loss += c * log1p_exp(-margin);
        let coeff = c * (sigmoid(margin) - 1.0) * yi;
        for (g, xj) in grad.iter_mut().zip(x) {
            *g += coeff * xj;
        }
    }
    (loss, grad)
}

/// Backtracking search along `step` for sufficient decrease.
///
/// Returns the accepted point with its loss and gradient, or `None` when no
/// step above `MIN_STEP` lowers the objective.
fn line_search(
    rows: &[Vec<f64>],
    y: &[f64],
    w: &[f64],
    step: &[f64],
    loss: f64,
    slope: f64,
    c: f64,
) -> Option<(Vec<f64>, f64, Vec<f64>)> {
    let mut alpha = 1.0;
    while alpha >= MIN_STEP {
        let candidate: Vec<f64> = w.iter().zip(step).map(|(wi, si)| wi + alpha * si).collect();
        let (cand_loss, cand_grad) = objective(rows, y, &candidate, c);
        if cand_loss <= loss + ARMIJO * alpha * slope {
            return Some((candidate, cand_loss, cand_grad));
        }
        alpha *= 0.5;
    }
    None
}

/// Hessian `I + C * X^T D X`, row-major
fn hessian(rows: &[Vec<f64>], w: &[f64], c: f64) -> Vec<f64> {
    let p = w.len();
    let mut h = vec![0.0; p * p];
    for i in 0..p {
        h[i * p + i] = 1.0;
    }
    for x in rows {
        let s = sigmoid(dot(w, x));
        let d = c * s * (1.0 - s);
        if d == 0.0 {
            continue;
        }
        for i in 0..p {
            let dxi = d * x[i];
            for j in 0..p {
                h[i * p + j] += dxi * x[j];
            }
        }
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One noisy feature where larger values lean positive
    fn separable(labels: [f64; 2]) -> Dataset {
        let mut frame = Frame::new(["x"]);
        let mut target = Vec::new();
        for i in 0..40 {
            let x = (i as f64 - 20.0) / 4.0;
            frame.push_row(vec![x]);
            // a few flipped labels near the boundary
            let positive = if i == 19 || i == 22 { x <= 0.0 } else { x > 0.0 };
            target.push(if positive { labels[1] } else { labels[0] });
        }
        Dataset::new(frame, target).unwrap()
    }

    #[test]
    fn test_fit_and_predict() {
        let data = separable([0.0, 1.0]);
        let model = LogisticRegression::new(1.0).fit(&data).unwrap();

        assert!(model.converged);
        assert!(model.coef[0] > 0.0);
        assert!(model.score(&data).unwrap() >= 0.9);

        let proba = model.predict_proba(&data.features).unwrap();
        for [p0, p1] in proba {
            assert!(p0 > 0.0 && p1 > 0.0);
            assert!((p0 + p1 - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_predict_returns_original_labels() {
        let data = separable([2.0, 5.0]);
        let model = LogisticRegression::default().fit(&data).unwrap();
        assert_eq!(model.classes, [2.0, 5.0]);
        let predicted = model.predict(&data.features).unwrap();
        assert!(predicted.iter().all(|&p| p == 2.0 || p == 5.0));
        assert_eq!(predicted[0], 2.0);
        assert_eq!(predicted[39], 5.0);
    }

    #[test]
    fn test_regularisation_shrinks_weights() {
        let data = separable([0.0, 1.0]);
        let loose = LogisticRegression::from_reg_rate(0.01).unwrap().fit(&data).unwrap();
        let tight = LogisticRegression::from_reg_rate(100.0).unwrap().fit(&data).unwrap();
        assert!(tight.coef[0].abs() < loose.coef[0].abs());
    }

    #[test]
    fn test_gradient_vanishes_at_solution() {
        let data = separable([0.0, 1.0]);
        let clf = LogisticRegression::new(10.0).with_tol(1e-10);
        let model = clf.fit(&data).unwrap();

        let rows: Vec<Vec<f64>> = data.features.rows().iter().map(|r| vec![r[0], 1.0]).collect();
        let y: Vec<f64> = data.target.iter().map(|&v| if v == 1.0 { 1.0 } else { -1.0 }).collect();
        let (_, grad) = objective(&rows, &y, &[model.coef[0], model.intercept], 10.0);
        assert!(norm(&grad) < 1e-6);
    }

    #[test]
    fn test_rejects_non_binary_target() {
        let mut frame = Frame::new(["x"]);
        for i in 0..3 {
            frame.push_row(vec![i as f64]);
        }
        let data = Dataset::new(frame.clone(), vec![0.0, 1.0, 2.0]).unwrap();
        let err = LogisticRegression::default().fit(&data).unwrap_err();
        assert!(matches!(err, TrainError::NotBinary(3)));

        let data = Dataset::new(frame, vec![1.0, 1.0, 1.0]).unwrap();
        let err = LogisticRegression::default().fit(&data).unwrap_err();
        assert!(matches!(err, TrainError::NotBinary(1)));
    }

    #[test]
    fn test_rejects_missing_values() {
        let mut frame = Frame::new(["x", "bmi"]);
        frame.push_row(vec![1.0, f64::NAN]);
        frame.push_row(vec![2.0, 3.0]);
        let data = Dataset::new(frame, vec![0.0, 1.0]).unwrap();
        let err = LogisticRegression::default().fit(&data).unwrap_err();
        assert!(matches!(err, TrainError::MissingValues(c) if c == "bmi"));
    }

    #[test]
    fn test_predict_checks_feature_count() {
        let model = LogisticRegression::default().fit(&separable([0.0, 1.0])).unwrap();
        let mut wide = Frame::new(["x", "y"]);
        wide.push_row(vec![1.0, 2.0]);
        assert!(matches!(
            model.predict(&wide).unwrap_err(),
            TrainError::DimensionMismatch { expected: 1, found: 2 }
        ));
    }

    #[test]
    fn test_from_reg_rate() {
        assert_eq!(LogisticRegression::from_reg_rate(0.01).unwrap().c, 100.0);
        assert!(LogisticRegression::from_reg_rate(0.0).is_err());
        assert!(LogisticRegression::from_reg_rate(-1.0).is_err());
    }

    #[test]
    fn test_line_search_rejects_ascent_direction() {
        let rows = vec![vec![1.0, 1.0], vec![-1.0, 1.0]];
        let y = [1.0, -1.0];
        let w = [0.0, 0.0];
        let (loss, grad) = objective(&rows, &y, &w, 1.0);

        // moving along the gradient only increases the loss
        let slope = dot(&grad, &grad);
        assert!(line_search(&rows, &y, &w, &grad, loss, slope, 1.0).is_none());

        let descent: Vec<f64> = grad.iter().map(|g| -g).collect();
        let (_, next_loss, _) =
            line_search(&rows, &y, &w, &descent, loss, -slope, 1.0).unwrap();
        assert!(next_loss < loss);
    }

    #[test]
    fn test_fit_without_intercept() {
        let data = separable([0.0, 1.0]);
        let model = LogisticRegression::new(1.0)
            .with_fit_intercept(false)
            .fit(&data)
            .unwrap();
        assert_eq!(model.intercept, 0.0);
        assert_eq!(model.coef.len(), 1);
        assert!(model.coef[0] > 0.0);
        assert!(model.score(&data).unwrap() >= 0.9);
        assert_eq!(
            LogisticRegression::new(1.0).with_fit_intercept(false).params()["fit_intercept"],
            "false"
        );
    }

    #[test]
    fn test_log1p_exp_is_stable() {
        assert!((log1p_exp(0.0) - 2f64.ln()).abs() < 1e-15);
        assert_eq!(log1p_exp(1000.0), 1000.0);
        assert_eq!(log1p_exp(-1000.0), 0.0);
    }
}
