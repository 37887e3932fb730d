//! Classification metrics

use serde::Serialize;

use crate::error::{Result, TrainError};

fn check_lengths(y_true: &[f64], other: &[f64]) -> Result<()> {
    if y_true.len() != other.len() {
        return Err(TrainError::DimensionMismatch {
            expected: y_true.len(),
            found: other.len(),
        });
    }
    if y_true.is_empty() {
        return Err(TrainError::EmptyData("no samples to score".to_string()));
    }
    Ok(())
}

/// Positive label of a binary target (the larger of its two values)
fn positive_label(y_true: &[f64]) -> Result<f64> {
    let mut labels = y_true.to_vec();
    labels.sort_by(f64::total_cmp);
    labels.dedup();
    match labels.as_slice() {
        [_] => Err(TrainError::SingleClass),
        [_, pos] => Ok(*pos),
        other => Err(TrainError::NotBinary(other.len())),
    }
}

/// Fraction of predictions equal to the true label
pub fn accuracy(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let hits = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(hits as f64 / y_true.len() as f64)
}

/// Area under the ROC curve for a binary target.
///
/// Computed from the rank-sum statistic; tied scores count half, which
/// equals the trapezoidal area under the ROC curve.
pub fn roc_auc_score(y_true: &[f64], y_score: &[f64]) -> Result<f64> {
    check_lengths(y_true, y_score)?;
    let pos_label = positive_label(y_true)?;

    let mut order: Vec<usize> = (0..y_score.len()).collect();
    order.sort_by(|&a, &b| y_score[a].total_cmp(&y_score[b]));

    // 1-based average ranks over runs of tied scores
    let mut ranks = vec![0.0; y_score.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && y_score[order[end]] == y_score[order[start]] {
            end += 1;
        }
        let avg_rank = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = avg_rank;
        }
        start = end;
    }

    let n_pos = y_true.iter().filter(|&&y| y == pos_label).count() as f64;
    let n_neg = y_true.len() as f64 - n_pos;
    let pos_rank_sum: f64 = y_true
        .iter()
        .zip(&ranks)
        .filter(|(y, _)| **y == pos_label)
        .map(|(_, r)| r)
        .sum();

    Ok((pos_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}

/// Receiver operating characteristic points, one per distinct threshold
/// (no intermediate points are dropped)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    /// Decreasing score thresholds; the first is `+inf`
    pub thresholds: Vec<f64>,
}

impl RocCurve {
    /// Trapezoidal area under the curve
    pub fn area(&self) -> f64 {
        self.fpr
            .windows(2)
            .zip(self.tpr.windows(2))
            .map(|(x, y)| (x[1] - x[0]) * (y[1] + y[0]) / 2.0)
            .sum()
    }

    /// Render as `fpr,tpr,threshold` CSV
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["fpr", "tpr", "threshold"])
            .map_err(csv_to_io)?;
        for ((fpr, tpr), threshold) in self.fpr.iter().zip(&self.tpr).zip(&self.thresholds) {
            writer
                .write_record([fpr.to_string(), tpr.to_string(), threshold.to_string()])
                .map_err(csv_to_io)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| TrainError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn csv_to_io(err: csv::Error) -> TrainError {
    TrainError::Io(std::io::Error::other(err))
}

/// ROC curve of a binary target against scores.
///
/// Every distinct threshold is kept; collinear intermediate points are not
/// dropped.
pub fn roc_curve(y_true: &[f64], y_score: &[f64]) -> Result<RocCurve> {
    check_lengths(y_true, y_score)?;
    let pos_label = positive_label(y_true)?;

    let mut order: Vec<usize> = (0..y_score.len()).collect();
    order.sort_by(|&a, &b| y_score[b].total_cmp(&y_score[a]));

    let n_pos = y_true.iter().filter(|&&y| y == pos_label).count() as f64;
    let n_neg = y_true.len() as f64 - n_pos;

    let mut curve = RocCurve {
        fpr: vec![0.0],
        tpr: vec![0.0],
        thresholds: vec![f64::INFINITY],
    };
    let (mut tp, mut fp) = (0.0, 0.0);
    for (i, &idx) in order.iter().enumerate() {
        if y_true[idx] == pos_label {
            tp += 1.0;
        } else {
            fp += 1.0;
        }
        let last_of_run = order
            .get(i + 1)
            .map_or(true, |&next| y_score[next] != y_score[idx]);
        if last_of_run {
            curve.fpr.push(fp / n_neg);
            curve.tpr.push(tp / n_pos);
            curve.thresholds.push(y_score[idx]);
        }
    }

    Ok(curve)
}

/// Mean cross-entropy of positive-class probabilities
pub fn log_loss(y_true: &[f64], p_pos: &[f64]) -> Result<f64> {
    check_lengths(y_true, p_pos)?;
    let pos_label = positive_label(y_true)?;
    let eps = f64::EPSILON;
    let total: f64 = y_true
        .iter()
        .zip(p_pos)
        .map(|(&y, &p)| {
            let p = p.clamp(eps, 1.0 - eps);
            if y == pos_label {
                -p.ln()
            } else {
                -(1.0 - p).ln()
            }
        })
        .sum();
    Ok(total / y_true.len() as f64)
}

/// Precision, recall and F1 for `pos_label`; undefined ratios are 0
pub fn precision_recall_f1(y_true: &[f64], y_pred: &[f64], pos_label: f64) -> Result<(f64, f64, f64)> {
    check_lengths(y_true, y_pred)?;
    let (mut tp, mut fp, mut fn_) = (0usize, 0usize, 0usize);
    for (&t, &p) in y_true.iter().zip(y_pred) {
        match (t == pos_label, p == pos_label) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
            (false, false) => {}
        }
    }

    let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };
    Ok((precision, recall, f1))
}

/// Held-out metrics logged at the end of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub acc: f64,
    pub auc: f64,
}
