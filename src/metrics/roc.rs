//! ROC curve math: AUC, interpolation onto a common grid, and cross-fold
//! averaging with a variance band.

use super::{mean, population_std};
use crate::bundle::RocRecord;
use crate::error::{CvError, Result};
use ndarray::{Array1, Array2, Axis};

/// Number of evenly spaced FPR grid points the fold curves are aligned on.
pub const GRID_POINTS: usize = 100;

/// Area under a curve by the trapezoidal rule. `xs` must be ascending.
pub fn trapezoid_auc(xs: &[f64], ys: &[f64]) -> f64 {
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| 0.5 * (x[1] - x[0]) * (y[1] + y[0]))
        .sum()
}

/// Piecewise-linear interpolation of `(xs, ys)` sampled at `grid`, clamping
/// to the first/last `ys` value outside the `xs` range.
pub fn interp(grid: &[f64], xs: &[f64], ys: &[f64]) -> Vec<f64> {
    debug_assert_eq!(xs.len(), ys.len());
    grid.iter()
        .map(|&g| {
            if xs.is_empty() {
                return 0.0;
            }
            if g <= xs[0] {
                return ys[0];
            }
            if g >= xs[xs.len() - 1] {
                return ys[ys.len() - 1];
            }
            // xs is ascending; find the bracketing segment.
            let hi = xs.partition_point(|&x| x < g);
            let (x0, x1) = (xs[hi - 1], xs[hi]);
            let (y0, y1) = (ys[hi - 1], ys[hi]);
            if x1 == x0 {
                y1
            } else {
                y0 + (y1 - y0) * (g - x0) / (x1 - x0)
            }
        })
        .collect()
}

/// Compute a ROC curve from binary labels and classifier scores.
///
/// Thresholds sweep the distinct scores in descending order; the first point
/// is (0, 0) at a threshold just above the highest score. Requires at least
/// one positive and one negative label.
pub fn curve_from_scores(labels: &[bool], scores: &[f64]) -> Result<RocRecord> {
    if labels.len() != scores.len() {
        return Err(CvError::Validation(format!(
            "roc curve: {} labels but {} scores",
            labels.len(),
            scores.len()
        )));
    }
    let positives = labels.iter().filter(|&&l| l).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(CvError::Validation(
            "roc curve: need at least one positive and one negative label".into(),
        ));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal));

    let top = scores[order[0]];
    let mut fpr = vec![0.0];
    let mut tpr = vec![0.0];
    let mut thresholds = vec![top + 1.0];

    let mut tp = 0usize;
    let mut fp = 0usize;
    for (rank, &idx) in order.iter().enumerate() {
        if labels[idx] {
            tp += 1;
        } else {
            fp += 1;
        }
        // Emit a point only once all samples tied at this score are counted.
        let last_of_tie = match order.get(rank + 1) {
            Some(&next) => scores[next] != scores[idx],
            None => true,
        };
        if last_of_tie {
            fpr.push(fp as f64 / negatives as f64);
            tpr.push(tp as f64 / positives as f64);
            thresholds.push(scores[idx]);
        }
    }

    Ok(RocRecord { fpr, tpr, thresholds })
}

/// Cross-fold ROC aggregate: per-fold AUCs plus the mean curve and its
/// ±1 standard-deviation band on a common FPR grid.
#[derive(Debug, Clone)]
pub struct RocSummary {
    /// The common FPR grid ([`GRID_POINTS`] even samples of [0, 1]).
    pub mean_fpr: Vec<f64>,
    /// Pointwise mean of the interpolated fold curves; forced to exactly 1
    /// at fpr = 1.
    pub mean_tpr: Vec<f64>,
    /// AUC of the mean curve.
    pub mean_auc: f64,
    /// Population standard deviation of the per-fold AUCs.
    pub std_auc: f64,
    /// Pointwise mean + 1 std, clipped to 1.
    pub upper_band: Vec<f64>,
    /// Pointwise mean - 1 std, clipped to 0.
    pub lower_band: Vec<f64>,
    /// AUC of each fold's native curve, in fold order.
    pub fold_aucs: Vec<f64>,
}

impl RocSummary {
    /// Aggregate the best-MCC ROC records of all folds.
    pub fn from_records(records: &[RocRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(CvError::Validation(
                "roc summary: no fold ROC records given".into(),
            ));
        }

        let grid: Vec<f64> = (0..GRID_POINTS)
            .map(|i| i as f64 / (GRID_POINTS - 1) as f64)
            .collect();

        let mut curves = Array2::<f64>::zeros((records.len(), GRID_POINTS));
        let mut fold_aucs = Vec::with_capacity(records.len());
        for (fold, record) in records.iter().enumerate() {
            if record.fpr.is_empty() || record.fpr.len() != record.tpr.len() {
                return Err(CvError::Validation(format!(
                    "roc summary: fold {} has a malformed ROC record",
                    fold
                )));
            }
            let mut tpr = interp(&grid, &record.fpr, &record.tpr);
            // Remove the interpolation artifact at the left boundary.
            tpr[0] = 0.0;
            curves
                .row_mut(fold)
                .assign(&Array1::from_vec(tpr));
            fold_aucs.push(trapezoid_auc(&record.fpr, &record.tpr));
        }

        let mut mean_tpr = curves
            .mean_axis(Axis(0))
            .expect("at least one fold curve")
            .to_vec();
        // Terminal-boundary correction at fpr = 1.
        mean_tpr[GRID_POINTS - 1] = 1.0;
        let mean_auc = trapezoid_auc(&grid, &mean_tpr);
        let std_auc = population_std(&fold_aucs);

        let std_tpr = curves.std_axis(Axis(0), 0.0);
        let upper_band: Vec<f64> = mean_tpr
            .iter()
            .zip(std_tpr.iter())
            .map(|(m, s)| (m + s).min(1.0))
            .collect();
        let lower_band: Vec<f64> = mean_tpr
            .iter()
            .zip(std_tpr.iter())
            .map(|(m, s)| (m - s).max(0.0))
            .collect();

        Ok(Self {
            mean_fpr: grid,
            mean_tpr,
            mean_auc,
            std_auc,
            upper_band,
            lower_band,
            fold_aucs,
        })
    }

    /// Mean of the per-fold AUCs (distinct from the AUC of the mean curve).
    pub fn mean_fold_auc(&self) -> f64 {
        mean(&self.fold_aucs)
    }
}
