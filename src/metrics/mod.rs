//! Metric aggregation across cross-validation folds
//!
//! Epoch selection is implicit: the best epoch for a metric is whichever
//! epoch had the maximum value in that fold's own history, independently per
//! metric. [`mean_max`] averages these per-fold maxima; [`roc`] aligns and
//! averages the per-fold ROC curves.

pub mod roc;

use crate::error::{CvError, Result};

/// Mean across folds of each fold's per-epoch maximum.
///
/// Degenerate input is an error, never a silent NaN.
pub fn mean_max(histories: &[Vec<f64>]) -> Result<f64> {
    if histories.is_empty() {
        return Err(CvError::Validation(
            "mean_max: no fold histories given".into(),
        ));
    }

    let mut maxima = Vec::with_capacity(histories.len());
    for (fold, history) in histories.iter().enumerate() {
        if history.is_empty() {
            return Err(CvError::Validation(format!(
                "mean_max: fold {} has an empty history",
                fold
            )));
        }
        maxima.push(history.iter().copied().fold(f64::NEG_INFINITY, f64::max));
    }

    Ok(mean(&maxima))
}

/// Arithmetic mean. Callers guarantee `values` is non-empty.
pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (ddof = 0, matching the fold-score
/// aggregation everywhere else in this crate).
pub(crate) fn population_std(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
