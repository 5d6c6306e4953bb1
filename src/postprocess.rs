//! Post-processing of a persisted cross-validation bundle
//!
//! Loads the bundle written by the runner, picks each fold's best epoch per
//! metric (maximum value in that fold's own history), averages across folds,
//! and aggregates the best-MCC ROC records into a mean curve with a variance
//! band. The CLI layer only formats the returned report.

use crate::bundle::CvBundle;
use crate::error::Result;
use crate::metrics::mean_max;
use crate::metrics::roc::RocSummary;
use crate::task::TaskMode;
use crate::visualization::save_roc_plot;
use std::path::{Path, PathBuf};

/// Aggregate results of one cross-validation run.
#[derive(Debug)]
pub struct PostProcessReport {
    pub mode: TaskMode,
    pub folds: usize,
    /// Mean across folds of each fold's best validation accuracy.
    pub mean_val_acc: f64,
    /// Mean across folds of each fold's best validation MCC.
    pub mean_val_mcc: f64,
    pub roc: RocSummary,
}

/// Path post-processing reads the bundle from: `{log_dir}/{mode}_cv.json`.
pub fn bundle_path(log_dir: &Path, mode: TaskMode) -> PathBuf {
    log_dir.join(format!("{}_cv.json", mode.stem()))
}

/// Default plot artifact path: `{log_dir}/{mode}_roc.svg`.
pub fn plot_path(log_dir: &Path, mode: TaskMode) -> PathBuf {
    log_dir.join(format!("{}_roc.svg", mode.stem()))
}

/// Aggregate an already-loaded bundle.
pub fn summarize(mode: TaskMode, bundle: &CvBundle) -> Result<PostProcessReport> {
    bundle.validate()?;
    Ok(PostProcessReport {
        mode,
        folds: bundle.folds(),
        mean_val_acc: mean_max(&bundle.val_acc)?,
        mean_val_mcc: mean_max(&bundle.val_mcc)?,
        roc: RocSummary::from_records(&bundle.best_mcc_roc)?,
    })
}

/// Load the bundle for `mode`, aggregate it, and write the ROC plot.
pub fn run(log_dir: &Path, mode: TaskMode, plot: &Path) -> Result<PostProcessReport> {
    let path = bundle_path(log_dir, mode);
    let bundle = CvBundle::load(&path)?;
    let report = summarize(mode, &bundle)?;
    save_roc_plot(&report.roc, &bundle.best_mcc_roc, plot)?;
    tracing::info!(plot = %plot.display(), folds = report.folds, "roc plot written");
    Ok(report)
}
