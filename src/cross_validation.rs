//! K-fold cross-validation runner
//!
//! Drives K independent training runs over pre-partitioned fold directories
//! (`{data_dir}/cv1/` .. `{data_dir}/cvK/`) through a [`TrainingBackend`],
//! accumulates the per-fold histories in fold order, and persists the
//! resulting [`CvBundle`] once at the end of the run.
//!
//! Folds run strictly one after another. A backend failure aborts the whole
//! run immediately: nothing is persisted and there is no resume.

use crate::backend::{Device, LoaderRequest, TrainingBackend};
use crate::bundle::CvBundle;
use crate::error::{CvError, Result};
use crate::task::TaskMode;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Configuration of one cross-validation run.
#[derive(Debug, Clone)]
pub struct CvConfig {
    pub mode: TaskMode,
    /// Root directory holding the pre-split folds as `cv1/` .. `cvK/`.
    pub data_dir: PathBuf,
    pub batch_size: usize,
    pub seed: u64,
    pub normalize: bool,
    /// Number of folds; folds beyond the partitioned directories fail when
    /// the backend builds its loaders.
    pub folds: usize,
    pub device: Device,
    /// Directory the result bundle is written to.
    pub log_dir: PathBuf,
}

impl CvConfig {
    pub fn new(mode: TaskMode, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            data_dir: data_dir.into(),
            batch_size: 256,
            seed: 123,
            normalize: true,
            folds: 5,
            device: Device::Cpu,
            log_dir: PathBuf::from("./log"),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    /// Path the bundle for this run is written to: `{log_dir}/{mode}_cv.json`.
    pub fn bundle_path(&self) -> PathBuf {
        self.log_dir.join(format!("{}_cv.json", self.mode.stem()))
    }

    /// Directory of fold `i` (1-based): `{data_dir}/cv{i}/`.
    pub fn fold_dir(&self, fold: usize) -> PathBuf {
        self.data_dir.join(format!("cv{}", fold))
    }
}

/// Cross-validation runner.
pub struct CrossValidation {
    config: CvConfig,
}

impl CrossValidation {
    pub fn new(config: CvConfig) -> Result<Self> {
        if config.folds == 0 {
            return Err(CvError::Validation(
                "cross-validation needs at least one fold".into(),
            ));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &CvConfig {
        &self.config
    }

    /// Execute all folds sequentially and return the accumulated bundle.
    ///
    /// Each fold gets a freshly initialized configuration from the backend,
    /// so no model or optimizer state leaks between folds.
    pub fn run<B: TrainingBackend>(&self, backend: &B) -> Result<CvBundle> {
        let mut bundle = CvBundle::new();

        for fold in 1..=self.config.folds {
            let started = Instant::now();
            tracing::info!(fold, total = self.config.folds, "starting fold");

            let train_config = backend.configuration(self.config.device)?;
            let request = LoaderRequest {
                mode: self.config.mode,
                batch_size: self.config.batch_size,
                fold_dir: self.config.fold_dir(fold),
                seed: self.config.seed,
                normalize: self.config.normalize,
            };
            let loaders = backend.data_loaders(&request)?;

            let outcome = backend.train(train_config, self.config.device, loaders)?;
            tracing::info!(
                fold,
                epochs = outcome.val_acc_history.len(),
                elapsed = ?started.elapsed(),
                "fold finished"
            );
            bundle.push_fold(outcome);
        }

        bundle.validate()?;
        Ok(bundle)
    }

    /// Run all folds and persist the bundle to [`CvConfig::bundle_path`].
    /// Full overwrite; re-running a mode discards its prior results.
    pub fn run_and_save<B: TrainingBackend>(&self, backend: &B) -> Result<(CvBundle, PathBuf)> {
        let bundle = self.run(backend)?;
        let path = self.config.bundle_path();
        bundle.save(&path)?;
        tracing::info!(path = %path.display(), folds = bundle.folds(), "bundle written");
        Ok((bundle, path))
    }
}

/// True when `data_dir` holds at least `folds` partition directories.
pub fn has_fold_partitions(data_dir: &Path, folds: usize) -> bool {
    (1..=folds).all(|i| data_dir.join(format!("cv{}", i)).is_dir())
}
