//! Training backend abstraction
//!
//! The cross-validation runner never trains a model itself; it drives an
//! external backend through [`TrainingBackend`]. Any framework that can
//! produce a fresh model/loss/optimizer configuration, build train/validation
//! loaders for a fold directory, and run a training loop that reports
//! per-epoch histories can be plugged in. The crate ships a deterministic
//! [`SyntheticBackend`] for tests and demonstration runs.

mod synthetic;

pub use synthetic::{SyntheticBackend, SyntheticConfig, SyntheticLoaders};

use crate::bundle::RocRecord;
use crate::error::Result;
use crate::task::TaskMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Compute device the backend should train on.
///
/// Threaded explicitly through the runner instead of probed globally, so runs
/// are reproducible and testable on machines without accelerators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Device {
    Cpu,
    Cuda(u32),
}

impl Default for Device {
    fn default() -> Self {
        Device::Cpu
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda(idx) => write!(f, "cuda:{}", idx),
        }
    }
}

impl FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(Device::Cpu),
            "cuda" => Ok(Device::Cuda(0)),
            other => match other.strip_prefix("cuda:") {
                Some(idx) => idx
                    .parse::<u32>()
                    .map(Device::Cuda)
                    .map_err(|_| format!("invalid cuda device index: {}", idx)),
                None => Err(format!("unknown device: {} (expected cpu or cuda[:N])", other)),
            },
        }
    }
}

/// Everything a backend needs to build the train/validation loaders for one
/// fold.
#[derive(Debug, Clone)]
pub struct LoaderRequest {
    pub mode: TaskMode,
    pub batch_size: usize,
    /// Directory holding this fold's pre-partitioned data (`{data_dir}/cv{i}/`).
    pub fold_dir: PathBuf,
    pub seed: u64,
    pub normalize: bool,
}

/// Per-fold result of one training run.
///
/// All six histories have one entry per epoch and identical length. The ROC
/// record is captured at the epoch where validation MCC was maximal. The
/// trained model is deliberately not surfaced: the runner discards it, so
/// backends keep their model types internal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainOutcome {
    pub train_acc_history: Vec<f64>,
    pub val_acc_history: Vec<f64>,
    pub train_loss_history: Vec<f64>,
    pub val_loss_history: Vec<f64>,
    pub train_mcc_history: Vec<f64>,
    pub val_mcc_history: Vec<f64>,
    pub best_mcc_roc: RocRecord,
}

/// External model/data provider driven by the cross-validation runner.
pub trait TrainingBackend {
    /// Framework-specific model/loss/optimizer/epoch-count bundle.
    /// A fresh value is requested per fold so no state leaks between folds.
    type Config;
    /// Framework-specific train/validation loader pair.
    type Loaders;

    /// Build a freshly initialized training configuration for `device`.
    fn configuration(&self, device: Device) -> Result<Self::Config>;

    /// Build train/validation data loaders for one fold.
    fn data_loaders(&self, request: &LoaderRequest) -> Result<Self::Loaders>;

    /// Run the full training loop and report per-epoch histories plus the
    /// ROC curve at the best-validation-MCC epoch. Failures abort the whole
    /// cross-validation run.
    fn train(
        &self,
        config: Self::Config,
        device: Device,
        loaders: Self::Loaders,
    ) -> Result<TrainOutcome>;
}
