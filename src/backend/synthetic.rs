//! Deterministic synthetic training backend
//!
//! Stands in for a real CNN training framework: given a seed it fabricates
//! plausible per-epoch accuracy/loss/MCC histories and computes a genuine ROC
//! record from sampled validation scores. Runs are fully reproducible, which
//! makes the fold loop and the post-processing pipeline testable end to end
//! without any ML framework or accelerator.

use super::{Device, LoaderRequest, TrainOutcome, TrainingBackend};
use crate::error::{CvError, Result};
use crate::metrics::roc::curve_from_scores;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Synthetic stand-in for an external training framework.
#[derive(Debug, Clone)]
pub struct SyntheticBackend {
    /// Epoch count handed out by the configuration factory.
    pub epochs: usize,
    /// Number of validation samples scored for the ROC record.
    pub val_samples: usize,
}

impl Default for SyntheticBackend {
    fn default() -> Self {
        Self {
            epochs: 12,
            val_samples: 200,
        }
    }
}

/// Fresh per-fold training configuration.
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub epochs: usize,
    pub device: Device,
}

/// Stand-in for a framework train/validation loader pair.
///
/// Carries the per-fold RNG seed so training is deterministic for a given
/// fold directory and user seed.
#[derive(Debug, Clone)]
pub struct SyntheticLoaders {
    pub train_batches: usize,
    pub val_batches: usize,
    seed: u64,
}

impl TrainingBackend for SyntheticBackend {
    type Config = SyntheticConfig;
    type Loaders = SyntheticLoaders;

    fn configuration(&self, device: Device) -> Result<Self::Config> {
        Ok(SyntheticConfig {
            epochs: self.epochs,
            device,
        })
    }

    fn data_loaders(&self, request: &LoaderRequest) -> Result<Self::Loaders> {
        if !request.fold_dir.is_dir() {
            return Err(CvError::Validation(format!(
                "fold directory not found: {}",
                request.fold_dir.display()
            )));
        }
        if request.batch_size == 0 {
            return Err(CvError::Validation("batch size must be positive".into()));
        }

        // Pretend each fold holds 1024 training and 256 validation images.
        let train_batches = (1024 + request.batch_size - 1) / request.batch_size;
        let val_batches = (256 + request.batch_size - 1) / request.batch_size;

        // Vary the stream per fold while staying deterministic for a given
        // user seed and fold directory.
        let mut hasher = DefaultHasher::new();
        request.fold_dir.hash(&mut hasher);
        let seed = request.seed ^ hasher.finish();

        Ok(SyntheticLoaders {
            train_batches,
            val_batches,
            seed,
        })
    }

    fn train(
        &self,
        config: Self::Config,
        _device: Device,
        loaders: Self::Loaders,
    ) -> Result<TrainOutcome> {
        let mut rng = ChaCha8Rng::seed_from_u64(loaders.seed);
        let epochs = config.epochs;

        let mut train_acc = Vec::with_capacity(epochs);
        let mut val_acc = Vec::with_capacity(epochs);
        let mut train_loss = Vec::with_capacity(epochs);
        let mut val_loss = Vec::with_capacity(epochs);
        let mut train_mcc = Vec::with_capacity(epochs);
        let mut val_mcc = Vec::with_capacity(epochs);

        // Saturating learning curves with small per-epoch noise. Epoch
        // metrics are batch averages, so their jitter shrinks with the
        // number of batches averaged per epoch.
        let train_jitter = 0.04 / (loaders.train_batches as f64).sqrt();
        let val_jitter = 0.05 / (loaders.val_batches as f64).sqrt();
        let ceiling = 0.88 + rng.gen_range(0.0..0.08);
        for epoch in 0..epochs {
            let progress = 1.0 - (-(epoch as f64) / 4.0).exp();
            let noise = rng.gen_range(-1.0..1.0) * val_jitter;
            let acc = (0.5 + (ceiling - 0.5) * progress + noise).clamp(0.0, 1.0);
            train_acc.push((acc + 0.03).min(1.0));
            val_acc.push(acc);

            let loss =
                0.7 * (-(epoch as f64) / 3.0).exp() + 0.05 + rng.gen_range(0.0..1.0) * train_jitter;
            train_loss.push(loss);
            val_loss.push(loss + rng.gen_range(0.0..1.0) * val_jitter);

            let mcc = (2.0 * acc - 1.0).clamp(-1.0, 1.0);
            train_mcc.push((mcc + 0.05).min(1.0));
            val_mcc.push(mcc);
        }

        // Score the validation set once to build the ROC record. Positives
        // and negatives draw from skewed distributions so the curve is
        // separable but imperfect, like a real classifier.
        let mut labels = Vec::with_capacity(self.val_samples);
        let mut scores = Vec::with_capacity(self.val_samples);
        for _ in 0..self.val_samples {
            let positive = rng.gen_bool(0.5);
            let u: f64 = rng.gen_range(0.0_f64..1.0);
            let score = if positive { u.powf(0.35) } else { u.powf(2.5) };
            labels.push(positive);
            scores.push(score);
        }
        let best_mcc_roc = curve_from_scores(&labels, &scores)?;

        Ok(TrainOutcome {
            train_acc_history: train_acc,
            val_acc_history: val_acc,
            train_loss_history: train_loss,
            val_loss_history: val_loss,
            train_mcc_history: train_mcc,
            val_mcc_history: val_mcc,
            best_mcc_roc,
        })
    }
}
