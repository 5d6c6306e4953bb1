//! Cross-validation result bundle and its persistence
//!
//! One bundle holds the results of a full K-fold run: seven parallel
//! per-fold lists (train/val × accuracy/loss/MCC histories plus the ROC
//! record at the best-validation-MCC epoch). The bundle is written once at
//! the end of a run and read back immutably by the post-processor.
//!
//! On disk the bundle is a keyed JSON object. The loader also accepts the
//! legacy layout: a positional 7-element JSON array in the field order of
//! [`CvBundle`], as written by earlier tooling. Producer and consumer live in
//! this one module so the two layouts cannot drift apart.

use crate::backend::TrainOutcome;
use crate::error::{CvError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// ROC curve captured at one fold's best-validation-MCC epoch.
///
/// `fpr` is ascending; `fpr`, `tpr` and `thresholds` are index-aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocRecord {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    pub thresholds: Vec<f64>,
}

/// The seven parallel per-fold result lists of one cross-validation run.
///
/// Invariant (checked by [`CvBundle::validate`]): all seven lists have the
/// same length K, and within each fold the six histories share one epoch
/// count. Epoch counts may differ between folds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CvBundle {
    pub train_acc: Vec<Vec<f64>>,
    pub val_acc: Vec<Vec<f64>>,
    pub train_loss: Vec<Vec<f64>>,
    pub val_loss: Vec<Vec<f64>>,
    pub train_mcc: Vec<Vec<f64>>,
    pub val_mcc: Vec<Vec<f64>>,
    pub best_mcc_roc: Vec<RocRecord>,
}

impl CvBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of folds accumulated so far.
    pub fn folds(&self) -> usize {
        self.train_acc.len()
    }

    /// Append one fold's training outcome, preserving fold order.
    pub fn push_fold(&mut self, outcome: TrainOutcome) {
        self.train_acc.push(outcome.train_acc_history);
        self.val_acc.push(outcome.val_acc_history);
        self.train_loss.push(outcome.train_loss_history);
        self.val_loss.push(outcome.val_loss_history);
        self.train_mcc.push(outcome.train_mcc_history);
        self.val_mcc.push(outcome.val_mcc_history);
        self.best_mcc_roc.push(outcome.best_mcc_roc);
    }

    /// Check the parallel-list invariants.
    pub fn validate(&self) -> Result<()> {
        let k = self.folds();
        let lengths = [
            ("val_acc", self.val_acc.len()),
            ("train_loss", self.train_loss.len()),
            ("val_loss", self.val_loss.len()),
            ("train_mcc", self.train_mcc.len()),
            ("val_mcc", self.val_mcc.len()),
            ("best_mcc_roc", self.best_mcc_roc.len()),
        ];
        for (name, len) in lengths {
            if len != k {
                return Err(CvError::Schema(format!(
                    "parallel lists out of step: train_acc has {} folds but {} has {}",
                    k, name, len
                )));
            }
        }

        for fold in 0..k {
            let epochs = self.train_acc[fold].len();
            let histories = [
                ("val_acc", self.val_acc[fold].len()),
                ("train_loss", self.train_loss[fold].len()),
                ("val_loss", self.val_loss[fold].len()),
                ("train_mcc", self.train_mcc[fold].len()),
                ("val_mcc", self.val_mcc[fold].len()),
            ];
            for (name, len) in histories {
                if len != epochs {
                    return Err(CvError::Schema(format!(
                        "fold {}: train_acc has {} epochs but {} has {}",
                        fold, epochs, name, len
                    )));
                }
            }
        }
        Ok(())
    }

    /// Write the bundle as keyed JSON. Full overwrite; the parent directory
    /// is created if missing.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read a bundle, accepting the keyed layout first and falling back to
    /// the legacy positional 7-element array.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| CvError::BundleRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let value: serde_json::Value = serde_json::from_str(&contents).map_err(|e| {
            CvError::Schema(format!("cannot parse bundle {}: {}", path.display(), e))
        })?;

        let bundle = match value {
            serde_json::Value::Object(_) => serde_json::from_value(value).map_err(|e| {
                CvError::Schema(format!("malformed bundle {}: {}", path.display(), e))
            })?,
            serde_json::Value::Array(elements) => Self::from_positional(elements, path)?,
            _ => {
                return Err(CvError::Schema(format!(
                    "bundle {} is neither an object nor an array",
                    path.display()
                )))
            }
        };
        bundle.validate()?;
        Ok(bundle)
    }

    /// Decode the legacy layout: seven positional elements in field order;
    /// position is the schema.
    fn from_positional(elements: Vec<serde_json::Value>, path: &Path) -> Result<Self> {
        if elements.len() != 7 {
            return Err(CvError::Schema(format!(
                "legacy bundle {} has {} top-level elements, expected 7",
                path.display(),
                elements.len()
            )));
        }
        let mut iter = elements.into_iter();
        let mut decode = |name: &str| -> Result<serde_json::Value> {
            iter.next().ok_or_else(|| {
                CvError::Schema(format!(
                    "legacy bundle {}: missing element {}",
                    path.display(),
                    name
                ))
            })
        };

        fn histories(value: serde_json::Value, name: &str, path: &Path) -> Result<Vec<Vec<f64>>> {
            serde_json::from_value(value).map_err(|e| {
                CvError::Schema(format!(
                    "legacy bundle {}: element {} is not a history list: {}",
                    path.display(),
                    name,
                    e
                ))
            })
        }

        let train_acc = histories(decode("train_acc")?, "train_acc", path)?;
        let val_acc = histories(decode("val_acc")?, "val_acc", path)?;
        let train_loss = histories(decode("train_loss")?, "train_loss", path)?;
        let val_loss = histories(decode("val_loss")?, "val_loss", path)?;
        let train_mcc = histories(decode("train_mcc")?, "train_mcc", path)?;
        let val_mcc = histories(decode("val_mcc")?, "val_mcc", path)?;

        let best_mcc_roc: Vec<RocRecord> =
            serde_json::from_value(decode("best_mcc_roc")?).map_err(|e| {
                CvError::Schema(format!(
                    "legacy bundle {}: element best_mcc_roc is not a ROC list: {}",
                    path.display(),
                    e
                ))
            })?;

        Ok(Self {
            train_acc,
            val_acc,
            train_loss,
            val_loss,
            train_mcc,
            val_mcc,
            best_mcc_roc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bundle() -> CvBundle {
        let mut bundle = CvBundle::new();
        for fold in 0..3 {
            bundle.push_fold(TrainOutcome {
                train_acc_history: vec![0.5, 0.7, 0.8 + fold as f64 * 0.01],
                val_acc_history: vec![0.4, 0.6, 0.75],
                train_loss_history: vec![0.9, 0.5, 0.3],
                val_loss_history: vec![1.0, 0.6, 0.4],
                train_mcc_history: vec![0.1, 0.4, 0.6],
                val_mcc_history: vec![0.0, 0.3, 0.5],
                best_mcc_roc: RocRecord {
                    fpr: vec![0.0, 0.5, 1.0],
                    tpr: vec![0.0, 0.8, 1.0],
                    thresholds: vec![2.0, 0.5, 0.0],
                },
            });
        }
        bundle
    }

    #[test]
    fn save_then_load_round_trips_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat_cv.json");
        let bundle = sample_bundle();

        bundle.save(&path).unwrap();
        let loaded = CvBundle::load(&path).unwrap();
        assert_eq!(loaded, bundle);
        assert_eq!(loaded.folds(), 3);
    }

    #[test]
    fn full_precision_floats_survive_the_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("precision_cv.json");

        // Values whose shortest decimal rendering needs all 17 significant
        // digits to parse back bit-identically.
        let mut bundle = sample_bundle();
        bundle.val_acc[0] = vec![0.9238589790577479, 0.1 + 0.2];
        bundle.train_acc[0] = vec![f64::MIN_POSITIVE, 1.0 - f64::EPSILON];
        bundle.val_loss[0] = vec![0.6999999999999999, 1e-308];
        bundle.train_loss[0] = vec![0.3, 0.4];
        bundle.train_mcc[0] = vec![0.5, 0.6];
        bundle.val_mcc[0] = vec![0.7, 0.8];

        bundle.save(&path).unwrap();
        let loaded = CvBundle::load(&path).unwrap();
        assert_eq!(loaded, bundle, "every float must reload bit-identically");
    }

    #[test]
    fn legacy_positional_array_loads_to_same_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy_cv.json");
        let bundle = sample_bundle();

        // Seven positional elements, exactly what the earlier tooling wrote.
        let legacy = serde_json::json!([
            bundle.train_acc,
            bundle.val_acc,
            bundle.train_loss,
            bundle.val_loss,
            bundle.train_mcc,
            bundle.val_mcc,
            bundle.best_mcc_roc,
        ]);
        fs::write(&path, serde_json::to_string(&legacy).unwrap()).unwrap();

        let loaded = CvBundle::load(&path).unwrap();
        assert_eq!(loaded, bundle);
    }

    #[test]
    fn legacy_array_with_wrong_element_count_is_a_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short_cv.json");
        fs::write(&path, "[[], [], []]").unwrap();

        let err = CvBundle::load(&path).unwrap_err();
        assert!(matches!(err, CvError::Schema(_)), "got {:?}", err);
        assert!(err.to_string().contains("expected 7"));
    }

    #[test]
    fn inconsistent_fold_counts_fail_validation() {
        let mut bundle = sample_bundle();
        bundle.val_mcc.pop();
        let err = bundle.validate().unwrap_err();
        assert!(matches!(err, CvError::Schema(_)));
    }

    #[test]
    fn inconsistent_epoch_counts_fail_validation() {
        let mut bundle = sample_bundle();
        bundle.val_loss[1].push(0.33);
        let err = bundle.validate().unwrap_err();
        assert!(err.to_string().contains("fold 1"));
    }

    #[test]
    fn missing_file_reports_the_attempted_path() {
        let err = CvBundle::load(Path::new("/nope/cat_cv.json")).unwrap_err();
        assert!(err.to_string().contains("/nope/cat_cv.json"));
    }

    #[test]
    fn folds_with_different_epoch_counts_are_valid() {
        let mut bundle = CvBundle::new();
        bundle.push_fold(TrainOutcome {
            train_acc_history: vec![0.5, 0.9],
            val_acc_history: vec![0.4, 0.8],
            train_loss_history: vec![0.9, 0.4],
            val_loss_history: vec![1.0, 0.5],
            train_mcc_history: vec![0.1, 0.6],
            val_mcc_history: vec![0.0, 0.5],
            best_mcc_roc: RocRecord {
                fpr: vec![0.0, 1.0],
                tpr: vec![0.0, 1.0],
                thresholds: vec![1.0, 0.0],
            },
        });
        bundle.push_fold(TrainOutcome {
            train_acc_history: vec![0.5, 0.7, 0.9],
            val_acc_history: vec![0.4, 0.6, 0.8],
            train_loss_history: vec![0.9, 0.6, 0.4],
            val_loss_history: vec![1.0, 0.7, 0.5],
            train_mcc_history: vec![0.1, 0.3, 0.6],
            val_mcc_history: vec![0.0, 0.2, 0.5],
            best_mcc_roc: RocRecord {
                fpr: vec![0.0, 1.0],
                tpr: vec![0.0, 1.0],
                thresholds: vec![1.0, 0.0],
            },
        });
        assert!(bundle.validate().is_ok());
    }
}
