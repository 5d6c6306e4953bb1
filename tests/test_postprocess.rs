//! Integration test: post-processing a bundle written by earlier tooling

use approx::assert_abs_diff_eq;
use catdog_cv::bundle::CvBundle;
use catdog_cv::metrics::roc::GRID_POINTS;
use catdog_cv::postprocess;
use catdog_cv::task::TaskMode;
use std::fs;

/// A legacy positional bundle with K=3 folds, as the original tooling wrote
/// it: seven positional lists, ROC records as fpr/tpr/thresholds maps.
fn write_legacy_bundle(log_dir: &std::path::Path) {
    let legacy = serde_json::json!([
        // train_acc
        [[0.6, 0.92, 0.85], [0.7, 0.97], [0.75, 0.88, 0.93, 0.9]],
        // val_acc
        [[0.5, 0.9, 0.8], [0.6, 0.95], [0.7, 0.85, 0.9, 0.88]],
        // train_loss
        [[0.8, 0.4, 0.3], [0.7, 0.35], [0.75, 0.5, 0.35, 0.3]],
        // val_loss
        [[0.9, 0.5, 0.45], [0.8, 0.4], [0.85, 0.6, 0.4, 0.42]],
        // train_mcc
        [[0.2, 0.8, 0.7], [0.35, 0.9], [0.4, 0.7, 0.85, 0.8]],
        // val_mcc
        [[0.1, 0.7, 0.6], [0.25, 0.85], [0.3, 0.6, 0.8, 0.75]],
        // best_mcc_roc
        [
            {"fpr": [0.0, 0.1, 1.0], "tpr": [0.0, 0.8, 1.0], "thresholds": [1.9, 0.7, 0.0]},
            {"fpr": [0.0, 0.2, 1.0], "tpr": [0.0, 0.9, 1.0], "thresholds": [1.8, 0.6, 0.0]},
            {"fpr": [0.0, 0.3, 1.0], "tpr": [0.0, 0.85, 1.0], "thresholds": [1.7, 0.5, 0.0]}
        ]
    ]);
    fs::write(
        log_dir.join("cat_vs_dog_cv.json"),
        serde_json::to_string(&legacy).unwrap(),
    )
    .unwrap();
}

#[test]
fn test_legacy_bundle_post_processes_end_to_end() {
    let log_dir = tempfile::tempdir().unwrap();
    write_legacy_bundle(log_dir.path());

    let plot = postprocess::plot_path(log_dir.path(), TaskMode::CatVsDog);
    let report = postprocess::run(log_dir.path(), TaskMode::CatVsDog, &plot).unwrap();

    assert_eq!(report.folds, 3);
    // mean(0.9, 0.95, 0.9) and mean(0.7, 0.85, 0.8)
    assert_abs_diff_eq!(report.mean_val_acc, 0.9167, epsilon = 1e-4);
    assert_abs_diff_eq!(report.mean_val_mcc, 0.7833, epsilon = 1e-4);

    // Endpoint forcing and the band invariants on the common grid.
    assert_eq!(report.roc.mean_tpr[0], 0.0);
    assert_eq!(report.roc.mean_tpr[GRID_POINTS - 1], 1.0);
    for i in 0..GRID_POINTS {
        assert!(report.roc.lower_band[i] <= report.roc.mean_tpr[i] + 1e-12);
        assert!(report.roc.mean_tpr[i] <= report.roc.upper_band[i] + 1e-12);
    }

    let svg = fs::read_to_string(&plot).unwrap();
    assert!(svg.contains("ROC fold 2"), "all three folds should be drawn");
}

#[test]
fn test_legacy_and_keyed_formats_agree() {
    let log_dir = tempfile::tempdir().unwrap();
    write_legacy_bundle(log_dir.path());
    let legacy_path = log_dir.path().join("cat_vs_dog_cv.json");

    let bundle = CvBundle::load(&legacy_path).unwrap();
    let keyed_path = log_dir.path().join("rewritten_cv.json");
    bundle.save(&keyed_path).unwrap();

    let reloaded = CvBundle::load(&keyed_path).unwrap();
    assert_eq!(reloaded, bundle, "keyed rewrite preserves every fold exactly");
}

#[test]
fn test_truncated_bundle_is_a_schema_error_not_a_panic() {
    let log_dir = tempfile::tempdir().unwrap();
    fs::write(log_dir.path().join("cat_cv.json"), "[[ [0.1] ], [ [0.2] ]]").unwrap();

    let plot = postprocess::plot_path(log_dir.path(), TaskMode::Cat);
    let err = postprocess::run(log_dir.path(), TaskMode::Cat, &plot).unwrap_err();
    assert!(
        err.to_string().contains("expected 7"),
        "got unexpected error: {}",
        err
    );
}
