//! Command-line interface
//!
//! Two subcommands: `cross-validate` runs the K-fold loop and persists the
//! result bundle; `post-process` aggregates a persisted bundle into the
//! accuracy/MCC summary and the ROC plot.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::time::Instant;

use crate::backend::{Device, SyntheticBackend};
use crate::cross_validation::{has_fold_partitions, CrossValidation, CvConfig};
use crate::postprocess;
use crate::task::TaskMode;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}
fn accent(s: &str) -> ColoredString {
    s.truecolor(120, 170, 255)
}
fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}
fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

fn parse_device(s: &str) -> Result<Device, String> {
    s.parse()
}

#[derive(Parser)]
#[command(name = "catdog-cv")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "K-fold cross-validation and post-processing for cats/dogs classifiers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run K-fold cross-validation and persist the per-fold metrics
    CrossValidate {
        /// Classification task
        #[arg(long, value_enum, default_value_t = TaskMode::Cat)]
        op: TaskMode,

        /// Seed for random number generation
        #[arg(long, default_value_t = 123)]
        seed: u64,

        /// Root directory holding the pre-split folds (cv1/ .. cvK/)
        #[arg(long, default_value = "../data_prep/cats_vs_dogs_cv/")]
        data_dir: PathBuf,

        /// Batch size, normally a power of two
        #[arg(long, default_value_t = 256)]
        batch_size: usize,

        /// Whether to normalize the dataset
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        normalize: bool,

        /// Number of folds
        #[arg(long, default_value_t = 5)]
        folds: usize,

        /// Compute device (cpu or cuda[:N])
        #[arg(long, default_value = "cpu", value_parser = parse_device)]
        device: Device,

        /// Directory the result bundle is written to
        #[arg(long, default_value = "./log")]
        log_dir: PathBuf,
    },

    /// Aggregate a persisted run into accuracy/MCC summaries and a ROC plot
    PostProcess {
        /// Classification task
        #[arg(long, value_enum, default_value_t = TaskMode::CatVsDog)]
        op: TaskMode,

        /// Directory the result bundle was written to
        #[arg(long, default_value = "./log")]
        log_dir: PathBuf,

        /// Output plot path (defaults to {log_dir}/{op}_roc.svg)
        #[arg(long)]
        plot: Option<PathBuf>,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn cmd_cross_validate(
    op: TaskMode,
    seed: u64,
    data_dir: &PathBuf,
    batch_size: usize,
    normalize: bool,
    folds: usize,
    device: Device,
    log_dir: &PathBuf,
) -> anyhow::Result<()> {
    section("Cross-validate");

    println!("  {:<14} {}", muted("task"), op.describe().white());
    println!("  {:<14} {}", muted("data"), data_dir.display().to_string().white());
    println!("  {:<14} {}", muted("batch size"), batch_size.to_string().white());
    println!("  {:<14} {}", muted("device"), device.to_string().white());

    if !has_fold_partitions(data_dir, folds) {
        anyhow::bail!(
            "data directory {} does not hold cv1/ .. cv{}/ partitions",
            data_dir.display(),
            folds
        );
    }

    let config = CvConfig::new(op, data_dir.clone())
        .with_batch_size(batch_size)
        .with_seed(seed)
        .with_normalize(normalize)
        .with_folds(folds)
        .with_device(device)
        .with_log_dir(log_dir.clone());
    let cv = CrossValidation::new(config)?;
    let backend = SyntheticBackend::default();

    step_run(&format!("Running {} folds", folds));
    let start = Instant::now();
    let (bundle, path) = cv.run_and_save(&backend)?;
    step_done(&format!("{:?}", start.elapsed()));

    println!();
    println!("  {:<14} {}", muted("folds"), bundle.folds().to_string().white().bold());
    println!("  {:<14} {}", muted("bundle"), path.display().to_string().white());
    println!();
    Ok(())
}

pub fn cmd_post_process(
    op: TaskMode,
    log_dir: &PathBuf,
    plot: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    section("Post-process");

    let plot = plot
        .map(PathBuf::from)
        .unwrap_or_else(|| postprocess::plot_path(log_dir, op));

    step_run(&format!("Aggregating {} run", op));
    let start = Instant::now();
    let report = postprocess::run(log_dir, op, &plot)?;
    step_done(&format!("{:?}", start.elapsed()));

    println!();
    println!(
        "  {:<34} {}",
        muted(&format!("Mean validation accuracy ({} folds)", report.folds)),
        format!("{:.4}", report.mean_val_acc).white().bold()
    );
    println!(
        "  {:<34} {}",
        muted(&format!("Mean validation MCC ({} folds)", report.folds)),
        format!("{:.4}", report.mean_val_mcc).white().bold()
    );
    println!(
        "  {:<34} {}",
        muted("Mean ROC AUC"),
        format!("{:.2} ± {:.2}", report.roc.mean_auc, report.roc.std_auc).white()
    );
    println!(
        "  {:<34} {}",
        muted("Mean per-fold AUC"),
        format!("{:.2}", report.roc.mean_fold_auc()).white()
    );
    println!(
        "  {:<34} {}",
        muted("ROC plot"),
        plot.display().to_string().white()
    );
    println!();
    Ok(())
}
