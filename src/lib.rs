//! catdog-cv — K-fold cross-validation of cats/dogs image classifiers and
//! post-processing of the saved per-fold metrics.
//!
//! The actual model training is delegated to an external provider behind the
//! [`backend::TrainingBackend`] trait; this crate owns the fold loop, the
//! persistence of per-fold results, and the aggregation.
//!
//! # Modules
//!
//! - [`cross_validation`] - the fold loop (runner)
//! - [`bundle`] - per-fold result lists and their JSON persistence
//! - [`metrics`] - epoch-selection aggregation and ROC math
//! - [`postprocess`] - bundle loading, summary reports
//! - [`visualization`] - ROC plot rendering (SVG)
//! - [`backend`] - training-framework abstraction + synthetic stand-in
//! - [`cli`] - command-line interface

pub mod error;

pub mod backend;
pub mod bundle;
pub mod cross_validation;
pub mod metrics;
pub mod postprocess;
pub mod task;
pub mod visualization;

pub mod cli;
