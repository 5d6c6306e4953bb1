//! Classification task modes

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three binary classification tasks the cross-validation runs cover.
///
/// The mode also names the persisted bundle: results for a mode live at
/// `{log_dir}/{mode}_cv.json`, so re-running a mode overwrites its prior
/// results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum TaskMode {
    /// Cats vs control
    Cat,
    /// Dogs vs control
    Dog,
    /// Cats vs dogs
    CatVsDog,
}

impl TaskMode {
    /// File-name stem used for the bundle and plot artifacts.
    pub fn stem(&self) -> &'static str {
        match self {
            TaskMode::Cat => "cat",
            TaskMode::Dog => "dog",
            TaskMode::CatVsDog => "cat_vs_dog",
        }
    }

    /// Human-readable description of the task.
    pub fn describe(&self) -> &'static str {
        match self {
            TaskMode::Cat => "cats vs control",
            TaskMode::Dog => "dogs vs control",
            TaskMode::CatVsDog => "cats vs dogs",
        }
    }
}

impl fmt::Display for TaskMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stem())
    }
}
