//! Visualization module — ROC plot rendering to SVG files.

mod roc_plot;

pub use roc_plot::{render_roc_svg, save_roc_plot};
