//! Aggregate ROC plot: per-fold curves, chance line, mean curve, ±1 std band.
//!
//! Renders plain SVG so headless runs produce a file artifact without any
//! display or chart dependency.

use crate::bundle::RocRecord;
use crate::error::Result;
use crate::metrics::roc::RocSummary;
use std::fs;
use std::path::Path;

const WIDTH: f64 = 760.0;
const HEIGHT: f64 = 560.0;
const PAD_L: f64 = 64.0;
const PAD_R: f64 = 24.0;
const PAD_T: f64 = 40.0;
const PAD_B: f64 = 52.0;

// Rotating palette for the translucent per-fold curves.
const FOLD_COLORS: [&str; 6] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#9467bd", "#8c564b", "#17becf",
];

fn to_xy(fpr: f64, tpr: f64) -> (f64, f64) {
    let x = PAD_L + fpr * (WIDTH - PAD_L - PAD_R);
    let y = PAD_T + (1.0 - tpr) * (HEIGHT - PAD_T - PAD_B);
    (x, y)
}

fn path_of(fpr: &[f64], tpr: &[f64]) -> String {
    fpr.iter()
        .zip(tpr.iter())
        .enumerate()
        .map(|(i, (&x, &y))| {
            let (px, py) = to_xy(x, y);
            if i == 0 {
                format!("M{:.1},{:.1}", px, py)
            } else {
                format!(" L{:.1},{:.1}", px, py)
            }
        })
        .collect()
}

/// Render the aggregate ROC plot as an SVG document.
///
/// `records` are the native per-fold curves (drawn translucent, labeled with
/// fold index and AUC); `summary` supplies the mean curve, the AUC spread,
/// and the variance band.
pub fn render_roc_svg(summary: &RocSummary, records: &[RocRecord]) -> String {
    let mut svg = String::with_capacity(16 * 1024);
    svg.push_str(&format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n\
         <rect width=\"{}\" height=\"{}\" fill=\"white\"/>\n",
        WIDTH, HEIGHT, WIDTH, HEIGHT
    ));

    // Axis grid and tick labels at 0.0, 0.25, .., 1.0.
    for tick in 0..=4 {
        let frac = tick as f64 / 4.0;
        let (x, _) = to_xy(frac, 0.0);
        let (_, y) = to_xy(0.0, frac);
        svg.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"#eee\"/>\n\
             <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"#eee\"/>\n\
             <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"#666\" font-size=\"11\">{:.2}</text>\n\
             <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"#666\" font-size=\"11\">{:.2}</text>\n",
            x, PAD_T, x, HEIGHT - PAD_B,
            PAD_L, y, WIDTH - PAD_R, y,
            x, HEIGHT - PAD_B + 16.0, frac,
            PAD_L - 6.0, y + 4.0, frac,
        ));
    }

    // Variance band: upper edge left-to-right, lower edge back.
    let mut band = String::new();
    for (i, (&fpr, &tpr)) in summary
        .mean_fpr
        .iter()
        .zip(summary.upper_band.iter())
        .enumerate()
    {
        let (x, y) = to_xy(fpr, tpr);
        band.push_str(&if i == 0 {
            format!("M{:.1},{:.1}", x, y)
        } else {
            format!(" L{:.1},{:.1}", x, y)
        });
    }
    for (&fpr, &tpr) in summary
        .mean_fpr
        .iter()
        .zip(summary.lower_band.iter())
        .rev()
    {
        let (x, y) = to_xy(fpr, tpr);
        band.push_str(&format!(" L{:.1},{:.1}", x, y));
    }
    svg.push_str(&format!(
        "<path d=\"{} Z\" fill=\"grey\" fill-opacity=\"0.4\" stroke=\"none\"/>\n",
        band
    ));

    // Per-fold curves, translucent.
    for (fold, record) in records.iter().enumerate() {
        let color = FOLD_COLORS[fold % FOLD_COLORS.len()];
        svg.push_str(&format!(
            "<path d=\"{}\" stroke=\"{}\" stroke-width=\"1\" stroke-opacity=\"0.3\" fill=\"none\"/>\n",
            path_of(&record.fpr, &record.tpr),
            color
        ));
    }

    // Chance diagonal.
    let (x0, y0) = to_xy(0.0, 0.0);
    let (x1, y1) = to_xy(1.0, 1.0);
    svg.push_str(&format!(
        "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"#d62728\" \
         stroke-width=\"2\" stroke-dasharray=\"6,4\" stroke-opacity=\"0.8\"/>\n",
        x0, y0, x1, y1
    ));

    // Mean curve, bold.
    svg.push_str(&format!(
        "<path d=\"{}\" stroke=\"#1552c8\" stroke-width=\"2.5\" stroke-opacity=\"0.8\" fill=\"none\"/>\n",
        path_of(&summary.mean_fpr, &summary.mean_tpr)
    ));

    // Title and axis labels.
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"24\" text-anchor=\"middle\" fill=\"#222\" font-size=\"15\">\
         Receiver operating characteristic curve</text>\n\
         <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"#222\" font-size=\"13\">\
         False Positive Rate</text>\n\
         <text x=\"18\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"#222\" font-size=\"13\" \
         transform=\"rotate(-90 18 {:.1})\">True Positive Rate</text>\n",
        WIDTH / 2.0,
        WIDTH / 2.0,
        HEIGHT - 14.0,
        HEIGHT / 2.0,
        HEIGHT / 2.0,
    ));

    // Legend, lower right.
    let legend_x = WIDTH - PAD_R - 280.0;
    let mut legend_y = HEIGHT - PAD_B - 24.0 - 18.0 * (records.len() as f64 + 2.0);
    let mut legend_line = |color: &str, dash: &str, opacity: f64, text: &str, svg: &mut String| {
        svg.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" \
             stroke-width=\"2\"{} stroke-opacity=\"{}\"/>\n\
             <text x=\"{:.1}\" y=\"{:.1}\" fill=\"#333\" font-size=\"11\">{}</text>\n",
            legend_x,
            legend_y,
            legend_x + 26.0,
            legend_y,
            color,
            if dash.is_empty() {
                String::new()
            } else {
                format!(" stroke-dasharray=\"{}\"", dash)
            },
            opacity,
            legend_x + 32.0,
            legend_y + 4.0,
            text
        ));
        legend_y += 18.0;
    };

    for (fold, auc) in summary.fold_aucs.iter().enumerate() {
        let color = FOLD_COLORS[fold % FOLD_COLORS.len()];
        legend_line(
            color,
            "",
            0.3,
            &format!("ROC fold {} (AUC = {:.2})", fold, auc),
            &mut svg,
        );
    }
    legend_line("#d62728", "6,4", 0.8, "Chance", &mut svg);
    legend_line(
        "#1552c8",
        "",
        0.8,
        &format!(
            "Mean ROC (AUC = {:.2} &#177; {:.2})",
            summary.mean_auc, summary.std_auc
        ),
        &mut svg,
    );

    svg.push_str("</svg>\n");
    svg
}

/// Render and write the plot. The parent directory is created if missing.
pub fn save_roc_plot(summary: &RocSummary, records: &[RocRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_roc_svg(summary, records))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> (RocSummary, Vec<RocRecord>) {
        let records = vec![
            RocRecord {
                fpr: vec![0.0, 0.2, 1.0],
                tpr: vec![0.0, 0.8, 1.0],
                thresholds: vec![2.0, 0.6, 0.0],
            },
            RocRecord {
                fpr: vec![0.0, 0.5, 1.0],
                tpr: vec![0.0, 0.6, 1.0],
                thresholds: vec![2.0, 0.5, 0.0],
            },
        ];
        let summary = RocSummary::from_records(&records).unwrap();
        (summary, records)
    }

    #[test]
    fn svg_contains_all_plot_elements() {
        let (summary, records) = fixtures();
        let svg = render_roc_svg(&summary, &records);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("ROC fold 0"));
        assert!(svg.contains("ROC fold 1"));
        assert!(svg.contains("Chance"));
        assert!(svg.contains("Mean ROC"));
        assert!(svg.contains("False Positive Rate"));
        assert!(svg.contains("True Positive Rate"));
    }

    #[test]
    fn plot_file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plots").join("cat_roc.svg");
        let (summary, records) = fixtures();

        save_roc_plot(&summary, &records, &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("</svg>"));
    }
}
