use std::path::{Path, PathBuf};

use tracing::info;

use crate::benchmark::analysis::ChartRenderer;
use crate::benchmark::metrics::MetricsReport;
use crate::error::{PlotError, Result};
use crate::table::MeasurementTable;

/// File names and y-axis labels of the report charts.
pub const LATENCY_CHART: (&str, &str) = ("latency.png", "Latency (ms)");
pub const SPEEDUP_CHART: (&str, &str) = ("speedup.png", "Speedup");
pub const EFFICIENCY_CHART: (&str, &str) = ("efficiency.png", "Efficiency");
pub const SCALABILITY_CHART: (&str, &str) = ("scalability.png", "Scalability");

/// Write the four report charts into an existing directory.
pub fn render_report_charts<R: ChartRenderer>(
    report: &MetricsReport,
    plots_directory: &Path,
    renderer: &R,
) -> Result<Vec<PathBuf>> {
    if !plots_directory.is_dir() {
        return Err(PlotError::OutputDirectory(plots_directory.to_path_buf()));
    }

    let charts: [(&MeasurementTable, (&str, &str)); 4] = [
        (&report.latency, LATENCY_CHART),
        (&report.speedup, SPEEDUP_CHART),
        (&report.efficiency, EFFICIENCY_CHART),
        (&report.scalability, SCALABILITY_CHART),
    ];

    let mut written = Vec::with_capacity(charts.len());
    for (table, (file_name, y_label)) in charts {
        let path = plots_directory.join(file_name);
        renderer.render(table, y_label, &path)?;
        info!(path = %path.display(), "wrote {}", y_label);
        written.push(path);
    }
    Ok(written)
}
