use std::ops::Range;
use std::path::Path;

use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, ValueFormatter};
use plotters::prelude::*;
use tracing::debug;

use crate::config::ChartConfig;
use crate::error::Result;
use crate::table::MeasurementTable;

const FONT_FAMILY: &str = "sans-serif";
const LEGEND_LINE_PX: i32 = 20;

/// Draws one table as a chart at `path`. Index values are the x axis, each
/// column is a series.
pub trait ChartRenderer {
    fn render(&self, table: &MeasurementTable, y_label: &str, path: &Path) -> Result<()>;
}

/// PNG line charts through the plotters bitmap backend.
#[derive(Debug, Clone, Default)]
pub struct PlottersRenderer {
    config: ChartConfig,
}

impl PlottersRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, table: &MeasurementTable, y_label: &str, path: &Path) -> Result<()> {
        generate_line_chart(table, y_label, path, &self.config)
    }
}

pub fn generate_line_chart(
    table: &MeasurementTable,
    y_label: &str,
    path: &Path,
    config: &ChartConfig,
) -> Result<()> {
    let root = BitMapBackend::new(path, config.pixel_size()).into_drawing_area();
    root.fill(&WHITE)?;

    let font_px = config.font_px();
    let font: TextStyle = (FONT_FAMILY, font_px).into_font().into();

    let mut chart = ChartBuilder::on(&root)
        .margin(font_px as u32)
        .x_label_area_size((font_px * 3.0) as u32)
        .y_label_area_size((font_px * 4.5) as u32)
        .build_cartesian_2d(WorkerAxis::new(table.index()), y_range(table))?;

    chart
        .configure_mesh()
        .x_desc("nw")
        .y_desc(y_label)
        .label_style(font.clone())
        .axis_desc_style(font.clone())
        .draw()?;

    for (i, column) in table.columns().iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        let line = color.stroke_width(config.line_width);

        for segment in segments(table.index(), &column.values) {
            chart.draw_series(LineSeries::new(segment, line))?;
        }

        let points = table
            .index()
            .iter()
            .zip(&column.values)
            .filter_map(|(&nw, value)| value.map(|v| (f64::from(nw), v)));
        chart
            .draw_series(points.map(|p| Circle::new(p, config.marker_size, color.filled())))?
            .label(column.name.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + LEGEND_LINE_PX, y)], line)
            });
    }

    chart
        .configure_series_labels()
        .label_font(font)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    debug!(path = %path.display(), series = table.columns().len(), "chart drawn");
    Ok(())
}

// ============================================================================
// WORKER AXIS - Linear x axis with a tick at every worker count
// ============================================================================

#[derive(Debug, Clone)]
struct WorkerAxis {
    range: Range<f64>,
    ticks: Vec<f64>,
}

impl WorkerAxis {
    fn new(index: &[u32]) -> Self {
        let mut ticks: Vec<f64> = index.iter().map(|&nw| f64::from(nw)).collect();
        ticks.sort_by(|a, b| a.total_cmp(b));
        ticks.dedup();
        Self {
            range: x_range(index),
            ticks,
        }
    }
}

impl Ranged for WorkerAxis {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        let span = self.range.end - self.range.start;
        let ratio = (value - self.range.start) / span;
        limit.0 + (ratio * f64::from(limit.1 - limit.0) + 1e-3).floor() as i32
    }

    // Bold points only, so the mesh has no light lines between worker counts.
    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        if hint.weight().allow_light_points() {
            Vec::new()
        } else {
            self.ticks.clone()
        }
    }

    fn range(&self) -> Range<f64> {
        self.range.clone()
    }
}

impl ValueFormatter<f64> for WorkerAxis {
    fn format_ext(&self, value: &f64) -> String {
        format!("{}", value.round() as i64)
    }
}

/// Runs of consecutive present values, in row order. A missing value breaks
/// the line.
fn segments(index: &[u32], values: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (&nw, value) in index.iter().zip(values) {
        match value {
            Some(v) if v.is_finite() => current.push((f64::from(nw), *v)),
            _ => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn x_range(index: &[u32]) -> Range<f64> {
    let min = index.iter().copied().min().map(f64::from).unwrap_or(0.0);
    let max = index.iter().copied().max().map(f64::from).unwrap_or(1.0);
    let pad = ((max - min) * 0.05).max(0.5);
    (min - pad)..(max + pad)
}

fn y_range(table: &MeasurementTable) -> Range<f64> {
    let values = table
        .columns()
        .iter()
        .flat_map(|c| c.values.iter().flatten())
        .copied()
        .filter(|v| v.is_finite());

    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min > max {
        return 0.0..1.0;
    }

    let span = max - min;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        (max.abs() * 0.05).max(1.0)
    };
    (min - pad)..(max + pad)
}
