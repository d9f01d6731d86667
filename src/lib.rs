pub mod benchmark;
pub mod config;
pub mod error;
pub mod table;
pub mod visualization;

pub use benchmark::analysis::{ChartRenderer, PlottersRenderer};
pub use benchmark::metrics::{efficiency, latency, scalability, speedup, MetricsReport};
pub use config::{load_config, ChartConfig};
pub use error::{PlotError, Result};
pub use table::{Column, MeasurementTable};
pub use visualization::dashboard::render_report_charts;
