//! Error type shared by loading, transforming and rendering.

use std::path::PathBuf;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid chart configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A configuration value the renderer cannot draw with
    #[error("invalid chart configuration: `{field}` must be positive, got {value}")]
    ConfigValue { field: &'static str, value: f64 },

    /// A required column is not in the CSV header
    #[error("missing column `{0}`")]
    MissingColumn(String),

    #[error("line {line}: invalid worker count `{value}`")]
    InvalidWorkerCount { line: u64, value: String },

    #[error("worker count {0} appears more than once")]
    DuplicateWorkerCount(u32),

    #[error("line {line}: invalid measurement `{value}` in column `{column}`")]
    InvalidMeasurement {
        line: u64,
        column: String,
        value: String,
    },

    #[error("table has no measurement rows")]
    EmptyTable,

    /// No `nw = 0` row to take the sequential time from
    #[error("no sequential row (nw = 0) in table")]
    MissingSequentialRow,

    #[error("sequential row (nw = 0) has no `Ideal` time")]
    MissingSequentialTime,

    /// Scalability needs the single-worker row as reference
    #[error("no single-worker row (nw = 1) in table")]
    MissingBaselineRow,

    #[error("division by zero at nw = {nw}, column `{column}`")]
    DivisionByZero { nw: u32, column: String },

    #[error("index has {found} entries, table has {expected} rows")]
    IndexMismatch { expected: usize, found: usize },

    #[error("column `{column}` has {found} values, index has {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("plots directory {} does not exist or is not a directory", .0.display())]
    OutputDirectory(PathBuf),

    #[error("chart rendering failed: {0}")]
    Render(String),
}

impl<E> From<DrawingAreaErrorKind<E>> for PlotError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Render(err.to_string())
    }
}
