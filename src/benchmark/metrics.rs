//! Metrics module - Latency, speedup, efficiency and scalability tables

use std::fmt;

use tracing::debug;

use crate::error::{PlotError, Result};
use crate::table::{MeasurementTable, TableCell};

/// Worker count of the scalability reference row.
pub const SINGLE_WORKER_NW: u32 = 1;

// ============================================================================
// TRANSFORMS - Elementwise ratios over a measurement table
// ============================================================================

/// Latency is the measured table itself.
pub fn latency(table: &MeasurementTable) -> MeasurementTable {
    table.clone()
}

/// `t_seq / measured` for every cell.
pub fn speedup(table: &MeasurementTable, t_seq: f64) -> Result<MeasurementTable> {
    table.try_map(|cell| divide(Some(t_seq), cell.value, &cell))
}

/// Divide every row of a speedup table by that row's worker count.
pub fn efficiency(speedup: &MeasurementTable, index: &[u32]) -> Result<MeasurementTable> {
    check_index(speedup, index)?;
    speedup.try_map(|cell| divide(cell.value, Some(f64::from(index[cell.row])), &cell))
}

/// Single-worker time over N-worker time, per column.
pub fn scalability(table: &MeasurementTable, index: &[u32]) -> Result<MeasurementTable> {
    check_index(table, index)?;
    let mut single = index
        .iter()
        .enumerate()
        .filter(|&(_, &nw)| nw == SINGLE_WORKER_NW)
        .map(|(row, _)| row);
    let reference_row = single.next().ok_or(PlotError::MissingBaselineRow)?;
    if single.next().is_some() {
        return Err(PlotError::DuplicateWorkerCount(SINGLE_WORKER_NW));
    }

    let reference: Vec<Option<f64>> = table
        .columns()
        .iter()
        .map(|c| c.values[reference_row])
        .collect();
    table.try_map(|cell| divide(reference[cell.col], cell.value, &cell))
}

fn check_index(table: &MeasurementTable, index: &[u32]) -> Result<()> {
    if index.len() != table.len() {
        return Err(PlotError::IndexMismatch {
            expected: table.len(),
            found: index.len(),
        });
    }
    Ok(())
}

// A zero denominator is always an error, missing operands give a missing result.
fn divide(numerator: Option<f64>, denominator: Option<f64>, cell: &TableCell<'_>) -> Result<Option<f64>> {
    match (numerator, denominator) {
        (_, Some(d)) if d == 0.0 => Err(PlotError::DivisionByZero {
            nw: cell.nw,
            column: cell.column.to_string(),
        }),
        (Some(n), Some(d)) => Ok(Some(n / d)),
        _ => Ok(None),
    }
}

// ============================================================================
// METRICS REPORT - The four derived tables of one measurement run
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsReport {
    pub t_seq: f64,
    pub latency: MeasurementTable,
    pub speedup: MeasurementTable,
    pub efficiency: MeasurementTable,
    pub scalability: MeasurementTable,
}

impl MetricsReport {
    /// `table` must already have its sequential row removed.
    pub fn compute(table: &MeasurementTable, t_seq: f64) -> Result<Self> {
        let index = table.index();
        let speedup = speedup(table, t_seq)?;
        let efficiency = efficiency(&speedup, index)?;
        let scalability = scalability(table, index)?;
        debug!(rows = table.len(), t_seq, "computed derived metrics");

        Ok(Self {
            t_seq,
            latency: latency(table),
            speedup,
            efficiency,
            scalability,
        })
    }
}

impl fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sequential time: {:.3} ms", self.t_seq)?;
        writeln!(f, "\n=== Latency (ms) ===\n{}", self.latency)?;
        writeln!(f, "=== Speedup ===\n{}", self.speedup)?;
        writeln!(f, "=== Efficiency ===\n{}", self.efficiency)?;
        write!(f, "=== Scalability ===\n{}", self.scalability)
    }
}
