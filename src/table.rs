//! Measurement table - worker-count indexed timings loaded from CSV

use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::error::{PlotError, Result};

/// Name of the index column.
pub const INDEX_COLUMN: &str = "nw";
/// Column holding the sequential time in the `nw = 0` row.
pub const IDEAL_COLUMN: &str = "Ideal";
/// Worker count of the sequential row.
pub const SEQUENTIAL_NW: u32 = 0;

// ============================================================================
// COLUMN - One named series of (possibly missing) values
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Column where every value is present.
    pub fn from_values(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().copied().map(Some).collect())
    }
}

// ============================================================================
// MEASUREMENT TABLE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementTable {
    index: Vec<u32>,
    columns: Vec<Column>,
}

impl MeasurementTable {
    pub fn new(index: Vec<u32>, columns: Vec<Column>) -> Result<Self> {
        for column in &columns {
            if column.values.len() != index.len() {
                return Err(PlotError::ColumnLength {
                    column: column.name.clone(),
                    expected: index.len(),
                    found: column.values.len(),
                });
            }
        }
        Ok(Self { index, columns })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_path(path)?;
        let table = Self::from_csv_reader(reader)?;
        info!(
            path = %path.display(),
            rows = table.len(),
            columns = table.columns.len(),
            "loaded measurement table"
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);
        Self::from_csv_reader(reader)
    }

    /// Parse every record of a CSV reader. The `nw` column becomes the index,
    /// every other column becomes a series in header order.
    pub fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader.headers()?.clone();
        let nw_pos = headers
            .iter()
            .position(|h| h == INDEX_COLUMN)
            .ok_or_else(|| PlotError::MissingColumn(INDEX_COLUMN.to_string()))?;

        let mut columns: Vec<Column> = headers
            .iter()
            .enumerate()
            .filter(|(pos, _)| *pos != nw_pos)
            .map(|(_, name)| Column::new(name, Vec::new()))
            .collect();
        let mut index = Vec::new();
        let mut seen = HashSet::new();

        for record in reader.records() {
            let record = record?;
            let line = record_line(&record);

            let raw_nw = record.get(nw_pos).unwrap_or_default();
            let nw: u32 = raw_nw.parse().map_err(|_| PlotError::InvalidWorkerCount {
                line,
                value: raw_nw.to_string(),
            })?;
            if !seen.insert(nw) {
                return Err(PlotError::DuplicateWorkerCount(nw));
            }
            index.push(nw);

            let cells = record
                .iter()
                .enumerate()
                .filter(|(pos, _)| *pos != nw_pos)
                .map(|(_, cell)| cell);
            for (column, cell) in columns.iter_mut().zip(cells) {
                column.values.push(parse_cell(cell, line, &column.name)?);
            }
        }

        if index.is_empty() {
            return Err(PlotError::EmptyTable);
        }
        debug!(index = ?index, "parsed worker counts");
        Ok(Self { index, columns })
    }

    pub fn index(&self) -> &[u32] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Row position of the given worker count.
    pub fn position(&self, nw: u32) -> Option<usize> {
        self.index.iter().position(|&n| n == nw)
    }

    pub fn value(&self, nw: u32, column: &str) -> Option<f64> {
        let row = self.position(nw)?;
        self.column(column)?.values[row]
    }

    /// Take the sequential time from the `Ideal` column of the `nw = 0` row
    /// and return it with the remaining rows.
    pub fn split_baseline(mut self) -> Result<(f64, MeasurementTable)> {
        let ideal = self
            .columns
            .iter()
            .position(|c| c.name == IDEAL_COLUMN)
            .ok_or_else(|| PlotError::MissingColumn(IDEAL_COLUMN.to_string()))?;
        let row = self
            .position(SEQUENTIAL_NW)
            .ok_or(PlotError::MissingSequentialRow)?;
        let t_seq = self.columns[ideal].values[row].ok_or(PlotError::MissingSequentialTime)?;

        self.index.remove(row);
        for column in &mut self.columns {
            column.values.remove(row);
        }
        if self.index.is_empty() {
            return Err(PlotError::EmptyTable);
        }

        info!(t_seq, "extracted sequential baseline");
        Ok((t_seq, self))
    }

    /// Build a table with the same index and column names, computing each
    /// cell from its position and current value.
    pub(crate) fn try_map<F>(&self, mut f: F) -> Result<MeasurementTable>
    where
        F: FnMut(TableCell<'_>) -> Result<Option<f64>>,
    {
        let mut columns = Vec::with_capacity(self.columns.len());
        for (col, column) in self.columns.iter().enumerate() {
            let mut values = Vec::with_capacity(self.index.len());
            for (row, (&nw, &value)) in self.index.iter().zip(&column.values).enumerate() {
                values.push(f(TableCell {
                    row,
                    col,
                    nw,
                    column: &column.name,
                    value,
                })?);
            }
            columns.push(Column::new(column.name.clone(), values));
        }

        Ok(MeasurementTable {
            index: self.index.clone(),
            columns,
        })
    }
}

/// A single cell handed to a transform.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TableCell<'a> {
    pub row: usize,
    pub col: usize,
    pub nw: u32,
    pub column: &'a str,
    pub value: Option<f64>,
}

fn record_line(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or_default()
}

fn parse_cell(cell: &str, line: u64, column: &str) -> Result<Option<f64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|_| PlotError::InvalidMeasurement {
            line,
            column: column.to_string(),
            value: cell.to_string(),
        })
}

impl fmt::Display for MeasurementTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}", INDEX_COLUMN)?;
        for column in &self.columns {
            write!(f, " {:>12}", column.name)?;
        }
        writeln!(f)?;

        for (row, nw) in self.index.iter().enumerate() {
            write!(f, "{:>6}", nw)?;
            for column in &self.columns {
                match column.values[row] {
                    Some(v) => write!(f, " {:>12.3}", v)?,
                    None => write!(f, " {:>12}", "-")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
nw,Ideal,static,dynamic
0,120,,
1,120,130,125
2,60,70,64
4,30,40,33
";

    #[test]
    fn test_parses_index_and_columns() {
        let table = MeasurementTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.index(), &[0, 1, 2, 4]);
        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ideal", "static", "dynamic"]);
        assert_eq!(table.value(2, "static"), Some(70.0));
    }

    #[test]
    fn test_empty_cells_are_missing() {
        let table = MeasurementTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.value(0, "static"), None);
        assert_eq!(table.value(0, "Ideal"), Some(120.0));
    }

    #[test]
    fn test_index_column_located_by_name() {
        let csv = "A,nw,Ideal\n5,0,10\n7,1,10\n";
        let table = MeasurementTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.index(), &[0, 1]);
        assert_eq!(table.value(1, "A"), Some(7.0));
        assert!(table.column("nw").is_none());
    }

    #[test]
    fn test_split_baseline_strips_sequential_row() {
        let table = MeasurementTable::from_reader(SAMPLE.as_bytes()).unwrap();
        let (t_seq, stripped) = table.split_baseline().unwrap();
        assert_eq!(t_seq, 120.0);
        assert_eq!(stripped.index(), &[1, 2, 4]);
        assert_eq!(stripped.column("static").unwrap().values.len(), 3);
        assert!(stripped.column(IDEAL_COLUMN).is_some());
    }

    #[test]
    fn test_split_baseline_needs_sequential_row() {
        let csv = "nw,Ideal,A\n1,10,10\n";
        let table = MeasurementTable::from_reader(csv.as_bytes()).unwrap();
        assert!(matches!(
            table.split_baseline(),
            Err(PlotError::MissingSequentialRow)
        ));
    }

    #[test]
    fn test_split_baseline_needs_ideal_column() {
        let csv = "nw,A\n0,10\n1,10\n";
        let table = MeasurementTable::from_reader(csv.as_bytes()).unwrap();
        match table.split_baseline() {
            Err(PlotError::MissingColumn(name)) => assert_eq!(name, "Ideal"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_split_baseline_needs_ideal_value() {
        let csv = "nw,Ideal,A\n0,,10\n1,10,10\n";
        let table = MeasurementTable::from_reader(csv.as_bytes()).unwrap();
        assert!(matches!(
            table.split_baseline(),
            Err(PlotError::MissingSequentialTime)
        ));
    }

    #[test]
    fn test_only_sequential_row_is_empty() {
        let csv = "nw,Ideal\n0,10\n";
        let table = MeasurementTable::from_reader(csv.as_bytes()).unwrap();
        assert!(matches!(table.split_baseline(), Err(PlotError::EmptyTable)));
    }

    #[test]
    fn test_rejects_duplicate_worker_count() {
        let csv = "nw,Ideal\n0,10\n1,10\n1,11\n";
        assert!(matches!(
            MeasurementTable::from_reader(csv.as_bytes()),
            Err(PlotError::DuplicateWorkerCount(1))
        ));
    }

    #[test]
    fn test_rejects_bad_cells() {
        let csv = "nw,Ideal\nfour,10\n";
        assert!(matches!(
            MeasurementTable::from_reader(csv.as_bytes()),
            Err(PlotError::InvalidWorkerCount { .. })
        ));

        let csv = "nw,Ideal\n0,fast\n";
        match MeasurementTable::from_reader(csv.as_bytes()) {
            Err(PlotError::InvalidMeasurement { line, column, value }) => {
                assert_eq!(line, 2);
                assert_eq!(column, "Ideal");
                assert_eq!(value, "fast");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_index_column() {
        let csv = "workers,Ideal\n0,10\n";
        assert!(matches!(
            MeasurementTable::from_reader(csv.as_bytes()),
            Err(PlotError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_header_only_is_empty() {
        let csv = "nw,Ideal\n";
        assert!(matches!(
            MeasurementTable::from_reader(csv.as_bytes()),
            Err(PlotError::EmptyTable)
        ));
    }

    #[test]
    fn test_new_checks_column_length() {
        let result = MeasurementTable::new(vec![1, 2], vec![Column::from_values("A", &[1.0])]);
        assert!(matches!(result, Err(PlotError::ColumnLength { .. })));
    }
}
