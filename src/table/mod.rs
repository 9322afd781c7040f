//! The row-by-year cash-flow table at the center of the DCF engine.
//!
//! Rows are line items looked up by label; columns are consecutive years.
//! Cells are stored densely, row-major, as `Option<f64>` where `None` is the
//! explicit "unset" sentinel: calculators reading an unset cell fail instead of
//! computing with zero.

pub mod error;
pub mod insert;
pub mod replicate;
pub mod spec;

pub use error::{TableError, TableRole};
pub use insert::YearRecord;
pub use spec::GridSpec;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableRecord", into = "TableRecord")]
pub struct DcfTable {
    initial_year: i32,
    width: usize,
    labels: Vec<String>,
    cells: Vec<Option<f64>>,
    index: HashMap<String, usize>,
}

impl DcfTable {
    /// Builds a table with one row per distinct label and `num_years` columns
    /// starting at `initial_year`. Duplicate labels collapse into one row.
    pub fn new<I, S>(row_labels: I, initial_year: i32, num_years: usize) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        check_year_range(initial_year, num_years)?;

        let mut table = Self {
            initial_year,
            width: num_years,
            labels: Vec::new(),
            cells: Vec::new(),
            index: HashMap::new(),
        };
        for label in row_labels {
            table.ensure_row(label.into());
        }

        tracing::debug!(
            rows = table.labels.len(),
            initial_year,
            num_years,
            "created table"
        );
        Ok(table)
    }

    /// A table with the same year columns and no rows.
    pub fn with_same_years(&self) -> Self {
        Self {
            initial_year: self.initial_year,
            width: self.width,
            labels: Vec::new(),
            cells: Vec::new(),
            index: HashMap::new(),
        }
    }

    // --- Columns ---

    pub fn initial_year(&self) -> i32 { self.initial_year }
    pub fn width(&self) -> usize { self.width }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.width).map(move |i| self.initial_year + i as i32)
    }

    /// Column labels as text, in column order (`"2024"`, `"2025"`, ...).
    pub fn column_labels(&self) -> Vec<String> {
        self.years().map(|y| y.to_string()).collect()
    }

    pub fn column_index(&self, year: i32) -> Option<usize> {
        let offset = i64::from(year) - i64::from(self.initial_year);
        if offset >= 0 && (offset as u64) < self.width as u64 {
            Some(offset as usize)
        } else {
            None
        }
    }

    pub fn same_columns(&self, other: &DcfTable) -> bool {
        self.initial_year == other.initial_year && self.width == other.width
    }

    // --- Rows ---

    pub fn row_count(&self) -> usize { self.labels.len() }

    pub fn row_labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn contains_row(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    pub fn row(&self, label: &str) -> Option<&[Option<f64>]> {
        self.index.get(label).map(|&r| self.row_slice(r))
    }

    pub fn get(&self, label: &str, year: i32) -> Option<f64> {
        let col = self.column_index(year)?;
        self.row(label)?[col]
    }

    /// Returns every value of a row, failing if the row is absent or any cell is unset.
    pub fn values(&self, label: &str) -> Result<Vec<f64>, TableError> {
        self.series(label, TableRole::Model)
    }

    pub(crate) fn series(&self, label: &str, role: TableRole) -> Result<Vec<f64>, TableError> {
        let row = self.row(label).ok_or_else(|| TableError::MissingRow {
            row: label.to_string(),
            table: role,
        })?;
        row.iter()
            .zip(self.years())
            .map(|(cell, year)| {
                cell.ok_or_else(|| TableError::UnsetCell { row: label.to_string(), year })
            })
            .collect()
    }

    // --- Storage ---

    #[inline(always)]
    fn row_slice(&self, r: usize) -> &[Option<f64>] {
        &self.cells[r * self.width..(r + 1) * self.width]
    }

    #[inline(always)]
    fn row_slice_mut(&mut self, r: usize) -> &mut [Option<f64>] {
        &mut self.cells[r * self.width..(r + 1) * self.width]
    }

    /// Returns the storage index of `label`, appending an unset row if it is new.
    pub(crate) fn ensure_row(&mut self, label: String) -> usize {
        if let Some(&r) = self.index.get(&label) {
            return r;
        }
        let r = self.labels.len();
        self.cells.resize(self.cells.len() + self.width, None);
        self.index.insert(label.clone(), r);
        self.labels.push(label);
        r
    }
}

fn check_year_range(initial_year: i32, num_years: usize) -> Result<(), TableError> {
    let overflow = TableError::YearOverflow { initial_year, num_years };
    let count = match i64::try_from(num_years) {
        Ok(n) if n <= i64::from(i32::MAX) => n,
        _ => return Err(overflow),
    };
    // Both terms fit in 32 bits, so the sum cannot overflow an i64.
    if i64::from(initial_year) + count - 1 > i64::from(i32::MAX) {
        return Err(overflow);
    }
    Ok(())
}

/// Serialized form: rows in table order, unset cells as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRecord {
    initial_year: i32,
    num_years: usize,
    rows: Vec<RowRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowRecord {
    label: String,
    values: Vec<Option<f64>>,
}

impl From<DcfTable> for TableRecord {
    fn from(table: DcfTable) -> Self {
        let rows = table
            .labels
            .iter()
            .enumerate()
            .map(|(r, label)| RowRecord { label: label.clone(), values: table.row_slice(r).to_vec() })
            .collect();
        Self { initial_year: table.initial_year, num_years: table.width, rows }
    }
}

impl TryFrom<TableRecord> for DcfTable {
    type Error = TableError;

    /// Rebuilds the label index and re-checks the shape after load.
    fn try_from(record: TableRecord) -> Result<Self, Self::Error> {
        let mut table = DcfTable::new(Vec::<String>::new(), record.initial_year, record.num_years)?;
        for row in record.rows {
            if table.contains_row(&row.label) {
                return Err(TableError::DuplicateRow(row.label));
            }
            if row.values.len() != table.width {
                return Err(TableError::LengthMismatch {
                    row: row.label,
                    expected: table.width,
                    actual: row.values.len(),
                });
            }
            let r = table.ensure_row(row.label);
            table.row_slice_mut(r).copy_from_slice(&row.values);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_columns_are_consecutive_years() {
        let t = DcfTable::new(["Gross Revenue", "Vacancy"], 2024, 3).unwrap();
        assert_eq!(t.column_labels(), vec!["2024", "2025", "2026"]);
        assert_eq!(t.years().collect::<Vec<_>>(), vec![2024, 2025, 2026]);
        assert_eq!(t.column_index(2025), Some(1));
        assert_eq!(t.column_index(2027), None);
        assert_eq!(t.column_index(2023), None);
    }

    #[test]
    fn test_cells_start_unset() {
        let t = DcfTable::new(["Gross Revenue"], 2024, 2).unwrap();
        assert_eq!(t.row("Gross Revenue"), Some(&[None, None][..]));
        assert_eq!(t.get("Gross Revenue", 2024), None);
    }

    #[test]
    fn test_duplicate_labels_collapse() {
        let t = DcfTable::new(["A", "B", "A"], 2000, 1).unwrap();
        assert_eq!(t.row_labels().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(t.row_count(), 2);
    }

    #[test]
    fn test_zero_years_is_allowed() {
        let t = DcfTable::new(["A"], 2024, 0).unwrap();
        assert_eq!(t.width(), 0);
        assert!(t.column_labels().is_empty());
        assert_eq!(t.values("A").unwrap(), Vec::<f64>::new());
    }

    #[rstest]
    #[case(i32::MAX - 1, 3)]
    #[case(0, usize::MAX / 2 + 1)]
    #[case(-5, usize::MAX)]
    #[case(0, i32::MAX as usize + 1)]
    fn test_year_overflow(#[case] initial_year: i32, #[case] num_years: usize) {
        let err = DcfTable::new(["A"], initial_year, num_years).unwrap_err();
        assert_eq!(err, TableError::YearOverflow { initial_year, num_years });
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_year_range_reaching_the_last_year() {
        assert!(DcfTable::new(["A"], i32::MAX - 1, 2).is_ok());
    }

    #[test]
    fn test_deserialize_rejects_huge_year_count() {
        let v = json!({"initial_year": -5, "num_years": 9_223_372_036_854_775_808u64, "rows": []});
        let err = serde_json::from_value::<DcfTable>(v).unwrap_err();
        assert!(err.to_string().contains("does not fit in i32"), "{err}");
    }

    #[test]
    fn test_values_fail_loudly() {
        let t = DcfTable::new(["A"], 2024, 2).unwrap();
        let err = t.values("A").unwrap_err();
        assert_eq!(err, TableError::UnsetCell { row: "A".into(), year: 2024 });
        assert_eq!(err.kind(), ErrorKind::Missing);

        let err = t.values("B").unwrap_err();
        assert_eq!(err, TableError::MissingRow { row: "B".into(), table: TableRole::Model });
        assert_eq!(err.kind(), ErrorKind::Missing);
    }

    #[test]
    fn test_json_round_trip_keeps_order_and_unset_cells() {
        let mut t = DcfTable::new(["Z", "A"], 2030, 2).unwrap();
        t.insert_row("A", [1.5, 2.5]).unwrap();
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(
            v,
            json!({
                "initial_year": 2030,
                "num_years": 2,
                "rows": [
                    {"label": "Z", "values": [null, null]},
                    {"label": "A", "values": [1.5, 2.5]}
                ]
            })
        );
        let back: DcfTable = serde_json::from_value(v).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_deserialize_rejects_bad_shapes() {
        let short = json!({"initial_year": 2024, "num_years": 2, "rows": [{"label": "A", "values": [1.0]}]});
        assert!(serde_json::from_value::<DcfTable>(short).is_err());

        let dup = json!({
            "initial_year": 2024,
            "num_years": 1,
            "rows": [{"label": "A", "values": [1.0]}, {"label": "A", "values": [2.0]}]
        });
        let err = serde_json::from_value::<DcfTable>(dup).unwrap_err();
        assert!(err.to_string().contains("duplicate row label"));
    }
}
