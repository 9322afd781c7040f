//! Populating table cells: by whole row, by single year, or by a batch of year records.

use super::{DcfTable, TableError};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const YEAR_KEY: &str = "year";

/// One year's worth of assumptions: a row label → value mapping for a single column.
///
/// The JSON form is a flat object with a `"year"` key (number or numeric text)
/// alongside one entry per row, e.g. `{"year": 2025, "Gross Revenue": 110.0}`.
/// Entry order is preserved, so rows created on demand keep the record's order.
#[derive(Debug, Clone, PartialEq)]
pub struct YearRecord {
    pub year: i32,
    pub values: Vec<(String, f64)>,
}

impl YearRecord {
    pub fn new(year: i32) -> Self {
        Self { year, values: Vec::new() }
    }

    pub fn with(mut self, label: impl Into<String>, value: f64) -> Self {
        self.values.push((label.into(), value));
        self
    }
}

/// Parses a column label such as `"2024"` into its year.
pub fn parse_year_label(label: &str) -> Result<i32, TableError> {
    label
        .trim()
        .parse::<i32>()
        .map_err(|_| TableError::InvalidYearLabel(label.to_string()))
}

impl DcfTable {
    /// Overwrites (or creates) a whole row. `values` must have one entry per year column.
    pub fn insert_row<S: Into<String>>(
        &mut self,
        label: S,
        values: impl AsRef<[f64]>,
    ) -> Result<(), TableError> {
        let label = label.into();
        let values = values.as_ref();
        if values.len() != self.width {
            return Err(TableError::LengthMismatch {
                row: label,
                expected: self.width,
                actual: values.len(),
            });
        }

        tracing::trace!(row = %label, "insert row");
        let r = self.ensure_row(label);
        for (cell, &v) in self.row_slice_mut(r).iter_mut().zip(values) {
            *cell = Some(v);
        }
        Ok(())
    }

    /// Sets the cell at `(label, year)` for every entry. Unknown labels become new rows.
    pub fn insert_year<I, S>(&mut self, year: i32, values: I) -> Result<(), TableError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let col = self.column_index(year).ok_or(TableError::UnknownYear(year))?;
        for (label, value) in values {
            let r = self.ensure_row(label.into());
            self.cells[r * self.width + col] = Some(value);
        }
        tracing::trace!(year, "insert year");
        Ok(())
    }

    pub fn insert_record(&mut self, record: &YearRecord) -> Result<(), TableError> {
        self.insert_year(record.year, record.values.iter().map(|(l, v)| (l.clone(), *v)))
    }

    /// Applies records in order, so a later record overwrites an earlier one for the
    /// same cell. Every year is checked first; a failing batch writes nothing.
    pub fn insert_batch(&mut self, records: &[YearRecord]) -> Result<(), TableError> {
        if let Some(bad) = records.iter().find(|r| self.column_index(r.year).is_none()) {
            return Err(TableError::UnknownYear(bad.year));
        }
        for record in records {
            self.insert_record(record)?;
        }
        tracing::debug!(records = records.len(), "inserted batch");
        Ok(())
    }
}

// --- Serde ---

impl Serialize for YearRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry(YEAR_KEY, &self.year)?;
        for (label, value) in &self.values {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YearLabel {
    Number(i64),
    Text(String),
}

impl YearLabel {
    fn into_year(self) -> Result<i32, TableError> {
        match self {
            YearLabel::Number(n) => {
                i32::try_from(n).map_err(|_| TableError::InvalidYearLabel(n.to_string()))
            }
            YearLabel::Text(s) => parse_year_label(&s),
        }
    }
}

struct YearRecordVisitor;

impl<'de> Visitor<'de> for YearRecordVisitor {
    type Value = YearRecord;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map with a 'year' key and numeric row values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut year = None;
        let mut values = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            if key == YEAR_KEY {
                if year.is_some() {
                    return Err(de::Error::duplicate_field(YEAR_KEY));
                }
                let label: YearLabel = map.next_value()?;
                year = Some(label.into_year().map_err(de::Error::custom)?);
            } else {
                let value: f64 = map.next_value()?;
                values.push((key, value));
            }
        }
        let year = year.ok_or_else(|| de::Error::missing_field(YEAR_KEY))?;
        Ok(YearRecord { year, values })
    }
}

impl<'de> Deserialize<'de> for YearRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(YearRecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn table() -> DcfTable {
        DcfTable::new(["Gross Revenue", "Vacancy"], 2024, 3).unwrap()
    }

    #[rstest]
    fn test_insert_row_overwrites_whole_row(mut table: DcfTable) {
        table.insert_row("Gross Revenue", [100.0, 110.0, 120.0]).unwrap();
        table.insert_row("Gross Revenue", vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(table.values("Gross Revenue").unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[rstest]
    fn test_insert_row_creates_new_rows_at_the_end(mut table: DcfTable) {
        table.insert_row("Debt Service", [5.0, 5.0, 5.0]).unwrap();
        assert_eq!(
            table.row_labels().collect::<Vec<_>>(),
            vec!["Gross Revenue", "Vacancy", "Debt Service"]
        );
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(4)]
    #[case(10)]
    fn test_insert_row_length_mismatch(mut table: DcfTable, #[case] len: usize) {
        let err = table.insert_row("Gross Revenue", vec![1.0; len]).unwrap_err();
        assert_eq!(
            err,
            TableError::LengthMismatch { row: "Gross Revenue".into(), expected: 3, actual: len }
        );
        assert_eq!(err.kind(), ErrorKind::Value);
        // Nothing was written.
        assert_eq!(table.row("Gross Revenue"), Some(&[None, None, None][..]));
    }

    #[rstest]
    fn test_insert_year_sets_single_cells(mut table: DcfTable) {
        table
            .insert_year(2025, [("Gross Revenue", 110.0), ("Insurance", 4.0)])
            .unwrap();
        assert_eq!(table.row("Gross Revenue"), Some(&[None, Some(110.0), None][..]));
        assert_eq!(table.row("Insurance"), Some(&[None, Some(4.0), None][..]));
        assert_eq!(table.row("Vacancy"), Some(&[None, None, None][..]));
    }

    #[rstest]
    fn test_insert_year_rejects_unknown_year(mut table: DcfTable) {
        let err = table.insert_year(2030, [("Gross Revenue", 1.0)]).unwrap_err();
        assert_eq!(err, TableError::UnknownYear(2030));
        assert!(!table.contains_row("Insurance"));
    }

    #[rstest]
    fn test_insert_batch_later_entry_wins(mut table: DcfTable) {
        let records = vec![
            YearRecord::new(2024).with("Gross Revenue", 100.0),
            YearRecord::new(2025).with("Gross Revenue", 105.0),
            YearRecord::new(2024).with("Gross Revenue", 99.0),
        ];
        table.insert_batch(&records).unwrap();
        assert_eq!(table.get("Gross Revenue", 2024), Some(99.0));
        assert_eq!(table.get("Gross Revenue", 2025), Some(105.0));
    }

    #[rstest]
    fn test_insert_batch_is_all_or_nothing(mut table: DcfTable) {
        let records = vec![
            YearRecord::new(2024).with("Gross Revenue", 100.0),
            YearRecord::new(1999).with("Gross Revenue", 1.0),
        ];
        assert_eq!(table.insert_batch(&records).unwrap_err(), TableError::UnknownYear(1999));
        assert_eq!(table.get("Gross Revenue", 2024), None);
    }

    #[test]
    fn test_year_record_json_forms() {
        let rec: YearRecord =
            serde_json::from_value(json!({"Gross Revenue": 100.0, "year": "2024", "Vacancy": 5})).unwrap();
        assert_eq!(rec.year, 2024);
        assert_eq!(
            rec.values,
            vec![("Gross Revenue".to_string(), 100.0), ("Vacancy".to_string(), 5.0)]
        );

        let rec: YearRecord = serde_json::from_str(r#"{"year": 2026, "Insurance": 3.5}"#).unwrap();
        assert_eq!(rec, YearRecord::new(2026).with("Insurance", 3.5));
        assert_eq!(serde_json::to_value(&rec).unwrap(), json!({"year": 2026, "Insurance": 3.5}));
    }

    #[rstest]
    #[case(json!({"Insurance": 3.5}))]
    #[case(json!({"year": "next", "Insurance": 3.5}))]
    #[case(json!({"year": 2024, "Insurance": "high"}))]
    fn test_year_record_rejects_bad_json(#[case] input: serde_json::Value) {
        assert!(serde_json::from_value::<YearRecord>(input).is_err());
    }

    #[test]
    fn test_parse_year_label() {
        assert_eq!(parse_year_label("2024").unwrap(), 2024);
        assert_eq!(parse_year_label(" 1999 ").unwrap(), 1999);
        assert!(matches!(parse_year_label("FY24"), Err(TableError::InvalidYearLabel(_))));
    }
}
