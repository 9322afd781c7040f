//! Defines the error types for table construction, insertion and evaluation.
use crate::error::ErrorKind;
use std::fmt;
use thiserror::Error;

/// Which table a missing row was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    Model,
    Rates,
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableRole::Model => f.write_str("model table"),
            TableRole::Rates => f.write_str("rate table"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("row '{row}' has {actual} values but the table has {expected} year columns")]
    LengthMismatch { row: String, expected: usize, actual: usize },
    #[error("year {0} is not a column of this table")]
    UnknownYear(i32),
    #[error("'{0}' is not a year label")]
    InvalidYearLabel(String),
    #[error("a range of {num_years} years starting at {initial_year} does not fit in i32")]
    YearOverflow { initial_year: i32, num_years: usize },
    #[error("duplicate row label '{0}'")]
    DuplicateRow(String),
    #[error("rate table columns do not match the model table's year columns")]
    ColumnMismatch,
    #[error("row '{row}' is missing from the {table}")]
    MissingRow { row: String, table: TableRole },
    #[error("cell ('{row}', {year}) is unset")]
    UnsetCell { row: String, year: i32 },
}

impl TableError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TableError::MissingRow { .. } | TableError::UnsetCell { .. } => ErrorKind::Missing,
            _ => ErrorKind::Value,
        }
    }
}
