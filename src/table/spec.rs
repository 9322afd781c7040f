//! Declarative table layout, loadable from JSON.

use super::{DcfTable, TableError};
use serde::{Deserialize, Serialize};

/// The shape of a model: its line items and year range.
///
/// ```json
/// {"rows": ["Gross Revenue", "Vacancy"], "initial_year": 2024, "num_years": 10}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    #[serde(default)]
    pub rows: Vec<String>,
    pub initial_year: i32,
    pub num_years: usize,
}

impl GridSpec {
    pub fn build(&self) -> Result<DcfTable, TableError> {
        DcfTable::new(self.rows.iter().cloned(), self.initial_year, self.num_years)
    }
}
