//! Cash-flow tables for real-estate discounted-cash-flow analysis, plus
//! validation of the property records those analyses describe.
//!
//! A [`DcfTable`] holds one row per line item and one column per projection
//! year. The standard [`Pipeline`] derives vacancy, income, expense and cash
//! flow rows from the raw assumptions, one whole-row arithmetic step at a time.

pub mod display;
pub mod error;
pub mod pipeline;
pub mod property;
pub mod rows;
pub mod table;

#[cfg(feature = "python")]
pub mod bindings;

pub use error::ErrorKind;
pub use pipeline::{
    calculate_cash_flow_after_financing, calculate_cash_flow_before_financing,
    calculate_effective_gross_income, calculate_net_operating_income, calculate_total_expenses,
    calculate_vacancy, Operand, Pipeline, PipelineError, Step,
};
pub use property::{Address, Location, Property, PropertyError, StructuredAddress};
pub use table::{DcfTable, GridSpec, TableError, YearRecord};
