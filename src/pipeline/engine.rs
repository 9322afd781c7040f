//! A synchronous, single-threaded step executor.
use super::kernel;
use super::step::{Operand, Step};
use crate::table::{DcfTable, TableError, TableRole};

/// Evaluates one step and writes its output row.
///
/// Every operand is resolved before anything is computed, so a missing row or an
/// unset cell fails the step without touching the table.
pub fn run_step(step: &Step, table: &mut DcfTable, rates: Option<&DcfTable>) -> Result<(), TableError> {
    let span = tracing::debug_span!("step", output = step.output());
    let _guard = span.enter();

    // 1. Resolve inputs
    let mut dest = resolve(step.base(), table, rates)?;
    let mut sources = Vec::with_capacity(step.terms().len());
    for term in step.terms() {
        sources.push((term.op, resolve(&term.operand, table, rates)?));
    }

    // 2. Fold terms left to right
    for (op, src) in &sources {
        kernel::execute_instruction(*op, &mut dest, src);
    }

    // 3. Write
    tracing::debug!(formula = %step.formula(), "computed");
    table.insert_row(step.output().to_string(), dest)
}

fn resolve(operand: &Operand, table: &DcfTable, rates: Option<&DcfTable>) -> Result<Vec<f64>, TableError> {
    match operand {
        Operand::Row(label) => table.series(label, TableRole::Model),
        Operand::Rate(label) => {
            let rates = rates.ok_or_else(|| TableError::MissingRow {
                row: label.to_string(),
                table: TableRole::Rates,
            })?;
            if !rates.same_columns(table) {
                return Err(TableError::ColumnMismatch);
            }
            rates.series(label, TableRole::Rates)
        }
    }
}
