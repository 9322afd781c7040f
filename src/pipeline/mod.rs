//! Evaluates derived rows from already-populated rows.
//!
//! A pipeline is an explicit, ordered list of [`Step`] records. The driver runs
//! them strictly in list order and never reorders or infers anything: a step
//! whose inputs are absent fails with a missing-row error. [`Pipeline::validate`]
//! checks the ordering of a definition without touching any table.

pub mod engine;
pub mod kernel;
pub mod standard;
pub mod step;
pub mod validate;

pub use engine::run_step;
pub use kernel::OpCode;
pub use standard::{
    calculate_cash_flow_after_financing, calculate_cash_flow_before_financing,
    calculate_effective_gross_income, calculate_net_operating_income, calculate_total_expenses,
    calculate_vacancy,
};
pub use step::{Operand, Step, Term};
pub use validate::{PipelineError, PipelineErrorType};

use crate::table::{DcfTable, TableError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new() -> Self { Self::default() }

    /// Vacancy → Effective Gross Income → Total Expenses → Net Operating Income
    /// → Cash Flow Before Financing → Cash Flow After Financing.
    pub fn standard() -> Self {
        Self { steps: standard::steps() }
    }

    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[Step] { &self.steps }

    /// The first step writing `output`.
    pub fn step_for(&self, output: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.output() == output)
    }

    /// Operands no step produces, i.e. the assumptions the caller must supply.
    pub fn required_inputs(&self) -> Vec<Operand> {
        let mut inputs: Vec<Operand> = Vec::new();
        for op in self.steps.iter().flat_map(Step::operands) {
            let produced = !op.is_rate() && self.step_for(op.label()).is_some();
            if !produced && !inputs.contains(op) {
                inputs.push(op.clone());
            }
        }
        inputs
    }

    pub fn validate(&self) -> Result<(), Vec<PipelineError>> {
        validate::validate(&self.steps)
    }

    /// Runs every step in order. Each step is all-or-nothing; rows written by
    /// earlier steps stay in place when a later step fails.
    pub fn run(&self, table: &mut DcfTable, rates: Option<&DcfTable>) -> Result<(), TableError> {
        for step in &self.steps {
            run_step(step, table, rates)?;
        }
        tracing::debug!(steps = self.steps.len(), "pipeline finished");
        Ok(())
    }
}
