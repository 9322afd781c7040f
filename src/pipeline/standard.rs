//! The six-step real-estate cash-flow chain, from vacancy down to levered cash flow.
//!
//! Each calculator depends on the row written by the one before it; call them
//! in the order listed or use [`Pipeline::standard`](super::Pipeline::standard).

use super::engine::run_step;
use super::step::{Operand, Step};
use crate::rows::*;
use crate::table::{DcfTable, TableError};

/// Vacancy = Gross Revenue × Vacancy Rate (rate table).
pub fn vacancy() -> Step {
    Step::new(VACANCY, Operand::row(GROSS_REVENUE)).times(Operand::rate(VACANCY_RATE))
}

/// Effective Gross Income = Gross Revenue − Vacancy.
pub fn effective_gross_income() -> Step {
    Step::new(EFFECTIVE_GROSS_INCOME, Operand::row(GROSS_REVENUE)).minus(Operand::row(VACANCY))
}

/// Total Expenses = sum of the five operating expense lines.
pub fn total_expenses() -> Step {
    let [first, rest @ ..] = OPERATING_EXPENSES;
    rest.iter()
        .fold(Step::new(TOTAL_EXPENSES, Operand::row(first)), |step, &row| {
            step.plus(Operand::row(row))
        })
}

/// Net Operating Income = Effective Gross Income − Total Expenses.
pub fn net_operating_income() -> Step {
    Step::new(NET_OPERATING_INCOME, Operand::row(EFFECTIVE_GROSS_INCOME))
        .minus(Operand::row(TOTAL_EXPENSES))
}

/// Cash Flow Before Financing = NOI − Tenant Improvements − Lease Commissions.
pub fn cash_flow_before_financing() -> Step {
    Step::new(CASH_FLOW_BEFORE_FINANCING, Operand::row(NET_OPERATING_INCOME))
        .minus(Operand::row(TENANT_IMPROVEMENTS))
        .minus(Operand::row(LEASE_COMMISSIONS))
}

/// Cash Flow After Financing = Cash Flow Before Financing − Debt Service.
pub fn cash_flow_after_financing() -> Step {
    Step::new(CASH_FLOW_AFTER_FINANCING, Operand::row(CASH_FLOW_BEFORE_FINANCING))
        .minus(Operand::row(DEBT_SERVICE))
}

pub fn steps() -> Vec<Step> {
    vec![
        vacancy(),
        effective_gross_income(),
        total_expenses(),
        net_operating_income(),
        cash_flow_before_financing(),
        cash_flow_after_financing(),
    ]
}

// --- Discrete calculators ---

pub fn calculate_vacancy(table: &mut DcfTable, rates: &DcfTable) -> Result<(), TableError> {
    run_step(&vacancy(), table, Some(rates))
}

pub fn calculate_effective_gross_income(table: &mut DcfTable) -> Result<(), TableError> {
    run_step(&effective_gross_income(), table, None)
}

pub fn calculate_total_expenses(table: &mut DcfTable) -> Result<(), TableError> {
    run_step(&total_expenses(), table, None)
}

pub fn calculate_net_operating_income(table: &mut DcfTable) -> Result<(), TableError> {
    run_step(&net_operating_income(), table, None)
}

pub fn calculate_cash_flow_before_financing(table: &mut DcfTable) -> Result<(), TableError> {
    run_step(&cash_flow_before_financing(), table, None)
}

pub fn calculate_cash_flow_after_financing(table: &mut DcfTable) -> Result<(), TableError> {
    run_step(&cash_flow_after_financing(), table, None)
}
