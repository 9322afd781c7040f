//! Line-item labels used by the standard pipeline.

// Raw assumptions
pub const GROSS_REVENUE: &str = "Gross Revenue";
pub const VACANCY_RATE: &str = "Vacancy Rate";
pub const GENERAL_OPERATING_EXPENSES: &str = "General Operating Expenses";
pub const REAL_ESTATE_TAXES: &str = "Real Estate Taxes";
pub const INSURANCE: &str = "Insurance";
pub const PROPERTY_MANAGEMENT_FEE: &str = "Property Management Fee";
pub const STRUCTURAL_RESERVE: &str = "Structural Reserve";
pub const TENANT_IMPROVEMENTS: &str = "Tenant Improvements";
pub const LEASE_COMMISSIONS: &str = "Lease Commissions";
pub const DEBT_SERVICE: &str = "Debt Service";

// Derived
pub const VACANCY: &str = "Vacancy";
pub const EFFECTIVE_GROSS_INCOME: &str = "Effective Gross Income";
pub const TOTAL_EXPENSES: &str = "Total Expenses";
pub const NET_OPERATING_INCOME: &str = "Net Operating Income";
pub const CASH_FLOW_BEFORE_FINANCING: &str = "Cash Flow Before Financing";
pub const CASH_FLOW_AFTER_FINANCING: &str = "Cash Flow After Financing";

/// The five operating expense lines summed into Total Expenses.
pub const OPERATING_EXPENSES: [&str; 5] = [
    GENERAL_OPERATING_EXPENSES,
    REAL_ESTATE_TAXES,
    INSURANCE,
    PROPERTY_MANAGEMENT_FEE,
    STRUCTURAL_RESERVE,
];
