//! Loan application model, input validation, and the feasibility scoring engine.

pub mod domain;
pub(crate) mod evaluation;
mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, BorrowerInfo, ConsumerLoan, EmploymentInfo, EmploymentStatus, FinancialInfo,
    HouseholdInfo, HousingInfo, HousingStatus, LoanApplication, ProjectInfo, PropertyType,
};
pub use evaluation::finance::{
    current_charges, eligible_income, monthly_payment, notary_fees, total_eligible_income,
};
pub use evaluation::{
    Criterion, CriterionVerdict, FeasibilityStatus, FinancingFigures, ScoringConfig,
    ScoringEngine, ScoringResult,
};
pub use validation::{ApplicationValidator, ValidationError};
