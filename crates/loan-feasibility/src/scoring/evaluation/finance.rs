use serde::{Deserialize, Serialize};

use super::super::domain::{
    EmploymentInfo, EmploymentStatus, FinancialInfo, HouseholdInfo, HousingInfo, HousingStatus,
    LoanApplication, PropertyType,
};
use super::config::ScoringConfig;

/// Every intermediate quantity the criteria are judged on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingFigures {
    pub notary_fees: f64,
    pub total_budget: f64,
    pub loan_amount: f64,
    pub annual_rate: f64,
    pub monthly_payment: f64,
    pub main_eligible_income: f64,
    pub total_eligible_income: f64,
    pub current_charges: f64,
    pub total_charges: f64,
    pub debt_ratio: f64,
    pub remaining_to_live: f64,
    pub minimum_contribution: f64,
    pub minimum_remaining_to_live: f64,
    pub personal_contribution: f64,
    pub loan_end_age: u32,
}

impl FinancingFigures {
    pub(crate) fn compute(
        application: &LoanApplication,
        annual_rate: f64,
        config: &ScoringConfig,
    ) -> Self {
        let project = &application.project;

        let notary_fees = notary_fees(project.property_price, project.property_type, config);
        let total_budget = project.property_price + notary_fees;
        let loan_amount = total_budget - project.personal_contribution;

        let main_eligible_income =
            eligible_income(&application.household.main_borrower.employment, config);
        let total_eligible_income =
            total_eligible_income(&application.household, &application.financial, config);

        let monthly_payment = monthly_payment(loan_amount, annual_rate, project.loan_duration);
        let current_charges = current_charges(&application.housing, &application.financial);
        let total_charges = monthly_payment + current_charges;

        let debt_ratio = if total_eligible_income > 0.0 {
            total_charges / total_eligible_income
        } else {
            1.0
        };

        Self {
            notary_fees,
            total_budget,
            loan_amount,
            annual_rate,
            monthly_payment,
            main_eligible_income,
            total_eligible_income,
            current_charges,
            total_charges,
            debt_ratio,
            remaining_to_live: total_eligible_income - total_charges,
            minimum_contribution: total_budget * config.minimum_contribution_ratio,
            minimum_remaining_to_live: f64::from(application.household.size())
                * config.remaining_to_live_per_person,
            personal_contribution: project.personal_contribution,
            loan_end_age: application.household.main_borrower.age + project.loan_duration,
        }
    }
}

/// Notary and transfer fees: reduced rate for new builds.
pub fn notary_fees(price: f64, property_type: PropertyType, config: &ScoringConfig) -> f64 {
    match property_type {
        PropertyType::New => price * config.notary_fee_new,
        PropertyType::Existing => price * config.notary_fee_existing,
    }
}

/// Fixed-rate annuity payment. Non-positive principals and empty terms cost nothing.
pub fn monthly_payment(principal: f64, annual_rate: f64, years: u32) -> f64 {
    let payments = years * 12;
    if payments == 0 || principal <= 0.0 {
        return 0.0;
    }

    let monthly_rate = annual_rate / 12.0;
    if monthly_rate == 0.0 {
        return principal / f64::from(payments);
    }

    let growth = (1.0 + monthly_rate).powf(f64::from(payments));
    principal * (monthly_rate * growth) / (growth - 1.0)
}

/// Income a lender counts for one borrower.
pub fn eligible_income(employment: &EmploymentInfo, config: &ScoringConfig) -> f64 {
    match employment.status {
        EmploymentStatus::Permanent if employment.trial_period => 0.0,
        EmploymentStatus::Permanent => employment.net_monthly_income,
        EmploymentStatus::FixedTerm
            if employment.years_experience >= config.fixed_term_minimum_years =>
        {
            employment.net_monthly_income * config.fixed_term_income_ratio
        }
        EmploymentStatus::FixedTerm => 0.0,
    }
}

/// Household income: both borrowers, discounted rent received, and other income.
pub fn total_eligible_income(
    household: &HouseholdInfo,
    financial: &FinancialInfo,
    config: &ScoringConfig,
) -> f64 {
    let main_income = eligible_income(&household.main_borrower.employment, config);
    let co_income = household
        .co_borrower
        .as_ref()
        .map(|borrower| eligible_income(&borrower.employment, config))
        .unwrap_or(0.0);

    main_income
        + co_income
        + financial.rental_income * config.rental_income_ratio
        + financial.other_income
}

/// Monthly charges that survive the purchase.
///
/// An owner's current mortgage only counts when the purchase replaces the primary residence.
pub fn current_charges(housing: &HousingInfo, financial: &FinancialInfo) -> f64 {
    let housing_charge = match housing.current_status {
        HousingStatus::Owner if housing.changing_main_residence => housing.current_mortgage,
        HousingStatus::Tenant | HousingStatus::Owner | HousingStatus::HostedFree => 0.0,
    };

    let consumer_loans: f64 = financial
        .consumer_loans
        .iter()
        .map(|loan| loan.monthly_payment)
        .sum();

    housing_charge + consumer_loans
}
