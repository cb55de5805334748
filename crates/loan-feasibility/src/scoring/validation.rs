use super::domain::{BorrowerInfo, LoanApplication};

const MIN_DURATION_YEARS: u32 = 5;
const MAX_DURATION_YEARS: u32 = 30;
const MIN_AGE: u32 = 18;
const MAX_AGE: u32 = 80;
const MAX_CHILDREN: u32 = 20;

/// Reasons an application is rejected before it reaches the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be greater than zero (found {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative (found {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be between {min} and {max} (found {value})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("borrowers_count must be 1 or 2 (found {0})")]
    BorrowerCount(u8),
}

/// Range checks on every numeric field of an application.
#[derive(Debug, Clone, Default)]
pub struct ApplicationValidator;

impl ApplicationValidator {
    pub fn validate(&self, application: &LoanApplication) -> Result<(), ValidationError> {
        let project = &application.project;
        positive("project.property_price", project.property_price)?;
        non_negative(
            "project.personal_contribution",
            project.personal_contribution,
        )?;
        within(
            "project.loan_duration",
            project.loan_duration,
            MIN_DURATION_YEARS,
            MAX_DURATION_YEARS,
        )?;

        let household = &application.household;
        if !(1..=2).contains(&household.borrowers_count) {
            return Err(ValidationError::BorrowerCount(household.borrowers_count));
        }
        within("household.children", household.children, 0, MAX_CHILDREN)?;
        borrower(BorrowerRole::Main, &household.main_borrower)?;
        if let Some(co_borrower) = &household.co_borrower {
            borrower(BorrowerRole::Co, co_borrower)?;
        }

        let housing = &application.housing;
        non_negative("housing.monthly_rent", housing.monthly_rent)?;
        non_negative("housing.current_mortgage", housing.current_mortgage)?;

        let financial = &application.financial;
        non_negative("financial.rental_income", financial.rental_income)?;
        non_negative("financial.other_income", financial.other_income)?;
        for loan in &financial.consumer_loans {
            non_negative("financial.consumer_loans.monthly_payment", loan.monthly_payment)?;
        }

        Ok(())
    }
}

#[derive(Clone, Copy)]
enum BorrowerRole {
    Main,
    Co,
}

impl BorrowerRole {
    /// Field paths for income, experience and age.
    const fn fields(self) -> [&'static str; 3] {
        match self {
            BorrowerRole::Main => [
                "household.main_borrower.employment.net_monthly_income",
                "household.main_borrower.employment.years_experience",
                "household.main_borrower.age",
            ],
            BorrowerRole::Co => [
                "household.co_borrower.employment.net_monthly_income",
                "household.co_borrower.employment.years_experience",
                "household.co_borrower.age",
            ],
        }
    }
}

fn borrower(role: BorrowerRole, borrower: &BorrowerInfo) -> Result<(), ValidationError> {
    let [income_field, experience_field, age_field] = role.fields();
    positive(income_field, borrower.employment.net_monthly_income)?;
    non_negative(experience_field, borrower.employment.years_experience)?;
    within(age_field, borrower.age, MIN_AGE, MAX_AGE)
}

fn positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}

fn within(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
