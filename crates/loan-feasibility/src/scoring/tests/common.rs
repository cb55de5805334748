use chrono::{DateTime, TimeZone, Utc};

use crate::rates::RateSnapshot;
use crate::scoring::domain::{
    ApplicationId, BorrowerInfo, ConsumerLoan, EmploymentInfo, EmploymentStatus, FinancialInfo,
    HouseholdInfo, HousingInfo, HousingStatus, LoanApplication, ProjectInfo, PropertyType,
};
use crate::scoring::{ScoringConfig, ScoringEngine};

pub(super) fn rates_updated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn rate_snapshot() -> RateSnapshot {
    RateSnapshot::default_table(rates_updated_at())
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(ScoringConfig::default())
}

pub(super) fn application_id(suffix: &str) -> ApplicationId {
    ApplicationId(format!("app-{suffix}"))
}

pub(super) fn permanent(income: f64) -> EmploymentInfo {
    EmploymentInfo {
        status: EmploymentStatus::Permanent,
        net_monthly_income: income,
        years_experience: 6.0,
        trial_period: false,
    }
}

pub(super) fn fixed_term(income: f64, years_experience: f64) -> EmploymentInfo {
    EmploymentInfo {
        status: EmploymentStatus::FixedTerm,
        net_monthly_income: income,
        years_experience,
        trial_period: false,
    }
}

pub(super) fn borrower(employment: EmploymentInfo, age: u32) -> BorrowerInfo {
    BorrowerInfo { employment, age }
}

/// Single permanent borrower, 200k existing property, 20k down, 20 years, no charges.
pub(super) fn reference_application() -> LoanApplication {
    LoanApplication {
        project: ProjectInfo {
            property_price: 200_000.0,
            property_type: PropertyType::Existing,
            personal_contribution: 20_000.0,
            loan_duration: 20,
        },
        household: HouseholdInfo {
            borrowers_count: 1,
            main_borrower: borrower(permanent(3_000.0), 35),
            co_borrower: None,
            children: 0,
        },
        housing: HousingInfo {
            current_status: HousingStatus::Tenant,
            monthly_rent: 750.0,
            current_mortgage: 0.0,
            changing_main_residence: true,
        },
        financial: FinancialInfo::default(),
    }
}

/// Dual-income household that clears every criterion.
pub(super) fn strong_application() -> LoanApplication {
    LoanApplication {
        project: ProjectInfo {
            property_price: 250_000.0,
            property_type: PropertyType::New,
            personal_contribution: 40_000.0,
            loan_duration: 25,
        },
        household: HouseholdInfo {
            borrowers_count: 2,
            main_borrower: borrower(permanent(3_200.0), 34),
            co_borrower: Some(borrower(permanent(2_600.0), 32)),
            children: 1,
        },
        housing: HousingInfo {
            current_status: HousingStatus::Tenant,
            monthly_rent: 1_100.0,
            current_mortgage: 0.0,
            changing_main_residence: true,
        },
        financial: FinancialInfo {
            consumer_loans: vec![ConsumerLoan {
                monthly_payment: 150.0,
            }],
            rental_income: 0.0,
            other_income: 0.0,
        },
    }
}
