use chrono::Utc;
use clap::Args;
use loan_feasibility::dossier::DossierError;
use loan_feasibility::error::AppError;
use loan_feasibility::rates::{CsvRateProvider, RateProvider, RateSnapshot, StaticRateProvider};
use loan_feasibility::scoring::{
    ApplicationValidator, BorrowerInfo, EmploymentInfo, EmploymentStatus, FinancialInfo,
    HouseholdInfo, HousingInfo, HousingStatus, LoanApplication, ProjectInfo, PropertyType,
    ScoringEngine, ScoringResult,
};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct EvaluateArgs {
    /// JSON file holding a loan application. Defaults to a built-in sample.
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
    /// Optional rate CSV (`duration_years,rate`) used instead of the built-in table.
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Print the full result as JSON instead of the text summary.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RatesArgs {
    /// Rate CSV (`duration_years,rate`) to load and validate.
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let application = match &args.file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str::<LoanApplication>(&raw)?
        }
        None => sample_application(),
    };

    ApplicationValidator
        .validate(&application)
        .map_err(DossierError::from)?;

    let rates = load_rates(args.csv)?;
    let result = ScoringEngine::default().evaluate(&application, &rates);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for line in render_result(&application, &result) {
            println!("{line}");
        }
    }
    Ok(())
}

pub(crate) fn run_rates(args: RatesArgs) -> Result<(), AppError> {
    let rates = load_rates(args.csv)?;
    for line in render_rates(&rates) {
        println!("{line}");
    }
    Ok(())
}

fn load_rates(csv: Option<PathBuf>) -> Result<RateSnapshot, AppError> {
    let now = Utc::now();
    let snapshot = match csv {
        Some(path) => CsvRateProvider::new(path).fetch(now)?,
        None => StaticRateProvider::default().fetch(now)?,
    };
    Ok(snapshot)
}

pub(crate) fn render_rates(rates: &RateSnapshot) -> Vec<String> {
    let mut lines = vec![format!(
        "Mortgage rates from {} (updated {})",
        rates.source(),
        rates.last_updated().format("%Y-%m-%d %H:%M UTC")
    )];
    lines.extend(
        rates
            .rates()
            .iter()
            .map(|(years, rate)| format!("  {years:>2} years: {:.2}%", rate * 100.0)),
    );
    lines
}

pub(crate) fn render_result(application: &LoanApplication, result: &ScoringResult) -> Vec<String> {
    let mut lines = vec![
        format!("Application {}", result.application_id),
        format!(
            "Score: {}/100 ({})",
            result.feasibility_score,
            result.status.label()
        ),
        format!(
            "Rate: {:.2}% over {} years ({}, updated {})",
            result.current_interest_rate * 100.0,
            application.project.loan_duration,
            result.rate_source,
            result.rate_last_update.format("%Y-%m-%d")
        ),
        format!("Monthly payment: {:.2} €", result.monthly_payment),
        format!("Total budget: {:.0} €", result.total_budget),
        "Criteria:".to_string(),
    ];
    lines.extend(
        result
            .criteria_details
            .iter()
            .map(|detail| format!("  {}: {}", detail.criterion.label(), detail.verdict)),
    );
    if !result.recommendations.is_empty() {
        lines.push("Recommendations:".to_string());
        lines.extend(
            result
                .recommendations
                .iter()
                .enumerate()
                .map(|(index, text)| format!("  {}. {}", index + 1, text)),
        );
    }
    lines
}

/// Couple buying a new-build flat; used when no application file is given.
pub(crate) fn sample_application() -> LoanApplication {
    LoanApplication {
        project: ProjectInfo {
            property_price: 280_000.0,
            property_type: PropertyType::New,
            personal_contribution: 35_000.0,
            loan_duration: 25,
        },
        household: HouseholdInfo {
            borrowers_count: 2,
            main_borrower: BorrowerInfo {
                employment: EmploymentInfo {
                    status: EmploymentStatus::Permanent,
                    net_monthly_income: 2_900.0,
                    years_experience: 7.0,
                    trial_period: false,
                },
                age: 36,
            },
            co_borrower: Some(BorrowerInfo {
                employment: EmploymentInfo {
                    status: EmploymentStatus::FixedTerm,
                    net_monthly_income: 1_900.0,
                    years_experience: 4.0,
                    trial_period: false,
                },
                age: 33,
            }),
            children: 1,
        },
        housing: HousingInfo {
            current_status: HousingStatus::Tenant,
            monthly_rent: 950.0,
            current_mortgage: 0.0,
            changing_main_residence: true,
        },
        financial: FinancialInfo::default(),
    }
}
