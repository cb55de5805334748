//! Paginated plain-text rendering of an evaluated loan dossier.

use serde::Serialize;

use crate::scoring::{LoanApplication, ScoringResult};

/// Lines of body text per page, excluding the page header and footer.
pub const LINES_PER_PAGE: usize = 40;

pub const REPORT_FILE_NAME: &str = "dossier_pret_immobilier.txt";

const PAGE_BREAK: char = '\u{c}';

/// Rendered dossier split into pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DossierReport {
    pub application_id: String,
    pub pages: Vec<Vec<String>>,
}

impl DossierReport {
    pub fn render(application: &LoanApplication, scoring: &ScoringResult) -> Self {
        Self::render_with_page_size(application, scoring, LINES_PER_PAGE)
    }

    pub fn render_with_page_size(
        application: &LoanApplication,
        scoring: &ScoringResult,
        lines_per_page: usize,
    ) -> Self {
        let body = body_lines(application, scoring);
        let chunk = lines_per_page.max(1);
        let page_count = body.len().div_ceil(chunk).max(1);

        let pages = body
            .chunks(chunk)
            .enumerate()
            .map(|(index, lines)| {
                let mut page = Vec::with_capacity(lines.len() + 4);
                page.push(format!("Loan dossier {}", scoring.application_id));
                page.push(String::new());
                page.extend(lines.iter().cloned());
                page.push(String::new());
                page.push(format!("Page {}/{}", index + 1, page_count));
                page
            })
            .collect();

        Self {
            application_id: scoring.application_id.to_string(),
            pages,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages joined with form feeds.
    pub fn to_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.join("\n"))
            .collect::<Vec<_>>()
            .join(&format!("\n{PAGE_BREAK}"))
    }
}

fn body_lines(application: &LoanApplication, scoring: &ScoringResult) -> Vec<String> {
    let project = &application.project;
    let household = &application.household;
    let figures = &scoring.figures;
    let mut lines = Vec::new();

    lines.push("MORTGAGE LOAN DOSSIER".to_string());
    lines.push(format!(
        "Rate ({}): {:.2}%",
        scoring.rate_source,
        scoring.current_interest_rate * 100.0
    ));
    lines.push(format!(
        "Rates updated: {}",
        scoring.rate_last_update.format("%Y-%m-%d")
    ));
    lines.push(String::new());
    lines.push(format!(
        "Score: {}/100 - {}",
        scoring.feasibility_score,
        scoring.status.label().to_uppercase()
    ));

    lines.push(String::new());
    lines.push("PROPERTY PROJECT".to_string());
    lines.push(format!("Price: {} €", euros(project.property_price)));
    lines.push(format!("Property type: {}", project.property_type.label()));
    lines.push(format!("Notary fees: {} €", euros(figures.notary_fees)));
    lines.push(format!("Total budget: {} €", euros(scoring.total_budget)));
    lines.push(format!(
        "Personal contribution: {} €",
        euros(project.personal_contribution)
    ));
    lines.push(format!("Loan amount: {} €", euros(figures.loan_amount.max(0.0))));
    lines.push(format!("Duration: {} years", project.loan_duration));
    lines.push(format!(
        "Monthly payment: {} €/month",
        euros(scoring.monthly_payment)
    ));

    lines.push(String::new());
    lines.push("HOUSEHOLD".to_string());
    lines.push(format!(
        "Borrowers: {}, children: {}",
        household.borrowers_count, household.children
    ));
    let borrowers = std::iter::once(("Main borrower", &household.main_borrower))
        .chain(household.co_borrower.iter().map(|b| ("Co-borrower", b)));
    for (role, borrower) in borrowers {
        lines.push(format!(
            "{role}: {}, {} €/month net, age {}{}",
            borrower.employment.status.label(),
            euros(borrower.employment.net_monthly_income),
            borrower.age,
            if borrower.employment.trial_period {
                " (trial period)"
            } else {
                ""
            }
        ));
    }
    lines.push(format!(
        "Current housing: {}",
        application.housing.current_status.label()
    ));
    lines.push(format!(
        "Eligible income: {} €/month, current charges: {} €/month",
        euros(figures.total_eligible_income),
        euros(figures.current_charges)
    ));

    lines.push(String::new());
    lines.push("ASSESSMENT CRITERIA".to_string());
    for detail in &scoring.criteria_details {
        lines.push(format!(
            "{} ({}/{}): {}",
            detail.criterion.label(),
            detail.points(),
            detail.weight,
            detail.verdict
        ));
    }

    if !scoring.recommendations.is_empty() {
        lines.push(String::new());
        lines.push("RECOMMENDATIONS".to_string());
        for (index, recommendation) in scoring.recommendations.iter().enumerate() {
            lines.push(format!("{}. {}", index + 1, recommendation));
        }
    }

    lines
}

fn euros(value: f64) -> String {
    crate::scoring::evaluation::rules::group_thousands(value)
}
