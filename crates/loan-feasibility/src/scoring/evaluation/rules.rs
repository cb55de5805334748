use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;
use super::finance::FinancingFigures;

/// The lending criteria, in the order they are judged and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Contribution,
    IncomeEligibility,
    DebtRatio,
    RemainingToLive,
    AgeAtTerm,
}

impl Criterion {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Contribution,
            Self::IncomeEligibility,
            Self::DebtRatio,
            Self::RemainingToLive,
            Self::AgeAtTerm,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Contribution => "Personal contribution",
            Self::IncomeEligibility => "Income eligibility",
            Self::DebtRatio => "Debt ratio",
            Self::RemainingToLive => "Remaining to live",
            Self::AgeAtTerm => "Age at loan term",
        }
    }
}

/// One row of the criteria table.
pub(crate) struct CriterionRule {
    pub criterion: Criterion,
    pub weight: u8,
    pub passes: fn(&FinancingFigures, &ScoringConfig) -> bool,
    pub verdict: fn(&FinancingFigures, &ScoringConfig, bool) -> String,
    pub recommendation: fn(&FinancingFigures, &ScoringConfig) -> String,
}

pub(crate) const CRITERIA: [CriterionRule; 5] = [
    CriterionRule {
        criterion: Criterion::Contribution,
        weight: 30,
        passes: contribution_passes,
        verdict: contribution_verdict,
        recommendation: contribution_recommendation,
    },
    CriterionRule {
        criterion: Criterion::IncomeEligibility,
        weight: 20,
        passes: income_passes,
        verdict: income_verdict,
        recommendation: income_recommendation,
    },
    CriterionRule {
        criterion: Criterion::DebtRatio,
        weight: 30,
        passes: debt_ratio_passes,
        verdict: debt_ratio_verdict,
        recommendation: debt_ratio_recommendation,
    },
    CriterionRule {
        criterion: Criterion::RemainingToLive,
        weight: 10,
        passes: remaining_passes,
        verdict: remaining_verdict,
        recommendation: remaining_recommendation,
    },
    CriterionRule {
        criterion: Criterion::AgeAtTerm,
        weight: 10,
        passes: age_passes,
        verdict: age_verdict,
        recommendation: age_recommendation,
    },
];

const PASS: &str = "✅";
const FAIL: &str = "❌";

fn contribution_passes(figures: &FinancingFigures, _config: &ScoringConfig) -> bool {
    figures.personal_contribution >= figures.minimum_contribution
}

fn contribution_verdict(
    figures: &FinancingFigures,
    _config: &ScoringConfig,
    passed: bool,
) -> String {
    if passed {
        format!(
            "{PASS} Sufficient personal contribution: {:.0}€",
            figures.personal_contribution
        )
    } else {
        format!(
            "{FAIL} Insufficient personal contribution ({:.0}€ minimum)",
            figures.minimum_contribution
        )
    }
}

fn contribution_recommendation(figures: &FinancingFigures, _config: &ScoringConfig) -> String {
    format!(
        "Increase your personal contribution to at least {:.0}€",
        figures.minimum_contribution
    )
}

fn income_passes(figures: &FinancingFigures, _config: &ScoringConfig) -> bool {
    figures.main_eligible_income > 0.0
}

fn income_verdict(figures: &FinancingFigures, _config: &ScoringConfig, passed: bool) -> String {
    if passed {
        format!(
            "{PASS} Eligible income: {}€/month",
            group_thousands(figures.total_eligible_income)
        )
    } else {
        format!("{FAIL} Income not eligible")
    }
}

fn income_recommendation(_figures: &FinancingFigures, config: &ScoringConfig) -> String {
    format!(
        "Secure a permanent contract or document {} years of fixed-term experience",
        config.fixed_term_minimum_years
    )
}

fn debt_ratio_passes(figures: &FinancingFigures, config: &ScoringConfig) -> bool {
    figures.debt_ratio <= config.maximum_debt_ratio
}

fn debt_ratio_verdict(figures: &FinancingFigures, _config: &ScoringConfig, passed: bool) -> String {
    if passed {
        format!("{PASS} Debt ratio: {}", percent(figures.debt_ratio))
    } else {
        format!("{FAIL} Debt ratio too high: {}", percent(figures.debt_ratio))
    }
}

fn debt_ratio_recommendation(_figures: &FinancingFigures, _config: &ScoringConfig) -> String {
    "Reduce your charges or increase your income".to_string()
}

fn remaining_passes(figures: &FinancingFigures, _config: &ScoringConfig) -> bool {
    figures.remaining_to_live >= figures.minimum_remaining_to_live
}

fn remaining_verdict(figures: &FinancingFigures, _config: &ScoringConfig, passed: bool) -> String {
    if passed {
        format!("{PASS} Remaining to live: {:.0}€", figures.remaining_to_live)
    } else {
        format!(
            "{FAIL} Insufficient remaining to live: {:.0}€",
            figures.remaining_to_live
        )
    }
}

fn remaining_recommendation(figures: &FinancingFigures, _config: &ScoringConfig) -> String {
    format!(
        "Make sure you keep at least {:.0}€ of remaining to live",
        figures.minimum_remaining_to_live
    )
}

fn age_passes(figures: &FinancingFigures, config: &ScoringConfig) -> bool {
    figures.loan_end_age <= config.maximum_age_at_term
}

fn age_verdict(figures: &FinancingFigures, config: &ScoringConfig, passed: bool) -> String {
    if passed {
        format!("{PASS} Loan ends at age {}", figures.loan_end_age)
    } else {
        format!(
            "{FAIL} Loan ends at age {} (limit {})",
            figures.loan_end_age, config.maximum_age_at_term
        )
    }
}

fn age_recommendation(_figures: &FinancingFigures, _config: &ScoringConfig) -> String {
    "Shorten the loan duration".to_string()
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Whole-euro amount with comma thousands separators.
pub(crate) fn group_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}{grouped}")
}
