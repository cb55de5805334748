mod config;
pub(crate) mod finance;
pub(crate) mod policy;
pub(crate) mod rules;

pub use config::ScoringConfig;
pub use finance::FinancingFigures;
pub use policy::FeasibilityStatus;
pub use rules::Criterion;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationId, LoanApplication};
use crate::rates::RateSnapshot;
use policy::status_for_score;
use rules::CRITERIA;

/// Stateless evaluator applying the criteria table to one application.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score `application` under a freshly generated identifier.
    pub fn evaluate(&self, application: &LoanApplication, rates: &RateSnapshot) -> ScoringResult {
        self.evaluate_with_id(ApplicationId::generate(), application, rates)
    }

    /// Score `application` against `rates`. Total over validated input; never fails.
    pub fn evaluate_with_id(
        &self,
        application_id: ApplicationId,
        application: &LoanApplication,
        rates: &RateSnapshot,
    ) -> ScoringResult {
        let annual_rate = rates.get_rate(application.project.loan_duration);
        let figures = FinancingFigures::compute(application, annual_rate, &self.config);

        let mut score: u8 = 0;
        let mut criteria_details = Vec::with_capacity(CRITERIA.len());
        let mut recommendations = Vec::new();

        for rule in &CRITERIA {
            let passed = (rule.passes)(&figures, &self.config);
            if passed {
                score += rule.weight;
            } else {
                recommendations.push((rule.recommendation)(&figures, &self.config));
            }

            criteria_details.push(CriterionVerdict {
                criterion: rule.criterion,
                passed,
                weight: rule.weight,
                verdict: (rule.verdict)(&figures, &self.config, passed),
            });
        }

        let info = rates.snapshot_info();

        ScoringResult {
            application_id,
            feasibility_score: score,
            status: status_for_score(score, &self.config),
            criteria_details,
            recommendations,
            monthly_payment: figures.monthly_payment,
            total_budget: figures.total_budget,
            current_interest_rate: annual_rate,
            rate_source: info.source,
            rate_last_update: info.last_updated,
            figures,
        }
    }
}

/// Outcome of a single criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionVerdict {
    pub criterion: Criterion,
    pub passed: bool,
    pub weight: u8,
    pub verdict: String,
}

impl CriterionVerdict {
    pub fn points(&self) -> u8 {
        if self.passed {
            self.weight
        } else {
            0
        }
    }
}

/// Evaluation output. Criteria and recommendations follow the criteria table order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub application_id: ApplicationId,
    pub feasibility_score: u8,
    pub status: FeasibilityStatus,
    pub criteria_details: Vec<CriterionVerdict>,
    pub recommendations: Vec<String>,
    pub monthly_payment: f64,
    pub total_budget: f64,
    pub current_interest_rate: f64,
    pub rate_source: String,
    pub rate_last_update: DateTime<Utc>,
    pub figures: FinancingFigures,
}

impl ScoringResult {
    pub fn verdict(&self, criterion: Criterion) -> Option<&CriterionVerdict> {
        self.criteria_details
            .iter()
            .find(|detail| detail.criterion == criterion)
    }

    pub fn summary(&self) -> String {
        format!(
            "score {}/100 ({}), {} recommendation(s)",
            self.feasibility_score,
            self.status.label(),
            self.recommendations.len()
        )
    }
}
