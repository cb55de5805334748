use serde::{Deserialize, Serialize};

/// Underwriting thresholds. `Default` carries the French lending rules the engine applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub notary_fee_new: f64,
    pub notary_fee_existing: f64,
    pub minimum_contribution_ratio: f64,
    pub fixed_term_income_ratio: f64,
    pub fixed_term_minimum_years: f64,
    pub rental_income_ratio: f64,
    pub maximum_debt_ratio: f64,
    pub remaining_to_live_per_person: f64,
    pub maximum_age_at_term: u32,
    pub favorable_threshold: u8,
    pub average_threshold: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            notary_fee_new: 0.03,
            notary_fee_existing: 0.08,
            minimum_contribution_ratio: 0.10,
            fixed_term_income_ratio: 0.7,
            fixed_term_minimum_years: 3.0,
            rental_income_ratio: 0.7,
            maximum_debt_ratio: 0.33,
            remaining_to_live_per_person: 750.0,
            maximum_age_at_term: 64,
            favorable_threshold: 80,
            average_threshold: 50,
        }
    }
}
