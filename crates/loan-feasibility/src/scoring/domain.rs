use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for evaluated applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Complete loan request as submitted by the household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub project: ProjectInfo,
    pub household: HouseholdInfo,
    pub housing: HousingInfo,
    #[serde(default)]
    pub financial: FinancialInfo,
}

/// The property being financed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub property_price: f64,
    pub property_type: PropertyType,
    pub personal_contribution: f64,
    /// Loan duration in years.
    pub loan_duration: u32,
}

/// New builds carry reduced notary fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[serde(alias = "neuf")]
    New,
    #[serde(alias = "ancien")]
    Existing,
}

impl PropertyType {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyType::New => "new",
            PropertyType::Existing => "existing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdInfo {
    pub borrowers_count: u8,
    pub main_borrower: BorrowerInfo,
    #[serde(default)]
    pub co_borrower: Option<BorrowerInfo>,
    pub children: u32,
}

impl HouseholdInfo {
    /// People the remaining-to-live threshold is computed for.
    pub fn size(&self) -> u32 {
        u32::from(self.borrowers_count) + self.children
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerInfo {
    pub employment: EmploymentInfo,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentInfo {
    pub status: EmploymentStatus,
    pub net_monthly_income: f64,
    pub years_experience: f64,
    #[serde(default)]
    pub trial_period: bool,
}

/// Contract type as recognised by French lenders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// CDI.
    #[serde(alias = "cdi")]
    Permanent,
    /// CDD.
    #[serde(alias = "cdd")]
    FixedTerm,
}

impl EmploymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EmploymentStatus::Permanent => "permanent",
            EmploymentStatus::FixedTerm => "fixed-term",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingInfo {
    pub current_status: HousingStatus,
    #[serde(default)]
    pub monthly_rent: f64,
    #[serde(default)]
    pub current_mortgage: f64,
    /// Whether the purchase replaces the primary residence.
    #[serde(default = "default_changing_main_residence")]
    pub changing_main_residence: bool,
}

fn default_changing_main_residence() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingStatus {
    #[serde(alias = "locataire")]
    Tenant,
    #[serde(alias = "proprietaire")]
    Owner,
    #[serde(alias = "heberge_gratuit")]
    HostedFree,
}

impl HousingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            HousingStatus::Tenant => "tenant",
            HousingStatus::Owner => "owner",
            HousingStatus::HostedFree => "hosted free of charge",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialInfo {
    #[serde(default)]
    pub consumer_loans: Vec<ConsumerLoan>,
    #[serde(default)]
    pub rental_income: f64,
    #[serde(default)]
    pub other_income: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumerLoan {
    #[serde(default)]
    pub monthly_payment: f64,
}
