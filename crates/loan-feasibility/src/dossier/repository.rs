use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{ApplicationId, LoanApplication, ScoringResult};

/// Stored evaluation together with its payment state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DossierRecord {
    pub application: LoanApplication,
    pub scoring: ScoringResult,
    pub created_at: DateTime<Utc>,
    pub paid: bool,
}

impl DossierRecord {
    pub fn application_id(&self) -> &ApplicationId {
        &self.scoring.application_id
    }

    pub fn view(&self) -> DossierView {
        DossierView {
            application_id: self.scoring.application_id.clone(),
            paid: self.paid,
            report_available: self.paid,
            scoring: self.scoring.clone(),
        }
    }
}

/// Storage abstraction so the service can be exercised in isolation.
pub trait DossierRepository: Send + Sync {
    fn insert(&self, record: DossierRecord) -> Result<DossierRecord, RepositoryError>;
    fn update(&self, record: DossierRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<DossierRecord>, RepositoryError>;
    fn count(&self) -> Result<usize, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("dossier already exists")]
    Conflict,
    #[error("dossier not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Card-payment processor holding intents for dossier purchases.
pub trait PaymentGateway: Send + Sync {
    fn create_intent(
        &self,
        application_id: &ApplicationId,
        amount_cents: u64,
    ) -> Result<PaymentIntent, PaymentError>;

    fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, PaymentError>;

    fn intent_status(&self, intent_id: &str) -> Result<PaymentStatus, PaymentError> {
        Ok(self.retrieve_intent(intent_id)?.status)
    }
}

/// Intent as reported by the gateway. `application_id` is the metadata attached on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub application_id: ApplicationId,
    pub amount_cents: u64,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Succeeded => "succeeded",
            PaymentStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("unknown payment intent {0}")]
    UnknownIntent(String),
    #[error("payment amount must be greater than zero")]
    InvalidAmount,
    #[error("payment gateway unavailable: {0}")]
    Transport(String),
}

/// Response body for a dossier lookup.
#[derive(Debug, Clone, Serialize)]
pub struct DossierView {
    pub application_id: ApplicationId,
    pub paid: bool,
    pub report_available: bool,
    pub scoring: ScoringResult,
}
