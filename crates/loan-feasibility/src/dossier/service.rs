use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::repository::{
    DossierRecord, DossierRepository, PaymentError, PaymentGateway, PaymentIntent, PaymentStatus,
    RepositoryError,
};
use crate::rates::{RateProvider, RateProviderError, RateSnapshot, RateTable};
use crate::report::DossierReport;
use crate::scoring::{
    ApplicationId, ApplicationValidator, LoanApplication, ScoringConfig, ScoringEngine,
    ScoringResult, ValidationError,
};

/// Price of one dossier when the caller does not name an amount.
pub const DEFAULT_DOSSIER_PRICE_CENTS: u64 = 9_900;

/// Service composing validation, the scoring engine, rate table, storage and payments.
pub struct DossierService<R, P> {
    validator: ApplicationValidator,
    engine: Arc<ScoringEngine>,
    rates: Arc<RateTable>,
    provider: Arc<dyn RateProvider>,
    repository: Arc<R>,
    payments: Arc<P>,
    dossier_price_cents: u64,
}

impl<R, P> DossierService<R, P>
where
    R: DossierRepository + 'static,
    P: PaymentGateway + 'static,
{
    pub fn new(
        repository: Arc<R>,
        payments: Arc<P>,
        rates: Arc<RateTable>,
        provider: Arc<dyn RateProvider>,
        config: ScoringConfig,
    ) -> Self {
        Self {
            validator: ApplicationValidator,
            engine: Arc::new(ScoringEngine::new(config)),
            rates,
            provider,
            repository,
            payments,
            dossier_price_cents: DEFAULT_DOSSIER_PRICE_CENTS,
        }
    }

    pub fn with_dossier_price(mut self, cents: u64) -> Self {
        self.dossier_price_cents = cents;
        self
    }

    pub fn dossier_price_cents(&self) -> u64 {
        self.dossier_price_cents
    }

    /// Validate, score against the current snapshot, and store the result unpaid.
    pub fn evaluate(&self, application: LoanApplication) -> Result<ScoringResult, DossierError> {
        self.validator.validate(&application)?;

        let snapshot = self.rates.snapshot();
        let scoring = self.engine.evaluate(&application, &snapshot);

        let record = DossierRecord {
            application,
            scoring,
            created_at: Utc::now(),
            paid: false,
        };
        let stored = self.repository.insert(record)?;

        info!(
            application_id = %stored.scoring.application_id,
            score = stored.scoring.feasibility_score,
            status = stored.scoring.status.label(),
            "application evaluated"
        );
        Ok(stored.scoring)
    }

    /// Open a payment intent for an existing dossier. `None` charges the configured price.
    pub fn create_payment_intent(
        &self,
        application_id: &ApplicationId,
        amount_cents: Option<u64>,
    ) -> Result<PaymentIntent, DossierError> {
        self.get(application_id)?;
        let amount = amount_cents.unwrap_or(self.dossier_price_cents);
        let intent = self.payments.create_intent(application_id, amount)?;
        info!(
            application_id = %application_id,
            intent_id = %intent.id,
            amount_cents = amount,
            "payment intent created"
        );
        Ok(intent)
    }

    /// Mark the dossier paid once its intent has succeeded.
    pub fn confirm_payment(
        &self,
        application_id: &ApplicationId,
        intent_id: &str,
    ) -> Result<DossierRecord, DossierError> {
        let mut record = self.get(application_id)?;
        let intent = self.payments.retrieve_intent(intent_id)?;

        if &intent.application_id != application_id {
            warn!(
                application_id = %application_id,
                intent_id,
                "payment intent belongs to another application"
            );
            return Err(DossierError::IntentMismatch {
                intent_id: intent_id.to_string(),
            });
        }
        if intent.status != PaymentStatus::Succeeded {
            return Err(DossierError::PaymentNotConfirmed {
                status: intent.status,
            });
        }

        if !record.paid {
            record.paid = true;
            self.repository.update(record.clone())?;
            info!(application_id = %application_id, intent_id, "dossier unlocked");
        }
        Ok(record)
    }

    pub fn get(&self, application_id: &ApplicationId) -> Result<DossierRecord, DossierError> {
        let record = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Fetch a dossier that has been paid for.
    pub fn paid_dossier(
        &self,
        application_id: &ApplicationId,
    ) -> Result<DossierRecord, DossierError> {
        let record = self.get(application_id)?;
        if !record.paid {
            return Err(DossierError::PaymentRequired(application_id.clone()));
        }
        Ok(record)
    }

    pub fn render_report(
        &self,
        application_id: &ApplicationId,
    ) -> Result<DossierReport, DossierError> {
        let record = self.paid_dossier(application_id)?;
        Ok(DossierReport::render(&record.application, &record.scoring))
    }

    pub fn rates(&self) -> Arc<RateSnapshot> {
        self.rates.snapshot()
    }

    /// Run the configured provider through the rate table.
    pub fn refresh_rates(&self, now: DateTime<Utc>) -> Result<Arc<RateSnapshot>, DossierError> {
        Ok(self.rates.refresh(self.provider.as_ref(), now)?)
    }

    pub fn active_dossiers(&self) -> Result<usize, DossierError> {
        Ok(self.repository.count()?)
    }
}

/// Error raised by the dossier service.
#[derive(Debug, thiserror::Error)]
pub enum DossierError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Rates(#[from] RateProviderError),
    #[error("payment required to access dossier {0}")]
    PaymentRequired(ApplicationId),
    #[error("payment not confirmed (status {})", .status.label())]
    PaymentNotConfirmed { status: PaymentStatus },
    #[error("payment intent {intent_id} was not issued for this application")]
    IntentMismatch { intent_id: String },
}
