use loan_feasibility::config::{AppEnvironment, RatesConfig};
use loan_feasibility::dossier::{
    DossierRecord, DossierRepository, PaymentError, PaymentGateway, PaymentIntent, PaymentStatus,
    RepositoryError,
};
use loan_feasibility::rates::{
    CsvRateProvider, FallbackRateProvider, RateProvider, StaticRateProvider,
};
use loan_feasibility::scoring::ApplicationId;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) environment: AppEnvironment,
}

type DossierMap = HashMap<ApplicationId, DossierRecord>;

#[derive(Default, Clone)]
pub(crate) struct InMemoryDossierRepository {
    records: Arc<Mutex<DossierMap>>,
}

impl InMemoryDossierRepository {
    fn lock(&self) -> Result<MutexGuard<'_, DossierMap>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl DossierRepository for InMemoryDossierRepository {
    fn insert(&self, record: DossierRecord) -> Result<DossierRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(record.application_id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.application_id().clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: DossierRecord) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(record.application_id()) {
            guard.insert(record.application_id().clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<DossierRecord>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock()?.len())
    }
}

/// Local stand-in for the card processor. Intents are captured as soon as they are created.
#[derive(Default, Clone)]
pub(crate) struct SimulatedPaymentGateway {
    intents: Arc<Mutex<HashMap<String, PaymentIntent>>>,
}

impl SimulatedPaymentGateway {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, PaymentIntent>>, PaymentError> {
        self.intents
            .lock()
            .map_err(|_| PaymentError::Transport("gateway mutex poisoned".to_string()))
    }
}

impl PaymentGateway for SimulatedPaymentGateway {
    fn create_intent(
        &self,
        application_id: &ApplicationId,
        amount_cents: u64,
    ) -> Result<PaymentIntent, PaymentError> {
        if amount_cents == 0 {
            return Err(PaymentError::InvalidAmount);
        }
        let id = format!("pi_sim_{}", Uuid::new_v4().simple());
        let intent = PaymentIntent {
            client_secret: format!("{id}_secret_{}", Uuid::new_v4().simple()),
            id: id.clone(),
            application_id: application_id.clone(),
            amount_cents,
            status: PaymentStatus::Succeeded,
        };
        self.lock()?.insert(id, intent.clone());
        Ok(intent)
    }

    fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, PaymentError> {
        self.lock()?
            .get(intent_id)
            .cloned()
            .ok_or_else(|| PaymentError::UnknownIntent(intent_id.to_string()))
    }
}

/// CSV file with fallback to the built-in table when configured, otherwise the built-in table.
pub(crate) fn rate_provider(config: &RatesConfig) -> Arc<dyn RateProvider> {
    match &config.csv_path {
        Some(path) => Arc::new(FallbackRateProvider::new(CsvRateProvider::new(path))),
        None => Arc::new(StaticRateProvider::default()),
    }
}
