use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::dossier::repository::{
    DossierRecord, DossierRepository, PaymentError, PaymentGateway, PaymentIntent, PaymentStatus,
    RepositoryError,
};
use crate::dossier::{dossier_router, DossierService};
use crate::rates::{RateProvider, RateProviderError, RateSnapshot, RateTable, StaticRateProvider};
use crate::scoring::{
    ApplicationId, BorrowerInfo, EmploymentInfo, EmploymentStatus, FinancialInfo, HouseholdInfo,
    HousingInfo, HousingStatus, LoanApplication, ProjectInfo, PropertyType, ScoringConfig,
};

pub(super) type TestService = DossierService<MemoryRepository, MemoryGateway>;

pub(super) fn rates_updated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn rate_table() -> Arc<RateTable> {
    Arc::new(RateTable::new(RateSnapshot::default_table(rates_updated_at())))
}

/// Single permanent borrower buying a 200k existing flat with 20k down over 20 years.
pub(super) fn application() -> LoanApplication {
    LoanApplication {
        project: ProjectInfo {
            property_price: 200_000.0,
            property_type: PropertyType::Existing,
            personal_contribution: 20_000.0,
            loan_duration: 20,
        },
        household: HouseholdInfo {
            borrowers_count: 1,
            main_borrower: BorrowerInfo {
                employment: EmploymentInfo {
                    status: EmploymentStatus::Permanent,
                    net_monthly_income: 3_000.0,
                    years_experience: 4.0,
                    trial_period: false,
                },
                age: 35,
            },
            co_borrower: None,
            children: 0,
        },
        housing: HousingInfo {
            current_status: HousingStatus::Tenant,
            monthly_rent: 800.0,
            current_mortgage: 0.0,
            changing_main_residence: true,
        },
        financial: FinancialInfo::default(),
    }
}

pub(super) fn invalid_application() -> LoanApplication {
    let mut application = application();
    application.project.loan_duration = 40;
    application
}

pub(super) fn build_service() -> (TestService, Arc<MemoryRepository>, Arc<MemoryGateway>) {
    build_service_with_provider(Arc::new(StaticRateProvider::default()))
}

pub(super) fn build_service_with_provider(
    provider: Arc<dyn RateProvider>,
) -> (TestService, Arc<MemoryRepository>, Arc<MemoryGateway>) {
    let repository = Arc::new(MemoryRepository::default());
    let gateway = Arc::new(MemoryGateway::default());
    let service = DossierService::new(
        repository.clone(),
        gateway.clone(),
        rate_table(),
        provider,
        ScoringConfig::default(),
    );
    (service, repository, gateway)
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    dossier_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<HashMap<ApplicationId, DossierRecord>>,
}

impl DossierRepository for MemoryRepository {
    fn insert(&self, record: DossierRecord) -> Result<DossierRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(record.application_id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.application_id().clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: DossierRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.application_id().clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<DossierRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.records.lock().expect("repository mutex poisoned").len())
    }
}

/// Gateway whose intents stay pending until a test settles them.
#[derive(Default)]
pub(super) struct MemoryGateway {
    intents: Mutex<HashMap<String, PaymentIntent>>,
}

impl MemoryGateway {
    pub(super) fn settle(&self, intent_id: &str, status: PaymentStatus) {
        let mut guard = self.intents.lock().expect("gateway mutex poisoned");
        if let Some(intent) = guard.get_mut(intent_id) {
            intent.status = status;
        }
    }
}

impl PaymentGateway for MemoryGateway {
    fn create_intent(
        &self,
        application_id: &ApplicationId,
        amount_cents: u64,
    ) -> Result<PaymentIntent, PaymentError> {
        if amount_cents == 0 {
            return Err(PaymentError::InvalidAmount);
        }
        let mut guard = self.intents.lock().expect("gateway mutex poisoned");
        let id = format!("pi_test_{}", guard.len() + 1);
        let intent = PaymentIntent {
            client_secret: format!("{id}_secret"),
            id: id.clone(),
            application_id: application_id.clone(),
            amount_cents,
            status: PaymentStatus::Pending,
        };
        guard.insert(id, intent.clone());
        Ok(intent)
    }

    fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, PaymentError> {
        self.intents
            .lock()
            .expect("gateway mutex poisoned")
            .get(intent_id)
            .cloned()
            .ok_or_else(|| PaymentError::UnknownIntent(intent_id.to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl DossierRepository for UnavailableRepository {
    fn insert(&self, _record: DossierRecord) -> Result<DossierRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: DossierRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<DossierRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct OfflineProvider;

impl RateProvider for OfflineProvider {
    fn name(&self) -> &str {
        "offline"
    }

    fn fetch(&self, _now: DateTime<Utc>) -> Result<RateSnapshot, RateProviderError> {
        Err(RateProviderError::Unavailable("rate site unreachable".to_string()))
    }
}

/// Evaluate, open an intent and settle it, returning the application id and intent id.
pub(super) fn paid_dossier(
    service: &TestService,
    gateway: &MemoryGateway,
) -> (ApplicationId, String) {
    let scoring = service.evaluate(application()).expect("evaluation succeeds");
    let intent = service
        .create_payment_intent(&scoring.application_id, None)
        .expect("intent created");
    gateway.settle(&intent.id, PaymentStatus::Succeeded);
    service
        .confirm_payment(&scoring.application_id, &intent.id)
        .expect("payment confirmed");
    (scoring.application_id, intent.id)
}
