use crate::cli::ServeArgs;
use crate::infra::{rate_provider, AppState, InMemoryDossierRepository, SimulatedPaymentGateway};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use loan_feasibility::config::AppConfig;
use loan_feasibility::dossier::{DossierRepository, DossierService, PaymentGateway};
use loan_feasibility::error::AppError;
use loan_feasibility::rates::{RateTable, RefreshSchedule};
use loan_feasibility::scoring::ScoringConfig;
use loan_feasibility::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        environment: config.environment,
    };

    let repository = Arc::new(InMemoryDossierRepository::default());
    let payments = Arc::new(SimulatedPaymentGateway::default());
    let service = Arc::new(
        DossierService::new(
            repository,
            payments,
            Arc::new(RateTable::default()),
            rate_provider(&config.rates),
            ScoringConfig::default(),
        )
        .with_dossier_price(config.billing.dossier_price_cents),
    );
    warn!("payments are simulated; intents are captured on creation");

    if let Err(err) = service.refresh_rates(Utc::now()) {
        warn!(error = %err, "initial rate refresh failed; serving built-in table");
    }
    let _refresh = spawn_rate_refresh(service.clone(), config.rates.schedule);

    let app = with_service_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(environment = config.environment.label(), %addr, "loan feasibility service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Refresh rates at every scheduled slot for as long as the server runs.
pub(crate) fn spawn_rate_refresh<R, P>(
    service: Arc<DossierService<R, P>>,
    schedule: RefreshSchedule,
) -> JoinHandle<()>
where
    R: DossierRepository + 'static,
    P: PaymentGateway + 'static,
{
    tokio::spawn(async move {
        loop {
            let now = Utc::now();
            info!(
                next_run = %schedule.next_run_after(now),
                "next mortgage rate refresh scheduled"
            );
            tokio::time::sleep(schedule.until_next_run(now)).await;

            if let Err(err) = service.refresh_rates(Utc::now()) {
                warn!(error = %err, "scheduled rate refresh failed");
            }
        }
    })
}
