use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use loan_feasibility::dossier::{
    dossier_router, DossierRepository, DossierService, PaymentGateway,
};
use loan_feasibility::error::AppError;
use serde_json::json;
use std::sync::Arc;

const APP_NAME: &str = "Loan Feasibility";

pub(crate) fn with_service_routes<R, P>(service: Arc<DossierService<R, P>>) -> axum::Router
where
    R: DossierRepository + 'static,
    P: PaymentGateway + 'static,
{
    dossier_router(service.clone())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/status", axum::routing::get(status_endpoint::<R, P>))
        .layer(Extension(service))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn status_endpoint<R, P>(
    Extension(state): Extension<AppState>,
    Extension(service): Extension<Arc<DossierService<R, P>>>,
) -> Result<Response, AppError>
where
    R: DossierRepository + 'static,
    P: PaymentGateway + 'static,
{
    let active_dossiers = service.active_dossiers()?;
    let rates = service.rates();
    let payload = json!({
        "app_name": APP_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.environment.label(),
        "dossier_price_cents": service.dossier_price_cents(),
        "rates": rates.as_ref(),
        "active_dossiers": active_dossiers,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}
