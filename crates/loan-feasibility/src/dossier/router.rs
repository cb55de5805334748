use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::repository::{DossierRepository, PaymentError, PaymentGateway, RepositoryError};
use super::service::{DossierError, DossierService};
use crate::report::REPORT_FILE_NAME;
use crate::scoring::{ApplicationId, LoanApplication};

/// Router exposing evaluation, rates, payment and dossier endpoints.
pub fn dossier_router<R, P>(service: Arc<DossierService<R, P>>) -> Router
where
    R: DossierRepository + 'static,
    P: PaymentGateway + 'static,
{
    Router::new()
        .route("/api/evaluate", post(evaluate_handler::<R, P>))
        .route("/api/rates", get(rates_handler::<R, P>))
        .route("/api/rates/refresh", post(refresh_rates_handler::<R, P>))
        .route(
            "/api/payment/create-intent",
            post(create_intent_handler::<R, P>),
        )
        .route("/api/payment/confirm", post(confirm_payment_handler::<R, P>))
        .route(
            "/api/dossier/:application_id",
            get(dossier_handler::<R, P>),
        )
        .route(
            "/api/dossier/:application_id/report",
            get(report_handler::<R, P>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    pub application_id: ApplicationId,
    #[serde(default)]
    pub amount: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub application_id: ApplicationId,
    pub payment_intent_id: String,
}

pub(crate) async fn evaluate_handler<R, P>(
    State(service): State<Arc<DossierService<R, P>>>,
    payload: Result<axum::Json<LoanApplication>, JsonRejection>,
) -> Response
where
    R: DossierRepository + 'static,
    P: PaymentGateway + 'static,
{
    let axum::Json(application) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.evaluate(application) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rates_handler<R, P>(
    State(service): State<Arc<DossierService<R, P>>>,
) -> Response
where
    R: DossierRepository + 'static,
    P: PaymentGateway + 'static,
{
    let snapshot = service.rates();
    (StatusCode::OK, axum::Json(snapshot.as_ref().clone())).into_response()
}

pub(crate) async fn refresh_rates_handler<R, P>(
    State(service): State<Arc<DossierService<R, P>>>,
) -> Response
where
    R: DossierRepository + 'static,
    P: PaymentGateway + 'static,
{
    match service.refresh_rates(Utc::now()) {
        Ok(snapshot) => {
            let payload = json!({
                "status": "updated",
                "rates": snapshot.as_ref(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => {
            let current = service.rates();
            let payload = json!({
                "error": error.to_string(),
                "status": "unchanged",
                "rates": current.as_ref(),
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn create_intent_handler<R, P>(
    State(service): State<Arc<DossierService<R, P>>>,
    payload: Result<axum::Json<CreateIntentRequest>, JsonRejection>,
) -> Response
where
    R: DossierRepository + 'static,
    P: PaymentGateway + 'static,
{
    let axum::Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.create_payment_intent(&request.application_id, request.amount) {
        Ok(intent) => {
            let payload = json!({
                "client_secret": intent.client_secret,
                "payment_intent_id": intent.id,
                "amount": intent.amount_cents,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn confirm_payment_handler<R, P>(
    State(service): State<Arc<DossierService<R, P>>>,
    payload: Result<axum::Json<ConfirmPaymentRequest>, JsonRejection>,
) -> Response
where
    R: DossierRepository + 'static,
    P: PaymentGateway + 'static,
{
    let axum::Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.confirm_payment(&request.application_id, &request.payment_intent_id) {
        Ok(record) => {
            let payload = json!({
                "status": "success",
                "application_id": record.application_id(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dossier_handler<R, P>(
    State(service): State<Arc<DossierService<R, P>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: DossierRepository + 'static,
    P: PaymentGateway + 'static,
{
    match service.paid_dossier(&ApplicationId(application_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R, P>(
    State(service): State<Arc<DossierService<R, P>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: DossierRepository + 'static,
    P: PaymentGateway + 'static,
{
    match service.render_report(&ApplicationId(application_id)) {
        Ok(report) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{REPORT_FILE_NAME}\""),
                ),
            ],
            report.to_text(),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

/// Body that failed to parse as the expected JSON shape.
pub(crate) fn rejection_response(rejection: JsonRejection) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        axum::Json(json!({ "error": rejection.body_text() })),
    )
        .into_response()
}

pub(crate) fn error_response(error: DossierError) -> Response {
    let status = match &error {
        DossierError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DossierError::Repository(RepositoryError::NotFound)
        | DossierError::Payment(PaymentError::UnknownIntent(_)) => StatusCode::NOT_FOUND,
        DossierError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        DossierError::PaymentRequired(_) => StatusCode::PAYMENT_REQUIRED,
        DossierError::PaymentNotConfirmed { .. }
        | DossierError::IntentMismatch { .. }
        | DossierError::Payment(PaymentError::InvalidAmount) => StatusCode::BAD_REQUEST,
        DossierError::Rates(_) => StatusCode::BAD_GATEWAY,
        DossierError::Repository(RepositoryError::Unavailable(_))
        | DossierError::Payment(PaymentError::Transport(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = match &error {
        DossierError::Repository(RepositoryError::NotFound) => "application not found".to_string(),
        other => other.to_string(),
    };

    (status, axum::Json(json!({ "error": message }))).into_response()
}
