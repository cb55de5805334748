use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::dossier::repository::{DossierRepository, PaymentStatus};
use crate::dossier::router::{dossier_handler, evaluate_handler, refresh_rates_handler};
use crate::dossier::DossierService;
use crate::rates::StaticRateProvider;
use crate::scoring::ScoringConfig;

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

#[tokio::test]
async fn evaluate_route_returns_scoring_result() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let body = serde_json::to_value(application()).expect("serialize application");
    let response = router
        .oneshot(post_json("/api/evaluate", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["feasibility_score"], json!(40));
    assert_eq!(payload["status"], json!("difficult"));
    assert_eq!(payload["rate_source"], json!("seloger.com"));
    assert_eq!(payload["current_interest_rate"], json!(0.0316));
    assert_eq!(
        payload["criteria_details"]
            .as_array()
            .map(|details| details.len()),
        Some(5)
    );
    assert!(payload["application_id"].as_str().is_some());
}

#[tokio::test]
async fn evaluate_route_accepts_french_enum_labels() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let mut body = serde_json::to_value(application()).expect("serialize application");
    body["project"]["property_type"] = json!("ancien");
    body["household"]["main_borrower"]["employment"]["status"] = json!("cdi");
    body["housing"]["current_status"] = json!("locataire");

    let response = router
        .oneshot(post_json("/api/evaluate", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn evaluate_route_reports_unreadable_payload_as_json() {
    let (service, repository, _) = build_service();
    let router = router_with_service(service);

    let mut body = serde_json::to_value(application()).expect("serialize application");
    body["project"]["property_type"] = json!("castle");

    let response = router
        .oneshot(post_json("/api/evaluate", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("property_type"));
    assert_eq!(repository.count().expect("count"), 0);
}

#[tokio::test]
async fn payment_routes_report_missing_fields_as_json() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    for uri in ["/api/payment/create-intent", "/api/payment/confirm"] {
        let response = router
            .clone()
            .oneshot(post_json(uri, &json!({ "amount": 4900 })))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        let payload = read_json_body(response).await;
        assert!(payload["error"]
            .as_str()
            .unwrap_or_default()
            .contains("application_id"));
    }
}

#[tokio::test]
async fn evaluate_handler_returns_unprocessable_for_invalid_input() {
    let (service, _, _) = build_service();

    let response =
        evaluate_handler(State(Arc::new(service)), Ok(axum::Json(invalid_application()))).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("project.loan_duration"));
}

#[tokio::test]
async fn evaluate_handler_returns_internal_error_on_repository_failure() {
    let service = DossierService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryGateway::default()),
        rate_table(),
        Arc::new(StaticRateProvider::default()),
        ScoringConfig::default(),
    );

    let response =
        evaluate_handler(State(Arc::new(service)), Ok(axum::Json(application()))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn rates_route_lists_every_bucket() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/rates"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["rates"]["20"], json!(0.0316));
    assert_eq!(payload["rates"]["30"], json!(0.034));
    assert_eq!(payload["source"], json!("seloger.com"));
}

#[tokio::test]
async fn refresh_handler_reports_failure_and_current_snapshot() {
    let (service, _, _) = build_service_with_provider(Arc::new(OfflineProvider));

    let response = refresh_rates_handler(State(Arc::new(service))).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], json!("unchanged"));
    assert_eq!(payload["rates"]["source"], json!("seloger.com"));
}

#[tokio::test]
async fn refresh_route_installs_new_snapshot() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json("/api/rates/refresh", &json!({})))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], json!("updated"));
}

#[tokio::test]
async fn create_intent_route_returns_client_secret() {
    let (service, _, _) = build_service();
    let scoring = service.evaluate(application()).expect("evaluation succeeds");
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/payment/create-intent",
            &json!({ "application_id": scoring.application_id }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["amount"], json!(9_900));
    assert_eq!(payload["payment_intent_id"], json!("pi_test_1"));
    assert_eq!(payload["client_secret"], json!("pi_test_1_secret"));
}

#[tokio::test]
async fn create_intent_route_returns_not_found_for_unknown_application() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/payment/create-intent",
            &json!({ "application_id": "missing" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("application not found"));
}

#[tokio::test]
async fn confirm_route_rejects_pending_payment() {
    let (service, _, _) = build_service();
    let scoring = service.evaluate(application()).expect("evaluation succeeds");
    let intent = service
        .create_payment_intent(&scoring.application_id, None)
        .expect("intent created");
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/payment/confirm",
            &json!({
                "application_id": scoring.application_id,
                "payment_intent_id": intent.id,
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn confirm_route_unlocks_dossier() {
    let (service, _, gateway) = build_service();
    let scoring = service.evaluate(application()).expect("evaluation succeeds");
    let intent = service
        .create_payment_intent(&scoring.application_id, None)
        .expect("intent created");
    gateway.settle(&intent.id, PaymentStatus::Succeeded);
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/payment/confirm",
            &json!({
                "application_id": scoring.application_id,
                "payment_intent_id": intent.id,
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["status"], json!("success"));

    let response = router
        .oneshot(get(&format!("/api/dossier/{}", scoring.application_id)))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["report_available"], json!(true));
    assert_eq!(payload["scoring"]["feasibility_score"], json!(40));
}

#[tokio::test]
async fn dossier_handler_requires_payment() {
    let (service, _, _) = build_service();
    let scoring = service.evaluate(application()).expect("evaluation succeeds");

    let response = dossier_handler(
        State(Arc::new(service)),
        Path(scoring.application_id.to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
}

#[tokio::test]
async fn dossier_handler_returns_not_found_for_unknown_id() {
    let (service, _, _) = build_service();

    let response = dossier_handler(State(Arc::new(service)), Path("nope".to_string())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn report_route_serves_text_attachment() {
    let (service, _, gateway) = build_service();
    let (id, _) = paid_dossier(&service, &gateway);
    let router = router_with_service(service);

    let response = router
        .oneshot(get(&format!("/api/dossier/{id}/report")))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok()),
        Some("attachment; filename=\"dossier_pret_immobilier.txt\"")
    );
    let text = read_text_body(response).await;
    assert!(text.contains("MORTGAGE LOAN DOSSIER"));
    assert!(text.contains("Page 1/1"));
}
