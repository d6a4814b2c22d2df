use actix_web::{http::StatusCode, test::TestRequest};
use karban_sync_engine::SyncTarget;
use serde_json::{json, Value};

use super::helpers::{authorized, send_request};
use crate::{middleware::API_KEY_HEADER, routes::REQUEST_ID_HEADER, sync_worker::SyncJob};

fn order_payload() -> Value {
    json!({
        "code": "SO-7001",
        "status": "PROCESSING",
        "channel": "AMAZON_IN",
        "cod": true,
        "displayOrderDateTime": 1_710_545_400_000_i64,
        "saleOrderItems": [{ "code": "SOI-1", "itemSku": "SKU-RED", "sellingPrice": 499.0 }],
        "addresses": [{ "name": "Asha Rao", "country": "IN", "state": "KA" }]
    })
}

#[actix_web::test]
async fn health_needs_no_key() {
    let (status, body, _) = send_request(TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn force_sync_queues_a_forced_job() {
    let (status, body, mut jobs) = send_request(authorized(TestRequest::post().uri("/api/force_sync/Orders"))).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, r#"{"success":true,"message":"Orders sync has been queued"}"#);
    assert!(matches!(jobs.try_recv(), Ok(SyncJob::Forced(SyncTarget::Orders))));
    assert!(jobs.try_recv().is_err());
}

#[actix_web::test]
async fn force_sync_rejects_unknown_targets() {
    let (status, body, mut jobs) = send_request(authorized(TestRequest::post().uri("/api/force_sync/orders"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"success":false,"message":"Unknown method: orders"}"#);
    assert!(jobs.try_recv().is_err());
}

#[actix_web::test]
async fn force_sync_without_key_is_unauthorized() {
    let (status, _, mut jobs) = send_request(TestRequest::post().uri("/api/force_sync/Orders")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(jobs.try_recv().is_err());
}

#[actix_web::test]
async fn force_sync_with_wrong_key_is_forbidden() {
    let req = TestRequest::post().uri("/api/force_sync/Items").insert_header((API_KEY_HEADER, "guess"));
    let (status, _, mut jobs) = send_request(req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(jobs.try_recv().is_err());
}

#[actix_web::test]
async fn pushed_orders_are_queued_with_request_id() {
    let req = authorized(TestRequest::post().uri("/api/orders"))
        .insert_header((REQUEST_ID_HEADER, "req-123"))
        .set_json(order_payload());
    let (status, body, mut jobs) = send_request(req).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, r#"{"success":true,"message":"Order SO-7001 has been queued"}"#);
    match jobs.try_recv() {
        Ok(SyncJob::Materialize { order, request_id }) => {
            assert_eq!(order.code, "SO-7001");
            assert_eq!(request_id.as_deref(), Some("req-123"));
        },
        other => panic!("Unexpected job: {other:?}"),
    }
}

#[actix_web::test]
async fn pushed_orders_without_request_id() {
    let req = authorized(TestRequest::post().uri("/api/orders")).set_json(order_payload());
    let (status, _, mut jobs) = send_request(req).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(matches!(jobs.try_recv(), Ok(SyncJob::Materialize { request_id: None, .. })));
}

#[actix_web::test]
async fn invalid_orders_are_rejected_up_front() {
    let mut payload = order_payload();
    payload.as_object_mut().unwrap().remove("saleOrderItems");
    let req = authorized(TestRequest::post().uri("/api/orders")).set_json(payload);
    let (status, body, mut jobs) = send_request(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("saleOrderItems"), "{body}");
    assert!(jobs.try_recv().is_err());
}
