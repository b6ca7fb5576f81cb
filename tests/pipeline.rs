//! In-process tests of the authenticated render pipeline.

use axum::{
    body::Body,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        Method, Request, StatusCode,
    },
};
use std::sync::atomic::Ordering;
use tower::ServiceExt;

use mathyd::http::{ErrorEnvelope, RenderResponse, X_REQUEST_ID};

mod common;
use common::{body_string, config_with_key, put_with_code, signed_put, stub_router, KEY};

#[tokio::test]
async fn test_valid_request_renders() {
    let (router, engine) = stub_router(config_with_key(KEY));

    let response = router
        .oneshot(signed_put(KEY, r#"{"type":"svg","tex":"x=1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    let body: RenderResponse = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body.svg, r#"<svg data-display="true" data-width="1024">x=1</svg>"#);
    assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_options_reach_engine() {
    let (router, _) = stub_router(config_with_key(KEY));

    let response = router
        .oneshot(signed_put(KEY, r#"{"type":"svg","tex":"y","inline":true,"width":300}"#))
        .await
        .unwrap();

    let body: RenderResponse = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body.svg, r#"<svg data-display="false" data-width="300">y</svg>"#);
}

#[tokio::test]
async fn test_documented_vector_passes_integrity_then_fails_type() {
    let (router, engine) = stub_router(config_with_key("secret"));

    let response = router
        .oneshot(put_with_code(
            "{}",
            "77325902caca812dc259733aacd046b73817372c777b8d95b402647474516e13",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_string(response).await, "invalid type");
    assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_wrong_code_is_rejected_regardless_of_body() {
    for body in [r#"{"type":"svg","tex":"x=1"}"#, "{}", "not json", ""] {
        let (router, engine) = stub_router(config_with_key(KEY));

        let response = router.oneshot(signed_put("other-key", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "body {:?}", body);
        let envelope: ErrorEnvelope = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(envelope.error, "hmac mismatch");
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn test_missing_header_is_rejected() {
    let (router, _) = stub_router(config_with_key(KEY));

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/")
        .body(Body::from(r#"{"type":"svg","tex":"x=1"}"#))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let envelope: ErrorEnvelope = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(envelope.error, "hmac mismatch");
}

#[tokio::test]
async fn test_empty_key_rejects_everything() {
    let (router, engine) = stub_router(config_with_key(""));

    let response = router
        .oneshot(signed_put("", r#"{"type":"svg","tex":"x=1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let envelope: ErrorEnvelope = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(envelope.error, "hmac key not set");
    assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_tex() {
    let (router, _) = stub_router(config_with_key(KEY));

    let response = router.oneshot(signed_put(KEY, r#"{"type":"svg"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_string(response).await, "missing tex");
}

#[tokio::test]
async fn test_invalid_type() {
    let (router, _) = stub_router(config_with_key(KEY));

    let response = router
        .oneshot(signed_put(KEY, r#"{"type":"png","tex":"x=1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_string(response).await, "invalid type");
}

#[tokio::test]
async fn test_verified_malformed_json_is_json_500() {
    let (router, _) = stub_router(config_with_key(KEY));

    let response = router.oneshot(signed_put(KEY, r#"{"type":"svg","#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    let envelope: ErrorEnvelope = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(!envelope.error.is_empty());
    assert_ne!(envelope.error, "hmac mismatch");
}

#[tokio::test]
async fn test_engine_failure_carries_message() {
    let (router, _) = stub_router(config_with_key(KEY));

    let response = router
        .oneshot(signed_put(KEY, r#"{"type":"svg","tex":"\\invalid"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let envelope: ErrorEnvelope = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(envelope.error, r"Undefined control sequence: \invalid");
}

#[tokio::test]
async fn test_repeated_requests_render_independently() {
    let (router, engine) = stub_router(config_with_key(KEY));
    let body = r#"{"type":"svg","tex":"a+b"}"#;

    let first = router.clone().oneshot(signed_put(KEY, body)).await.unwrap();
    let second = router.oneshot(signed_put(KEY, body)).await.unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_string(first).await, body_string(second).await);
    assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_oversized_body_is_refused() {
    let mut config = config_with_key(KEY);
    config.limits.max_body_bytes = 64;
    let (router, engine) = stub_router(config);

    let tex = "x".repeat(128);
    let response = router
        .oneshot(signed_put(KEY, &format!(r#"{{"type":"svg","tex":"{}"}}"#, tex)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let envelope: ErrorEnvelope = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(envelope.error, "request body too large");
    assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_declared_oversized_length_gets_envelope() {
    let mut config = config_with_key(KEY);
    config.limits.max_body_bytes = 64;
    let (router, engine) = stub_router(config);

    let body = format!(r#"{{"type":"svg","tex":"{}"}}"#, "x".repeat(128));
    let mut request = signed_put(KEY, &body);
    request
        .headers_mut()
        .insert(CONTENT_LENGTH, body.len().to_string().parse().unwrap());
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    let envelope: ErrorEnvelope = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(envelope.error, "request body too large");
    assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_help_page() {
    let (router, _) = stub_router(config_with_key(KEY));

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("x-mathyd-hmac-sha256"));
}

#[tokio::test]
async fn test_health_reports_key_state() {
    let (router, _) = stub_router(config_with_key(""));

    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["hmac_key_configured"], false);
}

#[tokio::test]
async fn test_request_id_is_generated_and_echoed() {
    let (router, _) = stub_router(config_with_key(KEY));

    let generated = router
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(generated.headers().contains_key(X_REQUEST_ID));

    let echoed = router
        .oneshot(
            Request::get("/")
                .header(X_REQUEST_ID, "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(echoed.headers()[X_REQUEST_ID], "req-42");
}

#[tokio::test]
async fn test_unsupported_method() {
    let (router, _) = stub_router(config_with_key(KEY));

    let response = router
        .oneshot(Request::post("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
