use goods_client::{Api, ClientError, HttpTransport, RequestOverride, RetryPolicy};
use httpmock::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

fn enveloped_api(server: &MockServer) -> Api {
    let transport =
        HttpTransport::enveloped(server.url("/api")).with_retry(RetryPolicy::disabled());
    Api::new("reports", Arc::new(transport))
}

fn legacy_api(server: &MockServer) -> Api {
    let transport =
        HttpTransport::pass_through(server.url("/api")).with_retry(RetryPolicy::disabled());
    Api::new("reports", Arc::new(transport))
}

#[tokio::test]
async fn test_success_envelope_returns_data_only() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/reports");
            then.status(200)
                .json_body(json!({"success": true, "data": [{"id": 1}, {"id": 2}]}));
        })
        .await;

    let data: Value = enveloped_api(&server)
        .get(RequestOverride::new())
        .await
        .unwrap();

    assert_eq!(data, json!([{"id": 1}, {"id": 2}]));
}

#[tokio::test]
async fn test_failure_envelope_raises_server_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/reports/7/build");
            then.status(200)
                .json_body(json!({"success": false, "message": "boom"}));
        })
        .await;

    let result = enveloped_api(&server)
        .post::<Value, _>(
            &json!({"format": "docx"}),
            RequestOverride::new().sub_id("7").method_name("build"),
        )
        .await;

    match result {
        Err(ClientError::Application { message }) => assert_eq!(message, "boom"),
        other => panic!("expected application failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_json_blob_with_failure_envelope_fails_download() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/reports/7/file");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"success":false,"message":"report not ready"}"#);
        })
        .await;

    let result = enveloped_api(&server)
        .download(RequestOverride::new().sub_id("7").method_name("file"))
        .await;

    assert!(matches!(
        result,
        Err(ClientError::Application { ref message }) if message == "report not ready"
    ));
}

#[tokio::test]
async fn test_binary_download_passes_through_envelope_mode() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/reports/7/file");
            then.status(200)
                .header(
                    "content-type",
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                )
                .body(b"PK\x03\x04docx".to_vec());
        })
        .await;

    let blob = enveloped_api(&server)
        .download(RequestOverride::new().sub_id("7").method_name("file"))
        .await
        .unwrap();

    assert_eq!(blob.data, b"PK\x03\x04docx".to_vec());
}

#[tokio::test]
async fn test_bad_request_carries_server_payload() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/reports/7/chat");
            then.status(400)
                .json_body(json!({"detail": "question is required"}));
        })
        .await;

    let result = enveloped_api(&server)
        .post::<Value, _>(
            &json!({"question": ""}),
            RequestOverride::new().sub_id("7").method_name("chat"),
        )
        .await;

    match result {
        Err(ClientError::BadRequest { payload, url }) => {
            assert_eq!(payload, json!({"detail": "question is required"}));
            assert_eq!(url, "reports/7/chat");
        }
        other => panic!("expected bad request, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_propagates_unmodified() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/reports");
            then.status(503).body("maintenance");
        })
        .await;

    let result = enveloped_api(&server)
        .get::<Value>(RequestOverride::new())
        .await;

    assert!(matches!(
        result,
        Err(ClientError::Status { status: 503, ref body, .. }) if body == "maintenance"
    ));
}

#[tokio::test]
async fn test_pass_through_mode_returns_raw_body() {
    let server = MockServer::start_async().await;
    let raw = json!({"success": false, "message": "ignored by legacy endpoints"});
    let body = raw.clone();
    server
        .mock_async(move |when, then| {
            when.method(GET).path("/api/reports");
            then.status(200).json_body(body);
        })
        .await;

    let data: Value = legacy_api(&server)
        .get(RequestOverride::new())
        .await
        .unwrap();

    assert_eq!(data, raw);
}
