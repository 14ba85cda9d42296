use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, app_with, MockConfig, Plan};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(String::new()).unwrap())
        .await
        .unwrap()
}

fn assert_error(body: &Value, code: u64, kind: &str) {
    assert_eq!(body["success"], false, "{body}");
    assert_eq!(body["error"]["code"], code, "{body}");
    assert_eq!(body["error"]["type"], kind, "{body}");
}

// --- authentication ---

#[tokio::test]
async fn missing_key_is_reported_in_body() {
    let resp = get(app(), "/134.201.250.155").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_error(&body_json(resp).await, 101, "missing_access_key");
}

#[tokio::test]
async fn wrong_key_is_invalid_access_key() {
    let resp = get(app(), "/134.201.250.155?access_key=nope").await;
    assert_error(&body_json(resp).await, 101, "invalid_access_key");
}

// --- lookup ---

#[tokio::test]
async fn lookup_returns_success_shape_without_flag() {
    let resp = get(app(), "/134.201.250.155?access_key=test-key").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body.get("success").is_none());
    assert_eq!(body["ip"], "134.201.250.155");
    assert_eq!(body["city"], "Los Angeles");
    assert_eq!(body["location"]["geoname_id"], 5368361);
    assert!(body.get("security").is_none());
    assert_eq!(body["connection"]["asn"], 25876);
}

#[tokio::test]
async fn domain_targets_are_resolved() {
    let resp = get(app(), "/dns.google?access_key=test-key&hostname=1").await;
    let body = body_json(resp).await;
    assert_eq!(body["ip"], "8.8.8.8");
    assert_eq!(body["hostname"], "dns.google");
}

#[tokio::test]
async fn unknown_target_is_not_found() {
    let resp = get(app(), "/no-such-host.invalid?access_key=test-key").await;
    assert_error(&body_json(resp).await, 404, "404_not_found");
}

#[tokio::test]
async fn ipv6_lookup_reports_type() {
    let resp = get(app(), "/2001:db8::1?access_key=test-key").await;
    let body = body_json(resp).await;
    assert_eq!(body["type"], "ipv6");
    assert!(body["city"].is_null());
}

// --- modules ---

#[tokio::test]
async fn security_module_only_when_requested() {
    let resp = get(app(), "/185.220.101.1?access_key=test-key&security=1").await;
    let body = body_json(resp).await;
    assert_eq!(body["security"]["is_tor"], true);
    assert_eq!(body["security"]["threat_level"], "high");
}

#[tokio::test]
async fn free_plan_omits_modules_and_rejects_security() {
    let config = MockConfig {
        access_key: "free".to_string(),
        plan: Plan::Free,
    };

    let resp = get(app_with(config.clone()), "/8.8.8.8?access_key=free").await;
    let body = body_json(resp).await;
    assert!(body.get("time_zone").is_none());
    assert!(body.get("currency").is_none());
    assert!(body.get("connection").is_none());

    let resp = get(app_with(config), "/8.8.8.8?access_key=free&security=1").await;
    assert_error(&body_json(resp).await, 105, "function_access_restricted");
}

// --- fields and language ---

#[tokio::test]
async fn fields_filter_trims_payload() {
    let resp = get(
        app(),
        "/134.201.250.155?access_key=test-key&fields=ip,location.capital",
    )
    .await;
    let body = body_json(resp).await;
    let object = body.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert_eq!(body["ip"], "134.201.250.155");
    assert_eq!(body["location"], serde_json::json!({ "capital": "Washington D.C." }));
}

#[tokio::test]
async fn unknown_field_is_invalid_fields() {
    let resp = get(app(), "/8.8.8.8?access_key=test-key&fields=ip,shoe_size").await;
    assert_error(&body_json(resp).await, 301, "invalid_fields");
}

#[tokio::test]
async fn unsupported_language_is_rejected() {
    let resp = get(app(), "/8.8.8.8?access_key=test-key&language=xx").await;
    assert_error(&body_json(resp).await, 103, "invalid_api_function");

    let resp = get(app(), "/8.8.8.8?access_key=test-key&language=pt-br").await;
    assert_eq!(body_json(resp).await["ip"], "8.8.8.8");
}

// --- redirects ---

#[tokio::test]
async fn moved_route_redirects_with_empty_body() {
    let resp = get(app(), "/moved/8.8.8.8?access_key=test-key").await;

    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(resp.headers()[header::LOCATION], "/8.8.8.8");
    assert!(body_bytes(resp).await.is_empty());
}
