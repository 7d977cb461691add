use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use kinetic::serializer::FormQuerySerializer;
use kinetic::server::{AppState, router};
use serde_json::{Value, json};

const FORM: [(&str, &str); 7] = [
    ("_class_key", "Person"),
    ("_domain", "http://h/"),
    ("_path", "/api/"),
    ("_name_comp", "="),
    ("name", "Alice"),
    ("name", "Bob"),
    ("_limit", "10"),
];

const URL: &str = "http://h//api/Person/search/STRING/name%20%3D%20%22Alice%22/limit/10";

fn create_test_server(dry_run: bool) -> TestServer {
    let app = router(Arc::new(AppState { serializer: FormQuerySerializer::default(), dry_run }));
    TestServer::new(app).expect("Failed to create test server")
}

#[tokio::test]
async fn form_post_redirects() {
    let server = create_test_server(false);
    let response = server.post("/search").form(&FORM).await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), URL);
}

#[tokio::test]
async fn dry_run_reports_url() {
    let server = create_test_server(true);
    let response = server.post("/search").form(&FORM).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["dry_run"], true);
    assert_eq!(body["url"], URL);
}

#[tokio::test]
async fn missing_control_is_bad_request() {
    let server = create_test_server(false);
    let response = server
        .post("/search")
        .form(&[("_class_key", "Person"), ("name", "Alice")])
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().contains("_domain"));
    assert!(body.get("url").is_none());
}

#[tokio::test]
async fn redirect_to_invalid_url_is_bad_request() {
    let server = create_test_server(false);
    let response = server
        .post("/search")
        .form(&[("_class_key", "Per\nson"), ("_domain", "http://h/"), ("_path", "/api/")])
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().contains("Location"));
}

#[tokio::test]
async fn json_endpoint_returns_url() {
    let server = create_test_server(false);
    let form = json!({"fields": [
        {"name": "_class_key", "value": "Person"},
        {"name": "_domain", "value": "http://h/"},
        {"name": "_path", "value": "/api/"},
        {"name": "_order_by", "value": "name"},
        {"name": "_sort_order", "value": "desc"}
    ]});
    let response = server.post("/v1/url").json(&form).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["dry_run"], false);
    assert_eq!(body["url"], "http://h//api/Person/search/STRING/null/order_by/name/sort_order/desc");
}
