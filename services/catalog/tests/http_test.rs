//! HTTP 层：令牌解析、状态码与 Problem Details

mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use vnm_auth_core::{Principal, TokenService};

use catalog::api::http::{AppState, router};
use common::*;

const SECRET: &str = "test-secret-at-least-32-bytes-long!!";

fn tokens() -> TokenService {
    TokenService::new(SECRET, 3600, "vnmarket".to_string(), "vnmarket-api".to_string())
}

fn app() -> Router {
    let catalog = TestCatalog::new();
    router(AppState::new(Arc::new(catalog.app), tokens()))
}

fn bearer(principal: &Principal) -> String {
    let token = tokens().generate_access_token(principal).unwrap();
    format!("Bearer {}", token)
}

fn json_request(method: &str, uri: &str, auth: Option<String>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn new_product(vendor_id: i64) -> Value {
    json!({
        "vendorId": vendor_id,
        "name": "Nước mắm Phú Quốc",
        "prices": [{ "amount": 120000, "currency": "VND" }],
        "variants": [{ "sku": "NM-500", "attributes": { "volume": "500ml" }, "stock": 40 }],
        "submitForReview": true
    })
}

#[tokio::test]
async fn test_invalid_token_is_401() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/api/products",
            Some("Bearer not-a-jwt".to_string()),
            new_product(101),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
}

#[tokio::test]
async fn test_vendor_creates_product() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/api/products",
            Some(bearer(&vendor_principal(101))),
            new_product(101),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["status"], "Pending");
    assert_eq!(body["statusCode"], 4);
    assert_eq!(body["slug"], "nuoc-mam-phu-quoc");
    assert_eq!(body["variants"][0]["sku"], "NM-500");
}

#[tokio::test]
async fn test_forbidden_is_problem_details() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/api/products",
            Some(bearer(&vendor_principal(101))),
            new_product(202),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["status"], 403);
    assert_eq!(body["title"], "Forbidden");
}

#[tokio::test]
async fn test_validation_errors_listed_in_body() {
    let mut product = new_product(101);
    product["name"] = json!("");
    product["prices"] = json!([]);

    let response = app()
        .oneshot(json_request(
            "POST",
            "/api/products",
            Some(bearer(&vendor_principal(101))),
            product,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let fields: Vec<_> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, ["name", "prices"]);
}

#[tokio::test]
async fn test_unknown_status_in_body_is_problem_details() {
    let response = app()
        .oneshot(json_request(
            "PUT",
            "/api/products/1/status",
            Some(bearer(&admin_principal())),
            json!({ "newStatus": "Bogus" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
    let body = body_json(response).await;
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_malformed_body_is_problem_details() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/products")
                .header(header::AUTHORIZATION, bearer(&vendor_principal(101)))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"vendorId\": 101,"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
}

#[tokio::test]
async fn test_body_without_json_content_type_is_400() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/products")
                .header(header::AUTHORIZATION, bearer(&vendor_principal(101)))
                .body(Body::from(new_product(101).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Validation Error");
}

#[tokio::test]
async fn test_unknown_product_is_404() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/products/999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_status_over_http() {
    let catalog = TestCatalog::new();
    catalog.create(101, "Cà phê", true).await;
    catalog.create(101, "Hạt điều", true).await;
    let app = router(AppState::new(Arc::new(catalog.app), tokens()));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/products/bulk-status",
            Some(bearer(&admin_principal())),
            json!({ "productIds": [1, 2, 999], "newStatus": 1 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["updatedCount"], 2);
    assert_eq!(body["failedCount"], 1);
    assert_eq!(body["failedProductIds"], json!([999]));
}

#[tokio::test]
async fn test_public_listing_needs_no_token() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/products?page=1&pageSize=10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["pageSize"], 10);
}
