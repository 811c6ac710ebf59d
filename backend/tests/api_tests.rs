//! Gateway tests
//!
//! Every request here is rejected before any query runs, so the router is
//! driven over a lazily-connected pool and no database is needed.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use proptest::prelude::*;
use serde_json::json;

use common::{json_request, lazy_app, send, INTERNAL_TOKEN};

// ============================================================================
// Routing envelopes
// ============================================================================

#[tokio::test]
async fn test_unknown_route_is_enveloped_404() {
    for uri in ["/nope", "/admin-api/nope"] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(lazy_app(), request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Endpoint not found");
    }
}

#[tokio::test]
async fn test_wrong_method_is_enveloped_405() {
    let request = Request::builder()
        .method("GET")
        .uri("/admin-api/login")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "METHOD_NOT_ALLOWED");
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_protected_route_requires_auth() {
    let request = Request::builder()
        .uri("/admin-api/dashboard")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_wrong_internal_token_rejected() {
    let request = Request::builder()
        .uri("/admin-api/categories")
        .header("x-internal-token", "not-the-token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_bearer_rejected() {
    let request = Request::builder()
        .uri("/admin-api/categories")
        .header("authorization", "Bearer not.a.jwt")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_requires_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/admin-api/login")
        .body(Body::from("username=admin&password=admin123"))
        .unwrap();
    let (status, body) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["code"], "UNSUPPORTED_MEDIA_TYPE");
}

#[tokio::test]
async fn test_login_missing_fields() {
    let payloads = [
        json!({}),
        json!({"username": "admin"}),
        json!({"username": "  ", "password": "x"}),
    ];
    for payload in payloads {
        let request = json_request("POST", "/admin-api/login", payload);
        let (status, body) = send(lazy_app(), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], "error");
    }
}

#[tokio::test]
async fn test_logout_without_session_succeeds() {
    let request = Request::builder()
        .method("POST")
        .uri("/admin-api/logout")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
}

// ============================================================================
// Validation before the store is touched
// ============================================================================

#[tokio::test]
async fn test_stock_adjustment_invalid_type() {
    let request = json_request(
        "POST",
        "/admin-api/spareparts/1/stock",
        json!({"quantity": 3, "type": "SIDEWAYS"}),
    );
    let (status, body) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "type");
}

#[tokio::test]
async fn test_stock_adjustment_needs_acting_admin() {
    let request = json_request(
        "POST",
        "/admin-api/spareparts/1/stock",
        json!({"quantity": 3, "type": "IN"}),
    );
    let (status, body) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "x-admin-id");
}

#[tokio::test]
async fn test_non_numeric_part_id_is_unknown_route() {
    let request = json_request(
        "POST",
        "/admin-api/spareparts/abc/stock",
        json!({"quantity": 3, "type": "IN"}),
    );
    let (status, body) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Endpoint not found");
}

#[tokio::test]
async fn test_sales_with_empty_items() {
    let request = json_request("POST", "/admin-api/sales", json!({"items": []}));
    let (status, body) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "items");
}

#[tokio::test]
async fn test_sales_without_items_key() {
    let request = json_request("POST", "/admin-api/sales", json!({"customer_name": "Budi"}));
    let (status, _) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_part_missing_name() {
    let request = json_request(
        "POST",
        "/admin-api/spareparts",
        json!({"kode_part": "06455-KVB-901", "harga": 125000}),
    );
    let (status, body) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Field nama_part is required");
}

#[tokio::test]
async fn test_part_detail_requires_code() {
    let request = common::internal_get("/admin-api/spareparts/detail?kode_part=%20");
    let (status, body) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "kode_part");
}

#[tokio::test]
async fn test_verification_check_requires_code() {
    let request = json_request("POST", "/admin-api/verification/check", json!({"kode_part": ""}));
    let (status, _) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_manual_log_requires_valid_status() {
    let request = json_request(
        "POST",
        "/admin-api/verification/log",
        json!({"kode_part": "ABC", "status": "PALSU"}),
    );
    let (status, body) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Part code and log status must be valid");
}

#[tokio::test]
async fn test_upload_requires_multipart() {
    let request = json_request("POST", "/admin-api/training-images/upload", json!({}));
    let (status, _) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_upload_requires_label() {
    let boundary = "XBOUNDARY";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"kode_part\"\r\n\r\nK1\r\n--{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/admin-api/training-images/upload")
        .header("content-type", format!("multipart/form-data; boundary={}", boundary))
        .header("x-internal-token", INTERNAL_TOKEN)
        .body(Body::from(body))
        .unwrap();
    let (status, body) = send(lazy_app(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "label");
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Non-positive quantities never reach the ledger
    #[test]
    fn prop_non_positive_quantity_rejected(quantity in -1_000i64..=0, out in any::<bool>()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let kind = if out { "OUT" } else { "IN" };
        let request = json_request(
            "POST",
            "/admin-api/spareparts/1/stock",
            json!({"quantity": quantity, "type": kind}),
        );
        let (status, body) = runtime.block_on(async { send(lazy_app(), request).await });

        prop_assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        prop_assert_eq!(body["field"].as_str(), Some("quantity"));
    }
}
