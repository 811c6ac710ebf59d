//! Shared helpers for the integration tests

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tower::ServiceExt;

use parts_admin::{create_app, AppState, Config};

pub const INTERNAL_TOKEN: &str = "test-internal-token";

/// Router over a pool that never connects unless a query runs
pub fn lazy_app() -> Router {
    let config = Config::for_tests();
    let db = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy(&config.database.url)
        .expect("valid database url");
    create_app(AppState::new(db, config))
}

/// Connected, migrated pool from `DATABASE_URL`
pub async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await
        .expect("database reachable");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations apply");
    pool
}

pub fn app_with(pool: PgPool) -> Router {
    create_app(AppState::new(pool, Config::for_tests()))
}

/// Part code unique to one test run
pub fn unique_code(prefix: &str) -> String {
    format!("{}-{}", prefix, shared::random_hex_suffix().to_uppercase())
}

pub async fn seed_admin(pool: &PgPool) -> i64 {
    let username = format!("admin-{}", shared::random_hex_suffix());
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO admins (username, password_hash, display_name) VALUES ($1, 'x', 'Test Admin') RETURNING id",
    )
    .bind(username)
    .fetch_one(pool)
    .await
    .expect("admin inserted")
}

pub async fn seed_part(pool: &PgPool, code: &str, stock: i64) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO spareparts (part_code, name, price, stock) VALUES ($1, 'Test Part', $2, $3) RETURNING id",
    )
    .bind(code)
    .bind(Decimal::new(45_000, 0))
    .bind(stock)
    .fetch_one(pool)
    .await
    .expect("part inserted")
}

pub async fn stock_of(pool: &PgPool, part_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT stock FROM spareparts WHERE id = $1")
        .bind(part_id)
        .fetch_one(pool)
        .await
        .expect("part exists")
}

pub async fn movement_count(pool: &PgPool, part_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stock_movements WHERE sparepart_id = $1")
        .bind(part_id)
        .fetch_one(pool)
        .await
        .expect("count")
}

/// Send a request and decode the JSON body (Null when empty)
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-internal-token", INTERNAL_TOKEN)
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub fn internal_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-internal-token", INTERNAL_TOKEN)
        .body(Body::empty())
        .expect("valid request")
}
