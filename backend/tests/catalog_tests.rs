//! Catalog edit tests
//!
//! Catalog edits share the part row with the ledger; an edit that does not
//! name `stok` must never roll a committed stock change back.

mod common;

use std::time::Duration;

use serde_json::json;

use parts_admin::services::CatalogService;
use shared::UpdatePartInput;

use common::{movement_count, seed_part, stock_of, test_pool, unique_code};

#[tokio::test]
#[ignore] // Requires database connection
async fn test_rename_waits_for_inflight_adjustment() {
    let pool = test_pool().await;
    let part = seed_part(&pool, &unique_code("CAT"), 10).await;

    // An adjustment in flight: row locked, stock written, movement appended
    let mut tx = pool.begin().await.unwrap();
    sqlx::query("SELECT stock FROM spareparts WHERE id = $1 FOR UPDATE")
        .bind(part)
        .execute(&mut *tx)
        .await
        .unwrap();
    sqlx::query("UPDATE spareparts SET stock = 2 WHERE id = $1")
        .bind(part)
        .execute(&mut *tx)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO stock_movements (sparepart_id, movement_type, quantity) VALUES ($1, 'OUT', 8)",
    )
    .bind(part)
    .execute(&mut *tx)
    .await
    .unwrap();

    let catalog = CatalogService::new(pool.clone());
    let rename: UpdatePartInput = serde_json::from_value(json!({"nama_part": "Renamed"})).unwrap();
    let edit = tokio::spawn(async move { catalog.update(part, rename).await });

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!edit.is_finished());
    tx.commit().await.unwrap();

    let updated = edit.await.unwrap().unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.stock, 2);
    assert_eq!(stock_of(&pool, part).await, 2);
    assert_eq!(movement_count(&pool, part).await, 1);
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_update_clears_category_on_null() {
    let pool = test_pool().await;
    let part = seed_part(&pool, &unique_code("CAT"), 1).await;
    let catalog = CatalogService::new(pool.clone());

    let category: i64 = sqlx::query_scalar("SELECT id FROM categories ORDER BY id LIMIT 1")
        .fetch_one(&pool)
        .await
        .unwrap();

    let set: UpdatePartInput = serde_json::from_value(json!({"kategori_id": category})).unwrap();
    assert_eq!(catalog.update(part, set).await.unwrap().category_id, Some(category));

    let keep: UpdatePartInput = serde_json::from_value(json!({"deskripsi": "Baru"})).unwrap();
    assert_eq!(catalog.update(part, keep).await.unwrap().category_id, Some(category));

    let clear: UpdatePartInput = serde_json::from_value(json!({"kategori_id": null})).unwrap();
    let cleared = catalog.update(part, clear).await.unwrap();
    assert_eq!(cleared.category_id, None);
    assert_eq!(cleared.category_name, None);
}
