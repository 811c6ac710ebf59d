//! Stock ledger tests
//!
//! Stock levels and the movement trail must move together, and an OUT may
//! never take a part below zero, even under concurrent adjusters.

mod common;

use parts_admin::{error::AppError, services::LedgerService};
use shared::{StockAdjustment, StockDirection};

use common::{movement_count, seed_admin, seed_part, stock_of, test_pool, unique_code};

fn out(quantity: i64) -> StockAdjustment {
    StockAdjustment::new(quantity, StockDirection::Out, None).unwrap()
}

fn inbound(quantity: i64) -> StockAdjustment {
    StockAdjustment::new(quantity, StockDirection::In, Some("restock".to_string())).unwrap()
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_out_until_insufficient() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool).await;
    let part = seed_part(&pool, &unique_code("LDG"), 5).await;
    let ledger = LedgerService::new(pool.clone());

    let outcome = ledger.adjust_stock(part, admin, &out(3)).await.unwrap();
    assert_eq!(outcome.stock, 2);
    assert_eq!(outcome.movement.movement_type, "OUT");
    assert_eq!(outcome.movement.quantity, 3);
    assert_eq!(outcome.movement.admin_id, Some(admin));
    assert_eq!(stock_of(&pool, part).await, 2);
    assert_eq!(movement_count(&pool, part).await, 1);

    let err = ledger.adjust_stock(part, admin, &out(3)).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::InsufficientStock {
            available: 2,
            requested: 3
        }
    ));
    assert_eq!(stock_of(&pool, part).await, 2);
    assert_eq!(movement_count(&pool, part).await, 1);
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_each_adjustment_appends_one_movement() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool).await;
    let part = seed_part(&pool, &unique_code("LDG"), 0).await;
    let ledger = LedgerService::new(pool.clone());

    let steps = [inbound(10), out(4), inbound(1), out(7)];
    let mut expected = 0;
    for (index, step) in steps.iter().enumerate() {
        let outcome = ledger.adjust_stock(part, admin, step).await.unwrap();
        expected = step.direction.apply(expected, step.quantity).unwrap();

        assert_eq!(outcome.stock, expected);
        assert_eq!(stock_of(&pool, part).await, expected);
        assert_eq!(movement_count(&pool, part).await, index as i64 + 1);
    }
    assert_eq!(expected, 0);
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_concurrent_outs_cannot_overspend() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool).await;
    let part = seed_part(&pool, &unique_code("LDG"), 10).await;
    let first = LedgerService::new(pool.clone());
    let second = LedgerService::new(pool.clone());
    let adjustment = out(8);

    let (a, b) = tokio::join!(
        first.adjust_stock(part, admin, &adjustment),
        second.adjust_stock(part, admin, &adjustment),
    );

    let (ok, err) = match (a, b) {
        (Ok(ok), Err(err)) | (Err(err), Ok(ok)) => (ok, err),
        (a, b) => panic!(
            "expected exactly one failure, got {:?} and {:?}",
            a.is_ok(),
            b.is_ok()
        ),
    };
    assert_eq!(ok.stock, 2);
    assert!(matches!(
        err,
        AppError::InsufficientStock {
            available: 2,
            requested: 8
        }
    ));
    assert_eq!(stock_of(&pool, part).await, 2);
    assert_eq!(movement_count(&pool, part).await, 1);
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_unknown_part_writes_nothing() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool).await;
    let ledger = LedgerService::new(pool.clone());

    let err = ledger.adjust_stock(i64::MAX, admin, &inbound(1)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(movement_count(&pool, i64::MAX).await, 0);
}
