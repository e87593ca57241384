//! Deliver transition
//!
//! Confirms delivery of a paid order. No inventory effect.

use super::FulfillmentError;
use crate::db::repository::order;
use shared::models::Order;
use sqlx::SqlitePool;

/// Execute the deliver transition: `Paid(undelivered) → Paid(delivered)`.
///
/// Delivery is only meaningful for a paid order; unpaid orders are
/// rejected with a precondition error rather than silently marked.
pub async fn deliver_order(pool: &SqlitePool, order_id: i64) -> Result<Order, FulfillmentError> {
    // 1. Conditional flip: only a paid, undelivered order transitions.
    //    Race-free - concurrent confirmations see rows_affected == 0.
    let flipped = sqlx::query(
        "UPDATE orders SET is_delivered = 1 WHERE id = ? AND is_paid = 1 AND is_delivered = 0",
    )
    .bind(order_id)
    .execute(pool)
    .await?;

    // 2. On no-op, re-read to name the violated precondition
    if flipped.rows_affected() == 0 {
        let order = order::find_by_id(pool, order_id)
            .await
            .map_err(|e| FulfillmentError::Storage(e.to_string()))?
            .ok_or(FulfillmentError::OrderNotFound(order_id))?;
        return Err(if !order.is_paid {
            FulfillmentError::NotPaid(order_id)
        } else {
            FulfillmentError::AlreadyDelivered(order_id)
        });
    }

    tracing::info!(order_id, "order delivered");

    // 3. Return the updated order
    order::find_by_id(pool, order_id)
        .await
        .map_err(|e| FulfillmentError::Storage(e.to_string()))?
        .ok_or(FulfillmentError::OrderNotFound(order_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::product;
    use crate::db::repository::order;
    use crate::db::testing::{confirmation, order_create, order_item, product_input, test_pool};
    use crate::fulfillment::pay_order;

    #[tokio::test]
    async fn test_deliver_paid_order() {
        let pool = test_pool().await;
        let p = product::create(&pool, product_input("Shirt", "A", 20.0, 5)).await.unwrap();
        let o = order::create(&pool, order_create(1, vec![order_item(p.id, 1, 20.0)]))
            .await
            .unwrap();
        pay_order(&pool, o.id, confirmation()).await.unwrap();

        let delivered = deliver_order(&pool, o.id).await.unwrap();
        assert!(delivered.is_delivered);
        assert!(delivered.is_paid);
    }

    #[tokio::test]
    async fn test_deliver_before_pay_is_rejected() {
        let pool = test_pool().await;
        let o = order::create(&pool, order_create(1, vec![order_item(1, 1, 5.0)]))
            .await
            .unwrap();

        let err = deliver_order(&pool, o.id).await.unwrap_err();
        assert!(matches!(err, FulfillmentError::NotPaid(_)));
        assert!(!order::find_by_id(&pool, o.id).await.unwrap().unwrap().is_delivered);
    }

    #[tokio::test]
    async fn test_deliver_twice_is_rejected() {
        let pool = test_pool().await;
        let p = product::create(&pool, product_input("Shirt", "A", 20.0, 5)).await.unwrap();
        let o = order::create(&pool, order_create(1, vec![order_item(p.id, 1, 20.0)]))
            .await
            .unwrap();
        pay_order(&pool, o.id, confirmation()).await.unwrap();
        deliver_order(&pool, o.id).await.unwrap();

        let err = deliver_order(&pool, o.id).await.unwrap_err();
        assert!(matches!(err, FulfillmentError::AlreadyDelivered(_)));
    }

    #[tokio::test]
    async fn test_deliver_missing_order_is_not_found() {
        let pool = test_pool().await;
        let err = deliver_order(&pool, 42).await.unwrap_err();
        assert!(matches!(err, FulfillmentError::OrderNotFound(42)));
    }

    #[tokio::test]
    async fn test_deliver_has_no_inventory_effect() {
        let pool = test_pool().await;
        let p = product::create(&pool, product_input("Shirt", "A", 20.0, 5)).await.unwrap();
        let o = order::create(&pool, order_create(1, vec![order_item(p.id, 2, 20.0)]))
            .await
            .unwrap();
        pay_order(&pool, o.id, confirmation()).await.unwrap();
        deliver_order(&pool, o.id).await.unwrap();

        let stock = product::find_by_id(&pool, p.id).await.unwrap().unwrap().count_in_stock;
        assert_eq!(stock, 3); // only the pay transition touched inventory
    }
}
