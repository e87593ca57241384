//! Pay transition
//!
//! Marks an order paid, records the gateway confirmation verbatim, and
//! decrements stock for every line item - all inside one transaction.

use super::FulfillmentError;
use crate::db::repository::order::{ORDER_SELECT, OrderRow};
use shared::models::{Order, PaymentResult};
use shared::util::now_millis;
use sqlx::SqlitePool;

/// Execute the pay transition: `Created → Paid(undelivered)`.
///
/// The order flip and every per-item stock decrement commit together or
/// not at all. Stock decrements are conditional (`count_in_stock >=
/// quantity`), so stock never goes negative: any shortfall rejects the
/// whole transition and leaves inventory untouched.
pub async fn pay_order(
    pool: &SqlitePool,
    order_id: i64,
    confirmation: PaymentResult,
) -> Result<Order, FulfillmentError> {
    let mut tx = pool.begin().await?;

    // 1. Load the order inside the transaction
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row: Option<OrderRow> = sqlx::query_as(&sql)
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?;
    let mut order = row
        .ok_or(FulfillmentError::OrderNotFound(order_id))?
        .into_order()
        .map_err(|e| FulfillmentError::Storage(e.to_string()))?;

    // 2. Flip the paid flag, guarded against double payment. The
    //    conditional WHERE also serializes concurrent pay attempts on the
    //    same order: exactly one of them sees a row to update.
    let paid_at = now_millis();
    let payment_json = serde_json::to_string(&confirmation)
        .map_err(|e| FulfillmentError::Storage(format!("Failed to encode confirmation: {e}")))?;
    let flipped = sqlx::query(
        "UPDATE orders SET is_paid = 1, paid_at = ?, payment_result = ? WHERE id = ? AND is_paid = 0",
    )
    .bind(paid_at)
    .bind(&payment_json)
    .bind(order_id)
    .execute(&mut *tx)
    .await?;
    if flipped.rows_affected() == 0 {
        return Err(FulfillmentError::AlreadyPaid(order_id));
    }

    // 3. Reconcile stock, one conditional decrement per line item.
    //    Relative arithmetic in the UPDATE keeps concurrent transitions on
    //    the same product from losing each other's decrements.
    for item in &order.items {
        let decremented = sqlx::query(
            "UPDATE product SET count_in_stock = count_in_stock - ?1 WHERE id = ?2 AND count_in_stock >= ?1",
        )
        .bind(item.quantity)
        .bind(item.product_id)
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            // Dropping the transaction rolls back the flip and every
            // decrement applied so far.
            let available: Option<i64> =
                sqlx::query_scalar("SELECT count_in_stock FROM product WHERE id = ?")
                    .bind(item.product_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            return Err(match available {
                None => FulfillmentError::ProductNotFound(item.product_id),
                Some(available) => FulfillmentError::InsufficientStock {
                    product_id: item.product_id,
                    requested: item.quantity,
                    available,
                },
            });
        }
    }

    // 4. Commit the unit of work
    tx.commit().await?;
    tracing::info!(order_id, paid_at, "order paid, stock reconciled");

    order.is_paid = true;
    order.paid_at = Some(paid_at);
    order.payment_result = Some(confirmation);
    Ok(order)
}
