//! Order Repository
//!
//! Orders are stored as single rows; line items, the shipping address and
//! the payment confirmation are embedded JSON columns. State transitions
//! (pay, deliver) live in the fulfillment module - this module covers
//! creation, reads and deletion.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderCreate, OrderItem, PaymentResult, ShippingAddress};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

pub(crate) const ORDER_SELECT: &str = "SELECT id, user_id, items, shipping_address, payment_method, items_price, shipping_price, tax_price, total_price, is_paid, paid_at, payment_result, is_delivered, created_at FROM orders";

/// The three disjoint status views used by administrative workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBucket {
    /// `is_paid == false`
    Unpaid,
    /// `is_paid == true && is_delivered == false`
    AwaitingDelivery,
    /// `is_paid == true && is_delivered == true`
    Completed,
}

impl OrderBucket {
    fn where_sql(&self) -> &'static str {
        match self {
            Self::Unpaid => "is_paid = 0",
            Self::AwaitingDelivery => "is_paid = 1 AND is_delivered = 0",
            Self::Completed => "is_paid = 1 AND is_delivered = 1",
        }
    }
}

/// Raw order row; JSON columns still serialized.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct OrderRow {
    pub id: i64,
    pub user_id: i64,
    pub items: String,
    pub shipping_address: String,
    pub payment_method: String,
    pub items_price: f64,
    pub shipping_price: f64,
    pub tax_price: f64,
    pub total_price: f64,
    pub is_paid: bool,
    pub paid_at: Option<i64>,
    pub payment_result: Option<String>,
    pub is_delivered: bool,
    pub created_at: i64,
}

impl OrderRow {
    pub(crate) fn into_order(self) -> RepoResult<Order> {
        let items: Vec<OrderItem> = serde_json::from_str(&self.items)
            .map_err(|e| RepoError::Database(format!("Corrupt order items for {}: {e}", self.id)))?;
        let shipping_address: ShippingAddress = serde_json::from_str(&self.shipping_address)
            .map_err(|e| RepoError::Database(format!("Corrupt shipping address for {}: {e}", self.id)))?;
        let payment_result: Option<PaymentResult> = match &self.payment_result {
            Some(raw) => Some(serde_json::from_str(raw).map_err(|e| {
                RepoError::Database(format!("Corrupt payment result for {}: {e}", self.id))
            })?),
            None => None,
        };
        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            items,
            shipping_address,
            payment_method: self.payment_method,
            items_price: self.items_price,
            shipping_price: self.shipping_price,
            tax_price: self.tax_price,
            total_price: self.total_price,
            is_paid: self.is_paid,
            paid_at: self.paid_at,
            payment_result,
            is_delivered: self.is_delivered,
            created_at: self.created_at,
        })
    }
}

fn into_orders(rows: Vec<OrderRow>) -> RepoResult<Vec<Order>> {
    rows.into_iter().map(OrderRow::into_order).collect()
}

/// Validate the shape of a client-submitted cart. Prices and totals are
/// trusted as given; only structural invariants are checked.
fn validate(data: &OrderCreate) -> RepoResult<()> {
    if data.order_items.is_empty() {
        return Err(RepoError::Validation("order must contain at least one item".into()));
    }
    for item in &data.order_items {
        if item.quantity < 1 {
            return Err(RepoError::Validation(format!(
                "quantity for product {} must be positive",
                item.product_id
            )));
        }
        if !item.price.is_finite() || item.price < 0.0 {
            return Err(RepoError::Validation(format!(
                "price for product {} must be non-negative",
                item.product_id
            )));
        }
    }
    for (label, value) in [
        ("itemsPrice", data.items_price),
        ("shippingPrice", data.shipping_price),
        ("taxPrice", data.tax_price),
        ("totalPrice", data.total_price),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(RepoError::Validation(format!("{label} must be non-negative")));
        }
    }
    Ok(())
}

/// Create an order atomically from a client-submitted cart. Line items
/// are immutable from this point on.
pub async fn create(pool: &SqlitePool, data: OrderCreate) -> RepoResult<Order> {
    validate(&data)?;
    let id = snowflake_id();
    let now = now_millis();
    let items = serde_json::to_string(&data.order_items)
        .map_err(|e| RepoError::Database(format!("Failed to encode order items: {e}")))?;
    let shipping_address = serde_json::to_string(&data.shipping_address)
        .map_err(|e| RepoError::Database(format!("Failed to encode shipping address: {e}")))?;

    sqlx::query(
        "INSERT INTO orders (id, user_id, items, shipping_address, payment_method, items_price, shipping_price, tax_price, total_price, is_paid, is_delivered, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, 0, ?)",
    )
    .bind(id)
    .bind(data.user_id)
    .bind(items)
    .bind(shipping_address)
    .bind(&data.payment_method)
    .bind(data.items_price)
    .bind(data.shipping_price)
    .bind(data.tax_price)
    .bind(data.total_price)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} ORDER BY id");
    let rows = sqlx::query_as::<_, OrderRow>(&sql).fetch_all(pool).await?;
    into_orders(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(OrderRow::into_order).transpose()
}

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE user_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    into_orders(rows)
}

/// Orders in one status bucket, in insertion order.
pub async fn find_by_bucket(pool: &SqlitePool, bucket: OrderBucket) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE {} ORDER BY id", bucket.where_sql());
    let rows = sqlx::query_as::<_, OrderRow>(&sql).fetch_all(pool).await?;
    into_orders(rows)
}

pub async fn count_by_bucket(pool: &SqlitePool, bucket: OrderBucket) -> RepoResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM orders WHERE {}", bucket.where_sql());
    let count: i64 = sqlx::query_scalar(&sql).fetch_one(pool).await?;
    Ok(count)
}

/// Remove one order. Returns whether a row was deleted.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Bulk purge of every unpaid order. Returns the number removed.
pub async fn purge_unpaid(pool: &SqlitePool) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM orders WHERE is_paid = 0")
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

/// Bulk purge of every paid-and-delivered order. Returns the number removed.
pub async fn purge_completed(pool: &SqlitePool) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM orders WHERE is_paid = 1 AND is_delivered = 1")
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

/// Remove all orders belonging to one user (user-deletion cascade).
pub async fn delete_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM orders WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
