//! Order Fulfillment
//!
//! Drives the order state machine and its inventory side effect:
//!
//! ```text
//! Created (unpaid, undelivered) ──pay──▶ Paid ──deliver──▶ Delivered
//! ```
//!
//! No transition goes backwards, delivery requires payment, and the pay
//! transition's stock reconciliation is a single transaction - an order
//! can never be marked paid while inventory was only partially adjusted.

mod deliver_order;
mod pay_order;

pub use deliver_order::deliver_order;
pub use pay_order::pay_order;

use thiserror::Error;

/// Fulfillment state machine errors
#[derive(Debug, Error)]
pub enum FulfillmentError {
    #[error("Order {0} not found")]
    OrderNotFound(i64),

    #[error("Product {0} not found")]
    ProductNotFound(i64),

    #[error("Order {0} is already paid")]
    AlreadyPaid(i64),

    #[error("Order {0} has not been paid")]
    NotPaid(i64),

    #[error("Order {0} is already delivered")]
    AlreadyDelivered(i64),

    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: i64,
        requested: i64,
        available: i64,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for FulfillmentError {
    fn from(err: sqlx::Error) -> Self {
        FulfillmentError::Storage(err.to_string())
    }
}
