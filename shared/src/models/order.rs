//! Order Model
//!
//! Orders embed their line items, shipping address and payment
//! confirmation; none of those exist as standalone collections.

use serde::{Deserialize, Serialize};

/// One line item within an order
///
/// A snapshot taken at order time: later product price changes do not
/// retroactively affect existing orders. Immutable once the order exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: i64,
    pub name: String,
    pub quantity: i64,
    /// Price at order time
    pub price: f64,
    #[serde(default)]
    pub image: String,
}

/// Shipping address captured at order creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Opaque payment confirmation from the external gateway
///
/// Stored verbatim on the pay transition, never validated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResult {
    /// Gateway-side transaction ID
    #[serde(rename = "id")]
    pub external_id: String,
    pub status: String,
    pub update_time: String,
    pub email_address: String,
}

/// Order entity
///
/// State machine: created (unpaid, undelivered) → paid → delivered.
/// `paid_at` and `payment_result` are set exactly once, on the pay
/// transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "orderItems")]
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: f64,
    pub shipping_price: f64,
    pub tax_price: f64,
    pub total_price: f64,
    pub is_paid: bool,
    pub paid_at: Option<i64>,
    pub payment_result: Option<PaymentResult>,
    pub is_delivered: bool,
    pub created_at: i64,
}

/// Create order payload (client-submitted cart)
///
/// Item prices and the price breakdown come from the caller and are
/// stored as given - the server validates shape (positive quantities,
/// non-negative money) but does not recompute totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub user_id: i64,
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: f64,
    pub shipping_price: f64,
    pub tax_price: f64,
    pub total_price: f64,
}
