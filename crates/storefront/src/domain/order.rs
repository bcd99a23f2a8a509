//! Order, order line, and payment entities.

use chrono::NaiveDate;

/// Status assigned to every newly placed order.
pub const ORDER_ACCEPTED: &str = "Order Accepted !";

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: i64,
    pub product_id: i64,
    /// Snapshot; the product may later be renamed or deleted.
    pub product_name: String,
    pub quantity: i64,
    pub discount: f64,
    /// Unit price paid, copied from the cart line.
    pub ordered_product_price: f64,
}

/// Payment-gateway record attached to an order.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: i64,
    pub payment_method: String,
    pub pg_payment_id: String,
    pub pg_status: String,
    pub pg_response_message: String,
    pub pg_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    /// Email of the ordering user.
    pub email: String,
    pub items: Vec<OrderItem>,
    pub order_date: NaiveDate,
    pub payment: Payment,
    pub total_amount: f64,
    pub status: String,
    pub address_id: i64,
}
