use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::product::LogisticType;

/// Lifecycle status of an order. Only `Paid` orders count toward sales
/// KPIs and channel breakdowns.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    Paid,
    Cancelled,
    Pending,
    Shipped,
    Delivered,
}

/// A line item within an order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub title: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// A marketplace order from the seed corpus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    pub buyer_nickname: String,
    pub total_amount: f64,
    pub items: Vec<OrderItem>,
    pub logistic_type: LogisticType,
    pub date_created: DateTime<Utc>,
}
