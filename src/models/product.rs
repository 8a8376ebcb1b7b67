use serde::{Deserialize, Serialize};

/// Fulfillment channel for a product's stock or an order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LogisticType {
    Fulfillment,
    Flex,
    XdDropOff,
}

/// Listing status of a product.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductStatus {
    Active,
    Paused,
    Closed,
}

/// Stock health classification, recomputed fresh from the current stock
/// and trailing-30-day sales snapshot (see `analytics::stock_status`).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StockStatus {
    Critical,
    Alert,
    Low,
    Normal,
    Overstock,
}

impl StockStatus {
    /// All statuses in display order.
    pub const ALL: [StockStatus; 5] = [
        StockStatus::Critical,
        StockStatus::Alert,
        StockStatus::Low,
        StockStatus::Normal,
        StockStatus::Overstock,
    ];
}

/// A catalog product with its sales history and derived metrics.
///
/// Invariants maintained by `analytics::derive::refresh_product`:
/// - `stock_total == stock_full + stock_flex`
/// - `margin == price - cost`
/// - `margin_percent == margin / price * 100` (0 when price is 0)
/// - `roi == margin / cost * 100` (0 when cost is 0)
/// - `days_of_stock` follows the 999/0 sentinel rules for zero sales
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    /// Unique business key.
    pub sku: String,
    pub title: String,
    pub price: f64,
    pub cost: f64,
    pub stock_full: u32,
    pub stock_flex: u32,
    /// Always `stock_full + stock_flex`; never written independently.
    pub stock_total: u32,
    pub sales_30d: u32,
    pub sales_60d: u32,
    pub sales_amount_30d: f64,
    pub margin: f64,
    pub margin_percent: f64,
    pub roi: f64,
    pub days_of_stock: f64,
    pub supplier_id: String,
    pub supplier_name: String,
    pub logistic_type: LogisticType,
    pub status: ProductStatus,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logistic_type_serializes_in_snake_case() {
        let json = serde_json::to_string(&LogisticType::XdDropOff).unwrap();
        assert_eq!(json, "\"xd_drop_off\"");
        assert_eq!(LogisticType::XdDropOff.to_string(), "xd_drop_off");
    }

    #[test]
    fn stock_status_round_trips_through_strum() {
        use std::str::FromStr;
        for status in StockStatus::ALL {
            assert_eq!(StockStatus::from_str(&status.to_string()).unwrap(), status);
        }
    }
}
