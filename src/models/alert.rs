use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of alert kinds. Alert generation is external to this core;
/// we only filter, sort and group what the seed corpus provides.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertType {
    LowStock,
    OutOfStock,
    NegativeMargin,
    SlowRotation,
    PriceChange,
}

/// Alert severity with the fixed total order critical < warning < info.
///
/// `Ord` follows declaration order, so sorting a slice of severities
/// ascending puts critical first.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertSeverity {
    Critical,
    Warning,
    Info,
}

/// A stock or pricing alert referencing a product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_title: Option<String>,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub notified: bool,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
}
