use serde::{Deserialize, Serialize};

/// A supplier with aggregate rollups over its product set.
///
/// The `total_*` and `avg_margin` fields are views computed from the
/// products whose `supplier_name` matches `name`; they are refreshed
/// whenever the underlying product set changes and are never treated as
/// independent truth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub total_products: u32,
    pub total_stock: u32,
    pub total_valuation: f64,
    pub total_sales_30d: f64,
    pub avg_margin: f64,
}
