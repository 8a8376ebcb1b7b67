use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::product::{LogisticType, Product, StockStatus};

/// ABC (Pareto) class by cumulative share of sales.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum AbcClass {
    A,
    B,
    C,
}

/// One product's position in the Pareto ranking. Computed, never stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParetoItem {
    pub product: Product,
    pub sales_amount: f64,
    /// Share of total sales amount, 0 when the total is 0.
    pub sales_percent: f64,
    /// Running share after sorting descending by sales amount.
    pub cumulative_percent: f64,
    pub abc_class: AbcClass,
}

/// Per-class counts and sales for the ABC summary widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct AbcBucket {
    pub count: usize,
    pub sales: f64,
    pub percent: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct AbcSummary {
    pub a: AbcBucket,
    pub b: AbcBucket,
    pub c: AbcBucket,
}

impl AbcSummary {
    pub fn bucket_mut(&mut self, class: AbcClass) -> &mut AbcBucket {
        match class {
            AbcClass::A => &mut self.a,
            AbcClass::B => &mut self.b,
            AbcClass::C => &mut self.c,
        }
    }
}

/// Headline numbers for the dashboard landing view.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardKpis {
    pub total_products: usize,
    pub total_stock: u64,
    pub stock_valuation: f64,
    pub sales_30d: f64,
    pub orders_30d: usize,
    pub avg_ticket: f64,
    pub avg_margin: f64,
    /// Products currently classified critical or alert.
    pub critical_products: usize,
    pub alerts_count: usize,
}

/// Count of products per stock status.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockDistribution {
    pub status: StockStatus,
    pub count: usize,
    pub percent: f64,
}

/// Paid sales and order counts grouped by fulfillment channel.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SalesByChannel {
    pub channel: LogisticType,
    pub sales: f64,
    pub orders: usize,
    pub percent: f64,
}

/// Aggregated paid sales for one calendar day.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SalesTrendPoint {
    pub date: NaiveDate,
    pub sales: f64,
    pub orders: usize,
}

/// Product count, stock and sales rolled up per category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub count: usize,
    pub stock: u64,
    pub sales: f64,
}

/// Rollup over one supplier's product subset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SupplierStats {
    pub total_products: usize,
    pub total_stock: u64,
    pub total_cost: f64,
    pub total_sales: f64,
    pub avg_margin: f64,
    pub avg_roi: f64,
}

/// Inventory valuation at cost and at list price.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct InventoryValuation {
    pub total_cost: f64,
    pub total_price: f64,
    pub potential_profit: f64,
}

/// One projected day of the sales forecast.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub forecast: f64,
}

/// A product projected to run out soon, with its replenishment numbers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockoutRisk {
    pub product: Product,
    /// Projected stockout date; `None` means it never runs out.
    pub stockout_date: Option<NaiveDate>,
    pub days_until_stockout: f64,
    pub reorder_point: u32,
    pub needs_reorder: bool,
}
