// Read accessors for the dashboard surfaces.
//
// Every function here takes a `DataSnapshot` (or a slice of it), so each
// call operates on exactly one generation. Display code consumes these
// accessors and never reads persisted keys itself.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::analytics::{self, stock};
use crate::analytics::stock::stock_status;
use crate::dataset::DataSnapshot;
use crate::models::{
    CategoryBreakdown, DashboardKpis, LogisticType, Order, OrderStatus, Product, SalesByChannel,
    SalesTrendPoint, StockDistribution, StockStatus, StockoutRisk,
};

/// Fixed anchor for the seed corpus sales trend; the last day with order
/// history in the embedded dataset.
pub fn seed_trend_anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 4).expect("valid anchor date")
}

/// Days of history in the trend window.
pub const TREND_WINDOW_DAYS: usize = 14;

/// Headline KPI row for the dashboard landing view.
pub fn dashboard_kpis(snapshot: &DataSnapshot) -> DashboardKpis {
    let products = &snapshot.products;
    let total_products = products.len();
    let total_stock: u64 = products.iter().map(|p| p.stock_total as u64).sum();
    let stock_valuation = analytics::inventory_valuation(products).total_cost;
    let sales_30d: f64 = products.iter().map(|p| p.sales_amount_30d).sum();

    let orders_30d = snapshot
        .orders
        .iter()
        .filter(|o| o.status == OrderStatus::Paid)
        .count();
    let avg_ticket = if orders_30d > 0 {
        sales_30d / orders_30d as f64
    } else {
        0.0
    };

    let avg_margin = if total_products > 0 {
        products.iter().map(|p| p.margin_percent).sum::<f64>() / total_products as f64
    } else {
        0.0
    };

    let critical_products = products
        .iter()
        .filter(|p| {
            matches!(
                stock_status(p.stock_total, p.sales_30d),
                StockStatus::Critical | StockStatus::Alert
            )
        })
        .count();

    let alerts_count = snapshot.alerts.iter().filter(|a| !a.resolved).count();

    DashboardKpis {
        total_products,
        total_stock,
        stock_valuation,
        sales_30d,
        orders_30d,
        avg_ticket,
        avg_margin,
        critical_products,
        alerts_count,
    }
}

/// Product counts per stock status, in display order.
pub fn stock_distribution(products: &[Product]) -> Vec<StockDistribution> {
    let mut counts: HashMap<StockStatus, usize> = HashMap::new();
    for product in products {
        *counts
            .entry(stock_status(product.stock_total, product.sales_30d))
            .or_default() += 1;
    }

    let total = products.len();
    StockStatus::ALL
        .iter()
        .map(|status| {
            let count = counts.get(status).copied().unwrap_or(0);
            StockDistribution {
                status: *status,
                count,
                percent: if total > 0 {
                    count as f64 / total as f64 * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// Count, stock and sales per category, sorted by sales descending.
pub fn products_by_category(products: &[Product]) -> Vec<CategoryBreakdown> {
    let mut by_category: Vec<CategoryBreakdown> = Vec::new();
    for product in products {
        match by_category
            .iter_mut()
            .find(|c| c.category == product.category)
        {
            Some(entry) => {
                entry.count += 1;
                entry.stock += product.stock_total as u64;
                entry.sales += product.sales_amount_30d;
            }
            None => by_category.push(CategoryBreakdown {
                category: product.category.clone(),
                count: 1,
                stock: product.stock_total as u64,
                sales: product.sales_amount_30d,
            }),
        }
    }

    by_category.sort_by(|a, b| b.sales.partial_cmp(&a.sales).unwrap_or(std::cmp::Ordering::Equal));
    by_category
}

/// Paid sales split by fulfillment channel, in fixed channel order.
pub fn sales_by_channel(orders: &[Order]) -> Vec<SalesByChannel> {
    const CHANNELS: [LogisticType; 3] = [
        LogisticType::Fulfillment,
        LogisticType::Flex,
        LogisticType::XdDropOff,
    ];

    let mut rows: Vec<SalesByChannel> = CHANNELS
        .iter()
        .map(|channel| SalesByChannel {
            channel: *channel,
            sales: 0.0,
            orders: 0,
            percent: 0.0,
        })
        .collect();

    for order in orders.iter().filter(|o| o.status == OrderStatus::Paid) {
        if let Some(row) = rows.iter_mut().find(|r| r.channel == order.logistic_type) {
            row.sales += order.total_amount;
            row.orders += 1;
        }
    }

    let total_sales: f64 = rows.iter().map(|r| r.sales).sum();
    if total_sales > 0.0 {
        for row in &mut rows {
            row.percent = row.sales / total_sales * 100.0;
        }
    }
    rows
}

/// Daily paid sales for the `days` ending at `anchor`, oldest first.
/// Days without orders appear as zero points so the series has no gaps.
pub fn sales_trend(orders: &[Order], anchor: NaiveDate, days: usize) -> Vec<SalesTrendPoint> {
    (0..days)
        .rev()
        .map(|offset| {
            let date = anchor - Duration::days(offset as i64);
            let day_orders: Vec<&Order> = orders
                .iter()
                .filter(|o| {
                    o.status == OrderStatus::Paid && o.date_created.date_naive() == date
                })
                .collect();
            SalesTrendPoint {
                date,
                sales: day_orders.iter().map(|o| o.total_amount).sum(),
                orders: day_orders.len(),
            }
        })
        .collect()
}

/// Products in the critical or alert band, most urgent (fewest days of
/// stock) first.
pub fn critical_products(products: &[Product]) -> Vec<(Product, StockStatus)> {
    let mut critical: Vec<(Product, StockStatus)> = products
        .iter()
        .map(|p| (p.clone(), stock_status(p.stock_total, p.sales_30d)))
        .filter(|(_, status)| matches!(status, StockStatus::Critical | StockStatus::Alert))
        .collect();

    critical.sort_by(|(a, _), (b, _)| {
        a.days_of_stock
            .partial_cmp(&b.days_of_stock)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    critical
}

/// Top `limit` products by 30-day sales amount.
pub fn top_products(products: &[Product], limit: usize) -> Vec<Product> {
    let mut ranked: Vec<Product> = products.to_vec();
    ranked.sort_by(|a, b| {
        b.sales_amount_30d
            .partial_cmp(&a.sales_amount_30d)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}

/// Products projected to stock out within `horizon_days`, soonest first,
/// with their suggested reorder points.
pub fn stockout_risk(
    products: &[Product],
    lead_time_days: u32,
    horizon_days: f64,
    today: NaiveDate,
) -> Vec<StockoutRisk> {
    let mut at_risk: Vec<StockoutRisk> = products
        .iter()
        .filter(|p| p.sales_30d > 0 || p.stock_total == 0)
        .map(|p| {
            let reorder_point = stock::reorder_point(p.sales_30d, lead_time_days);
            StockoutRisk {
                stockout_date: stock::stockout_date(p.stock_total, p.sales_30d, today),
                days_until_stockout: p.days_of_stock,
                reorder_point,
                needs_reorder: p.stock_total <= reorder_point,
                product: p.clone(),
            }
        })
        .filter(|risk| risk.days_until_stockout <= horizon_days)
        .collect();

    at_risk.sort_by(|a, b| {
        a.days_until_stockout
            .partial_cmp(&b.days_until_stockout)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    at_risk
}

/// Products belonging to one supplier.
pub fn products_by_supplier<'a>(products: &'a [Product], supplier_id: &str) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| p.supplier_id == supplier_id)
        .collect()
}
