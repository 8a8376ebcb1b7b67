// Derived-metrics engine.
//
// Everything in this module is a pure function over product/supplier
// collections: no clocks except injected dates, no randomness, no I/O.
// The sync pipeline and the read layer both call in here so there is a
// single source of truth for every formula.

pub mod derive;
pub mod forecast;
pub mod pareto;
pub mod stock;

use crate::models::{InventoryValuation, Product, SupplierStats};

/// Absolute margin per unit.
pub fn margin(price: f64, cost: f64) -> f64 {
    price - cost
}

/// Margin as a percentage of price; 0 when price is 0.
pub fn margin_percent(price: f64, cost: f64) -> f64 {
    if price > 0.0 {
        margin(price, cost) / price * 100.0
    } else {
        0.0
    }
}

/// Return on investment as a percentage of cost; 0 when cost is 0.
pub fn roi(price: f64, cost: f64) -> f64 {
    if cost > 0.0 {
        margin(price, cost) / cost * 100.0
    } else {
        0.0
    }
}

/// Days of runway at the trailing-30-day sales rate.
///
/// Sentinels: 999 when there is stock but no sales (infinite runway),
/// 0 when there is neither.
pub fn days_of_stock(stock: u32, sales_30d: u32) -> f64 {
    if sales_30d == 0 {
        return if stock > 0 { 999.0 } else { 0.0 };
    }
    stock as f64 / (sales_30d as f64 / 30.0)
}

/// Units sold per day over the trailing 30 days.
pub fn sales_velocity(sales_30d: u32) -> f64 {
    sales_30d as f64 / 30.0
}

/// Inventory valuation at cost and at list price over `stock_total`.
pub fn inventory_valuation(products: &[Product]) -> InventoryValuation {
    let mut total_cost = 0.0;
    let mut total_price = 0.0;
    for p in products {
        total_cost += p.stock_total as f64 * p.cost;
        total_price += p.stock_total as f64 * p.price;
    }
    InventoryValuation {
        total_cost,
        total_price,
        potential_profit: total_price - total_cost,
    }
}

/// Rollup over one supplier's product subset. Averages are 0 for an empty
/// subset rather than NaN.
pub fn supplier_stats(products: &[Product]) -> SupplierStats {
    let total_products = products.len();
    let total_stock: u64 = products.iter().map(|p| p.stock_total as u64).sum();
    let total_cost: f64 = products.iter().map(|p| p.stock_total as f64 * p.cost).sum();
    let total_sales: f64 = products.iter().map(|p| p.sales_amount_30d).sum();

    let (avg_margin, avg_roi) = if total_products > 0 {
        (
            products.iter().map(|p| p.margin_percent).sum::<f64>() / total_products as f64,
            products.iter().map(|p| p.roi).sum::<f64>() / total_products as f64,
        )
    } else {
        (0.0, 0.0)
    };

    SupplierStats {
        total_products,
        total_stock,
        total_cost,
        total_sales,
        avg_margin,
        avg_roi,
    }
}

/// Sales-amount-weighted mean of margin percent; 0 when nothing sold.
pub fn weighted_avg_margin(products: &[Product]) -> f64 {
    let total_sales: f64 = products.iter().map(|p| p.sales_amount_30d).sum();
    if total_sales <= 0.0 {
        return 0.0;
    }
    products
        .iter()
        .map(|p| p.margin_percent * p.sales_amount_30d)
        .sum::<f64>()
        / total_sales
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LogisticType, ProductStatus};

    pub(crate) fn product(sku: &str, price: f64, cost: f64, stock: u32, sales_30d: u32) -> Product {
        let mut p = Product {
            id: format!("test-{sku}"),
            sku: sku.to_string(),
            title: format!("Product {sku}"),
            price,
            cost,
            stock_full: stock,
            stock_flex: 0,
            stock_total: 0,
            sales_30d,
            sales_60d: sales_30d * 2,
            sales_amount_30d: sales_30d as f64 * price,
            margin: 0.0,
            margin_percent: 0.0,
            roi: 0.0,
            days_of_stock: 0.0,
            supplier_id: "sup-test".to_string(),
            supplier_name: "Test Supplier".to_string(),
            logistic_type: LogisticType::Fulfillment,
            status: ProductStatus::Active,
            category: "Test".to_string(),
        };
        derive::refresh_product(&mut p);
        p
    }

    #[test]
    fn margin_percent_guards_zero_price() {
        assert_eq!(margin_percent(0.0, 5.0), 0.0);
        assert!((margin_percent(10.0, 4.0) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn roi_guards_zero_cost() {
        assert_eq!(roi(10.0, 0.0), 0.0);
        assert!((roi(10.0, 4.0) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn days_of_stock_sentinels() {
        assert_eq!(days_of_stock(10, 0), 999.0);
        assert_eq!(days_of_stock(0, 0), 0.0);
        // 10 units at 10/day.
        assert!((days_of_stock(10, 300) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn supplier_stats_empty_subset_has_zero_averages() {
        let stats = supplier_stats(&[]);
        assert_eq!(stats.avg_margin, 0.0);
        assert_eq!(stats.avg_roi, 0.0);
        assert_eq!(stats.total_products, 0);
    }

    #[test]
    fn supplier_stats_aggregates() {
        let products = vec![product("A", 10.0, 5.0, 4, 30), product("B", 20.0, 10.0, 6, 0)];
        let stats = supplier_stats(&products);
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.total_stock, 10);
        assert!((stats.total_cost - (4.0 * 5.0 + 6.0 * 10.0)).abs() < 1e-9);
        assert!((stats.avg_margin - 50.0).abs() < 1e-9);
    }

    #[test]
    fn weighted_margin_ignores_zero_sales_corpus() {
        let products = vec![product("A", 10.0, 5.0, 4, 0)];
        assert_eq!(weighted_avg_margin(&products), 0.0);
    }

    #[test]
    fn weighted_margin_weights_by_sales_amount() {
        // A: margin 50% with 3x the sales weight of B at 25%.
        let a = product("A", 10.0, 5.0, 10, 30); // sales amount 300
        let b = product("B", 20.0, 15.0, 10, 5); // sales amount 100
        let weighted = weighted_avg_margin(&[a, b]);
        assert!((weighted - (50.0 * 300.0 + 25.0 * 100.0) / 400.0).abs() < 1e-9);
    }

    #[test]
    fn valuation_projects_profit() {
        let products = vec![product("A", 10.0, 6.0, 5, 0)];
        let v = inventory_valuation(&products);
        assert!((v.total_cost - 30.0).abs() < 1e-9);
        assert!((v.total_price - 50.0).abs() < 1e-9);
        assert!((v.potential_profit - 20.0).abs() < 1e-9);
    }
}
