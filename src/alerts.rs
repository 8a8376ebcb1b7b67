//! Alert and urgency policy.
//!
//! Stateless rules over the current product snapshot and the externally
//! sourced alert list. Alert generation is out of scope; this module only
//! filters, orders, and groups.

use std::collections::HashMap;

use crate::analytics::stock::stock_status;
use crate::models::{Alert, AlertType, Product, StockStatus};

/// Unresolved alerts, most severe first. The sort is stable so alerts of
/// equal severity keep their source order.
pub fn active_alerts(alerts: &[Alert]) -> Vec<Alert> {
    let mut active: Vec<Alert> = alerts.iter().filter(|a| !a.resolved).cloned().collect();
    active.sort_by_key(|a| a.severity);
    active
}

/// Unresolved alerts grouped by type.
pub fn alerts_by_type(alerts: &[Alert]) -> HashMap<AlertType, Vec<Alert>> {
    let mut groups: HashMap<AlertType, Vec<Alert>> = HashMap::new();
    for alert in alerts.iter().filter(|a| !a.resolved) {
        groups.entry(alert.alert_type).or_default().push(alert.clone());
    }
    groups
}

/// Products needing immediate attention: critical stock status or nothing
/// left at all, ranked by days of runway ascending.
pub fn urgent_products(products: &[Product]) -> Vec<Product> {
    let mut urgent: Vec<Product> = products
        .iter()
        .filter(|p| {
            p.stock_total == 0
                || stock_status(p.stock_total, p.sales_30d) == StockStatus::Critical
        })
        .cloned()
        .collect();

    urgent.sort_by(|a, b| {
        a.days_of_stock
            .partial_cmp(&b.days_of_stock)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    urgent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlertSeverity;
    use chrono::Utc;

    fn alert(id: &str, severity: AlertSeverity, alert_type: AlertType, resolved: bool) -> Alert {
        Alert {
            id: id.to_string(),
            product_id: "p-1".to_string(),
            product_title: None,
            alert_type,
            severity,
            message: "test".to_string(),
            notified: false,
            resolved,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn resolved_alerts_are_dropped() {
        let alerts = vec![
            alert("a", AlertSeverity::Info, AlertType::PriceChange, true),
            alert("b", AlertSeverity::Warning, AlertType::LowStock, false),
        ];
        let active = active_alerts(&alerts);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "b");
    }

    #[test]
    fn severity_sort_is_stable_within_bands() {
        let alerts = vec![
            alert("info-1", AlertSeverity::Info, AlertType::PriceChange, false),
            alert("crit-1", AlertSeverity::Critical, AlertType::OutOfStock, false),
            alert("warn-1", AlertSeverity::Warning, AlertType::LowStock, false),
            alert("crit-2", AlertSeverity::Critical, AlertType::LowStock, false),
        ];
        let active = active_alerts(&alerts);
        let ids: Vec<&str> = active.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["crit-1", "crit-2", "warn-1", "info-1"]);
    }

    #[test]
    fn grouping_partitions_unresolved_alerts() {
        let alerts = vec![
            alert("a", AlertSeverity::Warning, AlertType::LowStock, false),
            alert("b", AlertSeverity::Warning, AlertType::LowStock, false),
            alert("c", AlertSeverity::Info, AlertType::PriceChange, false),
            alert("d", AlertSeverity::Info, AlertType::PriceChange, true),
        ];
        let groups = alerts_by_type(&alerts);
        assert_eq!(groups[&AlertType::LowStock].len(), 2);
        assert_eq!(groups[&AlertType::PriceChange].len(), 1);
    }

    #[test]
    fn urgent_products_cover_zero_stock_and_critical_status() {
        use crate::analytics::derive;
        use crate::models::{LogisticType, ProductStatus};

        let mut out_of_stock = Product {
            id: "p-1".to_string(),
            sku: "OOS".to_string(),
            title: "Gone".to_string(),
            price: 10.0,
            cost: 5.0,
            stock_full: 0,
            stock_flex: 0,
            stock_total: 0,
            sales_30d: 0,
            sales_60d: 0,
            sales_amount_30d: 0.0,
            margin: 0.0,
            margin_percent: 0.0,
            roi: 0.0,
            days_of_stock: 0.0,
            supplier_id: "sup-1".to_string(),
            supplier_name: "Acme".to_string(),
            logistic_type: LogisticType::Fulfillment,
            status: ProductStatus::Active,
            category: "Test".to_string(),
        };
        derive::refresh_product(&mut out_of_stock);

        let mut healthy = out_of_stock.clone();
        healthy.id = "p-2".to_string();
        healthy.sku = "OK".to_string();
        healthy.stock_full = 40;
        healthy.sales_30d = 30;
        derive::refresh_product(&mut healthy);

        let mut burning = out_of_stock.clone();
        burning.id = "p-3".to_string();
        burning.sku = "HOT".to_string();
        burning.stock_full = 10;
        burning.sales_30d = 300; // one day of runway
        derive::refresh_product(&mut burning);

        let urgent = urgent_products(&[healthy, burning, out_of_stock]);
        let skus: Vec<&str> = urgent.iter().map(|p| p.sku.as_str()).collect();
        // Zero runway first, then the one-day product.
        assert_eq!(skus, vec!["OOS", "HOT"]);
    }
}
