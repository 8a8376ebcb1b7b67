//! Pareto (80/20) ranking and ABC classification.

use crate::models::{AbcClass, AbcSummary, ParetoItem, Product};

/// ABC class for a cumulative share of sales.
pub fn abc_class(cumulative_percent: f64) -> AbcClass {
    if cumulative_percent <= 80.0 {
        AbcClass::A
    } else if cumulative_percent <= 95.0 {
        AbcClass::B
    } else {
        AbcClass::C
    }
}

/// Ranks products by 30-day sales amount and attaches cumulative shares.
///
/// The sort is stable, so equal-sales products keep their relative source
/// order. A corpus with zero total sales yields all-zero percentages (and
/// therefore class A for every item) instead of dividing by zero.
pub fn calculate_pareto(products: &[Product]) -> Vec<ParetoItem> {
    let mut sorted: Vec<&Product> = products.iter().collect();
    sorted.sort_by(|a, b| {
        b.sales_amount_30d
            .partial_cmp(&a.sales_amount_30d)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total_sales: f64 = sorted.iter().map(|p| p.sales_amount_30d).sum();

    let mut cumulative = 0.0;
    sorted
        .into_iter()
        .map(|product| {
            let sales_percent = if total_sales > 0.0 {
                product.sales_amount_30d / total_sales * 100.0
            } else {
                0.0
            };
            cumulative += sales_percent;

            ParetoItem {
                product: product.clone(),
                sales_amount: product.sales_amount_30d,
                sales_percent,
                cumulative_percent: cumulative,
                abc_class: abc_class(cumulative),
            }
        })
        .collect()
}

/// Per-class counts and sales shares for the ABC summary widget.
pub fn abc_summary(items: &[ParetoItem]) -> AbcSummary {
    let mut summary = AbcSummary::default();
    let total_sales: f64 = items.iter().map(|i| i.sales_amount).sum();

    for item in items {
        let bucket = summary.bucket_mut(item.abc_class);
        bucket.count += 1;
        bucket.sales += item.sales_amount;
    }

    if total_sales > 0.0 {
        for class in [AbcClass::A, AbcClass::B, AbcClass::C] {
            let bucket = summary.bucket_mut(class);
            bucket.percent = bucket.sales / total_sales * 100.0;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::tests::product;

    #[test]
    fn ranks_descending_with_cumulative_shares() {
        let products = vec![
            product("LOW", 10.0, 5.0, 10, 5),   // 50
            product("HIGH", 10.0, 5.0, 10, 80), // 800
            product("MID", 10.0, 5.0, 10, 15),  // 150
        ];

        let items = calculate_pareto(&products);
        assert_eq!(items[0].product.sku, "HIGH");
        assert_eq!(items[1].product.sku, "MID");
        assert_eq!(items[2].product.sku, "LOW");

        assert!((items[0].sales_percent - 80.0).abs() < 1e-9);
        assert!((items[2].cumulative_percent - 100.0).abs() < 1e-9);
        assert_eq!(items[0].abc_class, AbcClass::A);
        assert_eq!(items[1].abc_class, AbcClass::B);
        assert_eq!(items[2].abc_class, AbcClass::C);
    }

    #[test]
    fn ties_keep_source_order() {
        let products = vec![
            product("FIRST", 10.0, 5.0, 10, 10),
            product("SECOND", 10.0, 5.0, 10, 10),
            product("THIRD", 10.0, 5.0, 10, 10),
        ];

        let items = calculate_pareto(&products);
        let skus: Vec<&str> = items.iter().map(|i| i.product.sku.as_str()).collect();
        assert_eq!(skus, vec!["FIRST", "SECOND", "THIRD"]);
    }

    #[test]
    fn zero_total_sales_yields_zero_percentages() {
        let products = vec![product("A", 10.0, 5.0, 10, 0), product("B", 10.0, 5.0, 10, 0)];
        let items = calculate_pareto(&products);
        for item in &items {
            assert_eq!(item.sales_percent, 0.0);
            assert_eq!(item.cumulative_percent, 0.0);
        }
    }

    #[test]
    fn summary_buckets_add_up() {
        let products = vec![
            product("HIGH", 10.0, 5.0, 10, 80),
            product("MID", 10.0, 5.0, 10, 15),
            product("LOW", 10.0, 5.0, 10, 5),
        ];
        let summary = abc_summary(&calculate_pareto(&products));

        assert_eq!(summary.a.count + summary.b.count + summary.c.count, 3);
        let total_percent = summary.a.percent + summary.b.percent + summary.c.percent;
        assert!((total_percent - 100.0).abs() < 1e-9);
    }
}
