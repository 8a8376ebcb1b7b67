//! Property-based tests for the derived-metrics engine.
//!
//! These use proptest to pin the invariants the dashboard relies on
//! across a wide range of inputs, not just the hand-picked unit cases.

use proptest::prelude::*;

use retail_pulse::analytics::{self, derive, pareto, stock};
use retail_pulse::models::{AbcClass, LogisticType, Product, ProductStatus, StockStatus};

fn make_product(index: usize, price: f64, cost: f64, stock: u32, sales_30d: u32) -> Product {
    let mut product = Product {
        id: format!("prop-{index}"),
        sku: format!("SKU-{index}"),
        title: format!("Product {index}"),
        price,
        cost,
        stock_full: stock,
        stock_flex: 0,
        stock_total: 0,
        sales_30d,
        sales_60d: sales_30d,
        sales_amount_30d: sales_30d as f64 * price,
        margin: 0.0,
        margin_percent: 0.0,
        roi: 0.0,
        days_of_stock: 0.0,
        supplier_id: "sup-prop".to_string(),
        supplier_name: "Prop Supplier".to_string(),
        logistic_type: LogisticType::Fulfillment,
        status: ProductStatus::Active,
        category: "Prop".to_string(),
    };
    derive::refresh_product(&mut product);
    product
}

fn product_strategy() -> impl Strategy<Value = (f64, f64, u32, u32)> {
    (
        0.0f64..100_000.0,
        0.0f64..100_000.0,
        0u32..10_000,
        0u32..10_000,
    )
}

fn corpus_strategy() -> impl Strategy<Value = Vec<(f64, f64, u32, u32)>> {
    prop::collection::vec(product_strategy(), 1..40)
}

fn build_corpus(specs: &[(f64, f64, u32, u32)]) -> Vec<Product> {
    specs
        .iter()
        .enumerate()
        .map(|(i, &(price, cost, stock, sales))| make_product(i, price, cost, stock, sales))
        .collect()
}

proptest! {
    #[test]
    fn derived_fields_satisfy_their_formulas((price, cost, stock, sales) in product_strategy()) {
        let p = make_product(0, price, cost, stock, sales);

        prop_assert_eq!(p.stock_total, p.stock_full + p.stock_flex);
        prop_assert!((p.margin - (price - cost)).abs() < 1e-9);

        if price > 0.0 {
            prop_assert!((p.margin_percent - (price - cost) / price * 100.0).abs() < 1e-9);
        } else {
            prop_assert_eq!(p.margin_percent, 0.0);
        }

        if cost > 0.0 {
            prop_assert!((p.roi - (price - cost) / cost * 100.0).abs() < 1e-9);
        } else {
            prop_assert_eq!(p.roi, 0.0);
        }

        if sales == 0 {
            prop_assert_eq!(p.days_of_stock, if stock > 0 { 999.0 } else { 0.0 });
        } else {
            prop_assert!(p.days_of_stock >= 0.0);
        }
    }

    #[test]
    fn pareto_cumulative_is_non_decreasing_and_reaches_100(specs in corpus_strategy()) {
        let corpus = build_corpus(&specs);
        let items = pareto::calculate_pareto(&corpus);
        prop_assert_eq!(items.len(), corpus.len());

        let total_sales: f64 = corpus.iter().map(|p| p.sales_amount_30d).sum();
        let mut previous = 0.0;
        for item in &items {
            prop_assert!(item.cumulative_percent >= previous - 1e-9);
            previous = item.cumulative_percent;
        }

        if total_sales > 0.0 {
            let last = items.last().unwrap();
            prop_assert!((last.cumulative_percent - 100.0).abs() < 1e-6);
        } else {
            prop_assert!(items.iter().all(|i| i.cumulative_percent == 0.0));
        }
    }

    #[test]
    fn abc_classes_are_monotonic_along_the_ranking(specs in corpus_strategy()) {
        let corpus = build_corpus(&specs);
        let items = pareto::calculate_pareto(&corpus);

        // Once the ranking leaves a class it never returns to it.
        let rank = |class: AbcClass| match class {
            AbcClass::A => 0,
            AbcClass::B => 1,
            AbcClass::C => 2,
        };
        for pair in items.windows(2) {
            prop_assert!(rank(pair[0].abc_class) <= rank(pair[1].abc_class));
        }
    }

    #[test]
    fn pareto_sort_is_descending_by_sales(specs in corpus_strategy()) {
        let corpus = build_corpus(&specs);
        let items = pareto::calculate_pareto(&corpus);
        for pair in items.windows(2) {
            prop_assert!(pair[0].sales_amount >= pair[1].sales_amount);
        }
    }

    #[test]
    fn zero_stock_is_always_critical(sales in 0u32..100_000) {
        prop_assert_eq!(stock::stock_status(0, sales), StockStatus::Critical);
    }

    #[test]
    fn stock_status_agrees_with_days_of_stock_bands(stock in 2u32..100_000, sales in 1u32..100_000) {
        let days = analytics::days_of_stock(stock, sales);
        let expected = if days <= 3.0 {
            StockStatus::Critical
        } else if days <= 7.0 {
            StockStatus::Alert
        } else if days <= 15.0 {
            StockStatus::Low
        } else if days > 60.0 {
            StockStatus::Overstock
        } else {
            StockStatus::Normal
        };
        prop_assert_eq!(stock::stock_status(stock, sales), expected);
    }

    #[test]
    fn reorder_point_scales_with_lead_time(sales in 0u32..100_000, lead in 1u32..60) {
        let shorter = stock::reorder_point(sales, lead);
        let longer = stock::reorder_point(sales, lead + 1);
        prop_assert!(longer >= shorter);
    }

    #[test]
    fn weighted_margin_is_bounded_by_extremes(specs in corpus_strategy()) {
        let corpus = build_corpus(&specs);
        let weighted = analytics::weighted_avg_margin(&corpus);

        let selling: Vec<&Product> = corpus.iter().filter(|p| p.sales_amount_30d > 0.0).collect();
        if selling.is_empty() {
            prop_assert_eq!(weighted, 0.0);
        } else {
            let min = selling.iter().map(|p| p.margin_percent).fold(f64::INFINITY, f64::min);
            let max = selling.iter().map(|p| p.margin_percent).fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(weighted >= min - 1e-6 && weighted <= max + 1e-6);
        }
    }
}
