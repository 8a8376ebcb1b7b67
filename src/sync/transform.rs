//! Transforms validated sheet rows into full derived entities.

use crate::analytics::{self, derive};
use crate::models::{LogisticType, Product, ProductStatus, SheetProduct, SheetSupplier, Supplier};

use super::backfill::{BackfilledSales, SalesBackfill};

/// Stable supplier id from a display name: `"Acme  Corp"` -> `"sup-acme-corp"`.
pub fn supplier_slug(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("sup-{slug}")
}

/// Builds a full product from a validated row.
///
/// The id is positional within this sync (`sync-1`, `sync-2`, ...); sales
/// come from the backfill strategy; every derived field is computed here,
/// at construction, and nowhere else.
pub fn product_from_row(row: &SheetProduct, index: usize, sales: BackfilledSales) -> Product {
    let mut product = Product {
        id: format!("sync-{}", index + 1),
        sku: row.sku.clone(),
        title: row.title.clone(),
        price: row.price,
        cost: row.cost,
        stock_full: row.stock_full,
        stock_flex: row.stock_flex,
        stock_total: 0,
        sales_30d: sales.sales_30d,
        sales_60d: sales.sales_60d,
        sales_amount_30d: sales.sales_30d as f64 * row.price,
        margin: 0.0,
        margin_percent: 0.0,
        roi: 0.0,
        days_of_stock: 0.0,
        supplier_id: supplier_slug(&row.supplier_name),
        supplier_name: row.supplier_name.clone(),
        logistic_type: if row.stock_flex > 0 {
            LogisticType::Flex
        } else {
            LogisticType::Fulfillment
        },
        status: ProductStatus::Active,
        category: row.category.clone(),
    };
    derive::refresh_product(&mut product);
    product
}

/// Builds a supplier from a validated row, rolling up over the products
/// whose `supplier_name` matches.
pub fn supplier_from_row(row: &SheetSupplier, products: &[Product]) -> Supplier {
    let subset: Vec<Product> = products
        .iter()
        .filter(|p| p.supplier_name == row.name)
        .cloned()
        .collect();
    let stats = analytics::supplier_stats(&subset);

    Supplier {
        id: row.id.clone(),
        name: row.name.clone(),
        contact_name: row.contact_name.clone().unwrap_or_default(),
        email: row.email.clone().unwrap_or_default(),
        phone: String::new(),
        total_products: stats.total_products as u32,
        total_stock: stats.total_stock as u32,
        total_valuation: stats.total_cost,
        total_sales_30d: stats.total_sales,
        avg_margin: stats.avg_margin,
    }
}

/// Synthesizes suppliers when the supplier tab is absent: one per distinct
/// `supplier_name`, in order of first appearance, with generated ids.
pub fn synthesize_suppliers(products: &[Product]) -> Vec<Supplier> {
    let mut seen: Vec<&str> = Vec::new();
    for product in products {
        if !seen.contains(&product.supplier_name.as_str()) {
            seen.push(&product.supplier_name);
        }
    }

    seen.iter()
        .enumerate()
        .map(|(index, name)| {
            let row = SheetSupplier {
                id: format!("sup-{}", index + 1),
                name: name.to_string(),
                contact_name: None,
                email: None,
            };
            supplier_from_row(&row, products)
        })
        .collect()
}

/// Transforms the full preview buffer into derived entities.
pub fn build_entities(
    product_rows: &[SheetProduct],
    supplier_rows: &[SheetSupplier],
    backfill: &mut dyn SalesBackfill,
) -> (Vec<Product>, Vec<Supplier>) {
    let products: Vec<Product> = product_rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let stock_total = row.stock_full + row.stock_flex;
            product_from_row(row, index, backfill.backfill(stock_total))
        })
        .collect();

    let suppliers = if supplier_rows.is_empty() {
        synthesize_suppliers(&products)
    } else {
        supplier_rows
            .iter()
            .map(|row| supplier_from_row(row, &products))
            .collect()
    };

    (products, suppliers)
}
