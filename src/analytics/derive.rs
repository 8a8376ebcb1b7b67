//! Constructor-time derivation of product metrics.
//!
//! Every code path that creates or loads a `Product` calls
//! [`refresh_product`] so derived fields can never drift from the raw
//! fields they are computed from. Nothing outside this module recomputes
//! margin, ROI or days-of-stock.

use crate::models::Product;

/// Recomputes all derived fields from the raw fields, together.
///
/// `stock_total` is always `stock_full + stock_flex`; margin, margin
/// percent, ROI and days-of-stock follow from price/cost/stock/sales with
/// the zero guards defined in `analytics`.
pub fn refresh_product(product: &mut Product) {
    product.stock_total = product.stock_full + product.stock_flex;
    product.margin = super::margin(product.price, product.cost);
    product.margin_percent = super::margin_percent(product.price, product.cost);
    product.roi = super::roi(product.price, product.cost);
    product.days_of_stock = super::days_of_stock(product.stock_total, product.sales_30d);
}
