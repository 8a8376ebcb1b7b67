//! Row validation: untyped sheet rows in, typed rows plus accumulated
//! errors out.
//!
//! Both validators share one shape: a structural required-column check on
//! the first row (one error listing every missing column, then stop), and
//! otherwise a per-row pass where the first failing field short-circuits
//! that row with exactly one error. Errors never abort the pass; every
//! subsequent row is still processed so the user sees all problems at once.

use serde_json::Value;

use super::SheetRow;
use crate::models::{RowValidationError, SheetProduct, SheetSupplier};

const PRODUCT_REQUIRED: [&str; 7] = [
    "sku",
    "title",
    "price",
    "cost",
    "stock_full",
    "category",
    "supplier_name",
];

const SUPPLIER_REQUIRED: [&str; 2] = ["id", "name"];

/// Coerces a cell into a trimmed, non-empty string.
fn coerce_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Coerces a cell into a number the way the sheet wire format implies:
/// JSON numbers pass through, numeric strings parse, and blank cells count
/// as zero. Returns `None` for anything unparsable.
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn missing_columns(first_row: &SheetRow, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|col| !first_row.contains_key(**col))
        .map(|col| col.to_string())
        .collect()
}

fn structural_error(missing: &[String]) -> RowValidationError {
    let joined = missing.join(", ");
    RowValidationError::new(0, joined.clone(), format!("Missing required columns: {joined}"))
}

/// Validates and coerces product rows.
///
/// Data rows are numbered from 2: position 1 is the header row of the
/// source sheet, which never reaches us as a record.
pub fn validate_product_rows(rows: &[SheetRow]) -> (Vec<SheetProduct>, Vec<RowValidationError>) {
    let mut products = Vec::new();
    let mut errors = Vec::new();

    if let Some(first_row) = rows.first() {
        let missing = missing_columns(first_row, &PRODUCT_REQUIRED);
        if !missing.is_empty() {
            errors.push(structural_error(&missing));
            return (products, errors);
        }
    }

    for (index, row) in rows.iter().enumerate() {
        let row_num = index + 2;

        let Some(sku) = coerce_string(row.get("sku")) else {
            errors.push(RowValidationError::new(row_num, "sku", "SKU is required"));
            continue;
        };

        let Some(title) = coerce_string(row.get("title")) else {
            errors.push(RowValidationError::new(row_num, "title", "Title is required"));
            continue;
        };

        let Some(price) = coerce_number(row.get("price")).filter(|p| *p >= 0.0) else {
            errors.push(RowValidationError::new(
                row_num,
                "price",
                "price must be a number >= 0",
            ));
            continue;
        };

        let Some(cost) = coerce_number(row.get("cost")).filter(|c| *c >= 0.0) else {
            errors.push(RowValidationError::new(
                row_num,
                "cost",
                "cost must be a number >= 0",
            ));
            continue;
        };

        let Some(stock_full) = coerce_number(row.get("stock_full")).filter(|s| *s >= 0.0) else {
            errors.push(RowValidationError::new(
                row_num,
                "stock_full",
                "stock_full must be a number >= 0",
            ));
            continue;
        };

        // Optional column; anything unusable just means no flex stock.
        let stock_flex = coerce_number(row.get("stock_flex"))
            .filter(|s| *s >= 0.0)
            .unwrap_or(0.0);

        let Some(category) = coerce_string(row.get("category")) else {
            errors.push(RowValidationError::new(
                row_num,
                "category",
                "Category is required",
            ));
            continue;
        };

        let Some(supplier_name) = coerce_string(row.get("supplier_name")) else {
            errors.push(RowValidationError::new(
                row_num,
                "supplier_name",
                "Supplier is required",
            ));
            continue;
        };

        products.push(SheetProduct {
            sku,
            title,
            price,
            cost,
            stock_full: stock_full as u32,
            stock_flex: stock_flex as u32,
            category,
            supplier_name,
        });
    }

    (products, errors)
}

/// Validates and coerces supplier rows.
pub fn validate_supplier_rows(rows: &[SheetRow]) -> (Vec<SheetSupplier>, Vec<RowValidationError>) {
    let mut suppliers = Vec::new();
    let mut errors = Vec::new();

    if let Some(first_row) = rows.first() {
        let missing = missing_columns(first_row, &SUPPLIER_REQUIRED);
        if !missing.is_empty() {
            errors.push(structural_error(&missing));
            return (suppliers, errors);
        }
    }

    for (index, row) in rows.iter().enumerate() {
        let row_num = index + 2;

        let Some(id) = coerce_string(row.get("id")) else {
            errors.push(RowValidationError::new(row_num, "id", "ID is required"));
            continue;
        };

        let Some(name) = coerce_string(row.get("name")) else {
            errors.push(RowValidationError::new(row_num, "name", "Name is required"));
            continue;
        };

        suppliers.push(SheetSupplier {
            id,
            name,
            contact_name: coerce_string(row.get("contact_name")),
            email: coerce_string(row.get("email")),
        });
    }

    (suppliers, errors)
}
