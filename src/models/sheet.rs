use serde::{Deserialize, Serialize};

/// A product row that passed validation: strings trimmed, numbers coerced.
/// Not yet a `Product` — derived metrics and identifiers are attached
/// during sync (`sync::transform`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SheetProduct {
    pub sku: String,
    pub title: String,
    pub price: f64,
    pub cost: f64,
    pub stock_full: u32,
    pub stock_flex: u32,
    pub category: String,
    pub supplier_name: String,
}

/// A supplier row that passed validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SheetSupplier {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// One accumulated validation failure.
///
/// `row` is the 1-based position in the sheet; row 0 flags a structural
/// (missing-column) problem that applies to the whole tab. Errors are
/// collected, never raised — the pipeline reports every bad row in one
/// pass so the user can fix the sheet in one round trip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowValidationError {
    pub row: usize,
    /// Column name, or a comma-joined list for structural errors.
    pub column: String,
    pub message: String,
}

impl RowValidationError {
    pub fn new(row: usize, column: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row,
            column: column.into(),
            message: message.into(),
        }
    }

    /// True when this error describes missing columns rather than a bad row.
    pub fn is_structural(&self) -> bool {
        self.row == 0
    }
}
