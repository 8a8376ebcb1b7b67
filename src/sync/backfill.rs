//! Synthetic sales backfill for freshly imported rows.
//!
//! Spreadsheet rows carry no sales history, so the sync pipeline invents
//! one scaled to stock on hand. This is a placeholder policy, not a demand
//! model; it sits behind a trait so tests inject a deterministic source
//! and a future integration can plug in real history.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sales numbers attached to an imported product row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackfilledSales {
    pub sales_30d: u32,
    pub sales_60d: u32,
}

/// Strategy for inventing sales history for imported rows.
pub trait SalesBackfill: Send {
    fn backfill(&mut self, stock_total: u32) -> BackfilledSales;
}

/// Uniform draws scaled to stock: 30-day sales up to 30% of stock on
/// hand, 60-day sales adding up to half of that again.
#[derive(Debug)]
pub struct SeededSalesBackfill {
    rng: StdRng,
}

impl SeededSalesBackfill {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl SalesBackfill for SeededSalesBackfill {
    fn backfill(&mut self, stock_total: u32) -> BackfilledSales {
        let cap_30d = (stock_total as f64 * 0.3) as u32;
        let sales_30d = if cap_30d > 0 {
            self.rng.gen_range(0..cap_30d)
        } else {
            0
        };

        let cap_extra = (sales_30d as f64 * 0.5) as u32;
        let extra = if cap_extra > 0 {
            self.rng.gen_range(0..cap_extra)
        } else {
            0
        };

        BackfilledSales {
            sales_30d,
            sales_60d: sales_30d + extra,
        }
    }
}

/// Constant backfill for tests that need exact numbers.
#[derive(Debug, Clone, Copy)]
pub struct FixedSalesBackfill {
    pub sales_30d: u32,
    pub sales_60d: u32,
}

impl SalesBackfill for FixedSalesBackfill {
    fn backfill(&mut self, _stock_total: u32) -> BackfilledSales {
        BackfilledSales {
            sales_30d: self.sales_30d,
            sales_60d: self.sales_60d,
        }
    }
}
