//! Stock health classification and replenishment math.

use chrono::{Duration, NaiveDate};

use crate::models::StockStatus;

/// Default supplier lead time used when none is configured.
pub const DEFAULT_LEAD_TIME_DAYS: u32 = 7;

/// Safety stock expressed in days of demand. Policy constant, not derived.
pub const SAFETY_STOCK_DAYS: u32 = 3;

/// Classifies a stock/sales snapshot.
///
/// Evaluation order matters and is part of the contract: the stock<=1 and
/// zero-sales special cases run before the generic day-band thresholds.
/// With zero sales, stock above 10 units reads as overstock and anything
/// else as normal; the day bands only apply when something actually sold.
pub fn stock_status(stock: u32, sales_30d: u32) -> StockStatus {
    if stock <= 1 {
        return StockStatus::Critical;
    }
    if sales_30d == 0 {
        return if stock > 10 {
            StockStatus::Overstock
        } else {
            StockStatus::Normal
        };
    }

    let days = stock as f64 / (sales_30d as f64 / 30.0);
    if days <= 3.0 {
        StockStatus::Critical
    } else if days <= 7.0 {
        StockStatus::Alert
    } else if days <= 15.0 {
        StockStatus::Low
    } else if days > 60.0 {
        StockStatus::Overstock
    } else {
        StockStatus::Normal
    }
}

/// Suggested reorder point: lead-time demand plus safety stock, rounded up.
pub fn reorder_point(sales_30d: u32, lead_time_days: u32) -> u32 {
    let daily_sales = sales_30d as f64 / 30.0;
    let safety_stock = daily_sales * SAFETY_STOCK_DAYS as f64;
    (daily_sales * lead_time_days as f64 + safety_stock).ceil() as u32
}

/// Projects the stockout date from `today`.
///
/// Already out of stock projects to today; stock with zero sales never
/// runs out (`None`). Fractional days of runway are projected forward on
/// the clock, so 1.5 days from today still lands on tomorrow.
pub fn stockout_date(stock: u32, sales_30d: u32, today: NaiveDate) -> Option<NaiveDate> {
    if stock == 0 {
        return Some(today);
    }
    if sales_30d == 0 {
        return None;
    }

    let days = super::days_of_stock(stock, sales_30d);
    let projected = today
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        + Duration::seconds((days * 86_400.0) as i64);
    Some(projected.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 100 => StockStatus::Critical ; "out of stock")]
    #[test_case(1, 0 => StockStatus::Critical ; "single unit left")]
    #[test_case(5, 0 => StockStatus::Normal ; "no sales, small stock")]
    #[test_case(10, 0 => StockStatus::Normal ; "no sales, boundary stock of ten")]
    #[test_case(11, 0 => StockStatus::Overstock ; "no sales, just over ten")]
    #[test_case(20, 0 => StockStatus::Overstock ; "no sales, large stock")]
    #[test_case(10, 300 => StockStatus::Critical ; "one day of runway")]
    #[test_case(2, 10 => StockStatus::Alert ; "six days of runway")]
    #[test_case(10, 30 => StockStatus::Low ; "ten days of runway")]
    #[test_case(30, 30 => StockStatus::Normal ; "thirty days of runway")]
    #[test_case(61, 30 => StockStatus::Overstock ; "sixty one days of runway")]
    fn classifies_snapshots(stock: u32, sales_30d: u32) -> StockStatus {
        stock_status(stock, sales_30d)
    }

    // Documented boundary: the zero-sales rule and the day-band rule meet
    // discontinuously around 10 units. With trickle sales the day band
    // takes over (11 units at 1 sale/30d is 330 days, overstock), while
    // moderate sales land the same stock level in normal. Preserved as-is.
    #[test]
    fn zero_sales_discontinuity_is_preserved() {
        assert_eq!(stock_status(11, 0), StockStatus::Overstock);
        assert_eq!(stock_status(11, 1), StockStatus::Overstock);
        assert_eq!(stock_status(11, 10), StockStatus::Normal);
    }

    #[test]
    fn reorder_point_adds_safety_stock() {
        // 2/day * 7 days lead + 2/day * 3 days safety = 20.
        assert_eq!(reorder_point(60, DEFAULT_LEAD_TIME_DAYS), 20);
        // Fractional demand rounds up.
        assert_eq!(reorder_point(10, DEFAULT_LEAD_TIME_DAYS), 4);
        assert_eq!(reorder_point(0, DEFAULT_LEAD_TIME_DAYS), 0);
    }

    #[test]
    fn stockout_projection() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 4).unwrap();
        assert_eq!(stockout_date(0, 50, today), Some(today));
        assert_eq!(stockout_date(10, 0, today), None);
        // 10 units at 2/day is 5 days of runway.
        assert_eq!(
            stockout_date(10, 60, today),
            Some(NaiveDate::from_ymd_opt(2026, 2, 9).unwrap())
        );
        // Fractional runway (1.5 days) still lands on the next day.
        assert_eq!(
            stockout_date(3, 60, today),
            Some(NaiveDate::from_ymd_opt(2026, 2, 5).unwrap())
        );
    }
}
