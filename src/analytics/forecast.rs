//! Linear trend projection over the daily sales series.
//!
//! An ordinary least-squares slope over day offsets, projected forward
//! from the historical mean. An illustrative projection only: no
//! confidence intervals, no seasonality.

use chrono::Duration;

use crate::models::{ForecastPoint, SalesTrendPoint};

/// OLS slope of `values` against their indices. Degenerate series (fewer
/// than two points, or no x-variance) report a flat slope.
pub fn ols_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.len() < 2 {
        return 0.0;
    }

    let mut x_sum = 0.0;
    let mut y_sum = 0.0;
    let mut xy_sum = 0.0;
    let mut x2_sum = 0.0;
    for (i, y) in values.iter().enumerate() {
        let x = i as f64;
        x_sum += x;
        y_sum += y;
        xy_sum += x * y;
        x2_sum += x * x;
    }

    let denominator = n * x2_sum - x_sum * x_sum;
    if denominator == 0.0 {
        return 0.0;
    }
    (n * xy_sum - x_sum * y_sum) / denominator
}

/// Projects `horizon` days of sales beyond the end of `history`.
///
/// Forecast for day `n + i` is `mean(history) + slope * (n + i - 1)`,
/// clamped at zero (a projected negative demand is just zero demand).
pub fn forecast_sales(history: &[SalesTrendPoint], horizon: usize) -> Vec<ForecastPoint> {
    let Some(last) = history.last() else {
        return Vec::new();
    };

    let n = history.len();
    let values: Vec<f64> = history.iter().map(|point| point.sales).collect();
    let mean = values.iter().sum::<f64>() / n as f64;
    let slope = ols_slope(&values);

    (1..=horizon)
        .map(|i| {
            let predicted = mean + slope * (n + i - 1) as f64;
            ForecastPoint {
                date: last.date + Duration::days(i as i64),
                forecast: predicted.max(0.0),
            }
        })
        .collect()
}
