//! Monthly units series and ordinary-least-squares trend line.
//!
//! The regression runs over the position of each period in chronological
//! order (0, 1, 2, ...), not over the calendar date, so the grouping and
//! ordering below must happen before the fit.

use std::collections::BTreeMap;

use crate::models::{SalesRecord, TrendFit, TrendPoint, TrendSeries};

/// Group `(year, month, units)` rows into periods, summing units, ordered
/// by year then month.
pub fn group_periods(series: &[(i32, u32, f64)]) -> Vec<(i32, u32, f64)> {
    let mut periods: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for &(year, month, units) in series {
        *periods.entry((year, month)).or_insert(0.0) += units;
    }
    periods
        .into_iter()
        .map(|((year, month), units)| (year, month, units))
        .collect()
}

/// Least-squares fit of `values` against their index.
///
/// With fewer than two values the slope is zero and the intercept is the
/// single value (zero when empty), so the fitted line equals the input.
pub fn linear_fit(values: &[f64]) -> TrendFit {
    let n = values.len();
    if n < 2 {
        let intercept = values.first().copied().unwrap_or(0.0);
        return TrendFit {
            slope: 0.0,
            intercept,
            fitted: values.to_vec(),
        };
    }

    let nf = n as f64;
    let mean_x = (nf - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / nf;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxy += dx * (y - mean_y);
        sxx += dx * dx;
    }

    // sxx > 0 for n >= 2 since positions are distinct.
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let fitted = (0..n).map(|i| slope * i as f64 + intercept).collect();

    TrendFit {
        slope,
        intercept,
        fitted,
    }
}

/// Group the raw rows into chronological periods and fit a trend line.
///
/// `fitted` has one value per distinct period, which is the input length
/// whenever the input already holds one row per period.
pub fn fit_trend(series: &[(i32, u32, f64)]) -> TrendFit {
    let periods = group_periods(series);
    let values: Vec<f64> = periods.iter().map(|&(_, _, units)| units).collect();
    linear_fit(&values)
}

/// Dated monthly series of `product` over `records` with its trend line.
///
/// Records without a month cannot be placed on the timeline and are skipped.
pub fn trend_series(records: &[SalesRecord], product: &str) -> TrendSeries {
    let raw: Vec<(i32, u32, f64)> = records
        .iter()
        .filter(|r| r.product == product)
        .filter_map(|r| r.month.map(|month| (r.year, month, r.units_sold)))
        .collect();
    series_from_periods(product, &raw)
}

/// Build a [`TrendSeries`] from `(year, month, units)` rows of one product.
pub fn series_from_periods(product: &str, series: &[(i32, u32, f64)]) -> TrendSeries {
    let periods = group_periods(series);
    let values: Vec<f64> = periods.iter().map(|&(_, _, units)| units).collect();
    let fit = linear_fit(&values);

    TrendSeries {
        product: product.to_string(),
        points: periods
            .into_iter()
            .map(|(year, month, units)| TrendPoint::new(year, month, units))
            .collect(),
        fitted: fit.fitted,
        slope: fit.slope,
        intercept: fit.intercept,
    }
}
