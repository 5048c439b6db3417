//! Per-product KPI aggregation over a slice of sales records.
//!
//! Every division is guarded: an empty slice, zero units, zero revenue or a
//! zero previous value all resolve to `0.0` so partial history never turns
//! into an error or a NaN on the dashboard.

use crate::models::{IndicatorDelta, PeriodAggregate, PeriodTotals, ProductIndicators, SalesRecord};

/// Sum units, revenue and cost of `product` over `records`.
pub fn product_totals(records: &[SalesRecord], product: &str) -> PeriodTotals {
    records
        .iter()
        .filter(|r| r.product == product)
        .fold(PeriodTotals::default(), |acc, r| PeriodTotals {
            units_sold: acc.units_sold + r.units_sold,
            total_revenue: acc.total_revenue + r.total_revenue,
            total_cost: acc.total_cost + r.total_cost,
        })
}

impl PeriodTotals {
    pub fn aggregate(&self) -> PeriodAggregate {
        let average_price = if self.units_sold > 0.0 {
            self.total_revenue / self.units_sold
        } else {
            0.0
        };
        let margin_percent = if self.total_revenue > 0.0 {
            (self.total_revenue - self.total_cost) / self.total_revenue * 100.0
        } else {
            0.0
        };
        PeriodAggregate {
            average_price,
            margin_percent,
            units_sold: self.units_sold,
        }
    }
}

/// Average price, margin percentage and units sold of `product` over `records`.
pub fn aggregate_period(records: &[SalesRecord], product: &str) -> PeriodAggregate {
    product_totals(records, product).aggregate()
}

impl IndicatorDelta {
    /// Variation of `current` against `previous`.
    ///
    /// Price and units use `(current - previous) / previous * 100` and fall
    /// back to `0.0` when the previous value is zero. Margin is the plain
    /// point difference.
    pub fn between(current: &PeriodAggregate, previous: &PeriodAggregate) -> Self {
        Self {
            price_change_pct: relative_change(current.average_price, previous.average_price),
            margin_change_pts: current.margin_percent - previous.margin_percent,
            units_change_pct: relative_change(current.units_sold, previous.units_sold),
        }
    }
}

fn relative_change(current: f64, previous: f64) -> f64 {
    if previous != 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

/// Compute the indicators of `product` for the current slice and, when a
/// previous slice is supplied, its period-over-period deltas.
///
/// Without a previous slice all deltas are zero.
pub fn compute_indicators(
    current: &[SalesRecord],
    product: &str,
    previous: Option<&[SalesRecord]>,
) -> ProductIndicators {
    let cur = aggregate_period(current, product);
    match previous {
        Some(prev_records) => {
            let prev = aggregate_period(prev_records, product);
            ProductIndicators {
                current: cur,
                previous: Some(prev),
                delta: IndicatorDelta::between(&cur, &prev),
            }
        }
        None => ProductIndicators {
            current: cur,
            previous: None,
            delta: IndicatorDelta::default(),
        },
    }
}
