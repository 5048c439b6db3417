use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PeriodAggregate — KPIs of one product over one slice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PeriodAggregate {
    pub average_price: f64,
    pub margin_percent: f64,
    pub units_sold: f64,
}

// ---------------------------------------------------------------------------
// IndicatorDelta — Period-over-period variation
// ---------------------------------------------------------------------------

/// Variation between a current and a previous [`PeriodAggregate`].
///
/// Price and units are relative changes in percent. Margin is an absolute
/// difference in percentage points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IndicatorDelta {
    pub price_change_pct: f64,
    pub margin_change_pts: f64,
    pub units_change_pct: f64,
}

// ---------------------------------------------------------------------------
// ProductIndicators — Aggregates plus deltas for one product
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProductIndicators {
    pub current: PeriodAggregate,
    pub previous: Option<PeriodAggregate>,
    pub delta: IndicatorDelta,
}

// ---------------------------------------------------------------------------
// PeriodTotals — Raw sums of one product over one slice (query result)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PeriodTotals {
    pub units_sold: f64,
    pub total_revenue: f64,
    pub total_cost: f64,
}
