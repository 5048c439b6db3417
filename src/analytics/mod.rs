//! Pure computations over in-memory sales records.
//!
//! Nothing in here touches DuckDB, the filesystem or any renderer; callers
//! hand in slices of [`SalesRecord`](crate::models::SalesRecord) and get
//! plain values back.

pub mod aggregator;
pub mod trend;

pub use aggregator::{aggregate_period, compute_indicators, product_totals};
pub use trend::{fit_trend, group_periods, linear_fit, series_from_periods, trend_series};
