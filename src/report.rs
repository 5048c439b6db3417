//! Dashboard report: explicit application state in, plain values out.
//!
//! [`DashboardReport::build`] is a pure function of the loaded
//! [`Dataset`] and a [`DashboardState`]. Renderers only ever see the
//! resulting report.

use serde::{Deserialize, Serialize};

use crate::analytics::{compute_indicators, trend_series};
use crate::error::{DashboardError, Result};
use crate::models::{distinct_products, Dataset, ProductIndicators, TrendSeries, Zone};

// ---------------------------------------------------------------------------
// DashboardState
// ---------------------------------------------------------------------------

/// The selections a dashboard view is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardState {
    pub zone: Zone,
    pub current_year: i32,
    /// Always `current_year - 1`; the year need not exist in the data.
    pub previous_year: i32,
}

impl DashboardState {
    pub fn new(zone: Zone, current_year: i32) -> Self {
        Self {
            zone,
            current_year,
            previous_year: current_year - 1,
        }
    }

    /// State for `zone` with the current year taken as the latest year of
    /// the whole dataset (before any zone filter).
    pub fn for_dataset(dataset: &Dataset, zone: Zone) -> Result<Self> {
        let current_year = dataset.latest_year().ok_or(DashboardError::EmptyDataset)?;
        Ok(Self::new(zone, current_year))
    }

    pub fn with_zone(self, zone: Zone) -> Self {
        Self { zone, ..self }
    }

    pub fn title(&self) -> String {
        match self.zone {
            Zone::All => "Information for All Zones".to_string(),
            zone => format!("Information for {}", zone),
        }
    }
}

// ---------------------------------------------------------------------------
// ProductPanel / DashboardReport
// ---------------------------------------------------------------------------

/// KPIs and monthly trend of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProductPanel {
    pub product: String,
    pub indicators: ProductIndicators,
    pub trend: TrendSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardReport {
    pub title: String,
    pub state: DashboardState,
    pub panels: Vec<ProductPanel>,
}

impl DashboardReport {
    /// Compute one panel per product sold in the current year and zone.
    ///
    /// Indicators compare the current slice against the previous-year slice
    /// of the same zone. Trend series cover every record of the product, across
    /// all years and zones.
    pub fn build(dataset: &Dataset, state: &DashboardState) -> Self {
        let current = dataset.slice(state.current_year, state.zone);
        let previous = dataset.slice(state.previous_year, state.zone);

        let panels = distinct_products(&current)
            .into_iter()
            .map(|product| {
                let indicators = compute_indicators(&current, &product, Some(&previous));
                let trend = trend_series(&dataset.for_product(&product), &product);
                ProductPanel {
                    product,
                    indicators,
                    trend,
                }
            })
            .collect();

        Self {
            title: state.title(),
            state: *state,
            panels,
        }
    }

    /// Panel of a single product, if it is part of the report.
    pub fn panel(&self, product: &str) -> Option<&ProductPanel> {
        self.panels.iter().find(|p| p.product == product)
    }

    pub fn products(&self) -> Vec<&str> {
        self.panels.iter().map(|p| p.product.as_str()).collect()
    }
}
