//! Rendering of [`DashboardReport`]s.
//!
//! Renderers consume finished reports only. Swapping the output (console
//! text, JSON for an HTTP response, assertions in a test) never touches the
//! computation layer.

pub mod format;
pub mod json;
pub mod text;

pub use format::{DeltaDisplay, Tone};
pub use json::JsonRenderer;
pub use text::TextRenderer;

use serde::Serialize;

use crate::error::Result;
use crate::models::ProductIndicators;
use crate::report::DashboardReport;

/// Turns a report into an output document.
pub trait Renderer {
    fn render(&self, report: &DashboardReport) -> Result<String>;
}

/// One formatted KPI: label, display value and delta.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub label: &'static str,
    pub value: String,
    pub delta: DeltaDisplay,
}

/// The three KPI tiles of a product panel, in display order.
pub fn kpis(indicators: &ProductIndicators) -> [Kpi; 3] {
    let cur = &indicators.current;
    let delta = &indicators.delta;
    [
        Kpi {
            label: "Average Price",
            value: format::currency(cur.average_price),
            delta: format::delta(delta.price_change_pct),
        },
        Kpi {
            label: "Margin (%)",
            value: format::percent(cur.margin_percent),
            delta: format::delta(delta.margin_change_pts),
        },
        Kpi {
            label: "Units Sold",
            value: format::number(cur.units_sold),
            delta: format::delta(delta.units_change_pct),
        },
    ]
}
