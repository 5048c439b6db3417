//! Plain-text console rendering.

use std::fmt::Write;

use crate::error::Result;
use crate::report::{DashboardReport, ProductPanel};

use super::{format, kpis, Renderer};

/// Renders KPI blocks and a period/units/trend table per product.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    /// Include the monthly table under each product's KPIs.
    pub show_series: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { show_series: true }
    }
}

impl Renderer for TextRenderer {
    fn render(&self, report: &DashboardReport) -> Result<String> {
        let mut out = String::new();
        self.write_report(&mut out, report)?;
        Ok(out)
    }
}

impl TextRenderer {
    fn write_report(&self, out: &mut String, report: &DashboardReport) -> std::fmt::Result {
        writeln!(out, "{}", report.title)?;
        writeln!(out, "{}", "=".repeat(report.title.chars().count()))?;
        writeln!(
            out,
            "Year {} vs {}",
            report.state.current_year, report.state.previous_year
        )?;

        if report.panels.is_empty() {
            writeln!(out)?;
            writeln!(out, "No sales recorded for this selection.")?;
            return Ok(());
        }

        for panel in &report.panels {
            writeln!(out)?;
            self.write_panel(out, panel)?;
        }
        Ok(())
    }

    fn write_panel(&self, out: &mut String, panel: &ProductPanel) -> std::fmt::Result {
        writeln!(out, "{}", panel.product)?;
        writeln!(out, "{}", "-".repeat(panel.product.chars().count()))?;
        for kpi in kpis(&panel.indicators) {
            writeln!(out, "  {:<16}{:>14}   {}", kpi.label, kpi.value, kpi.delta)?;
        }

        if !self.show_series || panel.trend.is_empty() {
            return Ok(());
        }

        writeln!(out)?;
        writeln!(out, "  Monthly Sales")?;
        writeln!(out, "  {:<12}{:>12}{:>12}", "Date", "Units", "Trend")?;
        for (point, fitted) in panel.trend.points.iter().zip(&panel.trend.fitted) {
            writeln!(
                out,
                "  {:<12}{:>12}{:>12.2}",
                point.date,
                format::number(point.units_sold),
                fitted
            )?;
        }
        Ok(())
    }
}
