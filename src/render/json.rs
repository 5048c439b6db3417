use crate::error::Result;
use crate::report::DashboardReport;

use super::Renderer;

/// Serializes the report as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl JsonRenderer {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, report: &DashboardReport) -> Result<String> {
        let out = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(out)
    }
}
