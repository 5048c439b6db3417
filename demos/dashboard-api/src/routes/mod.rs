pub mod dashboard;
pub mod meta;
pub mod products;

use sales_dashboard::{DashboardReport, DashboardState, Zone};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ZoneParams {
    pub zone: Option<String>,
    pub year: Option<i32>,
}

impl ZoneParams {
    /// Parse the `zone` query parameter, defaulting to all zones.
    pub fn zone(&self) -> Result<Zone, AppError> {
        match self.zone.as_deref() {
            None | Some("") => Ok(Zone::All),
            Some(z) => z.parse().map_err(AppError::from),
        }
    }

    /// Report for the requested zone and year (latest year when absent).
    pub async fn report(&self, state: &AppState) -> Result<DashboardReport, AppError> {
        let zone = self.zone()?;
        let report = match self.year {
            Some(year) => {
                state
                    .dashboard
                    .report_for(DashboardState::new(zone, year))
                    .await?
            }
            None => state.dashboard.report(zone).await?,
        };
        Ok(report)
    }
}
