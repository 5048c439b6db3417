use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use sales_dashboard::Zone;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/meta
///
/// Returns the data source, row count, available years, branches, every
/// product in file order and the zone names accepted by the other endpoints.
pub async fn get_meta(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let (rows, years, branches, products) = state
        .dashboard
        .run(|d| {
            let q = d.sales();
            Ok((q.count()?, q.years()?, q.branches()?, d.dataset()?.products()))
        })
        .await?;

    let zones: Vec<&str> = Zone::ALL.iter().map(|z| z.name()).collect();

    Ok(Json(json!({
        "source": state.source,
        "rows": rows,
        "years": years,
        "latest_year": years.last(),
        "branches": branches,
        "products": products,
        "zones": zones
    })))
}
