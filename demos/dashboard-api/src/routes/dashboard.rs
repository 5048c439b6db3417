use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::routes::ZoneParams;
use crate::state::AppState;

/// GET /api/dashboard?zone=North&year=2023
///
/// Full report for a zone: title, state and one panel per product with its
/// indicators and trend series. `year` defaults to the latest in the data.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ZoneParams>,
) -> Result<Json<Value>, AppError> {
    let report = params.report(&state).await?;

    Ok(Json(json!({ "data": report })))
}
