use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use sales_dashboard::analytics::series_from_periods;
use sales_dashboard::render::kpis;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::routes::ZoneParams;
use crate::state::AppState;

/// GET /api/products?zone=South
///
/// Products sold in the zone in `year` (default: latest), with raw indicators and
/// the formatted KPI tiles (value, arrow, signed delta, tone).
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ZoneParams>,
) -> Result<Json<Value>, AppError> {
    let report = params.report(&state).await?;

    let products: Vec<Value> = report
        .panels
        .iter()
        .map(|p| {
            json!({
                "product": p.product,
                "indicators": p.indicators,
                "kpis": kpis(&p.indicators)
            })
        })
        .collect();

    let count = products.len();
    Ok(Json(json!({
        "title": report.title,
        "state": report.state,
        "data": products,
        "count": count
    })))
}

/// GET /api/products/:product/trend
///
/// Monthly units of one product across all years and zones with its
/// least-squares trend line.
pub async fn get_trend(
    State(state): State<Arc<AppState>>,
    Path(product): Path<String>,
) -> Result<Json<Value>, AppError> {
    let name = product.clone();
    let series = state
        .dashboard
        .run(move |d| {
            let rows = d.sales().monthly_units(&name)?;
            Ok(series_from_periods(&name, &rows))
        })
        .await?;

    if series.is_empty() {
        return Err(AppError::not_found(format!(
            "No sales recorded for product '{product}'"
        )));
    }

    Ok(Json(json!({ "data": series })))
}
