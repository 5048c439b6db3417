mod error;
mod routes;
mod state;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use sales_dashboard::sample::{self, SampleConfig};
use sales_dashboard::AsyncSalesDashboard;
use tower_http::cors::CorsLayer;

use state::AppState;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    log::info!("Initializing sales dashboard...");
    let dashboard = AsyncSalesDashboard::builder().build().await?;

    // SALES_CSV may be a local path or an http(s) URL; without it the API
    // serves the seeded sample data.
    let source = match std::env::var("SALES_CSV") {
        Ok(src) if src.contains("://") => {
            let rows = dashboard.load_url(&src).await?;
            log::info!("Loaded {} rows from {}", rows, src);
            src
        }
        Ok(src) => {
            let rows = dashboard.load_csv(&src).await?;
            log::info!("Loaded {} rows from {}", rows, src);
            src
        }
        Err(_) => {
            let records = sample::generate(&SampleConfig::default());
            let rows = dashboard.load_records(records).await?;
            log::info!("SALES_CSV not set; loaded {} sample rows", rows);
            "sample".to_string()
        }
    };

    let state = Arc::new(AppState { dashboard, source });

    let app = Router::new()
        .route("/api/meta", get(routes::meta::get_meta))
        .route("/api/dashboard", get(routes::dashboard::get_dashboard))
        .route("/api/products", get(routes::products::list_products))
        .route(
            "/api/products/{product}/trend",
            get(routes::products::get_trend),
        )
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    log::info!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
