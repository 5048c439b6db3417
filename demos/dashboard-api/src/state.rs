/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// The async dashboard. Dispatches blocking DuckDB work to a thread
    /// pool internally.
    pub dashboard: sales_dashboard::AsyncSalesDashboard,

    /// Where the loaded data came from: a path, a URL or `sample`.
    pub source: String,
}
