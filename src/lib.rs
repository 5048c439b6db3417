//! Sales dashboard core for Rust.
//!
//! Loads a CSV of monthly sales records into an in-process DuckDB database
//! and computes, per product, the average unit price, margin percentage and
//! units sold with year-over-year deltas, plus a monthly units series with a
//! least-squares trend line. Results can be filtered by zone and rendered as
//! text or JSON.
//!
//! # Quick start
//!
//! ```no_run
//! use sales_dashboard::{SalesDashboard, Zone};
//! use sales_dashboard::render::{Renderer, TextRenderer};
//!
//! let dashboard = SalesDashboard::builder().build().unwrap();
//! dashboard.load_csv("ventas.csv").unwrap();
//!
//! let report = dashboard.report(Zone::North).unwrap();
//! println!("{}", TextRenderer::default().render(&report).unwrap());
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod analytics;
pub mod cache;
pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod queries;
pub mod render;
pub mod report;
pub mod sample;
pub mod sql_builder;

#[cfg(feature = "async")]
pub use async_client::AsyncSalesDashboard;
pub use cache::CacheManager;
pub use config::ColumnMap;
pub use connection::Connection;
pub use error::{DashboardError, Result};
pub use models::{Dataset, SalesRecord, Zone};
pub use report::{DashboardReport, DashboardState, ProductPanel};
pub use sql_builder::SqlBuilder;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// SalesDashboardBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`SalesDashboard`] instance.
pub struct SalesDashboardBuilder {
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    columns: ColumnMap,
}

impl Default for SalesDashboardBuilder {
    fn default() -> Self {
        Self {
            cache_dir: None,
            offline: false,
            timeout: config::DEFAULT_TIMEOUT,
            columns: ColumnMap::default(),
        }
    }
}

impl SalesDashboardBuilder {
    /// Set a custom cache directory for downloaded CSV files.
    ///
    /// If not set, the platform-appropriate default cache directory is used
    /// (e.g. `~/.cache/sales-dashboard` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, remote sources are only served from the cache.
    /// Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout for remote downloads.
    ///
    /// Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the CSV header names. Defaults to [`ColumnMap::spanish`].
    pub fn columns(mut self, columns: ColumnMap) -> Self {
        self.columns = columns;
        self
    }

    /// Build the dashboard, initializing the cache and DuckDB connection.
    ///
    /// No data is loaded yet.
    pub fn build(self) -> Result<SalesDashboard> {
        let cache = CacheManager::new(self.cache_dir, self.offline, self.timeout)?;
        let conn = Connection::new(cache)?;
        Ok(SalesDashboard {
            conn,
            columns: self.columns,
        })
    }
}

// ---------------------------------------------------------------------------
// SalesDashboard
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns a [`Connection`] (DuckDB database plus download cache) and the
/// column mapping used when loading CSV files.
pub struct SalesDashboard {
    conn: Connection,
    columns: ColumnMap,
}

impl SalesDashboard {
    /// Create a new builder for configuring the dashboard.
    pub fn builder() -> SalesDashboardBuilder {
        SalesDashboardBuilder::default()
    }

    // -- Loading -----------------------------------------------------------

    /// Load a local CSV file, replacing any previously loaded data.
    ///
    /// Returns the number of rows loaded.
    pub fn load_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        self.conn.load_csv(path.as_ref(), &self.columns)
    }

    /// Load a CSV from an HTTP(S) URL through the local cache.
    pub fn load_url(&self, url: &str) -> Result<usize> {
        self.conn.load_remote(url, &self.columns)
    }

    /// Load in-memory records, replacing any previously loaded data.
    pub fn load_records(&self, records: &[SalesRecord]) -> Result<usize> {
        self.conn.load_records(records)
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the sales query interface.
    pub fn sales(&self) -> queries::SalesQuery<'_> {
        queries::SalesQuery::new(&self.conn)
    }

    /// The loaded table as an in-memory [`Dataset`].
    pub fn dataset(&self) -> Result<Dataset> {
        self.sales().dataset()
    }

    /// Dashboard state for `zone`, with the current year taken from the data.
    pub fn state(&self, zone: Zone) -> Result<DashboardState> {
        let year = self
            .sales()
            .latest_year()?
            .ok_or(DashboardError::EmptyDataset)?;
        Ok(DashboardState::new(zone, year))
    }

    /// Compute the full report for `zone`.
    pub fn report(&self, zone: Zone) -> Result<DashboardReport> {
        let dataset = self.dataset()?;
        let state = DashboardState::for_dataset(&dataset, zone)?;
        Ok(DashboardReport::build(&dataset, &state))
    }

    /// Compute the report for an explicit state (e.g. a different year).
    pub fn report_for(&self, state: &DashboardState) -> Result<DashboardReport> {
        let dataset = self.dataset()?;
        Ok(DashboardReport::build(&dataset, state))
    }

    // -- Metadata and utility methods --------------------------------------

    /// The column mapping used for CSV loading.
    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Names of the loaded DuckDB tables.
    pub fn tables(&self) -> Vec<String> {
        self.conn.tables()
    }

    /// Execute a raw SQL query against the DuckDB database.
    ///
    /// # Arguments
    ///
    /// * `query` - SQL string with `?` positional placeholders.
    /// * `params` - Parameter values corresponding to the placeholders.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Remove every downloaded file from the cache.
    pub fn clear_cache(&self) -> Result<()> {
        self.conn.cache.borrow().clear()
    }

    /// Consume the dashboard and release all resources.
    pub fn close(self) {
        drop(self);
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for SalesDashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.conn.tables();
        let cache = self.conn.cache.borrow();
        write!(
            f,
            "SalesDashboard(cache_dir={}, tables=[{}], offline={})",
            cache.cache_dir.display(),
            tables.join(", "),
            cache.offline
        )
    }
}
