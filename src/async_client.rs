//! Async access to a [`SalesDashboard`] for HTTP handlers and other Tokio tasks.
//!
//! CSV loading and report building hit DuckDB synchronously, so every call
//! is shipped to [`tokio::task::spawn_blocking`]. One dashboard (one loaded
//! `sales` table) is shared by all clones of the handle; a reload through any
//! clone is visible to every other clone on its next report.
//!
//! # Example
//!
//! ```no_run
//! use sales_dashboard::{AsyncSalesDashboard, Zone};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let dashboard = AsyncSalesDashboard::builder().build().await.unwrap();
//!     dashboard.load_csv("ventas.csv").await.unwrap();
//!
//!     let report = dashboard.report(Zone::All).await.unwrap();
//!     let years = dashboard.run(|d| d.sales().years()).await.unwrap();
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::{self, ColumnMap};
use crate::error::{DashboardError, Result};
use crate::models::{SalesRecord, Zone};
use crate::report::{DashboardReport, DashboardState};
use crate::SalesDashboard;

// ---------------------------------------------------------------------------
// AsyncSalesDashboardBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncSalesDashboard`] instance.
pub struct AsyncSalesDashboardBuilder {
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    columns: ColumnMap,
}

impl Default for AsyncSalesDashboardBuilder {
    fn default() -> Self {
        Self {
            cache_dir: None,
            offline: false,
            timeout: config::DEFAULT_TIMEOUT,
            columns: ColumnMap::default(),
        }
    }
}

impl AsyncSalesDashboardBuilder {
    /// Directory for downloaded sales CSVs and their ETag files.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Only serve URLs from files already in the cache.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout for remote downloads.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the CSV header names.
    pub fn columns(mut self, columns: ColumnMap) -> Self {
        self.columns = columns;
        self
    }

    /// Build the async dashboard on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncSalesDashboard> {
        tokio::task::spawn_blocking(move || {
            let mut builder = SalesDashboard::builder();
            if let Some(dir) = self.cache_dir {
                builder = builder.cache_dir(dir);
            }
            builder = builder
                .offline(self.offline)
                .timeout(self.timeout)
                .columns(self.columns);
            let dashboard = builder.build()?;
            Ok(AsyncSalesDashboard {
                inner: Arc::new(Mutex::new(dashboard)),
            })
        })
        .await
        .map_err(|e| DashboardError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncSalesDashboard
// ---------------------------------------------------------------------------

/// Async wrapper around [`SalesDashboard`].
///
/// The underlying [`SalesDashboard`] is protected by a [`Mutex`] since it
/// uses `RefCell` internally; operations run one at a time.
#[derive(Clone)]
pub struct AsyncSalesDashboard {
    inner: Arc<Mutex<SalesDashboard>>,
}

impl AsyncSalesDashboard {
    /// Create a new builder for configuring the async dashboard.
    pub fn builder() -> AsyncSalesDashboardBuilder {
        AsyncSalesDashboardBuilder::default()
    }

    /// Run any [`SalesDashboard`] call (queries, dataset access) off the async runtime.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&SalesDashboard) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let dashboard = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = dashboard
                .lock()
                .map_err(|_| DashboardError::InvalidArgument("Dashboard lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| DashboardError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Load a local CSV file asynchronously.
    pub async fn load_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let path = path.as_ref().to_path_buf();
        self.run(move |d| d.load_csv(&path)).await
    }

    /// Load a remote CSV asynchronously.
    pub async fn load_url(&self, url: &str) -> Result<usize> {
        let url = url.to_string();
        self.run(move |d| d.load_url(&url)).await
    }

    /// Replace the loaded data with in-memory records (e.g. generated samples).
    pub async fn load_records(&self, records: Vec<SalesRecord>) -> Result<usize> {
        self.run(move |d| d.load_records(&records)).await
    }

    /// Report for `zone` in the latest year of the loaded data.
    pub async fn report(&self, zone: Zone) -> Result<DashboardReport> {
        self.run(move |d| d.report(zone)).await
    }

    /// Report for an explicit zone and year.
    pub async fn report_for(&self, state: DashboardState) -> Result<DashboardReport> {
        self.run(move |d| d.report_for(&state)).await
    }

    /// Ad-hoc SQL against the loaded `sales` table, e.g. from a debug endpoint.
    pub async fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let query = query.to_string();
        let params = params.to_vec();
        self.run(move |d| d.sql(&query, &params)).await
    }

    /// Return the names of the loaded tables.
    pub async fn tables(&self) -> Result<Vec<String>> {
        self.run(|d| Ok(d.tables())).await
    }
}
