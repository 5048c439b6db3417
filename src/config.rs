use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Name of the normalized DuckDB table every loaded CSV is materialized into.
pub const SALES_TABLE: &str = "sales";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Canonical column names of the `sales` table, in load order.
pub const CANONICAL_COLUMNS: [&str; 7] = [
    "year",
    "month",
    "branch",
    "product",
    "units_sold",
    "total_revenue",
    "total_cost",
];

// ---------------------------------------------------------------------------
// ColumnMap — CSV header names for each canonical column
// ---------------------------------------------------------------------------

/// Maps the headers of an input CSV onto the canonical `sales` columns.
///
/// The default is the Spanish header set the dashboard was built around
/// (`Año`, `Mes`, `Sucursal`, ...). Use [`ColumnMap::english`] for files
/// exported with English headers, or build a custom map field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub year: String,
    pub month: String,
    pub branch: String,
    pub product: String,
    pub units_sold: String,
    pub total_revenue: String,
    pub total_cost: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self::spanish()
    }
}

impl ColumnMap {
    pub fn spanish() -> Self {
        Self {
            year: "Año".to_string(),
            month: "Mes".to_string(),
            branch: "Sucursal".to_string(),
            product: "Producto".to_string(),
            units_sold: "Unidades_vendidas".to_string(),
            total_revenue: "Ingreso_total".to_string(),
            total_cost: "Costo_total".to_string(),
        }
    }

    pub fn english() -> Self {
        Self {
            year: "Year".to_string(),
            month: "Month".to_string(),
            branch: "Branch".to_string(),
            product: "Product".to_string(),
            units_sold: "UnitsSold".to_string(),
            total_revenue: "TotalRevenue".to_string(),
            total_cost: "TotalCost".to_string(),
        }
    }

    /// `(csv_header, canonical_name)` pairs in canonical column order.
    pub fn pairs(&self) -> [(&str, &'static str); 7] {
        [
            (self.year.as_str(), CANONICAL_COLUMNS[0]),
            (self.month.as_str(), CANONICAL_COLUMNS[1]),
            (self.branch.as_str(), CANONICAL_COLUMNS[2]),
            (self.product.as_str(), CANONICAL_COLUMNS[3]),
            (self.units_sold.as_str(), CANONICAL_COLUMNS[4]),
            (self.total_revenue.as_str(), CANONICAL_COLUMNS[5]),
            (self.total_cost.as_str(), CANONICAL_COLUMNS[6]),
        ]
    }

    /// Header names in canonical column order.
    pub fn headers(&self) -> Vec<&str> {
        self.pairs().iter().map(|(header, _)| *header).collect()
    }
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("sales-dashboard")
    } else {
        PathBuf::from(".sales-dashboard-cache")
    }
}
