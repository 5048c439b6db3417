//! Shared test fixtures for the sales dashboard integration tests.
//!
//! Provides `setup_sample_db()` which writes a small sales CSV to a temp
//! directory and loads it into a fresh in-memory DuckDB connection.
//!
//! Fixture rows (Spanish headers):
//!
//! | year | month | branch | product | units | revenue | cost |
//! |------|-------|--------|---------|-------|---------|------|
//! | 2022 | 1     | Norte  | Widget  | 100   | 1000    | 600  |
//! | 2022 | 2     | Sur    | Gadget  | 50    | 1000    | 700  |
//! | 2023 | 1     | Norte  | Widget  | 150   | 1800    | 900  |
//! | 2023 | 2     | Sur    | Gadget  | 40    | 800     | 500  |
//! | 2023 | 3     | Centro | Gadget  | 60    | 1200    | 600  |
//! | 2023 | 4     | Centro | Freebie | 0     | 0       | 50   |

#![allow(dead_code)]

use sales_dashboard::{CacheManager, Connection, SalesDashboard, SalesRecord};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const TOLERANCE: f64 = 1e-9;

pub const SAMPLE_CSV: &str = "\
Año,Mes,Sucursal,Producto,Unidades_vendidas,Ingreso_total,Costo_total
2022,1,Norte,Widget,100,1000,600
2022,2,Sur,Gadget,50,1000,700
2023,1,Norte,Widget,150,1800,900
2023,2,Sur,Gadget,40,800,500
2023,3,Centro,Gadget,60,1200,600
2023,4,Centro,Freebie,0,0,50
";

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

pub fn assert_all_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "length mismatch: {actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert_close(*a, *e);
    }
}

/// Write `contents` to `name` inside `dir` and return the path.
pub fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// A bare connection over an offline cache in a fresh temp directory.
///
/// The caller must keep the returned `TempDir` alive for the duration of
/// the test.
pub fn empty_connection() -> (Connection, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(
        Some(tmp_dir.path().join("cache")),
        true,
        Duration::from_secs(30),
    )
    .unwrap();
    let conn = Connection::new(cache).unwrap();
    (conn, tmp_dir)
}

/// A connection with `SAMPLE_CSV` loaded into the `sales` table.
pub fn setup_sample_db() -> (Connection, tempfile::TempDir) {
    let (conn, tmp_dir) = empty_connection();
    let path = write_csv(tmp_dir.path(), "ventas.csv", SAMPLE_CSV);
    conn.load_csv(&path, &Default::default()).unwrap();
    (conn, tmp_dir)
}

/// A full dashboard with `SAMPLE_CSV` loaded.
pub fn setup_dashboard() -> (SalesDashboard, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let dashboard = SalesDashboard::builder()
        .cache_dir(tmp_dir.path().join("cache"))
        .offline(true)
        .build()
        .unwrap();
    let path = write_csv(tmp_dir.path(), "ventas.csv", SAMPLE_CSV);
    dashboard.load_csv(&path).unwrap();
    (dashboard, tmp_dir)
}

/// Header row of `SAMPLE_CSV`.
pub const SPANISH_HEADER: &str =
    "Año,Mes,Sucursal,Producto,Unidades_vendidas,Ingreso_total,Costo_total";

pub fn record(
    year: i32,
    month: u32,
    branch: &str,
    product: &str,
    units: f64,
    revenue: f64,
    cost: f64,
) -> SalesRecord {
    SalesRecord {
        year,
        month: Some(month),
        branch: branch.to_string(),
        product: product.to_string(),
        units_sold: units,
        total_revenue: revenue,
        total_cost: cost,
    }
}
