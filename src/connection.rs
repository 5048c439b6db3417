//! DuckDB connection wrapper with CSV loading and query execution.
//!
//! Every input file is normalized into a single `sales` table with
//! canonical column names, so the query layer never has to know which
//! headers the CSV used.

use crate::cache::CacheManager;
use crate::config::{ColumnMap, SALES_TABLE};
use crate::error::{DashboardError, Result};
use crate::models::SalesRecord;
use duckdb::{params, types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;

const STAGING_TABLE: &str = "sales_staging";

const SALES_DDL: &str = "CREATE OR REPLACE TABLE sales (\
     row_id BIGINT, \
     year INTEGER, \
     month INTEGER, \
     branch VARCHAR, \
     product VARCHAR, \
     units_sold DOUBLE, \
     total_revenue DOUBLE, \
     total_cost DOUBLE)";

/// Wraps a DuckDB connection and materializes sales CSV files as tables.
pub struct Connection {
    conn: DuckDbConnection,
    /// The cache manager used to download remote CSV files.
    pub cache: RefCell<CacheManager>,
    registered_tables: RefCell<HashSet<String>>,
}

impl Connection {
    /// Create a connection backed by the given cache.
    ///
    /// Opens an in-memory DuckDB database.
    pub fn new(cache: CacheManager) -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self {
            conn,
            cache: RefCell::new(cache),
            registered_tables: RefCell::new(HashSet::new()),
        })
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    /// Automatically converts DuckDB types to `serde_json::Value`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        log::debug!("execute: {}", sql);
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available after the query has run.
        let column_names: Vec<String> = {
            let executed = rows_result.as_ref().ok_or_else(|| {
                DashboardError::InvalidArgument("Query returned no statement metadata".into())
            })?;
            executed
                .column_names()
                .into_iter()
                .map(|s| s.to_string())
                .collect()
        };

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, col_name) in column_names.iter().enumerate() {
                let value = convert_value_ref(row.get_ref(i)?);
                map.insert(col_name.clone(), value);
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(
                row.into_iter().collect::<serde_json::Map<String, serde_json::Value>>(),
            );
            let item: T = serde_json::from_value(value)?;
            results.push(item);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        log::debug!("execute_scalar: {}", sql);
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            let value = convert_value_ref(row.get_ref(0)?);
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Load a sales CSV into the `sales` table, replacing any previous data.
    ///
    /// The header row is checked against `columns` first; every missing
    /// header is reported in a single [`DashboardError::MissingColumns`].
    /// Measures that fail to parse count as zero and a month outside 1-12
    /// loads as NULL. Rows without a usable year or product are dropped with
    /// a warning.
    ///
    /// Returns the number of rows loaded.
    pub fn load_csv(&self, path: &Path, columns: &ColumnMap) -> Result<usize> {
        if !path.exists() {
            return Err(DashboardError::NotFound(format!(
                "CSV file {} does not exist",
                path.display()
            )));
        }
        // Use forward slashes for DuckDB compatibility
        let path_str = path.to_string_lossy().replace('\\', "/");
        let source = format!("read_csv_auto('{}', header = true)", escape_literal(&path_str));

        let present = self.describe_columns(&source)?;
        let missing: Vec<String> = columns
            .headers()
            .into_iter()
            .filter(|h| !present.iter().any(|p| p == h))
            .map(|h| h.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DashboardError::MissingColumns(missing));
        }

        let [year, month, branch, product, units, revenue, cost] = columns.pairs();
        self.conn.execute_batch(&format!(
            "CREATE OR REPLACE TEMP TABLE {staging} AS \
             SELECT \
               row_number() OVER () AS row_id, \
               TRY_CAST({y} AS INTEGER) AS year, \
               CASE WHEN TRY_CAST({m} AS INTEGER) BETWEEN 1 AND 12 \
                 THEN TRY_CAST({m} AS INTEGER) END AS month, \
               COALESCE(CAST({b} AS VARCHAR), '') AS branch, \
               CAST({p} AS VARCHAR) AS product, \
               COALESCE(TRY_CAST({u} AS DOUBLE), 0) AS units_sold, \
               COALESCE(TRY_CAST({r} AS DOUBLE), 0) AS total_revenue, \
               COALESCE(TRY_CAST({c} AS DOUBLE), 0) AS total_cost \
             FROM {source}",
            staging = STAGING_TABLE,
            y = quote_ident(year.0),
            m = quote_ident(month.0),
            b = quote_ident(branch.0),
            p = quote_ident(product.0),
            u = quote_ident(units.0),
            r = quote_ident(revenue.0),
            c = quote_ident(cost.0),
            source = source,
        ))?;

        let total = self.count_rows(STAGING_TABLE)?;

        self.conn.execute_batch(SALES_DDL)?;
        self.conn.execute_batch(&format!(
            "INSERT INTO {sales} \
             SELECT row_id, year, month, branch, product, units_sold, total_revenue, total_cost \
             FROM {staging} \
             WHERE year IS NOT NULL \
               AND product IS NOT NULL \
             ORDER BY row_id; \
             DROP TABLE {staging};",
            sales = SALES_TABLE,
            staging = STAGING_TABLE,
        ))?;

        let loaded = self.count_rows(SALES_TABLE)?;
        if loaded < total {
            log::warn!(
                "Dropped {} of {} rows from {} without a valid year or product",
                total - loaded,
                total,
                path.display()
            );
        }

        self.registered_tables
            .borrow_mut()
            .insert(SALES_TABLE.to_string());
        log::info!("Registered table: {} -> {} ({} rows)", SALES_TABLE, path_str, loaded);

        Ok(loaded)
    }

    /// Download (or reuse a cached copy of) a remote CSV and load it.
    pub fn load_remote(&self, url: &str, columns: &ColumnMap) -> Result<usize> {
        let path = self.cache.borrow_mut().ensure_remote(url)?;
        self.load_csv(&path, columns)
    }

    /// Replace the `sales` table with in-memory records.
    ///
    /// Returns the number of rows loaded.
    pub fn load_records(&self, records: &[SalesRecord]) -> Result<usize> {
        self.conn.execute_batch(SALES_DDL)?;
        let mut stmt = self
            .conn
            .prepare("INSERT INTO sales VALUES (?, ?, ?, ?, ?, ?, ?, ?)")?;
        for (i, r) in records.iter().enumerate() {
            stmt.execute(params![
                (i + 1) as i64,
                r.year,
                r.month.map(i64::from),
                r.branch,
                r.product,
                r.units_sold,
                r.total_revenue,
                r.total_cost
            ])?;
        }

        self.registered_tables
            .borrow_mut()
            .insert(SALES_TABLE.to_string());
        log::info!("Registered table: {} ({} in-memory rows)", SALES_TABLE, records.len());

        Ok(records.len())
    }

    /// Check whether a table has been registered.
    pub fn has_table(&self, name: &str) -> bool {
        self.registered_tables.borrow().contains(name)
    }

    /// Fail with [`DashboardError::NotFound`] unless `name` is registered.
    pub fn require_table(&self, name: &str) -> Result<()> {
        if self.has_table(name) {
            Ok(())
        } else {
            Err(DashboardError::NotFound(format!(
                "Table '{}' is not loaded; load a CSV file first",
                name
            )))
        }
    }

    /// Return a list of all registered table names.
    pub fn tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registered_tables.borrow().iter().cloned().collect();
        names.sort();
        names
    }

    /// Drop every registered table.
    pub fn reset_tables(&self) -> Result<()> {
        let names = self.tables();
        for name in &names {
            self.conn
                .execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_ident(name)))?;
        }
        self.registered_tables.borrow_mut().clear();
        Ok(())
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }

    /// Column names of a table function or query source, read with DESCRIBE.
    ///
    /// Only sniffs the CSV header and sample rows; no full scan.
    fn describe_columns(&self, source: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT column_name FROM (DESCRIBE SELECT * FROM {})",
            source
        ))?;

        let mut rows = stmt.query([])?;
        let mut cols: Vec<String> = Vec::new();
        while let Some(row) = rows.next()? {
            let col_name: String = row.get(0)?;
            cols.push(col_name);
        }
        Ok(cols)
    }

    fn count_rows(&self, table: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UTinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::USmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // SUM over integer columns widens to HUGEINT
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => {
            serde_json::Value::String(String::from_utf8_lossy(bytes).to_string())
        }
        _ => serde_json::Value::Null,
    }
}
