//! Sales queries against the normalized DuckDB `sales` table.

use serde::Deserialize;

use crate::config::SALES_TABLE;
use crate::error::Result;
use crate::models::{Dataset, PeriodTotals, SalesRecord, Zone};
use crate::sql_builder::SqlBuilder;

const RECORD_COLUMNS: [&str; 7] = [
    "year",
    "month",
    "branch",
    "product",
    "units_sold",
    "total_revenue",
    "total_cost",
];

// ---------------------------------------------------------------------------
// SalesFilter
// ---------------------------------------------------------------------------

/// Row filter for [`SalesQuery::records`].
#[derive(Debug, Clone, Default)]
pub struct SalesFilter {
    pub year: Option<i32>,
    pub zone: Zone,
    pub product: Option<String>,
}

impl SalesFilter {
    pub fn year(year: i32, zone: Zone) -> Self {
        Self {
            year: Some(year),
            zone,
            product: None,
        }
    }
}

#[derive(Deserialize)]
struct MonthlyRow {
    year: i32,
    month: u32,
    units_sold: f64,
}

// ---------------------------------------------------------------------------
// SalesQuery
// ---------------------------------------------------------------------------

/// Query interface over the `sales` table.
pub struct SalesQuery<'a> {
    conn: &'a crate::connection::Connection,
}

impl<'a> SalesQuery<'a> {
    /// Create a new `SalesQuery` bound to the given connection.
    pub fn new(conn: &'a crate::connection::Connection) -> Self {
        Self { conn }
    }

    /// Number of loaded rows.
    pub fn count(&self) -> Result<i64> {
        self.conn.require_table(SALES_TABLE)?;

        let (sql, params) = SqlBuilder::new(SALES_TABLE)
            .select(&["COUNT(*) AS cnt"])
            .build();
        let cnt = self
            .conn
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(cnt)
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Result<Vec<i32>> {
        self.conn.require_table(SALES_TABLE)?;

        let (sql, params) = SqlBuilder::new(SALES_TABLE)
            .select(&["year"])
            .distinct()
            .order_by(&["year ASC"])
            .build();
        let rows = self.conn.execute(&sql, &params)?;
        Ok(rows
            .iter()
            .filter_map(|r| r.get("year").and_then(|v| v.as_i64()))
            .map(|y| y as i32)
            .collect())
    }

    /// Highest year in the table, or `None` when it is empty.
    pub fn latest_year(&self) -> Result<Option<i32>> {
        self.conn.require_table(SALES_TABLE)?;

        let (sql, params) = SqlBuilder::new(SALES_TABLE)
            .select(&["MAX(year) AS latest"])
            .build();
        Ok(self
            .conn
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_i64())
            .map(|y| y as i32))
    }

    /// Distinct branch values, sorted.
    pub fn branches(&self) -> Result<Vec<String>> {
        self.conn.require_table(SALES_TABLE)?;

        let (sql, params) = SqlBuilder::new(SALES_TABLE)
            .select(&["branch"])
            .distinct()
            .order_by(&["branch ASC"])
            .build();
        let rows = self.conn.execute(&sql, &params)?;
        Ok(rows
            .iter()
            .filter_map(|r| r.get("branch").and_then(|v| v.as_str()))
            .map(|s| s.to_string())
            .collect())
    }

    /// Products sold in a year and zone, in order of first appearance.
    ///
    /// `year = None` covers every year.
    pub fn products(&self, year: Option<i32>, zone: Zone) -> Result<Vec<String>> {
        self.conn.require_table(SALES_TABLE)?;

        let mut qb = SqlBuilder::new(SALES_TABLE);
        qb.select(&["product", "MIN(row_id) AS first_seen"]);
        if let Some(y) = year {
            qb.where_int("year", y as i64);
        }
        apply_zone(&mut qb, zone);
        qb.group_by(&["product"]);
        qb.order_by(&["first_seen ASC"]);

        let (sql, params) = qb.build();
        let rows = self.conn.execute(&sql, &params)?;
        Ok(rows
            .iter()
            .filter_map(|r| r.get("product").and_then(|v| v.as_str()))
            .map(|s| s.to_string())
            .collect())
    }

    /// Records matching `filter`, in file order.
    pub fn records(&self, filter: &SalesFilter) -> Result<Vec<SalesRecord>> {
        self.conn.require_table(SALES_TABLE)?;

        let mut qb = SqlBuilder::new(SALES_TABLE);
        qb.select(&RECORD_COLUMNS);
        if let Some(y) = filter.year {
            qb.where_int("year", y as i64);
        }
        apply_zone(&mut qb, filter.zone);
        if let Some(ref product) = filter.product {
            qb.where_eq("product", product);
        }
        qb.order_by(&["row_id ASC"]);

        let (sql, params) = qb.build();
        self.conn.execute_into(&sql, &params)
    }

    /// The whole table as an in-memory [`Dataset`].
    pub fn dataset(&self) -> Result<Dataset> {
        Ok(Dataset::new(self.records(&SalesFilter::default())?))
    }

    /// Units, revenue and cost of one product summed in SQL.
    pub fn period_totals(&self, product: &str, year: i32, zone: Zone) -> Result<PeriodTotals> {
        self.conn.require_table(SALES_TABLE)?;

        let mut qb = SqlBuilder::new(SALES_TABLE);
        qb.select(&[
            "COALESCE(SUM(units_sold), 0) AS units_sold",
            "COALESCE(SUM(total_revenue), 0) AS total_revenue",
            "COALESCE(SUM(total_cost), 0) AS total_cost",
        ]);
        qb.where_eq("product", product);
        qb.where_int("year", year as i64);
        apply_zone(&mut qb, zone);

        let (sql, params) = qb.build();
        let rows: Vec<PeriodTotals> = self.conn.execute_into(&sql, &params)?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    /// Units of one product per (year, month), chronologically ordered.
    ///
    /// Rows without a month are left out.
    pub fn monthly_units(&self, product: &str) -> Result<Vec<(i32, u32, f64)>> {
        self.conn.require_table(SALES_TABLE)?;

        let (sql, params) = SqlBuilder::new(SALES_TABLE)
            .select(&["year", "month", "SUM(units_sold) AS units_sold"])
            .where_eq("product", product)
            .where_clause("month IS NOT NULL", &[])
            .group_by(&["year", "month"])
            .order_by(&["year ASC", "month ASC"])
            .build();
        let rows: Vec<MonthlyRow> = self.conn.execute_into(&sql, &params)?;
        Ok(rows
            .into_iter()
            .map(|r| (r.year, r.month, r.units_sold))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn apply_zone(qb: &mut SqlBuilder, zone: Zone) {
    let keys = zone.branch_keys();
    if keys.is_empty() {
        return;
    }
    let refs: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
    qb.where_in("LOWER(TRIM(branch))", &refs);
}
