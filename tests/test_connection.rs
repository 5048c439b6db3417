//! Connection integration tests: CSV loading, validation and raw SQL execution.

mod common;

use sales_dashboard::{ColumnMap, DashboardError};

// ---------------------------------------------------------------------------
// load_csv
// ---------------------------------------------------------------------------

#[test]
fn load_csv_materializes_canonical_sales_table() {
    let (conn, _tmp) = common::setup_sample_db();

    let rows = conn
        .execute("SELECT * FROM sales ORDER BY row_id", &[])
        .unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0]["year"], 2022);
    assert_eq!(rows[0]["month"], 1);
    assert_eq!(rows[0]["branch"], "Norte");
    assert_eq!(rows[0]["product"], "Widget");
    assert_eq!(rows[0]["units_sold"].as_f64().unwrap(), 100.0);
    assert_eq!(rows[0]["total_revenue"].as_f64().unwrap(), 1000.0);
    assert_eq!(rows[0]["total_cost"].as_f64().unwrap(), 600.0);
}

#[test]
fn load_csv_preserves_file_order() {
    let (conn, _tmp) = common::setup_sample_db();

    let rows = conn
        .execute("SELECT product FROM sales ORDER BY row_id", &[])
        .unwrap();
    let products: Vec<&str> = rows.iter().map(|r| r["product"].as_str().unwrap()).collect();
    assert_eq!(
        products,
        vec!["Widget", "Gadget", "Widget", "Gadget", "Gadget", "Freebie"]
    );
}

#[test]
fn load_csv_returns_row_count_and_registers_table() {
    let (conn, tmp) = common::empty_connection();
    let path = common::write_csv(tmp.path(), "ventas.csv", common::SAMPLE_CSV);

    assert!(!conn.has_table("sales"));
    let loaded = conn.load_csv(&path, &ColumnMap::default()).unwrap();

    assert_eq!(loaded, 6);
    assert!(conn.has_table("sales"));
    assert_eq!(conn.tables(), vec!["sales".to_string()]);
}

#[test]
fn load_csv_replaces_previous_data() {
    let (conn, tmp) = common::setup_sample_db();
    let path = common::write_csv(
        tmp.path(),
        "other.csv",
        "Año,Mes,Sucursal,Producto,Unidades_vendidas,Ingreso_total,Costo_total\n\
         2024,5,Sur,Gizmo,7,70,35\n",
    );

    conn.load_csv(&path, &ColumnMap::default()).unwrap();

    let rows = conn.execute("SELECT product, year FROM sales", &[]).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["product"], "Gizmo");
    assert_eq!(rows[0]["year"], 2024);
}

#[test]
fn load_csv_reports_every_missing_column() {
    let (conn, tmp) = common::empty_connection();
    let path = common::write_csv(
        tmp.path(),
        "partial.csv",
        "Año,Mes,Producto,Unidades_vendidas\n2023,1,Widget,10\n",
    );

    let err = conn.load_csv(&path, &ColumnMap::default()).unwrap_err();
    match err {
        DashboardError::MissingColumns(cols) => {
            assert_eq!(cols, vec!["Sucursal", "Ingreso_total", "Costo_total"]);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
    assert!(!conn.has_table("sales"));
}

#[test]
fn load_csv_missing_file_is_not_found() {
    let (conn, tmp) = common::empty_connection();

    let err = conn
        .load_csv(&tmp.path().join("nope.csv"), &ColumnMap::default())
        .unwrap_err();
    assert!(matches!(err, DashboardError::NotFound(_)));
}

#[test]
fn load_csv_accepts_english_headers_with_english_map() {
    let (conn, tmp) = common::empty_connection();
    let path = common::write_csv(
        tmp.path(),
        "sales.csv",
        "Year,Month,Branch,Product,UnitsSold,TotalRevenue,TotalCost\n\
         2023,6,North,Widget,12,240,120\n",
    );

    let loaded = conn.load_csv(&path, &ColumnMap::english()).unwrap();
    assert_eq!(loaded, 1);

    let rows = conn.execute("SELECT branch, units_sold FROM sales", &[]).unwrap();
    assert_eq!(rows[0]["branch"], "North");
    assert_eq!(rows[0]["units_sold"].as_f64().unwrap(), 12.0);
}

#[test]
fn load_csv_counts_unparseable_measures_as_zero() {
    let (conn, tmp) = common::empty_connection();
    let path = common::write_csv(
        tmp.path(),
        "dirty.csv",
        "Año,Mes,Sucursal,Producto,Unidades_vendidas,Ingreso_total,Costo_total\n\
         2023,1,Norte,Widget,n/a,100,\n\
         2023,2,Norte,Widget,5,50,20\n",
    );

    conn.load_csv(&path, &ColumnMap::default()).unwrap();

    let rows = conn
        .execute("SELECT units_sold, total_cost FROM sales ORDER BY row_id", &[])
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["units_sold"].as_f64().unwrap(), 0.0);
    assert_eq!(rows[0]["total_cost"].as_f64().unwrap(), 0.0);
    assert_eq!(rows[1]["units_sold"].as_f64().unwrap(), 5.0);
}

#[test]
fn load_csv_drops_rows_without_year_or_product() {
    let (conn, tmp) = common::empty_connection();
    let path = common::write_csv(
        tmp.path(),
        "gaps.csv",
        "Año,Mes,Sucursal,Producto,Unidades_vendidas,Ingreso_total,Costo_total\n\
         2023,1,Norte,Widget,1,10,5\n\
         ,2,Norte,Widget,1,10,5\n\
         2023,13,Norte,Widget,1,10,5\n\
         2023,3,Norte,,1,10,5\n",
    );

    let loaded = conn.load_csv(&path, &ColumnMap::default()).unwrap();
    assert_eq!(loaded, 2);
}

#[test]
fn load_csv_keeps_rows_without_a_usable_month() {
    let (conn, tmp) = common::empty_connection();
    let path = common::write_csv(
        tmp.path(),
        "months.csv",
        &format!(
            "{}\n2023,1,Norte,Widget,100,1000,500\n2023,,Norte,Widget,50,500,250\n2023,13,Norte,Widget,5,50,25\n",
            common::SPANISH_HEADER
        ),
    );

    let loaded = conn.load_csv(&path, &ColumnMap::default()).unwrap();
    assert_eq!(loaded, 3);

    let rows = conn
        .execute("SELECT month FROM sales ORDER BY row_id", &[])
        .unwrap();
    assert_eq!(rows[0]["month"], 1);
    assert!(rows[1]["month"].is_null());
    assert!(rows[2]["month"].is_null());
}

// ---------------------------------------------------------------------------
// load_records
// ---------------------------------------------------------------------------

#[test]
fn load_records_creates_queryable_table() {
    let (conn, _tmp) = common::empty_connection();
    let records = vec![
        common::record(2023, 1, "Norte", "Widget", 10.0, 100.0, 40.0),
        common::record(2023, 2, "Sur", "Gadget", 3.0, 30.0, 10.0),
    ];

    let loaded = conn.load_records(&records).unwrap();
    assert_eq!(loaded, 2);

    let rows = conn
        .execute("SELECT product, month FROM sales ORDER BY row_id", &[])
        .unwrap();
    assert_eq!(rows[0]["product"], "Widget");
    assert_eq!(rows[1]["month"], 2);
}

// ---------------------------------------------------------------------------
// execute / execute_scalar / execute_into
// ---------------------------------------------------------------------------

#[test]
fn execute_with_params() {
    let (conn, _tmp) = common::setup_sample_db();

    let rows = conn
        .execute(
            "SELECT * FROM sales WHERE product = ?",
            &["Gadget".to_string()],
        )
        .unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn execute_returns_empty_for_no_matches() {
    let (conn, _tmp) = common::setup_sample_db();

    let rows = conn
        .execute(
            "SELECT * FROM sales WHERE product = ?",
            &["Nothing".to_string()],
        )
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn execute_scalar_returns_single_value() {
    let (conn, _tmp) = common::setup_sample_db();

    let result = conn
        .execute_scalar("SELECT COUNT(*) FROM sales", &[])
        .unwrap();
    assert_eq!(result.unwrap().as_i64().unwrap(), 6);
}

#[test]
fn execute_scalar_returns_none_for_empty_result() {
    let (conn, _tmp) = common::setup_sample_db();

    let result = conn
        .execute_scalar(
            "SELECT product FROM sales WHERE product = ?",
            &["Nothing".to_string()],
        )
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn execute_into_deserializes_rows() {
    let (conn, _tmp) = common::setup_sample_db();

    #[derive(serde::Deserialize, Debug)]
    struct Row {
        product: String,
        units_sold: f64,
    }

    let rows: Vec<Row> = conn
        .execute_into(
            "SELECT product, units_sold FROM sales WHERE year = 2023 ORDER BY row_id",
            &[],
        )
        .unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].product, "Widget");
    assert_eq!(rows[0].units_sold, 150.0);
}

#[test]
fn null_values_are_converted_to_json_null() {
    let (conn, _tmp) = common::setup_sample_db();

    let rows = conn.execute("SELECT NULL AS nothing", &[]).unwrap();
    assert!(rows[0]["nothing"].is_null());
}

// ---------------------------------------------------------------------------
// tables / reset_tables / raw
// ---------------------------------------------------------------------------

#[test]
fn require_table_fails_before_loading() {
    let (conn, _tmp) = common::empty_connection();

    let err = conn.require_table("sales").unwrap_err();
    assert!(matches!(err, DashboardError::NotFound(_)));
}

#[test]
fn reset_tables_drops_loaded_data() {
    let (conn, _tmp) = common::setup_sample_db();

    conn.reset_tables().unwrap();

    assert!(conn.tables().is_empty());
    assert!(conn.execute("SELECT * FROM sales", &[]).is_err());
}

#[test]
fn raw_provides_access_to_underlying_duckdb_connection() {
    let (conn, _tmp) = common::setup_sample_db();

    conn.raw()
        .execute_batch("CREATE TABLE raw_test (id INTEGER, value TEXT); INSERT INTO raw_test VALUES (1, 'hello')")
        .unwrap();

    let rows = conn.execute("SELECT * FROM raw_test", &[]).unwrap();
    assert_eq!(rows[0]["value"], "hello");
}
