//! Aggregator tests: per-product KPIs and period-over-period deltas.

mod common;

use common::{assert_close, record};
use sales_dashboard::analytics::{aggregate_period, compute_indicators};
use sales_dashboard::models::{IndicatorDelta, PeriodAggregate};
use sales_dashboard::SalesRecord;

fn widget_2022() -> Vec<SalesRecord> {
    vec![record(2022, 1, "Norte", "Widget", 100.0, 1000.0, 600.0)]
}

fn widget_2023() -> Vec<SalesRecord> {
    vec![record(2023, 1, "Norte", "Widget", 150.0, 1800.0, 900.0)]
}

// ---------------------------------------------------------------------------
// aggregate_period
// ---------------------------------------------------------------------------

#[test]
fn aggregate_sums_only_the_selected_product() {
    let rows = vec![
        record(2023, 1, "Norte", "Widget", 10.0, 200.0, 50.0),
        record(2023, 2, "Sur", "Widget", 30.0, 400.0, 150.0),
        record(2023, 1, "Norte", "Gadget", 999.0, 9999.0, 1.0),
    ];

    let agg = aggregate_period(&rows, "Widget");
    assert_close(agg.units_sold, 40.0);
    assert_close(agg.average_price, 600.0 / 40.0);
    assert_close(agg.margin_percent, (600.0 - 200.0) / 600.0 * 100.0);
}

#[test]
fn average_price_is_zero_without_units() {
    let rows = vec![record(2023, 1, "Norte", "Widget", 0.0, 500.0, 100.0)];

    let agg = aggregate_period(&rows, "Widget");
    assert_eq!(agg.average_price, 0.0);
    assert_close(agg.margin_percent, 80.0);
}

#[test]
fn margin_is_zero_without_revenue() {
    let rows = vec![record(2023, 1, "Norte", "Widget", 5.0, 0.0, 100.0)];

    let agg = aggregate_period(&rows, "Widget");
    assert_eq!(agg.margin_percent, 0.0);
    assert_eq!(agg.average_price, 0.0);
    assert_close(agg.units_sold, 5.0);
}

#[test]
fn empty_slice_aggregates_to_zero() {
    let agg = aggregate_period(&[], "Widget");
    assert_eq!(agg, PeriodAggregate::default());
}

#[test]
fn unknown_product_aggregates_to_zero() {
    let agg = aggregate_period(&widget_2023(), "Nothing");
    assert_eq!(agg, PeriodAggregate::default());
}

#[test]
fn margin_can_be_negative_when_cost_exceeds_revenue() {
    let rows = vec![record(2023, 1, "Norte", "Widget", 10.0, 100.0, 150.0)];

    let agg = aggregate_period(&rows, "Widget");
    assert_close(agg.margin_percent, -50.0);
}

// ---------------------------------------------------------------------------
// compute_indicators
// ---------------------------------------------------------------------------

#[test]
fn widget_year_over_year_example() {
    let current = widget_2023();
    let previous = widget_2022();

    let ind = compute_indicators(&current, "Widget", Some(&previous));

    assert_close(ind.current.margin_percent, 50.0);
    assert_close(ind.previous.unwrap().margin_percent, 40.0);
    assert_close(ind.delta.margin_change_pts, 10.0);

    assert_close(ind.current.average_price, 12.0);
    assert_close(ind.delta.price_change_pct, 20.0);

    assert_close(ind.current.units_sold, 150.0);
    assert_close(ind.delta.units_change_pct, 50.0);
}

#[test]
fn units_delta_is_relative_change_when_both_nonzero() {
    let cases = [(150.0, 100.0), (80.0, 100.0), (3.0, 7.0), (100.0, 100.0)];
    for (cur_units, prev_units) in cases {
        let current = vec![record(2023, 1, "Norte", "Widget", cur_units, 10.0, 1.0)];
        let previous = vec![record(2022, 1, "Norte", "Widget", prev_units, 10.0, 1.0)];

        let ind = compute_indicators(&current, "Widget", Some(&previous));
        assert_close(
            ind.delta.units_change_pct,
            (cur_units - prev_units) / prev_units * 100.0,
        );
    }
}

#[test]
fn deltas_are_zero_without_previous_slice() {
    let ind = compute_indicators(&widget_2023(), "Widget", None);

    assert!(ind.previous.is_none());
    assert_eq!(ind.delta, IndicatorDelta::default());
    assert_close(ind.current.units_sold, 150.0);
}

#[test]
fn relative_deltas_are_zero_when_previous_is_empty() {
    let ind = compute_indicators(&widget_2023(), "Widget", Some(&[]));

    assert_eq!(ind.delta.price_change_pct, 0.0);
    assert_eq!(ind.delta.units_change_pct, 0.0);
    // Margin is a point difference against a zero previous margin.
    assert_close(ind.delta.margin_change_pts, 50.0);
}

#[test]
fn negative_changes_are_reported() {
    let current = vec![record(2023, 1, "Norte", "Widget", 50.0, 400.0, 300.0)];
    let previous = widget_2022();

    let ind = compute_indicators(&current, "Widget", Some(&previous));
    assert_close(ind.delta.units_change_pct, -50.0);
    assert_close(ind.delta.price_change_pct, -20.0);
    assert_close(ind.delta.margin_change_pts, 25.0 - 40.0);
}

#[test]
fn delta_between_is_consistent_with_compute_indicators() {
    let current = widget_2023();
    let previous = widget_2022();

    let ind = compute_indicators(&current, "Widget", Some(&previous));
    let direct = IndicatorDelta::between(&ind.current, &ind.previous.unwrap());
    assert_eq!(ind.delta, direct);
}

#[test]
fn results_are_never_nan() {
    let current = vec![record(2023, 1, "Norte", "Widget", 0.0, 0.0, 0.0)];
    let previous = vec![record(2022, 1, "Norte", "Widget", 0.0, 0.0, 0.0)];

    let ind = compute_indicators(&current, "Widget", Some(&previous));
    for v in [
        ind.current.average_price,
        ind.current.margin_percent,
        ind.current.units_sold,
        ind.delta.price_change_pct,
        ind.delta.margin_change_pts,
        ind.delta.units_change_pct,
    ] {
        assert!(v.is_finite());
        assert_eq!(v, 0.0);
    }
}
