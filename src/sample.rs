//! Deterministic synthetic sales data.
//!
//! Produces a full monthly grid (year x month x zone x product) with mild
//! year-over-year growth and random noise, seeded so the same config always
//! yields the same rows. Used by the demos when no CSV is at hand.

use std::path::Path;

use rand::prelude::*;

use crate::config::ColumnMap;
use crate::error::Result;
use crate::models::{SalesRecord, Zone};

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub seed: u64,
    pub years: Vec<i32>,
    pub products: Vec<String>,
    /// Zones to generate branches for; [`Zone::All`] is skipped.
    pub zones: Vec<Zone>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            years: vec![2022, 2023],
            products: ["Widget", "Gadget", "Gizmo"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            zones: vec![Zone::North, Zone::Central, Zone::South],
        }
    }
}

/// Generate records in year, month, zone, product order.
///
/// Branch values use the Spanish data labels (`Norte`, `Centro`, `Sur`).
pub fn generate(config: &SampleConfig) -> Vec<SalesRecord> {
    let mut rng = StdRng::seed_from_u64(config.seed);

    // Per-product base volume, unit price and cost ratio.
    let profiles: Vec<(f64, f64, f64)> = config
        .products
        .iter()
        .map(|_| {
            (
                rng.gen_range(50.0..200.0),
                rng.gen_range(10.0..50.0),
                rng.gen_range(0.55..0.75),
            )
        })
        .collect();

    let zones: Vec<Zone> = config
        .zones
        .iter()
        .copied()
        .filter(|z| *z != Zone::All)
        .collect();

    let mut records = Vec::with_capacity(
        config.years.len() * 12 * zones.len() * config.products.len(),
    );
    for (year_idx, &year) in config.years.iter().enumerate() {
        let growth = 1.0 + 0.05 * year_idx as f64;
        for month in 1..=12u32 {
            for zone in &zones {
                for (product, &(base, price, cost_ratio)) in config.products.iter().zip(&profiles) {
                    let units = (base * growth * rng.gen_range(0.8..1.2)).round();
                    let revenue = (units * price * rng.gen_range(0.95..1.05)).round();
                    let cost = (revenue * cost_ratio * rng.gen_range(0.97..1.03)).round();
                    records.push(SalesRecord {
                        year,
                        month: Some(month),
                        branch: zone.label().to_string(),
                        product: product.clone(),
                        units_sold: units,
                        total_revenue: revenue,
                        total_cost: cost,
                    });
                }
            }
        }
    }
    records
}

/// Write records as CSV with the headers of `columns`.
///
/// A record without a month gets an empty `month` field.
pub fn write_csv(records: &[SalesRecord], path: &Path, columns: &ColumnMap) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(columns.headers())?;
    for r in records {
        writer.write_record(&[
            r.year.to_string(),
            r.month.map(|m| m.to_string()).unwrap_or_default(),
            r.branch.clone(),
            r.product.clone(),
            r.units_sold.to_string(),
            r.total_revenue.to_string(),
            r.total_cost.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
