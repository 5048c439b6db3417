use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// SalesRecord — One row of the input dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SalesRecord {
    pub year: i32,
    /// `None` when the source row had no usable month. Such rows still count
    /// towards the yearly KPIs but are left out of the monthly trend.
    pub month: Option<u32>,
    pub branch: String,
    pub product: String,
    pub units_sold: f64,
    pub total_revenue: f64,
    pub total_cost: f64,
}

// ---------------------------------------------------------------------------
// Zone — Geographic filter over the branch column
// ---------------------------------------------------------------------------

/// Zone filter applied to the branch column.
///
/// Branch values are matched case-insensitively against both the English
/// zone name and the Spanish label used in the source files, so `North`
/// selects rows whose branch is `Norte` or `North`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    #[default]
    All,
    North,
    Central,
    South,
}

impl Zone {
    pub const ALL: [Zone; 4] = [Zone::All, Zone::North, Zone::Central, Zone::South];

    pub fn name(&self) -> &'static str {
        match self {
            Zone::All => "All",
            Zone::North => "North",
            Zone::Central => "Central",
            Zone::South => "South",
        }
    }

    /// Branch label as it appears in the source data.
    pub fn label(&self) -> &'static str {
        match self {
            Zone::All => "Todas",
            Zone::North => "Norte",
            Zone::Central => "Centro",
            Zone::South => "Sur",
        }
    }

    /// Lowercased branch spellings this zone accepts. Empty for [`Zone::All`].
    pub fn branch_keys(&self) -> Vec<String> {
        match self {
            Zone::All => Vec::new(),
            z => vec![z.name().to_lowercase(), z.label().to_lowercase()],
        }
    }

    pub fn matches(&self, branch: &str) -> bool {
        match self {
            Zone::All => true,
            z => {
                let b = branch.trim();
                b.eq_ignore_ascii_case(z.name()) || b.eq_ignore_ascii_case(z.label())
            }
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Zone {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Zone::ALL
            .into_iter()
            .find(|z| needle.eq_ignore_ascii_case(z.name()) || needle.eq_ignore_ascii_case(z.label()))
            .ok_or_else(|| DashboardError::InvalidArgument(format!("Unknown zone: {}", s)))
    }
}

// ---------------------------------------------------------------------------
// Dataset — Read-only ordered collection of records
// ---------------------------------------------------------------------------

/// The loaded sales table, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<SalesRecord>,
}

impl Dataset {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest year present, or `None` for an empty dataset.
    pub fn latest_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).max()
    }

    /// Records of one year restricted to a zone.
    pub fn slice(&self, year: i32, zone: Zone) -> Vec<SalesRecord> {
        self.records
            .iter()
            .filter(|r| r.year == year && zone.matches(&r.branch))
            .cloned()
            .collect()
    }

    /// Every record of a product, regardless of year or zone.
    pub fn for_product(&self, product: &str) -> Vec<SalesRecord> {
        self.records
            .iter()
            .filter(|r| r.product == product)
            .cloned()
            .collect()
    }

    /// Distinct product names in order of first appearance.
    pub fn products(&self) -> Vec<String> {
        distinct_products(&self.records)
    }
}

impl From<Vec<SalesRecord>> for Dataset {
    fn from(records: Vec<SalesRecord>) -> Self {
        Self::new(records)
    }
}

/// Distinct product names of a slice, in order of first appearance.
pub fn distinct_products(records: &[SalesRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for r in records {
        if !seen.iter().any(|p| p == &r.product) {
            seen.push(r.product.clone());
        }
    }
    seen
}
