use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TrendPoint — Units sold in one (year, month) period
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrendPoint {
    pub year: i32,
    pub month: u32,
    /// First day of the period, `YYYY-MM-01`.
    pub date: String,
    pub units_sold: f64,
}

impl TrendPoint {
    pub fn new(year: i32, month: u32, units_sold: f64) -> Self {
        Self {
            year,
            month,
            date: format!("{:04}-{:02}-01", year, month),
            units_sold,
        }
    }
}

// ---------------------------------------------------------------------------
// TrendFit — Result of the least-squares fit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrendFit {
    pub slope: f64,
    pub intercept: f64,
    /// One fitted value per period, in chronological order.
    pub fitted: Vec<f64>,
}

// ---------------------------------------------------------------------------
// TrendSeries — Monthly series of one product with its trend line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrendSeries {
    pub product: String,
    pub points: Vec<TrendPoint>,
    /// Same length as `points`.
    pub fitted: Vec<f64>,
    pub slope: f64,
    pub intercept: f64,
}

impl TrendSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
