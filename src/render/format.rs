//! Display formatting for KPI values and deltas.
//!
//! Pure string helpers; nothing here knows about reports or records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer rendering with `,` thousands separators, e.g. `1,234,568`.
pub fn number(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    if !value.is_finite() {
        return rounded;
    }
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    format!("{}{}", sign, group_thousands(digits))
}

/// Currency rendering without decimals, e.g. `$1,235`.
pub fn currency(value: f64) -> String {
    format!("${}", number(value))
}

/// Percentage rendering without decimals, e.g. `50%`.
pub fn percent(value: f64) -> String {
    format!("{:.0}%", value)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Delta display
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Negative,
}

/// How a period-over-period variation is shown next to a KPI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaDisplay {
    pub arrow: &'static str,
    /// Signed magnitude with two decimals, e.g. `+12.50%`.
    pub text: String,
    pub tone: Tone,
}

impl fmt::Display for DeltaDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.arrow, self.text)
    }
}

/// Arrow, signed text and tone for a variation.
///
/// Only strictly positive values get the up arrow and `+` sign; zero is
/// shown as `↓ -0.00%` but keeps the positive tone.
pub fn delta(value: f64) -> DeltaDisplay {
    let up = value > 0.0;
    DeltaDisplay {
        arrow: if up { "↑" } else { "↓" },
        text: format!("{}{:.2}%", if up { "+" } else { "-" }, value.abs()),
        tone: if value >= 0.0 {
            Tone::Positive
        } else {
            Tone::Negative
        },
    }
}
