// Core data structures shared by the pipeline: raw spreadsheet rows, the
// normalized record every aggregation works on, and the aggregate/insight
// output shapes.
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

/// One decoded spreadsheet row: column label → cell value.
///
/// Labels are whatever the sheet used (any case, any language), so no
/// schema is imposed until `normalize::normalize_row`.
pub type RawRow = Map<String, Value>;

/// Fully normalized sales record.
///
/// By the time a `NormalizedRow` exists we have:
/// - resolved every column through the alias table,
/// - parsed the primary date (rows without one never get here),
/// - coerced amount/quantity to finite numbers, and
/// - filled sentinels for missing labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRow {
    pub client: String,
    pub rep: String,
    pub item: String,
    pub region: String,
    pub category: String,
    pub date: Option<NaiveDate>,
    pub month_key: String,
    pub week_key: String,
    pub amount: f64,
    pub quantity: f64,
    pub design: bool,
    pub planning: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlagCounts {
    pub design: usize,
    pub planning: usize,
}

/// Running totals for one group value (one client, one month, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateBucket {
    pub label: String,
    pub amount: f64,
    pub quantity: f64,
    pub order_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<FlagCounts>,
}

impl AggregateBucket {
    pub fn new(label: impl Into<String>, with_flags: bool) -> Self {
        Self {
            label: label.into(),
            amount: 0.0,
            quantity: 0.0,
            order_count: 0,
            flags: with_flags.then(FlagCounts::default),
        }
    }
}

/// A templated recommendation derived from the ranked aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub title: String,
    pub detail: String,
}

impl Insight {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
        }
    }
}

/// The normalized rows of one upload plus what was lost on the way.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dataset {
    pub rows: Vec<NormalizedRow>,
    pub total_rows: usize,
    pub dropped_rows: usize,
}

/// Headline figures shown above the tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_amount: f64,
    pub total_quantity: f64,
    pub order_count: usize,
    pub average_order_value: f64,
    pub client_count: usize,
    pub item_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}
