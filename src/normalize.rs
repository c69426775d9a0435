// Row normalization: resolve arbitrary column labels through a static
// alias table, coerce cells to typed fields, and drop rows whose primary
// date cannot be parsed.
use crate::types::{Dataset, NormalizedRow, RawRow};
use chrono::{Datelike, Days, NaiveDate};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

pub const UNKNOWN: &str = "不明";
pub const UNASSIGNED: &str = "未割当";
pub const UNCATEGORIZED: &str = "未分類";

/// Default mark for a design/planning cell that is included.
pub const FLAG_MARKER: char = '○';

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y年%m月%d日"];

// Spreadsheet serial dates count days from 1899-12-30; 2_958_465 is 9999-12-31.
const MAX_SERIAL_DATE: f64 = 2_958_465.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Date,
    Amount,
    Quantity,
    Client,
    Rep,
    Item,
    Region,
    Category,
    Design,
    Planning,
}

/// Accepted column labels per field, in priority order. Compared after
/// trimming and lowercasing both sides.
static ALIASES: Lazy<HashMap<CanonicalField, &'static [&'static str]>> = Lazy::new(|| {
    use CanonicalField::*;
    HashMap::from([
        (
            Date,
            &[
                "売上請求日",
                "請求日",
                "billing",
                "billing date",
                "invoice",
                "invoice date",
                "取引日",
                "売上日",
                "受注日",
                "日付",
                "transaction date",
                "order date",
                "date",
            ][..],
        ),
        (
            Amount,
            &["金額", "売上金額", "売上", "請求金額", "amount", "sales", "total", "revenue"][..],
        ),
        (Quantity, &["数量", "個数", "quantity", "qty", "units"][..]),
        (Client, &["顧客名", "顧客", "取引先", "client", "customer"][..]),
        (Rep, &["担当者", "営業担当", "担当", "rep", "sales rep", "owner"][..]),
        (Item, &["商品名", "品目", "商品", "item", "product"][..]),
        (Region, &["地域", "エリア", "region", "area"][..]),
        (Category, &["カテゴリ", "カテゴリー", "分類", "category"][..]),
        (Design, &["デザイン", "デザイン有無", "design"][..]),
        (Planning, &["企画", "企画有無", "planning"][..]),
    ])
});

pub fn aliases(field: CanonicalField) -> &'static [&'static str] {
    ALIASES.get(&field).copied().unwrap_or(&[])
}

/// The row's labels, trimmed and lowercased once so every field lookup is
/// a plain comparison.
struct ColumnIndex<'a> {
    columns: Vec<(String, &'a Value)>,
}

impl<'a> ColumnIndex<'a> {
    fn new(raw: &'a RawRow) -> Self {
        let columns = raw
            .iter()
            .map(|(label, value)| (label.trim().to_lowercase(), value))
            .collect();
        Self { columns }
    }

    fn resolve(&self, field: CanonicalField) -> Option<&'a Value> {
        aliases(field).iter().find_map(|alias| {
            let alias = alias.to_lowercase();
            self.columns
                .iter()
                .find(|(label, _)| *label == alias)
                .map(|(_, value)| *value)
        })
    }

    fn text(&self, field: CanonicalField, fallback: &str) -> String {
        self.resolve(field)
            .and_then(cell_text)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// String form of a cell; blank and null cells count as absent.
pub fn cell_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

/// Parse a numeric cell. Currency symbols, yen suffixes, grouping commas
/// and whitespace are ignored; non-finite results count as unparseable.
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '¥' | '￥' | '$' | '円' | ',') && !c.is_whitespace())
                .collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Parse the primary date of a row.
///
/// Accepts ISO-like and Japanese date strings (a trailing time part is
/// ignored), compact `YYYYMMDD`, and spreadsheet serial numbers either as
/// numbers or as numeric strings.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => n.as_f64().and_then(serial_to_date),
        Value::String(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let date_part = s.split(['T', ' ']).next().unwrap_or(s);
    if date_part.is_empty() {
        return None;
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
    {
        return Some(date);
    }
    if date_part.len() == 8 && date_part.bytes().all(|b| b.is_ascii_digit()) {
        let year = date_part[0..4].parse().ok()?;
        let month = date_part[4..6].parse().ok()?;
        let day = date_part[6..8].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    date_part.parse::<f64>().ok().and_then(serial_to_date)
}

fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..=MAX_SERIAL_DATE).contains(&serial) {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

pub fn month_key(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => format!("{:04}-{:02}", d.year(), d.month()),
        None => UNKNOWN.to_string(),
    }
}

/// Week of the month, `週1` to `週5`, counted in seven-day blocks from the 1st.
pub fn week_key(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => format!("週{}", d.day().div_ceil(7)),
        None => UNKNOWN.to_string(),
    }
}

fn flag(value: Option<&Value>, marker: char) -> bool {
    value
        .and_then(cell_text)
        .is_some_and(|text| text.contains(marker))
}

/// Normalize one raw row, or `None` when it has no parseable primary date.
pub fn normalize_row(raw: &RawRow) -> Option<NormalizedRow> {
    normalize_row_with_marker(raw, FLAG_MARKER)
}

/// [`normalize_row`] with a custom design/planning marker.
pub fn normalize_row_with_marker(raw: &RawRow, marker: char) -> Option<NormalizedRow> {
    let columns = ColumnIndex::new(raw);

    let date = columns.resolve(CanonicalField::Date).and_then(parse_date)?;
    let amount = columns
        .resolve(CanonicalField::Amount)
        .and_then(parse_number)
        .unwrap_or(0.0);
    let quantity = columns
        .resolve(CanonicalField::Quantity)
        .and_then(parse_number)
        .unwrap_or(1.0);

    Some(NormalizedRow {
        client: columns.text(CanonicalField::Client, UNKNOWN),
        rep: columns.text(CanonicalField::Rep, UNASSIGNED),
        item: columns.text(CanonicalField::Item, UNKNOWN),
        region: columns.text(CanonicalField::Region, UNKNOWN),
        category: columns.text(CanonicalField::Category, UNCATEGORIZED),
        date: Some(date),
        month_key: month_key(Some(date)),
        week_key: week_key(Some(date)),
        amount,
        quantity,
        design: flag(columns.resolve(CanonicalField::Design), marker),
        planning: flag(columns.resolve(CanonicalField::Planning), marker),
    })
}

/// Normalize a whole upload. Dropped rows are only counted, never reported
/// individually.
pub fn normalize_rows(raws: &[RawRow]) -> Dataset {
    normalize_rows_with_marker(raws, FLAG_MARKER)
}

pub fn normalize_rows_with_marker(raws: &[RawRow], marker: char) -> Dataset {
    let mut rows = Vec::with_capacity(raws.len());
    for (idx, raw) in raws.iter().enumerate() {
        match normalize_row_with_marker(raw, marker) {
            Some(row) => rows.push(row),
            None => debug!(row = idx + 1, "dropping row without a parseable date"),
        }
    }
    let dataset = Dataset {
        total_rows: raws.len(),
        dropped_rows: raws.len() - rows.len(),
        rows,
    };
    info!(
        total = dataset.total_rows,
        kept = dataset.rows.len(),
        dropped = dataset.dropped_rows,
        "normalized dataset"
    );
    dataset
}
